//! Source trait and the Article Search connector

use super::batches::{BatchResultStream, BatchStream};
use crate::config::SourceConfig;
use crate::error::{Error, Result};
use crate::flatten::json_kind;
use crate::http::{HttpClient, HttpClientConfig, Pause, RequestConfig, TokioPause};
use crate::logging::{LogSink, TracingSink};
use crate::types::{ErrorPolicy, JsonValue, Record};
use std::sync::Arc;

/// Column names reported by [`Source::get_schema`]
///
/// These are the names the ingestion harness was promised. They do not
/// match the keys flattening actually produces (`headline.main`, `_id`, ...).
pub const DECLARED_SCHEMA: [&str; 7] = [
    "title",
    "body",
    "created_at",
    "id",
    "summary",
    "abstract",
    "keywords",
];

// ============================================================================
// Source Trait
// ============================================================================

/// Lifecycle contract between a source and a batch-ingestion harness
pub trait Source: Send + Sync {
    /// Prepare the source for reading
    ///
    /// The incremental-extraction parameters are accepted for compatibility
    /// with the harness and otherwise ignored.
    fn connect(&mut self, inc_column: Option<&str>, max_inc_value: Option<&JsonValue>)
        -> Result<()>;

    /// Release the source
    fn disconnect(&mut self) -> Result<()>;

    /// Start a lazy sequence of batches holding at most `batch_size` records
    fn get_data_batch(&self, batch_size: usize) -> Result<BatchResultStream<'_>>;

    /// Column names the source declares
    fn get_schema(&self) -> Vec<String>;
}

// ============================================================================
// Search Response
// ============================================================================

/// Pull `response.docs` out of a search response body
///
/// A missing `response`, or a missing or null `docs`, yields no documents.
/// Elements are returned as-is; flattening checks that each is an object.
fn parse_documents(body: &str) -> Result<Vec<JsonValue>> {
    let envelope: JsonValue = serde_json::from_str(body)
        .map_err(|e| Error::decode(format!("Failed to parse search response: {e}")))?;

    let mut envelope = match envelope {
        JsonValue::Object(map) => map,
        other => {
            return Err(Error::invalid_document(format!(
                "search response is {}, expected an object",
                json_kind(&other)
            )))
        }
    };

    let mut response = match envelope.remove("response") {
        None => return Ok(Vec::new()),
        Some(JsonValue::Object(map)) => map,
        Some(other) => {
            return Err(Error::invalid_document(format!(
                "`response` is {}, expected an object",
                json_kind(&other)
            )))
        }
    };

    match response.remove("docs") {
        None | Some(JsonValue::Null) => Ok(Vec::new()),
        Some(JsonValue::Array(docs)) => Ok(docs),
        Some(other) => Err(Error::invalid_document(format!(
            "`docs` is {}, expected an array",
            json_kind(&other)
        ))),
    }
}

// ============================================================================
// NY Times Source
// ============================================================================

/// Source reading the New York Times Article Search API
pub struct NyTimesSource {
    config: SourceConfig,
    client: HttpClient,
    log: Arc<dyn LogSink>,
    pause: Arc<dyn Pause>,
    connected: bool,
}

impl NyTimesSource {
    /// Create a source from a validated config
    ///
    /// Logs go to `tracing` and pauses use the tokio timer until replaced
    /// with [`with_log_sink`](Self::with_log_sink) and
    /// [`with_pause`](Self::with_pause).
    pub fn new(config: SourceConfig) -> Result<Self> {
        config.validate()?;

        let client = HttpClient::with_config(
            HttpClientConfig::builder()
                .timeout(config.timeout())
                .build(),
        )?;

        Ok(Self {
            config,
            client,
            log: Arc::new(TracingSink),
            pause: Arc::new(TokioPause),
            connected: false,
        })
    }

    /// Set the log sink
    #[must_use]
    pub fn with_log_sink(mut self, log: Arc<dyn LogSink>) -> Self {
        self.log = log;
        self
    }

    /// Set the pause implementation
    #[must_use]
    pub fn with_pause(mut self, pause: Arc<dyn Pause>) -> Self {
        self.pause = pause;
        self
    }

    /// Get the configuration
    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    /// Whether `connect` has been called without a matching `disconnect`
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub(crate) fn log(&self) -> &dyn LogSink {
        self.log.as_ref()
    }

    /// Fetch the raw documents on one result page
    ///
    /// Under [`ErrorPolicy::FailSoft`] a failed request is logged and comes
    /// back as an empty page, which ends any batch sequence reading it.
    /// A body that parses but has the wrong shape is always an error.
    pub async fn fetch_page(&self, page: u32) -> Result<Vec<JsonValue>> {
        match self.request_page(page).await {
            Ok(documents) => {
                self.log.debug(&format!(
                    "Page {page}: fetched {} documents",
                    documents.len()
                ));
                Ok(documents)
            }
            Err(e)
                if e.is_fetch_failure()
                    && self.config.effective_error_policy() == ErrorPolicy::FailSoft =>
            {
                self.log.error(&format!("Failed to fetch data: {e}"));
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    async fn request_page(&self, page: u32) -> Result<Vec<JsonValue>> {
        let request = RequestConfig::new()
            .query("q", &self.config.query)
            .query("page", page.to_string())
            .query("api-key", &self.config.api_key);

        let response = self
            .client
            .get_with_config(&self.config.endpoint, request)
            .await?;

        // Stay under the API's per-minute quota
        let pause = self.config.rate_limit_pause();
        if !pause.is_zero() {
            self.pause.pause(pause).await;
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::Http(e.without_url()))?;
        parse_documents(&body)
    }

    /// Flatten documents with the configured strategy
    pub fn flatten(&self, documents: &[JsonValue]) -> Result<Vec<Record>> {
        self.config.flatten_strategy().apply(documents)
    }

    /// Start a batch sequence with explicit `has_next` / `next_batch` control
    pub fn batches(&self, batch_size: usize) -> Result<BatchStream<'_>> {
        if batch_size == 0 {
            return Err(Error::invalid_value(
                "batch_size",
                "must be a positive integer",
            ));
        }
        Ok(BatchStream::new(self, batch_size))
    }
}

impl Source for NyTimesSource {
    fn connect(
        &mut self,
        inc_column: Option<&str>,
        max_inc_value: Option<&JsonValue>,
    ) -> Result<()> {
        self.log.debug(&format!("Incremental column: {inc_column:?}"));
        self.log.debug(&format!("Incremental last value: {max_inc_value:?}"));
        self.connected = true;
        Ok(())
    }

    fn disconnect(&mut self) -> Result<()> {
        self.connected = false;
        self.log.debug("Disconnected from source");
        Ok(())
    }

    fn get_data_batch(&self, batch_size: usize) -> Result<BatchResultStream<'_>> {
        Ok(self.batches(batch_size)?.into_stream())
    }

    fn get_schema(&self) -> Vec<String> {
        DECLARED_SCHEMA.iter().map(|s| (*s).to_string()).collect()
    }
}

impl std::fmt::Debug for NyTimesSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NyTimesSource")
            .field("config", &self.config)
            .field("connected", &self.connected)
            .finish_non_exhaustive()
    }
}
