//! Source configuration
//!
//! `SourceConfig` holds everything a source needs to talk to the search API:
//! the API key and query plus the knobs that distinguish the single-page and
//! paginated presets. It can be built in code, or loaded from a JSON or YAML
//! file.

use crate::error::{Error, Result};
use crate::flatten::FlattenStrategy;
use crate::types::{ErrorPolicy, SourceMode};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Article Search endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.nytimes.com/svc/search/v2/articlesearch.json";

/// Pause after each successful fetch in paginated mode
pub const DEFAULT_RATE_LIMIT_PAUSE: Duration = Duration::from_secs(6);

/// Request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Source Config
// ============================================================================

/// Configuration for a search source
///
/// Optional fields override the defaults of the selected [`SourceMode`].
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Static API key sent as the `api-key` query parameter
    #[serde(default)]
    pub api_key: String,

    /// Search query sent as the `q` query parameter
    #[serde(default)]
    pub query: String,

    /// Search endpoint URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Preset for pagination, flattening and error handling
    #[serde(default)]
    pub mode: SourceMode,

    /// Flattening strategy override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flatten: Option<FlattenStrategy>,

    /// Error policy override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_policy: Option<ErrorPolicy>,

    /// Pause after each successful fetch, in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_limit_pause_ms: Option<u64>,

    /// Upper bound on pages fetched per batch sequence (unbounded when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_pages: Option<u32>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl SourceConfig {
    /// Create a paginated config for the given key and query
    pub fn new(api_key: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            query: query.into(),
            endpoint: default_endpoint(),
            mode: SourceMode::default(),
            flatten: None,
            error_policy: None,
            rate_limit_pause_ms: None,
            max_pages: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Create a config that reads page 0 once and fails fast
    pub fn single_page(api_key: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            mode: SourceMode::SinglePage,
            ..Self::new(api_key, query)
        }
    }

    /// Create a config that reads every page and fails soft
    pub fn paginated(api_key: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            mode: SourceMode::Paginated,
            ..Self::new(api_key, query)
        }
    }

    /// Create a new config builder
    pub fn builder(api_key: impl Into<String>, query: impl Into<String>) -> SourceConfigBuilder {
        SourceConfigBuilder {
            config: Self::new(api_key, query),
        }
    }

    /// Parse and validate a config from JSON
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a config from YAML
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let config = Self::parse_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a config file without validating it, picking the format from
    /// its extension
    ///
    /// `.yaml` and `.yml` are parsed as YAML, anything else as JSON.
    pub fn parse_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                Error::Io(e)
            }
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => Ok(serde_yaml::from_str(&content)?),
            _ => Ok(serde_json::from_str(&content)?),
        }
    }

    /// Check the config for values the source cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(Error::missing_field("api_key"));
        }

        let url = Url::parse(&self.endpoint)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::invalid_value(
                "endpoint",
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }

        if self.timeout_secs == 0 {
            return Err(Error::invalid_value("timeout_secs", "must be positive"));
        }

        if self.max_pages == Some(0) {
            return Err(Error::invalid_value("max_pages", "must be positive"));
        }

        Ok(())
    }

    /// Effective flattening strategy
    pub fn flatten_strategy(&self) -> FlattenStrategy {
        self.flatten.unwrap_or(match self.mode {
            SourceMode::SinglePage => FlattenStrategy::Full,
            SourceMode::Paginated => FlattenStrategy::Projected,
        })
    }

    /// Effective error policy
    pub fn effective_error_policy(&self) -> ErrorPolicy {
        self.error_policy.unwrap_or(match self.mode {
            SourceMode::SinglePage => ErrorPolicy::FailFast,
            SourceMode::Paginated => ErrorPolicy::FailSoft,
        })
    }

    /// Effective pause after each successful fetch
    pub fn rate_limit_pause(&self) -> Duration {
        match (self.rate_limit_pause_ms, self.mode) {
            (Some(ms), _) => Duration::from_millis(ms),
            (None, SourceMode::SinglePage) => Duration::ZERO,
            (None, SourceMode::Paginated) => DEFAULT_RATE_LIMIT_PAUSE,
        }
    }

    /// Request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl std::fmt::Debug for SourceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceConfig")
            .field("api_key", &mask_secret(&self.api_key))
            .field("query", &self.query)
            .field("endpoint", &self.endpoint)
            .field("mode", &self.mode)
            .field("flatten", &self.flatten)
            .field("error_policy", &self.error_policy)
            .field("rate_limit_pause_ms", &self.rate_limit_pause_ms)
            .field("max_pages", &self.max_pages)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Mask all but the last four characters of a secret
fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{tail}")
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`SourceConfig`]
#[derive(Debug, Clone)]
pub struct SourceConfigBuilder {
    config: SourceConfig,
}

impl SourceConfigBuilder {
    /// Set the search endpoint
    #[must_use]
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = endpoint.into();
        self
    }

    /// Set the mode preset
    #[must_use]
    pub fn mode(mut self, mode: SourceMode) -> Self {
        self.config.mode = mode;
        self
    }

    /// Override the flattening strategy
    #[must_use]
    pub fn flatten(mut self, strategy: FlattenStrategy) -> Self {
        self.config.flatten = Some(strategy);
        self
    }

    /// Override the error policy
    #[must_use]
    pub fn error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.config.error_policy = Some(policy);
        self
    }

    /// Override the pause after each successful fetch
    #[must_use]
    pub fn rate_limit_pause(mut self, pause: Duration) -> Self {
        self.config.rate_limit_pause_ms = Some(pause.as_millis() as u64);
        self
    }

    /// Bound the number of pages fetched per batch sequence
    #[must_use]
    pub fn max_pages(mut self, max_pages: u32) -> Self {
        self.config.max_pages = Some(max_pages);
        self
    }

    /// Set the request timeout (whole seconds, rounded up)
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        let secs = timeout.as_secs() + u64::from(timeout.subsec_nanos() > 0);
        self.config.timeout_secs = secs;
        self
    }

    /// Validate and build the config
    pub fn build(self) -> Result<SourceConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
