//! Lazy batch sequence
//!
//! A `BatchStream` walks result pages one fetch at a time. It stops at the
//! first empty page, after the only page in single-page mode, after
//! `max_pages` fetches when a bound is configured, or after an error.
//! Once stopped it yields nothing further.

use super::connector::NyTimesSource;
use crate::error::{Error, Result};
use crate::types::{Batch, SourceMode};
use futures::Stream;
use std::pin::Pin;

/// Boxed stream of batches handed to harnesses
pub type BatchResultStream<'a> = Pin<Box<dyn Stream<Item = Result<Batch>> + Send + 'a>>;

/// Batch sequence over one source
pub struct BatchStream<'a> {
    source: &'a NyTimesSource,
    batch_size: usize,
    /// Next page to fetch, which is also the number of pages fetched
    page: u32,
    batches_emitted: usize,
    done: bool,
}

impl<'a> BatchStream<'a> {
    pub(crate) fn new(source: &'a NyTimesSource, batch_size: usize) -> Self {
        Self {
            source,
            batch_size,
            page: 0,
            batches_emitted: 0,
            done: false,
        }
    }

    /// Whether another call to `next_batch` may produce a batch
    ///
    /// `true` does not promise a batch: the next page may turn out empty.
    pub fn has_next(&self) -> bool {
        !self.done
    }

    /// Maximum records per batch
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Pages fetched so far
    pub fn pages_fetched(&self) -> u32 {
        self.page
    }

    /// Batches handed out so far
    pub fn batches_emitted(&self) -> usize {
        self.batches_emitted
    }

    /// Fetch until the next batch is ready
    ///
    /// Returns `Ok(None)` once the sequence is exhausted. An error ends the
    /// sequence.
    pub async fn next_batch(&mut self) -> Result<Option<Batch>> {
        let result = self.advance().await;
        if result.is_err() {
            self.done = true;
        }
        result
    }

    async fn advance(&mut self) -> Result<Option<Batch>> {
        let source = self.source;
        let config = source.config();
        let log = source.log();

        while !self.done {
            if let Some(max_pages) = config.max_pages {
                if self.page >= max_pages {
                    log.info(&format!(
                        "Reached max_pages ({max_pages}), ending batch sequence"
                    ));
                    self.done = true;
                    break;
                }
            }

            let page = self.page;
            let documents = source.fetch_page(page).await?;
            self.page += 1;

            if config.mode == SourceMode::SinglePage {
                // Only page 0 is ever read, and its batch is emitted even when empty
                self.done = true;
            } else if documents.is_empty() {
                log.debug(&format!("Page {page} is empty, ending batch sequence"));
                self.done = true;
                break;
            }

            let mut batch = source.flatten(&documents)?;
            batch.truncate(self.batch_size);

            if batch.is_empty() && config.mode == SourceMode::Paginated {
                continue;
            }

            self.batches_emitted += 1;
            log.debug(&format!(
                "Batch {} with {} records from page {page}",
                self.batches_emitted - 1,
                batch.len()
            ));
            return Ok(Some(batch));
        }

        Ok(None)
    }

    /// Turn the sequence into a `futures` stream
    pub fn into_stream(self) -> BatchResultStream<'a> {
        Box::pin(futures::stream::try_unfold(self, |mut batches| async move {
            let next = batches.next_batch().await?;
            Ok::<_, Error>(next.map(|batch| (batch, batches)))
        }))
    }
}

impl std::fmt::Debug for BatchStream<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchStream")
            .field("batch_size", &self.batch_size)
            .field("page", &self.page)
            .field("batches_emitted", &self.batches_emitted)
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}
