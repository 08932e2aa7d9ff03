//! # NY Times Source
//!
//! A batch source connector for the New York Times Article Search API.
//!
//! ## Features
//!
//! - **Page walking**: one HTTP call per result page, stopping at the first
//!   empty page
//! - **Flattening**: full (every leaf under a dotted path) or projected
//!   (`web_url`, `headline.main`, `_id`)
//! - **Bounded batches**: never more than `batch_size` records per batch
//! - **Rate-limit pause**: fixed wait after each successful fetch
//! - **Injected logging**: sources report through a [`logging::LogSink`]
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use futures::StreamExt;
//! use nytimes_source::{NyTimesSource, Result, Source, SourceConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = SourceConfig::paginated("my-api-key", "Silicon Valley");
//!     let mut source = NyTimesSource::new(config)?;
//!     source.connect(None, None)?;
//!
//!     let mut batches = source.get_data_batch(10)?;
//!     while let Some(batch) = batches.next().await {
//!         for record in batch? {
//!             println!("{} - {}", record["_id"], record["headline.main"]);
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Source trait                         │
//! │  connect()   get_data_batch(n) → Stream<Batch>   get_schema │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//!        ┌───────────────┬──────┴────────┬────────────────┐
//!        │  BatchStream  │     HTTP      │    Flatten     │
//!        ├───────────────┼───────────────┼────────────────┤
//!        │ Page counter  │ Session       │ Full           │
//!        │ Truncation    │ Status check  │ Projected      │
//!        │ Stop rules    │ Pause         │                │
//!        └───────────────┴───────────────┴────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Source configuration
pub mod config;

/// Injected log sinks
pub mod logging;

/// HTTP session and rate-limit pause
pub mod http;

/// Document flattening
pub mod flatten;

/// Source trait and the Article Search connector
pub mod source;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::SourceConfig;
pub use error::{Error, Result};
pub use source::{BatchStream, NyTimesSource, Source};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
