//! Search source
//!
//! The connector itself: fetches pages of search hits, flattens them, and
//! hands them to the caller in bounded batches.
//!
//! # Overview
//!
//! - [`Source`] - the lifecycle contract a batch-ingestion harness drives
//! - [`NyTimesSource`] - the Article Search implementation
//! - [`BatchStream`] - lazy batch sequence with an internal page counter

mod batches;
mod connector;

pub use batches::{BatchResultStream, BatchStream};
pub use connector::{NyTimesSource, Source, DECLARED_SCHEMA};
