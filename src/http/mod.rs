//! HTTP client module
//!
//! Provides the HTTP session used by sources and the rate-limit pause.
//!
//! # Features
//!
//! - **Session reuse**: one `reqwest::Client` per source
//! - **Status classification**: non-2xx responses become errors
//! - **Pause**: fixed wait between calls, swappable for tests

mod client;
mod pause;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
pub use pause::{Pause, RecordingPause, TokioPause};

#[cfg(test)]
mod tests;
