//! Rate-limit pause
//!
//! The search API allows only a handful of calls per minute, so paginated
//! sources wait a fixed interval after every successful fetch. The wait
//! goes through [`Pause`] so callers can swap the clock out.

use async_trait::async_trait;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Something that can wait for a duration
#[async_trait]
pub trait Pause: Send + Sync {
    /// Wait for `duration`
    async fn pause(&self, duration: Duration);
}

/// Pause backed by `tokio::time::sleep`
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPause;

#[async_trait]
impl Pause for TokioPause {
    async fn pause(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

/// Pause that returns immediately and remembers every requested duration
#[derive(Debug, Default)]
pub struct RecordingPause {
    calls: Mutex<Vec<Duration>>,
}

impl RecordingPause {
    /// Create a new recording pause
    pub fn new() -> Self {
        Self::default()
    }

    /// Durations requested so far, in order
    pub fn calls(&self) -> Vec<Duration> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Total time that would have been spent waiting
    pub fn total(&self) -> Duration {
        self.calls().iter().sum()
    }
}

#[async_trait]
impl Pause for RecordingPause {
    async fn pause(&self, duration: Duration) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(duration);
    }
}

#[cfg(test)]
mod pause_tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn test_tokio_pause_waits() {
        let start = Instant::now();
        TokioPause.pause(Duration::from_millis(20)).await;
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[tokio::test]
    async fn test_tokio_pause_zero_returns_immediately() {
        let start = Instant::now();
        TokioPause.pause(Duration::ZERO).await;
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_recording_pause() {
        let pause = RecordingPause::new();
        pause.pause(Duration::from_secs(6)).await;
        pause.pause(Duration::from_secs(6)).await;

        assert_eq!(pause.calls(), vec![Duration::from_secs(6); 2]);
        assert_eq!(pause.total(), Duration::from_secs(12));
    }
}
