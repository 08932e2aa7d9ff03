//! Log sinks
//!
//! Sources do not log through a process-wide logger. They are handed a
//! [`LogSink`] and report through it; [`TracingSink`] forwards to `tracing`
//! and [`MemorySink`] keeps entries in memory for harnesses and tests.

use crate::types::LogLevel;
use chrono::{DateTime, Utc};
use std::sync::{Mutex, PoisonError};

/// Destination for connector log messages
pub trait LogSink: Send + Sync {
    /// Record a message at the given level
    fn log(&self, level: LogLevel, message: &str);

    /// Record a debug message
    fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    /// Record an info message
    fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    /// Record a warning
    fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    /// Record an error
    fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }
}

// ============================================================================
// Tracing Sink
// ============================================================================

/// Sink that emits `tracing` events under the `nytimes_source` target
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Trace => tracing::trace!(target: "nytimes_source", "{message}"),
            LogLevel::Debug => tracing::debug!(target: "nytimes_source", "{message}"),
            LogLevel::Info => tracing::info!(target: "nytimes_source", "{message}"),
            LogLevel::Warn => tracing::warn!(target: "nytimes_source", "{message}"),
            LogLevel::Error => tracing::error!(target: "nytimes_source", "{message}"),
        }
    }
}

// ============================================================================
// Memory Sink
// ============================================================================

/// A log message captured by [`MemorySink`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Log level
    pub level: LogLevel,
    /// Log message
    pub message: String,
    /// When the message was recorded
    pub logged_at: DateTime<Utc>,
}

/// Sink that keeps every message in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// All entries recorded so far, oldest first
    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock().clone()
    }

    /// Messages recorded at exactly `level`
    pub fn messages_at(&self, level: LogLevel) -> Vec<String> {
        self.lock()
            .iter()
            .filter(|entry| entry.level == level)
            .map(|entry| entry.message.clone())
            .collect()
    }

    /// Messages recorded at error level
    pub fn errors(&self) -> Vec<String> {
        self.messages_at(LogLevel::Error)
    }

    /// Number of entries recorded
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop all recorded entries
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<LogEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LogSink for MemorySink {
    fn log(&self, level: LogLevel, message: &str) {
        self.lock().push(LogEntry {
            level,
            message: message.to_string(),
            logged_at: Utc::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_memory_sink_records_in_order() {
        let sink = MemorySink::new();
        sink.debug("first");
        sink.error("second");
        sink.info("third");

        let entries = sink.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].level, LogLevel::Debug);
        assert_eq!(entries[1].message, "second");
        assert!(entries[0].logged_at <= entries[2].logged_at);
    }

    #[test]
    fn test_memory_sink_filters_by_level() {
        let sink = MemorySink::new();
        sink.warn("careful");
        sink.error("broken");
        sink.error("still broken");

        assert_eq!(sink.errors(), vec!["broken", "still broken"]);
        assert_eq!(sink.messages_at(LogLevel::Warn), vec!["careful"]);
        assert!(sink.messages_at(LogLevel::Info).is_empty());
    }

    #[test]
    fn test_memory_sink_clear() {
        let sink = MemorySink::new();
        assert!(sink.is_empty());
        sink.info("hello");
        assert_eq!(sink.len(), 1);
        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn test_sinks_as_trait_objects() {
        let memory = Arc::new(MemorySink::new());
        let sinks: Vec<Arc<dyn LogSink>> = vec![Arc::new(TracingSink), memory.clone()];
        for sink in &sinks {
            sink.log(LogLevel::Info, "shared");
        }
        assert_eq!(memory.messages_at(LogLevel::Info), vec!["shared"]);
    }
}
