//! Common types used throughout the connector
//!
//! Shared type aliases for documents, records and batches, plus the log
//! level used by the injected log sink.

use serde::{Deserialize, Serialize};

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// A single search hit as returned by the API, arbitrarily nested
pub type RawDocument = JsonObject;

/// A flattened, single-level record, keys in document order
pub type Record = JsonObject;

/// An ordered group of records handed to the caller in one step
pub type Batch = Vec<Record>;

// ============================================================================
// Source Mode
// ============================================================================

/// Preset describing how a source walks the search results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceMode {
    /// Fetch page 0 once, full flatten, fail fast, no pause
    SinglePage,
    /// Fetch pages until one comes back empty, projected flatten,
    /// fail soft, fixed pause after every successful fetch
    #[default]
    Paginated,
}

impl std::str::FromStr for SourceMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "single_page" | "single" => Ok(Self::SinglePage),
            "paginated" | "paged" => Ok(Self::Paginated),
            other => Err(format!("unknown source mode: {other}")),
        }
    }
}

// ============================================================================
// Error Policy
// ============================================================================

/// What a failed page fetch does to the batch sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Return the error and end the sequence
    FailFast,
    /// Log the error and treat the page as empty
    FailSoft,
}

// ============================================================================
// Log Level
// ============================================================================

/// Log level for connector messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "TRACE"),
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warn => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_to_tracing() {
        assert_eq!(tracing::Level::from(LogLevel::Debug), tracing::Level::DEBUG);
        assert_eq!(tracing::Level::from(LogLevel::Error), tracing::Level::ERROR);
    }

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Error > LogLevel::Warn);
        assert!(LogLevel::Debug < LogLevel::Info);
    }

    #[test]
    fn test_source_mode_from_str() {
        assert_eq!("single-page".parse::<SourceMode>(), Ok(SourceMode::SinglePage));
        assert_eq!("SINGLE_PAGE".parse::<SourceMode>(), Ok(SourceMode::SinglePage));
        assert_eq!("paginated".parse::<SourceMode>(), Ok(SourceMode::Paginated));
        assert!("streaming".parse::<SourceMode>().is_err());
    }

    #[test]
    fn test_source_mode_default_is_paginated() {
        assert_eq!(SourceMode::default(), SourceMode::Paginated);
    }

    #[test]
    fn test_error_policy_serde() {
        let policy: ErrorPolicy = serde_json::from_str("\"fail_soft\"").unwrap();
        assert_eq!(policy, ErrorPolicy::FailSoft);
    }

    #[test]
    fn test_log_level_serde() {
        let json = serde_json::to_string(&LogLevel::Warn).unwrap();
        assert_eq!(json, "\"WARN\"");
        let level: LogLevel = serde_json::from_str("\"ERROR\"").unwrap();
        assert_eq!(level, LogLevel::Error);
    }
}
