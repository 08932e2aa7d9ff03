//! CLI commands and argument parsing

use crate::types::SourceMode;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Query used when neither a flag nor a config file provides one
pub const DEFAULT_QUERY: &str = "Silicon Valley";

/// NY Times Article Search source CLI
#[derive(Parser, Debug)]
#[command(name = "nytimes-source")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Source configuration file (JSON or YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// API key (overrides the config file)
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Search query (overrides the config file)
    #[arg(short, long, global = true)]
    pub query: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "pretty")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Read batches of articles
    Read {
        /// Maximum records per batch
        #[arg(short, long, default_value = "10")]
        batch_size: usize,

        /// Source mode (single-page or paginated)
        #[arg(short, long)]
        mode: Option<SourceMode>,

        /// Stop after this many pages
        #[arg(long)]
        max_pages: Option<u32>,
    },

    /// Show the declared schema
    Schema,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One JSON array per batch, one batch per line
    Json,
    /// Human-readable batch summaries
    Pretty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_read_defaults() {
        let cli = Cli::try_parse_from(["nytimes-source", "--api-key", "abc", "read"]).unwrap();

        assert_eq!(cli.api_key.as_deref(), Some("abc"));
        assert!(cli.query.is_none());
        assert_eq!(cli.format, OutputFormat::Pretty);
        match cli.command {
            Commands::Read {
                batch_size,
                mode,
                max_pages,
            } => {
                assert_eq!(batch_size, 10);
                assert!(mode.is_none());
                assert!(max_pages.is_none());
            }
            Commands::Schema => panic!("Expected read command"),
        }
    }

    #[test]
    fn test_parse_read_options() {
        let cli = Cli::try_parse_from([
            "nytimes-source",
            "read",
            "--batch-size",
            "25",
            "--mode",
            "single-page",
            "--max-pages",
            "4",
            "--query",
            "Open Source",
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.query.as_deref(), Some("Open Source"));
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::Read {
                batch_size,
                mode,
                max_pages,
            } => {
                assert_eq!(batch_size, 25);
                assert_eq!(mode, Some(SourceMode::SinglePage));
                assert_eq!(max_pages, Some(4));
            }
            Commands::Schema => panic!("Expected read command"),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_mode() {
        assert!(Cli::try_parse_from(["nytimes-source", "read", "--mode", "streaming"]).is_err());
    }

    #[test]
    fn test_parse_schema() {
        let cli = Cli::try_parse_from(["nytimes-source", "schema"]).unwrap();
        assert!(matches!(cli.command, Commands::Schema));
    }
}
