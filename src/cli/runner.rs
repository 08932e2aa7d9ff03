//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat, DEFAULT_QUERY};
use crate::config::SourceConfig;
use crate::error::{Result, ResultExt};
use crate::source::{NyTimesSource, Source, DECLARED_SCHEMA};
use crate::types::{Batch, JsonValue, SourceMode};
use futures::StreamExt;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Read {
                batch_size,
                mode,
                max_pages,
            } => self.read(*batch_size, *mode, *max_pages).await,
            Commands::Schema => self.schema(),
        }
    }

    /// Build the source config from the config file and flag overrides
    pub fn resolve_config(
        &self,
        mode: Option<SourceMode>,
        max_pages: Option<u32>,
    ) -> Result<SourceConfig> {
        let mut config = match &self.cli.config {
            Some(path) => SourceConfig::parse_file(path)?,
            None => SourceConfig::new("", DEFAULT_QUERY),
        };

        if let Some(api_key) = &self.cli.api_key {
            config.api_key.clone_from(api_key);
        }
        if let Some(query) = &self.cli.query {
            config.query.clone_from(query);
        }
        if let Some(mode) = mode {
            config.mode = mode;
        }
        if max_pages.is_some() {
            config.max_pages = max_pages;
        }

        config.validate()?;
        Ok(config)
    }

    async fn read(
        &self,
        batch_size: usize,
        mode: Option<SourceMode>,
        max_pages: Option<u32>,
    ) -> Result<()> {
        let config = self.resolve_config(mode, max_pages)?;
        info!(
            "Reading '{}' in {:?} mode, batch size {batch_size}",
            config.query, config.mode
        );

        let mut source = NyTimesSource::new(config)?;
        source.connect(None, None)?;
        let result = self.print_batches(&source, batch_size).await;
        source.disconnect()?;
        result
    }

    async fn print_batches(&self, source: &NyTimesSource, batch_size: usize) -> Result<()> {
        let mut batches = source.get_data_batch(batch_size)?;
        let mut count = 0;

        while let Some(batch) = batches.next().await {
            let batch = batch?;
            print!("{}", format_batch(self.cli.format, count, &batch)?);
            count += 1;
        }

        info!("Read {count} batches");
        Ok(())
    }

    fn schema(&self) -> Result<()> {
        match self.cli.format {
            OutputFormat::Json => {
                let json = serde_json::to_string(&DECLARED_SCHEMA)
                    .context("Failed to serialize schema")?;
                println!("{json}");
            }
            OutputFormat::Pretty => {
                for column in DECLARED_SCHEMA {
                    println!("{column}");
                }
            }
        }
        Ok(())
    }
}

/// Render one batch for output, newline-terminated
pub fn format_batch(format: OutputFormat, index: usize, batch: &Batch) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string(batch)
                .with_context(|| format!("Failed to serialize batch {index}"))?;
            Ok(format!("{json}\n"))
        }
        OutputFormat::Pretty => {
            let mut out = format!("Batch {index} with {} items\n", batch.len());
            for record in batch {
                out.push_str(&format!(
                    " - {} - {}\n",
                    display_field(record.get("_id")),
                    display_field(record.get("headline.main"))
                ));
            }
            Ok(out)
        }
    }
}

fn display_field(value: Option<&JsonValue>) -> String {
    match value {
        Some(JsonValue::String(s)) => s.clone(),
        Some(JsonValue::Null) | None => "-".to_string(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn batch() -> Batch {
        vec![
            json!({"_id": "nyt://article/1", "headline.main": "First", "web_url": "u1"}),
            json!({"_id": "nyt://article/2", "headline.main": null, "web_url": "u2"}),
        ]
        .into_iter()
        .map(|v| v.as_object().cloned().unwrap())
        .collect()
    }

    #[test]
    fn test_format_batch_pretty() {
        let out = format_batch(OutputFormat::Pretty, 0, &batch()).unwrap();
        assert_eq!(
            out,
            "Batch 0 with 2 items\n - nyt://article/1 - First\n - nyt://article/2 - -\n"
        );
    }

    #[test]
    fn test_format_batch_json() {
        let out = format_batch(OutputFormat::Json, 3, &batch()).unwrap();
        assert!(out.ends_with('\n'));
        let parsed: serde_json::Value = serde_json::from_str(out.trim_end()).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 2);
        assert_eq!(parsed[0]["_id"], "nyt://article/1");
    }

    #[test]
    fn test_format_batch_json_keeps_record_key_order() {
        let out = format_batch(OutputFormat::Json, 0, &batch()).unwrap();
        assert!(out.starts_with(
            r#"[{"_id":"nyt://article/1","headline.main":"First","web_url":"u1"}"#
        ));

        let record = json!({"web_url": "u", "headline.main": "m", "_id": "1"})
            .as_object()
            .cloned()
            .unwrap();
        let out = format_batch(OutputFormat::Json, 0, &vec![record]).unwrap();
        assert_eq!(out, "[{\"web_url\":\"u\",\"headline.main\":\"m\",\"_id\":\"1\"}]\n");
    }

    #[test]
    fn test_display_field() {
        assert_eq!(display_field(Some(&json!("text"))), "text");
        assert_eq!(display_field(Some(&json!(42))), "42");
        assert_eq!(display_field(Some(&JsonValue::Null)), "-");
        assert_eq!(display_field(None), "-");
    }

    #[test]
    fn test_resolve_config_from_flags() {
        let cli = Cli::try_parse_from(["nytimes-source", "--api-key", "abc", "read"]).unwrap();
        let config = Runner::new(cli).resolve_config(None, None).unwrap();

        assert_eq!(config.api_key, "abc");
        assert_eq!(config.query, DEFAULT_QUERY);
        assert_eq!(config.mode, SourceMode::Paginated);
    }

    #[test]
    fn test_resolve_config_file_with_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("source.json");
        std::fs::write(
            &path,
            r#"{"api_key": "from-file", "query": "Climate", "mode": "paginated"}"#,
        )
        .unwrap();

        let cli = Cli::try_parse_from([
            "nytimes-source",
            "--config",
            path.to_str().unwrap(),
            "--query",
            "Elections",
            "read",
        ])
        .unwrap();
        let config = Runner::new(cli)
            .resolve_config(Some(SourceMode::SinglePage), Some(2))
            .unwrap();

        assert_eq!(config.api_key, "from-file");
        assert_eq!(config.query, "Elections");
        assert_eq!(config.mode, SourceMode::SinglePage);
        assert_eq!(config.max_pages, Some(2));
    }

    #[test]
    fn test_resolve_config_requires_api_key() {
        let cli = Cli::try_parse_from(["nytimes-source", "read"]).unwrap();
        let err = Runner::new(cli).resolve_config(None, None).unwrap_err();
        assert_eq!(err.to_string(), "Missing required config field: api_key");
    }
}
