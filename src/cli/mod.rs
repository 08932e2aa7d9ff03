//! CLI module
//!
//! Command-line interface for running the source.
//!
//! # Commands
//!
//! - `read` - Fetch batches and print them
//! - `schema` - Print the declared schema

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat, DEFAULT_QUERY};
pub use runner::{format_batch, Runner};
