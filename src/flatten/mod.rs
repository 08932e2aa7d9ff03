//! Document flattening
//!
//! Turns nested search hits into single-level records.
//!
//! # Strategies
//!
//! - **Full**: every nested object is merged into its parent under a
//!   `.`-joined key path (`headline.main`), keeping every leaf
//! - **Projected**: only `web_url`, `headline.main` and `_id` are kept

mod strategies;

pub(crate) use strategies::json_kind;
pub use strategies::{
    flatten_document, flatten_with_separator, project_document, FlattenStrategy,
    DEFAULT_SEPARATOR, PROJECTED_FIELDS,
};
