//! Flattening strategies

use crate::error::{Error, Result};
use crate::types::{JsonValue, RawDocument, Record};
use serde::{Deserialize, Serialize};

/// Separator used to join nested key paths
pub const DEFAULT_SEPARATOR: &str = ".";

/// Keys produced by the projected strategy, in output order
pub const PROJECTED_FIELDS: [&str; 3] = ["web_url", "headline.main", "_id"];

/// How raw documents become records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlattenStrategy {
    /// Keep every leaf under its dotted path
    #[default]
    Full,
    /// Keep `web_url`, `headline.main` and `_id` only
    Projected,
}

impl FlattenStrategy {
    /// Flatten a page of documents
    ///
    /// Every element must be a JSON object. Projected flattening also fails
    /// on the first document without a `headline` object.
    pub fn apply(&self, documents: &[JsonValue]) -> Result<Vec<Record>> {
        documents
            .iter()
            .enumerate()
            .map(|(index, value)| {
                let document = as_document(index, value)?;
                match self {
                    Self::Full => Ok(flatten_document(document)),
                    Self::Projected => project_document(document),
                }
            })
            .collect()
    }
}

fn as_document(index: usize, value: &JsonValue) -> Result<&RawDocument> {
    value.as_object().ok_or_else(|| {
        Error::invalid_document(format!(
            "document {index} is {}, expected an object",
            json_kind(value)
        ))
    })
}

/// Short name of a JSON value's type, for error messages
pub(crate) fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

/// Flatten a document, joining nested keys with `.`
pub fn flatten_document(document: &RawDocument) -> Record {
    flatten_with_separator(document, DEFAULT_SEPARATOR)
}

/// Flatten a document, joining nested keys with `separator`
///
/// Arrays and scalars are leaves and are copied unchanged. An empty nested
/// object contributes no key. When two paths collide the later one wins.
pub fn flatten_with_separator(document: &RawDocument, separator: &str) -> Record {
    let mut record = Record::new();
    flatten_into(&mut record, document, None, separator);
    record
}

fn flatten_into(record: &mut Record, object: &RawDocument, parent: Option<&str>, separator: &str) {
    for (key, value) in object {
        let path = match parent {
            Some(parent) => format!("{parent}{separator}{key}"),
            None => key.clone(),
        };

        match value {
            JsonValue::Object(nested) => flatten_into(record, nested, Some(&path), separator),
            leaf => {
                record.insert(path, leaf.clone());
            }
        }
    }
}

/// Extract the projected fields from a document
///
/// `web_url` and `_id` become `null` when absent, as does `headline.main`.
/// A document whose `headline` is missing or not an object is rejected.
pub fn project_document(document: &RawDocument) -> Result<Record> {
    let headline = document
        .get("headline")
        .and_then(JsonValue::as_object)
        .ok_or_else(|| Error::missing_document_field("headline"))?;

    let mut record = Record::new();
    record.insert("web_url".to_string(), field_or_null(document, "web_url"));
    record.insert(
        "headline.main".to_string(),
        field_or_null(headline, "main"),
    );
    record.insert("_id".to_string(), field_or_null(document, "_id"));
    Ok(record)
}

fn field_or_null(object: &RawDocument, key: &str) -> JsonValue {
    object.get(key).cloned().unwrap_or(JsonValue::Null)
}
