//! JSON text → [`SchemaNode`].
//!
//! Two passes keep the failure kinds apart: syntax first (into a
//! `serde_json::Value`), then the typed decode with JSON-path context.
use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ParseError;
use crate::schema::SchemaNode;

pub fn parse_schema_str(src: &str) -> Result<SchemaNode, ParseError> {
    let value = serde_json::from_str::<Value>(src).map_err(ParseError::Malformed)?;
    parse_schema_value(value)
}

pub fn parse_schema_slice(bytes: &[u8]) -> Result<SchemaNode, ParseError> {
    let value = serde_json::from_slice::<Value>(bytes).map_err(ParseError::Malformed)?;
    parse_schema_value(value)
}

pub fn parse_schema_value(value: Value) -> Result<SchemaNode, ParseError> {
    from_value_with_path(value)
}

pub fn parse_schema_file(path: impl AsRef<Path>) -> Result<SchemaNode, ParseError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ParseError::NotFound { path: path.to_path_buf() });
    }
    let bytes = std::fs::read(path).map_err(|source| ParseError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "parsing schema file");
    parse_schema_slice(&bytes)
}

/// Deserialize with JSON-path context in error messages.
fn from_value_with_path<T: DeserializeOwned>(value: Value) -> Result<T, ParseError> {
    match serde_path_to_error::deserialize::<_, T>(value) {
        Ok(v) => Ok(v),
        Err(err) => {
            let path = err.path().to_string();
            Err(ParseError::Shape { path, message: err.into_inner().to_string() })
        }
    }
}
