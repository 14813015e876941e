//! Typed JSON Schema model.
//!
//! A [`SchemaNode`] owns its children through `properties`, `items` and
//! `defs`, so the parsed document is a plain tree. Cycles in the logical
//! schema only exist through `$ref` strings, which the
//! [`Resolver`](crate::resolver::Resolver) follows on demand.
//!
//! Unknown keywords (`allOf`, `oneOf`, `additionalProperties`, ...) are
//! dropped at parse time; nodes that only carry them map to the untyped
//! representation.
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

pub type SchemaMap = IndexMap<String, SchemaNode>;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SchemaNode {
    #[serde(rename = "$schema")]
    pub schema_uri: Option<String>,
    #[serde(rename = "$id")]
    pub id: Option<String>,
    #[serde(rename = "x-cpp-namespace")]
    pub cpp_namespace: Option<String>,
    #[serde(rename = "x-python-namespace")]
    pub python_namespace: Option<String>,

    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub ty: Option<SchemaType>,
    /// Declaration order is kept; it drives field order and collision suffixes.
    pub properties: Option<SchemaMap>,
    pub required: Option<Vec<String>>,
    pub items: Option<Items>,
    #[serde(rename = "enum")]
    pub enum_values: Option<Vec<Value>>,
    pub default: Option<Value>,
    #[serde(rename = "$ref")]
    pub reference: Option<String>,
    #[serde(rename = "$defs", alias = "defs")]
    pub defs: Option<SchemaMap>,

    // validation-only; carried for downstream tools
    pub read_only: Option<bool>,
    pub write_only: Option<bool>,
    pub minimum: Option<f64>,
    pub exclusive_minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub exclusive_maximum: Option<f64>,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub pattern: Option<String>,
    pub min_items: Option<u64>,
    pub max_items: Option<u64>,
}

/// `items`: one schema for homogeneous arrays, a list for tuple arrays.
///
/// `Tuple` is tried first so that `[]` never decodes as an empty node.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Items {
    Tuple(Vec<SchemaNode>),
    Single(Box<SchemaNode>),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum SchemaType {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
    /// Anything else (`"null"`, custom names); mapped as untyped.
    Other(String),
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl From<String> for SchemaType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "string" => SchemaType::String,
            "integer" => SchemaType::Integer,
            "number" => SchemaType::Number,
            "boolean" => SchemaType::Boolean,
            "array" => SchemaType::Array,
            "object" => SchemaType::Object,
            _ => SchemaType::Other(s),
        }
    }
}

impl SchemaType {
    pub fn as_str(&self) -> &str {
        match self {
            SchemaType::String => "string",
            SchemaType::Integer => "integer",
            SchemaType::Number => "number",
            SchemaType::Boolean => "boolean",
            SchemaType::Array => "array",
            SchemaType::Object => "object",
            SchemaType::Other(s) => s,
        }
    }
}

impl SchemaNode {
    pub fn is_required(&self, property: &str) -> bool {
        self.required
            .as_ref()
            .is_some_and(|names| names.iter().any(|n| n == property))
    }

    pub fn property(&self, name: &str) -> Option<&SchemaNode> {
        self.properties.as_ref().and_then(|props| props.get(name))
    }

    pub fn definition(&self, name: &str) -> Option<&SchemaNode> {
        self.defs.as_ref().and_then(|defs| defs.get(name))
    }

    /// An object schema that declares at least one property; these become
    /// named structs, everything else maps to a primitive or container.
    pub fn has_properties(&self) -> bool {
        self.properties.as_ref().is_some_and(|p| !p.is_empty())
    }

    pub fn has_enum(&self) -> bool {
        self.enum_values.as_ref().is_some_and(|v| !v.is_empty())
    }
}
