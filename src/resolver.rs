//! `$ref` resolution over a parsed [`SchemaNode`] (RFC 6901 JSON Pointer).
//!
//! Only same-document references (`#...`) are supported. The resolver holds
//! a shared borrow of the root and nothing else, so resolving is a pure
//! function of `(root, ref)`: the same pointer always lands on the same node.
use std::borrow::Cow;

use serde_json::Value;

use crate::error::ResolveError;
use crate::schema::{Items, SchemaMap, SchemaNode};

#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    root: &'a SchemaNode,
}

/// Where traversal currently stands.
#[derive(Debug)]
enum Cursor<'a> {
    Node(&'a SchemaNode),
    Table(&'a SchemaMap),
    List(&'a [SchemaNode]),
    /// Untyped JSON (`enum`, `default`, scalar attributes).
    Raw(Cow<'a, Value>),
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl<'a> Resolver<'a> {
    pub fn new(root: &'a SchemaNode) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &'a SchemaNode {
        self.root
    }

    /// Resolve `reference` to a node.
    ///
    /// Nodes reached through the typed model are borrowed from the root.
    /// A pointer that ends on a raw JSON object (e.g. inside `default`) is
    /// promoted into an owned [`SchemaNode`].
    pub fn resolve(&self, reference: &str) -> Result<Cow<'a, SchemaNode>, ResolveError> {
        if reference.is_empty() {
            return Err(ResolveError::InvalidReference);
        }
        let Some(pointer) = reference.strip_prefix('#') else {
            return Err(ResolveError::UnsupportedReference { reference: reference.to_string() });
        };
        // "#" and "#/" both name the document root
        if pointer.is_empty() || pointer == "/" {
            return Ok(Cow::Borrowed(self.root));
        }

        let mut cursor = Cursor::Node(self.root);
        // the element before the first '/' is whatever followed '#'
        for raw in pointer.split('/').skip(1) {
            let segment = decode_segment(raw);
            tracing::trace!(reference, segment = %segment, "pointer step");
            cursor = step(cursor, &segment, reference)?;
        }
        finish(cursor, reference)
    }
}

/// `~1` → `/` first, then `~0` → `~`.
pub fn decode_segment(raw: &str) -> String {
    raw.replace("~1", "/").replace("~0", "~")
}

/// Inverse of [`decode_segment`], for building pointers.
pub fn encode_segment(key: &str) -> String {
    key.replace('~', "~0").replace('/', "~1")
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn step<'a>(cursor: Cursor<'a>, segment: &str, reference: &str) -> Result<Cursor<'a>, ResolveError> {
    let fail = |reason: &str| ResolveError::resolution(reference, segment, reason);

    if segment == "$defs" || segment == "defs" {
        return match cursor {
            Cursor::Node(node) => node
                .defs
                .as_ref()
                .map(Cursor::Table)
                .ok_or_else(|| fail("no definitions on this node")),
            // a definitions table may itself contain an entry named "defs"
            Cursor::Table(table) => table
                .get(segment)
                .map(Cursor::Node)
                .ok_or_else(|| fail("no definitions found")),
            Cursor::Raw(value) => raw_key(value, segment).ok_or_else(|| fail("no definitions found")),
            Cursor::List(_) => Err(fail("no definitions found")),
        };
    }

    match cursor {
        Cursor::Table(table) => table
            .get(segment)
            .map(Cursor::Node)
            .ok_or_else(|| fail("key not found")),
        Cursor::List(list) => parse_index(segment)
            .and_then(|i| list.get(i))
            .map(Cursor::Node)
            .ok_or_else(|| fail("invalid index for list")),
        Cursor::Node(node) => match attribute(node, segment) {
            Some(Ok(next)) => Ok(next),
            Some(Err(())) => Err(fail("attribute is not set")),
            None => Err(fail("no such attribute")),
        },
        Cursor::Raw(value) => {
            if value.is_object() {
                return raw_key(value, segment).ok_or_else(|| fail("key not found"));
            }
            let Some(len) = value.as_array().map(Vec::len) else {
                return Err(fail("cannot descend into a scalar"));
            };
            match parse_index(segment) {
                Some(i) if i < len => Ok(Cursor::Raw(index_raw(value, i))),
                _ => Err(fail("invalid index for list")),
            }
        }
    }
}

/// Named attribute of a node, by its JSON spelling.
///
/// `None`: the node has no attribute of that name.
/// `Some(Err(()))`: the attribute exists but is unset.
fn attribute<'a>(node: &'a SchemaNode, name: &str) -> Option<Result<Cursor<'a>, ()>> {
    fn raw<'a>(v: Option<Value>) -> Result<Cursor<'a>, ()> {
        v.map(|v| Cursor::Raw(Cow::Owned(v))).ok_or(())
    }
    fn text<'a>(s: &Option<String>) -> Result<Cursor<'a>, ()> {
        raw(s.clone().map(Value::String))
    }
    fn num<'a>(n: Option<f64>) -> Result<Cursor<'a>, ()> {
        raw(n.map(Value::from))
    }
    fn int<'a>(n: Option<u64>) -> Result<Cursor<'a>, ()> {
        raw(n.map(Value::from))
    }
    fn flag<'a>(b: Option<bool>) -> Result<Cursor<'a>, ()> {
        raw(b.map(Value::Bool))
    }

    let cursor = match name {
        "properties" => node.properties.as_ref().map(Cursor::Table).ok_or(()),
        "items" => match &node.items {
            Some(Items::Single(item)) => Ok(Cursor::Node(item)),
            Some(Items::Tuple(items)) => Ok(Cursor::List(items)),
            None => Err(()),
        },
        "enum" => node
            .enum_values
            .as_ref()
            .map(|xs| Cursor::Raw(Cow::Owned(Value::Array(xs.clone()))))
            .ok_or(()),
        "default" => node.default.as_ref().map(|v| Cursor::Raw(Cow::Borrowed(v))).ok_or(()),
        "required" => raw(node
            .required
            .as_ref()
            .map(|xs| Value::Array(xs.iter().cloned().map(Value::String).collect()))),
        "type" => raw(node.ty.as_ref().map(|t| Value::String(t.as_str().to_string()))),
        "title" => text(&node.title),
        "description" => text(&node.description),
        "$ref" => text(&node.reference),
        "$id" => text(&node.id),
        "$schema" => text(&node.schema_uri),
        "x-cpp-namespace" => text(&node.cpp_namespace),
        "x-python-namespace" => text(&node.python_namespace),
        "pattern" => text(&node.pattern),
        "minimum" => num(node.minimum),
        "maximum" => num(node.maximum),
        "exclusiveMinimum" => num(node.exclusive_minimum),
        "exclusiveMaximum" => num(node.exclusive_maximum),
        "minLength" => int(node.min_length),
        "maxLength" => int(node.max_length),
        "minItems" => int(node.min_items),
        "maxItems" => int(node.max_items),
        "readOnly" => flag(node.read_only),
        "writeOnly" => flag(node.write_only),
        _ => return None,
    };
    Some(cursor)
}

fn parse_index(segment: &str) -> Option<usize> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

fn raw_key<'a>(value: Cow<'a, Value>, key: &str) -> Option<Cursor<'a>> {
    match value {
        Cow::Borrowed(v) => v.get(key).map(|x| Cursor::Raw(Cow::Borrowed(x))),
        Cow::Owned(mut v) => v
            .as_object_mut()
            .and_then(|m| m.remove(key))
            .map(|x| Cursor::Raw(Cow::Owned(x))),
    }
}

fn index_raw(value: Cow<'_, Value>, i: usize) -> Cow<'_, Value> {
    match value {
        Cow::Borrowed(v) => Cow::Borrowed(&v[i]),
        Cow::Owned(v) => Cow::Owned(v[i].clone()),
    }
}

fn finish<'a>(cursor: Cursor<'a>, reference: &str) -> Result<Cow<'a, SchemaNode>, ResolveError> {
    let last = reference.rsplit('/').next().map(decode_segment).unwrap_or_default();
    match cursor {
        Cursor::Node(node) => Ok(Cow::Borrowed(node)),
        Cursor::Raw(value) if value.is_object() => {
            serde_json::from_value::<SchemaNode>(value.into_owned())
                .map(Cow::Owned)
                .map_err(|e| ResolveError::resolution(reference, &last, format!("target is not a schema: {e}")))
        }
        Cursor::Raw(_) => Err(ResolveError::resolution(reference, &last, "target is not a schema")),
        Cursor::Table(_) | Cursor::List(_) => Err(ResolveError::resolution(
            reference,
            &last,
            "target is a collection, not a schema",
        )),
    }
}
