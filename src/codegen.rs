//! Target-language policies and the generation entry point.
//!
//! Every target shares the collection walk in [`crate::lower`]; a
//! [`Language`] only decides spelling: primitive names, casing, the
//! optional / indirection / sequence wrappers, literals, and the final
//! source layout.
pub mod cpp;
pub mod python;
pub mod typescript;

use std::path::PathBuf;

use convert_case::{Case, Casing};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::error::ResolveError;
use crate::ir::{Collected, Primitive};
use crate::schema::SchemaNode;

pub use cpp::Cpp;
pub use python::Python;
pub use typescript::TypeScript;

/// Type name used when neither a title nor a usable context name exists.
pub const FALLBACK_TYPE_NAME: &str = "GeneratedModel";

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Target {
    Cpp,
    Python,
    #[value(alias = "ts")]
    Typescript,
}

pub trait Language {
    fn target(&self) -> Target;

    fn primitive(&self, p: Primitive) -> String;
    fn sequence(&self, item: &str) -> String;
    fn optional(&self, inner: &str) -> String;
    fn indirect(&self, inner: &str) -> String;

    /// Identifier casing for generated types.
    fn type_name(&self, raw: &str) -> String {
        pascal_case(raw)
    }
    fn field_ident(&self, raw: &str) -> String;
    fn reserved(&self) -> &'static [&'static str];

    fn bool_literal(&self, b: bool) -> &'static str;
    /// Initializer for an empty-array default.
    fn empty_sequence(&self) -> &'static str;
    fn enum_member(&self, enum_name: &str, variant: &str) -> String;

    /// Literal for a primitive `default`; `None` for values with no
    /// literal form (objects, non-empty arrays, null).
    fn literal(&self, value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(quote(s)),
            Value::Bool(b) => Some(self.bool_literal(*b).to_string()),
            Value::Number(n) => Some(n.to_string()),
            Value::Array(xs) if xs.is_empty() => Some(self.empty_sequence().to_string()),
            _ => None,
        }
    }

    fn namespace(&self, _root: &SchemaNode) -> Option<String> {
        None
    }
    /// Output subdirectory, relative to the output root.
    fn package_dir(&self, _namespace: Option<&str>) -> PathBuf {
        PathBuf::new()
    }
    /// Marker file created in every package directory, if any.
    fn package_marker(&self) -> Option<&'static str> {
        None
    }

    fn render(&self, collected: &Collected, namespace: Option<&str>) -> String;
}

/// One rendered artifact, not yet written anywhere.
#[derive(Debug, Clone)]
pub struct Generated {
    pub target: Target,
    pub collected: Collected,
    pub namespace: Option<String>,
    /// Relative to the output root.
    pub directory: PathBuf,
    pub file_name: String,
    pub package_marker: Option<&'static str>,
    pub source: String,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl Target {
    pub fn extension(self) -> &'static str {
        match self {
            Target::Cpp => "hpp",
            Target::Python => "py",
            Target::Typescript => "ts",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Target::Cpp => "C++",
            Target::Python => "Python",
            Target::Typescript => "TypeScript",
        }
    }
}

impl Generated {
    pub fn relative_path(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }
}

/// Collect and render `schema` for `target`.
pub fn generate(schema: &SchemaNode, target: Target) -> Result<Generated, ResolveError> {
    match target {
        Target::Cpp => generate_with(schema, &Cpp),
        Target::Python => generate_with(schema, &Python),
        Target::Typescript => generate_with(schema, &TypeScript),
    }
}

pub fn generate_with<L: Language>(schema: &SchemaNode, lang: &L) -> Result<Generated, ResolveError> {
    let collected = crate::lower::collect(schema, lang)?;
    let namespace = lang.namespace(schema);
    tracing::debug!(
        target_lang = lang.target().label(),
        root = %collected.root,
        namespace = ?namespace,
        structs = collected.structs.len(),
        enums = collected.enums.len(),
        "rendering"
    );
    let source = lang.render(&collected, namespace.as_deref());
    Ok(Generated {
        target: lang.target(),
        directory: lang.package_dir(namespace.as_deref()),
        file_name: format!("{}.{}", collected.root.to_lowercase(), lang.target().extension()),
        package_marker: lang.package_marker(),
        namespace,
        collected,
        source,
    })
}

// ————————————————————————————————————————————————————————————————————————————
// IDENTIFIER HELPERS
// ————————————————————————————————————————————————————————————————————————————

static NON_IDENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_]").unwrap());
static NON_ALNUM_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Z0-9]+").unwrap());
static JS_IDENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").unwrap());

pub fn pascal_case(raw: &str) -> String {
    let out = sanitize_identifier(&raw.to_case(Case::Pascal));
    if out.is_empty() || out.chars().all(|c| c == '_') {
        FALLBACK_TYPE_NAME.to_string()
    } else {
        out
    }
}

pub fn snake_case(raw: &str) -> String {
    raw.to_case(Case::Snake)
}

/// Replace anything outside `[A-Za-z0-9_]` with `_`; a leading digit gets a
/// `_` prefix.
pub fn sanitize_identifier(raw: &str) -> String {
    let mut out = NON_IDENT.replace_all(raw, "_").into_owned();
    if out.is_empty() || out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

pub fn is_js_identifier(raw: &str) -> bool {
    JS_IDENT.is_match(raw)
}

pub fn escape_reserved(ident: String, reserved: &[&str]) -> String {
    if reserved.contains(&ident.as_str()) {
        ident + "_"
    } else {
        ident
    }
}

/// `"pending"` → `PENDING`, `"in-progress"` → `IN_PROGRESS`,
/// `"123abc"` → `VALUE_123ABC`.
pub fn enum_variant_ident(value: &Value) -> String {
    let text = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    let upper = text.to_uppercase();
    let ident = NON_ALNUM_RUN.replace_all(&upper, "_");
    let ident = ident.trim_matches('_');
    if ident.is_empty() {
        "EMPTY".to_string()
    } else if ident.starts_with(|c: char| c.is_ascii_digit()) {
        format!("VALUE_{ident}")
    } else {
        ident.to_string()
    }
}

/// Double-quoted string literal; JSON escaping is valid in all three targets.
pub fn quote(s: &str) -> String {
    Value::String(s.to_string()).to_string()
}

/// `/// ` style comment lines for a possibly multi-line description.
pub(crate) fn comment_lines(text: &str, indent: &str, marker: &str) -> String {
    text.lines()
        .map(|line| {
            let line = line.trim_end();
            if line.is_empty() {
                format!("{indent}{}\n", marker.trim_end())
            } else {
                format!("{indent}{marker}{line}\n")
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_schema_str;
    use serde_json::json;

    #[test]
    fn type_name_casing() {
        assert_eq!(pascal_case("address"), "Address");
        assert_eq!(pascal_case("SharedName"), "SharedName");
        assert_eq!(pascal_case("main_address"), "MainAddress");
        assert_eq!(pascal_case("simple object"), "SimpleObject");
        assert_eq!(pascal_case(""), FALLBACK_TYPE_NAME);
        assert_eq!(pascal_case("$$"), FALLBACK_TYPE_NAME);
    }

    #[test]
    fn enum_identifiers() {
        assert_eq!(enum_variant_ident(&json!("pending")), "PENDING");
        assert_eq!(enum_variant_ident(&json!("in-progress")), "IN_PROGRESS");
        let numeric = enum_variant_ident(&json!("123abc"));
        assert!(!numeric.starts_with(|c: char| c.is_ascii_digit()));
        assert_eq!(numeric, "VALUE_123ABC");
        assert_eq!(enum_variant_ident(&json!(7)), "VALUE_7");
        assert_eq!(enum_variant_ident(&json!("")), "EMPTY");
    }

    #[test]
    fn identifier_sanitizing() {
        assert_eq!(sanitize_identifier("a-b"), "a_b");
        assert_eq!(sanitize_identifier("1x"), "_1x");
        assert_eq!(sanitize_identifier(""), "_");
        assert!(is_js_identifier("isAvailable"));
        assert!(!is_js_identifier("a-b"));
        assert_eq!(escape_reserved("class".into(), &["class"]), "class_");
    }

    #[test]
    fn quoting_escapes() {
        assert_eq!(quote("a\"b"), r#""a\"b""#);
    }

    #[test]
    fn file_name_from_root_type() {
        let schema = parse_schema_str(r#"{"title": "SimpleObject", "type": "object"}"#).unwrap();
        for (target, expected) in [
            (Target::Cpp, "simpleobject.hpp"),
            (Target::Python, "simpleobject.py"),
            (Target::Typescript, "simpleobject.ts"),
        ] {
            let generated = generate(&schema, target).unwrap();
            assert_eq!(generated.file_name, expected);
            assert_eq!(generated.collected.root, "SimpleObject");
        }
    }

    #[test]
    fn untitled_root_uses_fallback_name() {
        let schema = parse_schema_str(r#"{"type": "object"}"#).unwrap();
        let generated = generate(&schema, Target::Cpp).unwrap();
        assert_eq!(generated.collected.root, FALLBACK_TYPE_NAME);
        assert_eq!(generated.file_name, "generatedmodel.hpp");
    }

    #[test]
    fn resolver_errors_surface_unchanged() {
        let schema = parse_schema_str(
            r##"{"title": "Broken", "type": "object", "properties": {"a": {"$ref": "#/$defs/missing"}}}"##,
        )
        .unwrap();
        let err = generate(&schema, Target::Python).unwrap_err();
        assert!(matches!(err, ResolveError::Resolution { ref reference, .. } if reference == "#/$defs/missing"));

        let schema = parse_schema_str(
            r#"{"title": "External", "type": "object", "properties": {"a": {"$ref": "other.json#/x"}}}"#,
        )
        .unwrap();
        assert!(matches!(
            generate(&schema, Target::Typescript).unwrap_err(),
            ResolveError::UnsupportedReference { .. }
        ));
    }
}
