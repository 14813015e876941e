//! C++17 header output: `std::` containers, `nlohmann::json` for untyped data.
use std::fmt::Write as _;

use super::{Language, Target, comment_lines, escape_reserved, sanitize_identifier, snake_case};
use crate::ir::{Collected, EnumDef, Primitive, StructDef};
use crate::schema::SchemaNode;

#[derive(Debug, Clone, Copy, Default)]
pub struct Cpp;

const RESERVED: &[&str] = &[
    "alignas", "alignof", "and", "asm", "auto", "bool", "break", "case", "catch", "char",
    "class", "const", "constexpr", "continue", "default", "delete", "do", "double", "else",
    "enum", "explicit", "export", "extern", "false", "float", "for", "friend", "goto", "if",
    "inline", "int", "long", "mutable", "namespace", "new", "noexcept", "not", "nullptr",
    "operator", "or", "private", "protected", "public", "register", "return", "short",
    "signed", "sizeof", "static", "struct", "switch", "template", "this", "throw", "true",
    "try", "typedef", "typename", "union", "unsigned", "using", "virtual", "void", "volatile",
    "while", "xor", "NULL", "EOF", "TRUE", "FALSE",
];

impl Language for Cpp {
    fn target(&self) -> Target {
        Target::Cpp
    }

    fn primitive(&self, p: Primitive) -> String {
        match p {
            Primitive::Text => "std::string",
            Primitive::Integer => "int64_t",
            Primitive::Number => "double",
            Primitive::Boolean => "bool",
            Primitive::Any | Primitive::Map => "nlohmann::json",
        }
        .to_string()
    }

    fn sequence(&self, item: &str) -> String {
        format!("std::vector<{item}>")
    }

    fn optional(&self, inner: &str) -> String {
        format!("std::optional<{inner}>")
    }

    fn indirect(&self, inner: &str) -> String {
        format!("std::shared_ptr<{inner}>")
    }

    fn field_ident(&self, raw: &str) -> String {
        escape_reserved(sanitize_identifier(&snake_case(raw)), RESERVED)
    }

    fn reserved(&self) -> &'static [&'static str] {
        RESERVED
    }

    fn bool_literal(&self, b: bool) -> &'static str {
        if b { "true" } else { "false" }
    }

    fn empty_sequence(&self) -> &'static str {
        "{}"
    }

    fn enum_member(&self, enum_name: &str, variant: &str) -> String {
        format!("{enum_name}::{variant}")
    }

    /// `x-cpp-namespace`, else the `$id` file stem (`.../my_messages.schema.json`
    /// → `my_messages`).
    fn namespace(&self, root: &SchemaNode) -> Option<String> {
        if let Some(ns) = root.cpp_namespace.as_deref().filter(|ns| !ns.trim().is_empty()) {
            return Some(ns.to_string());
        }
        let id = root.id.as_deref()?;
        let file = id.rsplit('/').next()?;
        let stem = file.split('.').next()?;
        if stem.is_empty() {
            return None;
        }
        Some(snake_case(stem))
    }

    fn render(&self, collected: &Collected, namespace: Option<&str>) -> String {
        render(collected, namespace)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// RENDERING
// ————————————————————————————————————————————————————————————————————————————

const INCLUDES: &[&str] = &[
    "<cstdint>",
    "<memory>",
    "<optional>",
    "<string>",
    "<vector>",
    "<nlohmann/json.hpp>",
];

pub fn render(collected: &Collected, namespace: Option<&str>) -> String {
    let segments: Vec<&str> = namespace
        .map(|ns| ns.split("::").map(str::trim).filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();

    let mut out = String::new();
    out.push_str("#pragma once\n\n");
    for include in INCLUDES {
        let _ = writeln!(out, "#include {include}");
    }
    out.push('\n');

    for segment in &segments {
        let _ = writeln!(out, "namespace {segment} {{");
    }
    if !segments.is_empty() {
        out.push('\n');
    }

    for def in &collected.enums {
        render_enum(&mut out, def);
    }

    // forward declarations let shared_ptr back-references name later structs
    if collected.structs.len() > 1 {
        for def in &collected.structs {
            let _ = writeln!(out, "struct {};", def.name);
        }
        out.push('\n');
    }

    for def in &collected.structs {
        render_struct(&mut out, def);
    }

    for segment in segments.iter().rev() {
        let _ = writeln!(out, "}} // namespace {segment}");
    }
    out
}

fn render_enum(out: &mut String, def: &EnumDef) {
    if let Some(description) = &def.description {
        out.push_str(&comment_lines(description, "", "/// "));
    }
    let _ = writeln!(out, "enum class {} {{", def.name);
    for variant in &def.variants {
        let _ = writeln!(out, "    {},", variant.ident);
    }
    out.push_str("};\n\n");
}

fn render_struct(out: &mut String, def: &StructDef) {
    if let Some(description) = &def.description {
        out.push_str(&comment_lines(description, "", "/// "));
    }
    let _ = writeln!(out, "struct {} {{", def.name);
    for field in &def.fields {
        if let Some(description) = &field.description {
            out.push_str(&comment_lines(description, "    ", "/// "));
        }
        match &field.default {
            Some(default) => {
                let _ = writeln!(out, "    {} {} = {};", field.ty, field.ident, default);
            }
            None => {
                let _ = writeln!(out, "    {} {};", field.ty, field.ident);
            }
        }
    }
    out.push_str("};\n\n");
}
