//! Python output: one module of `@dataclass` classes and `Enum`s.
use std::fmt::Write as _;
use std::path::PathBuf;

use serde_json::Value;

use super::{Language, Target, escape_reserved, quote, sanitize_identifier};
use crate::ir::{Collected, EnumDef, Field, Primitive, StructDef};
use crate::schema::SchemaNode;

#[derive(Debug, Clone, Copy, Default)]
pub struct Python;

const RESERVED: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield",
];

impl Language for Python {
    fn target(&self) -> Target {
        Target::Python
    }

    fn primitive(&self, p: Primitive) -> String {
        match p {
            Primitive::Text => "str",
            Primitive::Integer => "int",
            Primitive::Number => "float",
            Primitive::Boolean => "bool",
            Primitive::Any => "Any",
            Primitive::Map => "Dict[str, Any]",
        }
        .to_string()
    }

    fn sequence(&self, item: &str) -> String {
        format!("List[{item}]")
    }

    fn optional(&self, inner: &str) -> String {
        format!("Optional[{inner}]")
    }

    /// Forward reference to a class whose body is not complete yet.
    fn indirect(&self, inner: &str) -> String {
        format!("\"{inner}\"")
    }

    fn field_ident(&self, raw: &str) -> String {
        escape_reserved(sanitize_identifier(raw), RESERVED)
    }

    fn reserved(&self) -> &'static [&'static str] {
        RESERVED
    }

    fn bool_literal(&self, b: bool) -> &'static str {
        if b { "True" } else { "False" }
    }

    fn empty_sequence(&self) -> &'static str {
        "field(default_factory=list)"
    }

    fn enum_member(&self, enum_name: &str, variant: &str) -> String {
        format!("{enum_name}.{variant}")
    }

    fn namespace(&self, root: &SchemaNode) -> Option<String> {
        root.python_namespace
            .as_deref()
            .map(str::trim)
            .filter(|ns| !ns.is_empty())
            .map(str::to_string)
    }

    /// `rgs.messages` → `rgs/messages`.
    fn package_dir(&self, namespace: Option<&str>) -> PathBuf {
        namespace
            .map(|ns| ns.split('.').map(str::trim).filter(|s| !s.is_empty()).collect())
            .unwrap_or_default()
    }

    fn package_marker(&self) -> Option<&'static str> {
        Some("__init__.py")
    }

    fn render(&self, collected: &Collected, _namespace: Option<&str>) -> String {
        render(collected)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// RENDERING
// ————————————————————————————————————————————————————————————————————————————

const PRELUDE: &str = "\
from __future__ import annotations

from dataclasses import asdict, dataclass, field
from enum import Enum
from typing import Any, Dict, List, Optional
";

pub fn render(collected: &Collected) -> String {
    let mut out = String::from(PRELUDE);
    for def in &collected.enums {
        out.push_str("\n\n");
        render_enum(&mut out, def);
    }
    for def in &collected.structs {
        out.push_str("\n\n");
        render_struct(&mut out, def);
    }
    out
}

fn render_enum(out: &mut String, def: &EnumDef) {
    let _ = writeln!(out, "class {}(Enum):", def.name);
    if let Some(description) = &def.description {
        docstring(out, description);
    }
    if def.variants.is_empty() {
        out.push_str("    pass\n");
    }
    for variant in &def.variants {
        let _ = writeln!(out, "    {} = {}", variant.ident, enum_value(&variant.value));
    }
}

fn render_struct(out: &mut String, def: &StructDef) {
    out.push_str("@dataclass\n");
    let _ = writeln!(out, "class {}:", def.name);
    if let Some(description) = &def.description {
        docstring(out, description);
    }
    if def.fields.is_empty() {
        out.push_str("    pass\n");
    } else {
        // dataclass fields without a default must come first
        let (bare, initialized): (Vec<&Field>, Vec<&Field>) =
            def.fields.iter().partition(|f| initializer(f).is_none());
        for field in bare.into_iter().chain(initialized) {
            match initializer(field) {
                Some(init) => {
                    let _ = writeln!(out, "    {}: {} = {}", field.ident, field.ty, init);
                }
                None => {
                    let _ = writeln!(out, "    {}: {}", field.ident, field.ty);
                }
            }
        }
    }

    let renamed: Vec<&Field> = def.fields.iter().filter(|f| f.ident != f.name).collect();
    out.push('\n');
    out.push_str("    def to_dict(self) -> Dict[str, Any]:\n");
    if renamed.is_empty() {
        out.push_str("        return asdict(self)\n");
    } else {
        out.push_str("        data = asdict(self)\n");
        for f in &renamed {
            let _ = writeln!(out, "        data[{}] = data.pop({})", quote(&f.name), quote(&f.ident));
        }
        out.push_str("        return data\n");
    }

    out.push('\n');
    out.push_str("    @classmethod\n");
    let _ = writeln!(out, "    def from_dict(cls, data: Dict[str, Any]) -> {}:", def.name);
    if renamed.is_empty() {
        out.push_str("        return cls(**data)\n");
    } else {
        out.push_str("        data = dict(data)\n");
        for f in &renamed {
            let _ = writeln!(
                out,
                "        if {wire} in data:\n            data[{ident}] = data.pop({wire})",
                wire = quote(&f.name),
                ident = quote(&f.ident),
            );
        }
        out.push_str("        return cls(**data)\n");
    }
}

/// `= ...` part of a field declaration.
fn initializer(field: &Field) -> Option<&str> {
    match &field.default {
        Some(default) => Some(default.as_str()),
        None if field.indirect || !field.required => Some("None"),
        None => None,
    }
}

fn enum_value(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(b) => Python.bool_literal(*b).to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => quote(s),
        other => quote(&other.to_string()),
    }
}

fn docstring(out: &mut String, text: &str) {
    let text = text.trim().replace("\"\"\"", "\\\"\\\"\\\"");
    if text.contains('\n') {
        out.push_str("    \"\"\"\n");
        for line in text.lines() {
            let _ = writeln!(out, "    {}", line.trim_end());
        }
        out.push_str("    \"\"\"\n");
    } else {
        let _ = writeln!(out, "    \"\"\"{text}\"\"\"");
    }
    out.push('\n');
}
