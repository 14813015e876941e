//! TypeScript output: exported classes with JSON helpers and string enums.
use std::fmt::Write as _;

use serde_json::Value;

use super::{Language, Target, comment_lines, is_js_identifier, quote};
use crate::ir::{Collected, EnumDef, Field, Primitive, StructDef};

#[derive(Debug, Clone, Copy, Default)]
pub struct TypeScript;

const RESERVED: &[&str] = &[
    "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete",
    "do", "else", "enum", "export", "extends", "false", "finally", "for", "function", "if",
    "import", "in", "instanceof", "new", "null", "return", "super", "switch", "this", "throw",
    "true", "try", "typeof", "var", "void", "while", "with",
];

impl Language for TypeScript {
    fn target(&self) -> Target {
        Target::Typescript
    }

    fn primitive(&self, p: Primitive) -> String {
        match p {
            Primitive::Text => "string",
            Primitive::Integer | Primitive::Number => "number",
            Primitive::Boolean => "boolean",
            Primitive::Any => "any",
            Primitive::Map => "{ [key: string]: any }",
        }
        .to_string()
    }

    fn sequence(&self, item: &str) -> String {
        format!("Array<{item}>")
    }

    /// Optionality is spelled on the property (`name?:`), not the type.
    fn optional(&self, inner: &str) -> String {
        inner.to_string()
    }

    fn indirect(&self, inner: &str) -> String {
        format!("{inner} | null")
    }

    fn field_ident(&self, raw: &str) -> String {
        if is_js_identifier(raw) { raw.to_string() } else { quote(raw) }
    }

    fn reserved(&self) -> &'static [&'static str] {
        RESERVED
    }

    fn bool_literal(&self, b: bool) -> &'static str {
        if b { "true" } else { "false" }
    }

    fn empty_sequence(&self) -> &'static str {
        "[]"
    }

    fn enum_member(&self, enum_name: &str, variant: &str) -> String {
        format!("{enum_name}.{variant}")
    }

    fn render(&self, collected: &Collected, _namespace: Option<&str>) -> String {
        render(collected)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// RENDERING
// ————————————————————————————————————————————————————————————————————————————

pub fn render(collected: &Collected) -> String {
    let mut blocks: Vec<String> = Vec::new();
    for def in &collected.enums {
        blocks.push(render_enum(def));
    }
    for def in &collected.structs {
        blocks.push(render_class(def));
    }
    blocks.join("\n")
}

fn render_enum(def: &EnumDef) -> String {
    let mut out = String::new();
    if let Some(description) = &def.description {
        doc_comment(&mut out, description, "");
    }
    let _ = writeln!(out, "export enum {} {{", def.name);
    for variant in &def.variants {
        let value = match &variant.value {
            Value::String(s) => quote(s),
            Value::Number(n) => n.to_string(),
            other => quote(&other.to_string()),
        };
        let _ = writeln!(out, "    {} = {},", variant.ident, value);
    }
    out.push_str("}\n");
    out
}

fn render_class(def: &StructDef) -> String {
    let mut out = String::new();
    if let Some(description) = &def.description {
        doc_comment(&mut out, description, "");
    }
    let _ = writeln!(out, "export class {} {{", def.name);
    for field in &def.fields {
        if let Some(description) = &field.description {
            doc_comment(&mut out, description, "    ");
        }
        let _ = writeln!(out, "    {};", property(field));
    }
    if !def.fields.is_empty() {
        out.push('\n');
    }
    let name = &def.name;
    let _ = writeln!(out, "    static fromJson(json: string | object): {name} {{");
    out.push_str("        const data = typeof json === \"string\" ? JSON.parse(json) : json;\n");
    let _ = writeln!(out, "        return Object.assign(new {name}(), data);");
    out.push_str("    }\n\n");
    let _ = writeln!(out, "    static toJson(obj: {name}): string {{");
    out.push_str("        return JSON.stringify(obj);\n");
    out.push_str("    }\n");
    out.push_str("}\n");
    out
}

/// Property declaration without the trailing `;`.
fn property(field: &Field) -> String {
    let (ident, ty) = (&field.ident, &field.ty);
    match &field.default {
        Some(default) => format!("{ident}: {ty} = {default}"),
        None if field.indirect => format!("{ident}: {ty} = null"),
        None if field.required => format!("{ident}!: {ty}"),
        None => format!("{ident}?: {ty}"),
    }
}

fn doc_comment(out: &mut String, text: &str, indent: &str) {
    let text = text.trim().replace("*/", "*\\/");
    if text.contains('\n') {
        let _ = writeln!(out, "{indent}/**");
        out.push_str(&comment_lines(&text, indent, " * "));
        let _ = writeln!(out, "{indent} */");
    } else {
        let _ = writeln!(out, "{indent}/** {text} */");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::generate;
    use crate::parser::parse_schema_str;

    fn source(src: &str) -> String {
        let schema = parse_schema_str(src).unwrap();
        generate(&schema, Target::Typescript).unwrap().source
    }

    #[test]
    fn simple_class() {
        let content = source(
            r#"{
                "title": "SimpleObject",
                "type": "object",
                "properties": {
                    "isAvailable": { "type": "boolean" },
                    "itemCount": { "type": "integer" },
                    "priceValue": { "type": "number", "default": 1.5 },
                    "itemName": { "type": "string" }
                },
                "required": ["isAvailable", "itemCount"]
            }"#,
        );
        assert!(content.contains("export class SimpleObject {"));
        assert!(content.contains("    isAvailable!: boolean;"));
        assert!(content.contains("    itemCount!: number;"));
        assert!(content.contains("    priceValue: number = 1.5;"));
        assert!(content.contains("    itemName?: string;"));
        assert!(content.contains("static fromJson(json: string | object): SimpleObject {"));
        assert!(content.contains("static toJson(obj: SimpleObject): string {"));
        assert!(content.contains("return JSON.stringify(obj);"));
    }

    #[test]
    fn enums() {
        let content = source(
            r#"{
                "title": "EnumObject",
                "type": "object",
                "properties": {
                    "status": { "type": "string", "enum": ["pending", "active"], "default": "active" },
                    "level": { "enum": [1, 2] }
                },
                "required": ["status"]
            }"#,
        );
        assert!(content.contains("export enum Status {\n    PENDING = \"pending\",\n    ACTIVE = \"active\",\n}"));
        assert!(content.contains("    status: Status = Status.ACTIVE;"));
        assert!(content.contains("export enum Level {\n    VALUE_1 = 1,\n    VALUE_2 = 2,\n}"));
        assert!(content.contains("    level?: Level;"));
        assert!(content.find("export enum Status").unwrap() < content.find("export class EnumObject").unwrap());
    }

    #[test]
    fn arrays_maps_and_recursion() {
        let content = source(
            r##"{
                "title": "Tree",
                "type": "object",
                "properties": {
                    "tags": { "type": "array", "items": { "type": "string" }, "default": [] },
                    "meta": { "type": "object" },
                    "parent": { "$ref": "#" },
                    "children": { "type": "array", "items": { "$ref": "#" } }
                },
                "required": ["meta"]
            }"##,
        );
        assert!(content.contains("    tags: Array<string> = [];"));
        assert!(content.contains("    meta!: { [key: string]: any };"));
        assert!(content.contains("    parent: Tree | null = null;"));
        assert!(content.contains("    children?: Array<Tree | null>;"));
    }

    #[test]
    fn quoted_property_names_and_docs() {
        let content = source(
            r#"{
                "title": "Doc",
                "description": "A documented class.",
                "type": "object",
                "properties": { "content-type": { "type": "string", "description": "MIME type" } },
                "required": ["content-type"]
            }"#,
        );
        assert!(content.contains("/** A documented class. */\nexport class Doc {"));
        assert!(content.contains("    /** MIME type */\n    \"content-type\"!: string;"));
    }

    #[test]
    fn multi_line_docs() {
        let mut out = String::new();
        doc_comment(&mut out, "first\nsecond", "");
        assert_eq!(out, "/**\n * first\n * second\n */\n");
    }
}
