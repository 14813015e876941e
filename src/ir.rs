//! Collected type definitions handed to the renderers. Type expressions are
//! already spelled in the target language.
use serde_json::Value;

/// Schema-level scalar kinds a [`Language`](crate::codegen::Language) spells out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Text,
    Integer,   // 64-bit signed
    Number,    // 64-bit float
    Boolean,
    Any,       // untyped / dynamic
    Map,       // object without properties
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructDef {
    pub name: String,
    pub description: Option<String>,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Property name as written in the schema (wire name).
    pub name: String,
    /// Identifier in the target language.
    pub ident: String,
    /// Final type expression, wrappers included.
    pub ty: String,
    pub required: bool,
    /// Back-reference to a type still being collected; held behind the
    /// language's indirection wrapper and never marked optional.
    pub indirect: bool,
    /// Initializer literal in the target language.
    pub default: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumDef {
    pub name: String,
    pub description: Option<String>,
    pub variants: Vec<EnumVariant>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumVariant {
    pub ident: String,
    pub value: Value,
}

/// One generation run's output, in discovery order. A struct is pushed
/// after its properties are walked, so dependencies precede dependents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collected {
    pub root: String,
    pub structs: Vec<StructDef>,
    pub enums: Vec<EnumDef>,
}

impl Collected {
    pub fn find_struct(&self, name: &str) -> Option<&StructDef> {
        self.structs.iter().find(|s| s.name == name)
    }

    pub fn find_enum(&self, name: &str) -> Option<&EnumDef> {
        self.enums.iter().find(|e| e.name == name)
    }
}

impl StructDef {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}
