//! JSON Schema → typed data models for C++, Python and TypeScript.
//!
//! Pipeline: [`parser`] reads a document into a [`schema::SchemaNode`],
//! [`lower`] walks it (following `$ref`s through [`resolver`]) into the
//! definitions of [`ir`], and a [`codegen::Language`] renders those as
//! source text that [`output`] places on disk.
pub mod cli;
pub mod codegen;
pub mod error;
pub mod ir;
pub mod lower;
pub mod output;
pub mod parser;
pub mod resolver;
pub mod schema;

pub use codegen::{Generated, Target, generate};
pub use error::{Error, ParseError, ResolveError, Result};
pub use parser::{parse_schema_file, parse_schema_str};
pub use schema::SchemaNode;
