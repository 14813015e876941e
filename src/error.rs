//! Error taxonomy shared by the parser, resolver, generator and CLI.
use std::path::PathBuf;
use thiserror::Error;

// ————————————————————————————————————————————————————————————————————————————
// PARSER
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Error)]
pub enum ParseError {
    /// The schema path does not exist (checked before any read).
    #[error("schema file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read schema file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Source is not well-formed JSON.
    #[error("malformed JSON: {0}")]
    Malformed(#[source] serde_json::Error),

    /// Well-formed JSON whose fields do not fit the schema model.
    #[error("at JSON path {path} → {message}")]
    Shape { path: String, message: String },
}

// ————————————————————————————————————————————————————————————————————————————
// RESOLVER
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("empty reference")]
    InvalidReference,

    #[error("external references are not supported: {reference}")]
    UnsupportedReference { reference: String },

    #[error("could not resolve segment '{segment}' in reference '{reference}': {reason}")]
    Resolution {
        reference: String,
        segment: String,
        reason: String,
    },
}

impl ResolveError {
    pub(crate) fn resolution(reference: &str, segment: &str, reason: impl Into<String>) -> Self {
        ResolveError::Resolution {
            reference: reference.to_string(),
            segment: segment.to_string(),
            reason: reason.into(),
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INVOCATION BOUNDARY
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Process exit status for this failure; each taxonomy member gets its own.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::Parse(ParseError::NotFound { .. }) => 2,
            Error::Parse(ParseError::Malformed(_)) => 3,
            Error::Parse(ParseError::Shape { .. }) => 4,
            Error::Resolve(_) => 5,
            Error::Parse(ParseError::Read { .. }) | Error::Write { .. } | Error::Other(_) => 1,
        }
    }

    /// Short banner used by the CLI in front of the message.
    pub fn label(&self) -> &'static str {
        match self {
            Error::Parse(ParseError::NotFound { .. }) => "File Not Found",
            Error::Parse(ParseError::Malformed(_)) => "JSON Parse Error",
            Error::Parse(ParseError::Shape { .. }) => "Schema Validation Error",
            Error::Parse(ParseError::Read { .. }) => "Read Error",
            Error::Resolve(_) => "Reference Error",
            Error::Write { .. } => "Write Error",
            Error::Other(_) => "Error",
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
