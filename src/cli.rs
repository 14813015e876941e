//! Minimal CLI: schema files → generated sources for one target language.
use std::path::PathBuf;

use anyhow::{Context, anyhow};
use clap::Parser;
use colored::Colorize;

use crate::codegen::{Target, generate};
use crate::error::Result;
use crate::output::write_generated;
use crate::parser::parse_schema_file;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// generate C++, Python or TypeScript data models from JSON Schema documents
#[derive(Parser, Debug)]
#[command(name = "rgs-types", version)]
pub struct CommandLineInterface {
    /// One or more schema files. May be literal paths or quoted glob patterns
    #[arg(num_args = 1.., required = true)]
    pub schemas: Vec<String>,

    /// target language
    #[arg(long, short, value_enum, default_value_t = Target::Cpp)]
    pub lang: Target,

    /// output directory (created if missing)
    #[arg(long, short, default_value = ".")]
    pub output: PathBuf,

    /// debugging
    #[arg(long)]
    pub no_op: bool,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    /// Process every schema in order, stopping at the first failure.
    /// Returns the written file paths.
    pub fn run(&self) -> Result<Vec<PathBuf>> {
        // debug path
        if self.no_op {
            eprintln!("{self:#?}");
            return Ok(Vec::new());
        }

        let source_paths = resolve_file_path_patterns(&self.schemas)?;
        tracing::debug!(
            files = source_paths.len(),
            lang = self.lang.label(),
            output = %self.output.display(),
            "starting generation"
        );

        let mut written = Vec::with_capacity(source_paths.len());
        for source_path in source_paths {
            println!("{} {}", "Parsing schema:".cyan(), source_path.display());
            let schema = parse_schema_file(&source_path)?;
            let generated = generate(&schema, self.lang)?;
            let path = write_generated(&self.output, &generated)?;
            let banner = format!("Generated {} code:", self.lang.label());
            println!("{} {}", banner.as_str().green(), path.display());
            written.push(path);
        }
        Ok(written)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn resolve_file_path_patterns<I>(patterns: I) -> anyhow::Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'['))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            let entries = glob::glob(pattern).with_context(|| format!("invalid glob pattern: {pattern}"))?;
            for entry in entries {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                return Err(anyhow!("glob pattern matched no files: {pattern}"));
            }
        } else {
            // literal path; existence is checked by the parser
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
