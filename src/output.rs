//! Write generated sources below an output root.
use std::path::{Path, PathBuf};

use crate::codegen::Generated;
use crate::error::{Error, Result};

/// Write `generated` under `out_dir` and return the file's path.
///
/// Package directories are created as needed; when the target uses a
/// package marker (`__init__.py`) every directory between `out_dir` and the
/// file receives one, unless it already exists.
pub fn write_generated(out_dir: &Path, generated: &Generated) -> Result<PathBuf> {
    let directory = out_dir.join(&generated.directory);
    std::fs::create_dir_all(&directory).map_err(|source| Error::Write {
        path: directory.clone(),
        source,
    })?;

    if let Some(marker) = generated.package_marker {
        let mut package = out_dir.to_path_buf();
        for component in generated.directory.components() {
            package.push(component);
            let marker_path = package.join(marker);
            if !marker_path.exists() {
                write_file(&marker_path, "")?;
            }
        }
    }

    let path = directory.join(&generated.file_name);
    let mut source = generated.source.trim_end().to_string();
    source.push('\n');
    write_file(&path, &source)?;
    tracing::debug!(path = %path.display(), bytes = source.len(), "wrote generated source");
    Ok(path)
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })
}
