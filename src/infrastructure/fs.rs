//! Small-file JSON persistence helpers

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::DomainError;

/// Failure reading a JSON file
#[derive(Debug, thiserror::Error)]
pub enum JsonFileError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl From<JsonFileError> for DomainError {
    fn from(err: JsonFileError) -> Self {
        DomainError::storage(err.to_string())
    }
}

/// Read and parse a JSON file. A missing file yields `Ok(None)`.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, JsonFileError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(JsonFileError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    serde_json::from_str(&content)
        .map(Some)
        .map_err(|source| JsonFileError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

/// Serialize `value` as pretty JSON and replace `path` with it.
///
/// The content goes to a sibling temp file first and is renamed over the
/// target, so readers never observe a half-written file.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), DomainError> {
    let content = serde_json::to_vec_pretty(value)
        .map_err(|e| DomainError::internal(format!("Failed to serialize: {}", e)))?;

    write_atomic(path, &content).map_err(|e| {
        DomainError::storage(format!("Failed to write {}: {}", path.display(), e))
    })
}

fn write_atomic(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let temp_path = temp_path_for(parent, path);

    {
        let mut file = std::fs::File::create(&temp_path)?;
        file.write_all(content)?;
        file.sync_all()?;
    }

    std::fs::rename(&temp_path, path)
}

fn temp_path_for(parent: &Path, path: &Path) -> PathBuf {
    parent.join(format!(
        ".{}.tmp.{}",
        path.file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("data"),
        std::process::id()
    ))
}
