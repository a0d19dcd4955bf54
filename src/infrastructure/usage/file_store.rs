use std::path::{Path, PathBuf};

use crate::domain::usage::{UsageRecord, UsageStore};
use crate::domain::DomainError;
use crate::infrastructure::fs::{read_json, write_json_atomic};

/// Usage record persisted as a single JSON document
#[derive(Debug, Clone)]
pub struct FileUsageStore {
    path: PathBuf,
}

impl FileUsageStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl UsageStore for FileUsageStore {
    fn load(&self) -> Result<Option<UsageRecord>, DomainError> {
        Ok(read_json(&self.path)?)
    }

    fn save(&self, record: &UsageRecord) -> Result<(), DomainError> {
        write_json_atomic(&self.path, record)
    }
}
