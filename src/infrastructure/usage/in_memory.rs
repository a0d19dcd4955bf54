//! In-memory usage store

use std::sync::RwLock;

use crate::domain::usage::{UsageRecord, UsageStore};
use crate::domain::DomainError;

/// Usage store that keeps the record in process memory
#[derive(Debug, Default)]
pub struct InMemoryUsageStore {
    record: RwLock<Option<UsageRecord>>,
}

impl InMemoryUsageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: UsageRecord) -> Self {
        Self {
            record: RwLock::new(Some(record)),
        }
    }
}

impl UsageStore for InMemoryUsageStore {
    fn load(&self) -> Result<Option<UsageRecord>, DomainError> {
        let record = self.record.read().map_err(|e| {
            DomainError::internal(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(record.clone())
    }

    fn save(&self, record: &UsageRecord) -> Result<(), DomainError> {
        let mut stored = self.record.write().map_err(|e| {
            DomainError::internal(format!("Failed to acquire write lock: {}", e))
        })?;

        *stored = Some(record.clone());
        Ok(())
    }
}
