use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::catch::{CatchRecord, CatchRepository, NewCatch};
use crate::domain::DomainError;

/// Catch log kept in process memory
#[derive(Debug, Default)]
pub struct InMemoryCatchRepository {
    catches: RwLock<Vec<CatchRecord>>,
}

impl InMemoryCatchRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatchRepository for InMemoryCatchRepository {
    async fn append(&self, entry: NewCatch) -> Result<CatchRecord, DomainError> {
        let mut catches = self.catches.write().await;
        let record = CatchRecord::from_new(catches.len() as u64 + 1, entry, Utc::now());
        catches.push(record.clone());
        Ok(record)
    }

    async fn list(&self) -> Result<Vec<CatchRecord>, DomainError> {
        Ok(self.catches.read().await.clone())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.catches.read().await.len())
    }
}
