use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{CatchRecord, NewCatch};
use crate::domain::DomainError;

/// Append-only catch log
#[async_trait]
pub trait CatchRepository: Send + Sync + Debug {
    /// Append a catch and return the stored record
    async fn append(&self, entry: NewCatch) -> Result<CatchRecord, DomainError>;

    /// All catches in insertion order
    async fn list(&self) -> Result<Vec<CatchRecord>, DomainError>;

    async fn count(&self) -> Result<usize, DomainError>;
}
