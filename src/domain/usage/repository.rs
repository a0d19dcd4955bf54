//! Usage persistence trait

use std::fmt::Debug;

use super::record::UsageRecord;
use crate::domain::DomainError;

/// Durable storage for the usage record.
///
/// Implementations are synchronous: the record is small and the file is
/// local, and every write replaces the whole record.
pub trait UsageStore: Send + Sync + Debug {
    /// Read the stored record.
    ///
    /// Returns `Ok(None)` when nothing has been stored yet and an error when
    /// the stored data cannot be read or parsed.
    fn load(&self) -> Result<Option<UsageRecord>, DomainError>;

    /// Replace the stored record
    fn save(&self, record: &UsageRecord) -> Result<(), DomainError>;
}
