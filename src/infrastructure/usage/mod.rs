//! Usage tracking infrastructure implementations

mod file_store;
mod in_memory;
mod ledger;

pub use file_store::FileUsageStore;
pub use in_memory::InMemoryUsageStore;
pub use ledger::{AdmissionDenied, AdmissionPermit, UsageLedger};
