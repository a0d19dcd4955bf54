//! Catch log storage

mod file_repository;
mod in_memory;

pub use file_repository::FileCatchRepository;
pub use in_memory::InMemoryCatchRepository;
