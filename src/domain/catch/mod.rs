//! Catch log domain

mod entity;
mod repository;
mod validation;

pub use entity::{CatchRecord, NewCatch};
pub use repository::CatchRepository;
pub use validation::{validate_catch, CatchValidationError};
