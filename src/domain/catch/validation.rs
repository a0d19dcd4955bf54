//! Catch validation

use thiserror::Error;

use super::entity::NewCatch;

const MAX_FIELD_LENGTH: usize = 200;
const MAX_NOTES_LENGTH: usize = 2000;

/// Errors that can occur during catch validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CatchValidationError {
    #[error("Field '{0}' cannot be empty")]
    EmptyField(&'static str),

    #[error("Field '{0}' cannot exceed {1} characters")]
    FieldTooLong(&'static str, usize),
}

/// Validate a submitted catch
pub fn validate_catch(entry: &NewCatch) -> Result<(), CatchValidationError> {
    let fields = [
        ("species", entry.species.as_str()),
        ("bait", entry.bait.as_str()),
        ("location", entry.location.as_str()),
        ("date", entry.date.as_str()),
        ("time", entry.time.as_str()),
    ];

    for (name, value) in fields {
        if value.trim().is_empty() {
            return Err(CatchValidationError::EmptyField(name));
        }

        if value.chars().count() > MAX_FIELD_LENGTH {
            return Err(CatchValidationError::FieldTooLong(name, MAX_FIELD_LENGTH));
        }
    }

    if let Some(ref notes) = entry.notes {
        if notes.chars().count() > MAX_NOTES_LENGTH {
            return Err(CatchValidationError::FieldTooLong("notes", MAX_NOTES_LENGTH));
        }
    }

    Ok(())
}
