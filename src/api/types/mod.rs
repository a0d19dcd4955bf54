//! Request and response types shared by the HTTP handlers

pub mod analyze;
pub mod error;
pub mod json;

pub use analyze::{AnalyzeResponse, CatchLoggedResponse, UsageStatsResponse};
pub use error::{ApiError, ApiErrorResponse, ApiErrorType};
pub use json::Json;
