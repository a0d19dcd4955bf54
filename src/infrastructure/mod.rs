//! Infrastructure layer - External service implementations

pub mod catch;
pub mod forecast;
pub mod fs;
pub mod logging;
pub mod observability;
pub mod usage;
pub mod vision;
