//! API layer - HTTP endpoints and middleware

pub mod analyze;
pub mod catches;
pub mod forecast;
pub mod health;
pub mod index;
pub mod middleware;
pub mod router;
pub mod state;
pub mod types;
pub mod usage;

pub use router::{create_router, create_router_with_metrics};
pub use state::AppState;
