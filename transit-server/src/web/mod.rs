//! Web layer for the transit routing server.
//!
//! Provides the route-planning endpoint, stop search, and health check.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::create_router;
pub use state::AppState;
