//! Route planning over the transit graph.
//!
//! The pathfinder runs a mode-masked A* between two coordinates: candidate
//! stops around each endpoint are found through the spatial grid, seeded
//! with their access-walk cost, and expanded under a transfer penalty
//! until no destination candidate can improve the best known total. The
//! planner wraps four pathfinder runs, one per mode variant.

mod config;
mod plan;
mod search;


pub use config::SearchConfig;
pub use plan::RoutePlanner;
pub use search::{Pathfinder, RouteQuery};
