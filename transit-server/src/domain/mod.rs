//! Domain types for the transit routing engine.
//!
//! Core vocabulary shared by the loader, the graph builder, the planner
//! and the web layer: coordinates, transport modes, graph nodes and edges,
//! and itinerary output types.

mod geo;
mod itinerary;
mod mode;
mod node;

pub use geo::GeoPoint;
pub use itinerary::{RouteResult, RouteSegment};
pub use mode::{Mode, ModeMask, RouteKind};
pub use node::{Edge, EdgeTrip, Node, NodeId, TripIdx};
