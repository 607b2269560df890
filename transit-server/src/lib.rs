//! Multi-modal transit routing server.
//!
//! Builds an immutable routing graph from a GTFS feed at startup: stops
//! become nodes, consecutive stop-times become transit edges, and nearby
//! stops are joined by walking transfers. Requests then resolve a pair of
//! coordinates into four ranked itineraries (bus, metro, microbus, and
//! the optimal combination) via a mode-masked A* search.

pub mod config;
pub mod domain;
pub mod graph;
pub mod gtfs;
pub mod planner;
pub mod web;
