//! Graph node and edge types.
//!
//! Internal node identity is a dense index into the node table, assigned in
//! load order. External GTFS stop ids are opaque strings kept on the node
//! for display and mode-prefix filtering. Dense indices allow O(1)
//! per-node arrays for search state instead of hash lookups in the inner
//! loop.

use std::fmt;

use super::geo::GeoPoint;
use super::mode::Mode;

/// Dense identifier of a stop in the transit graph: 0..N−1 in load order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Dense identifier of an interned GTFS trip id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TripIdx(pub u32);

impl TripIdx {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// The trip an edge belongs to: a transit trip, or the walking sentinel.
///
/// Walking edges all share the sentinel so consecutive walks group into a
/// single itinerary segment, and so the transfer penalty never applies
/// to or from walking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeTrip {
    Walk,
    Transit(TripIdx),
}

impl EdgeTrip {
    pub fn is_walk(self) -> bool {
        matches!(self, EdgeTrip::Walk)
    }
}

/// A directed transition between two nodes.
#[derive(Debug, Clone)]
pub struct Edge {
    /// Target node.
    pub to: NodeId,
    /// Travel time in seconds (non-negative).
    pub weight: f64,
    /// Owning trip, or the walk sentinel.
    pub trip: EdgeTrip,
    /// Transport mode; filtered against the request mask with a single AND.
    pub mode: Mode,
}

/// A stop in the transit network. Immutable after graph load.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    /// External GTFS stop id (opaque string).
    pub stop_id: String,
    pub name: String,
    pub location: GeoPoint,
    /// Outgoing edges, in insertion order.
    pub edges: Vec<Edge>,
}
