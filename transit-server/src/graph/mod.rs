//! The immutable transit graph.
//!
//! Built once at startup from a loaded [`Feed`](crate::gtfs::Feed) and held
//! by shared reference for the process lifetime. No mutation paths exist
//! after construction, so request handlers read it without locks.

mod build;
mod grid;

pub use build::BuildConfig;

use std::collections::HashMap;

use crate::domain::{EdgeTrip, GeoPoint, Mode, ModeMask, Node, NodeId, TripIdx};

use grid::SpatialGrid;

/// If no mode-matching stop lies within this distance, the mode-filtered
/// nearest lookup falls back to the unfiltered one.
const NEAREST_MODE_FALLBACK_M: f64 = 5_000.0;

/// An interned transit trip, with its route and mode resolved at build
/// time so the search never touches the reference maps.
#[derive(Debug, Clone)]
pub struct TripInfo {
    /// The GTFS trip id.
    pub gtfs_id: String,
    /// The GTFS route id the trip belongs to; empty when the feed never
    /// declared the trip.
    pub route_id: String,
    /// Mode of the trip's route.
    pub mode: Mode,
}

/// The transit network: dense node table, interned trips, and the spatial
/// grid used for neighbor queries and transfer generation.
#[derive(Debug)]
pub struct Graph {
    nodes: Vec<Node>,
    stop_index: HashMap<String, NodeId>,
    trips: Vec<TripInfo>,
    grid: SpatialGrid,
}

impl Graph {
    pub(crate) fn new(
        nodes: Vec<Node>,
        stop_index: HashMap<String, NodeId>,
        trips: Vec<TripInfo>,
        grid: SpatialGrid,
    ) -> Self {
        Self {
            nodes,
            stop_index,
            trips,
            grid,
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn trip(&self, idx: TripIdx) -> &TripInfo {
        &self.trips[idx.index()]
    }

    /// Mode of the trip an edge belongs to; the walk sentinel is walking.
    pub fn trip_mode(&self, trip: EdgeTrip) -> Mode {
        match trip {
            EdgeTrip::Walk => Mode::Walk,
            EdgeTrip::Transit(idx) => self.trip(idx).mode,
        }
    }

    /// Node for an external GTFS stop id.
    pub fn node_by_stop_id(&self, stop_id: &str) -> Option<NodeId> {
        self.stop_index.get(stop_id).copied()
    }

    /// Case-insensitive stop search by GTFS id or name substring, for the
    /// stop-search endpoint. An exact id match always ranks first.
    pub fn search_stops(&self, query: &str, limit: usize) -> Vec<NodeId> {
        let needle = query.to_lowercase();
        let mut hits = Vec::new();
        if let Some(id) = self.node_by_stop_id(query) {
            hits.push(id);
        }
        for node in &self.nodes {
            if hits.len() >= limit {
                break;
            }
            if hits.contains(&node.id) {
                continue;
            }
            if node.name.to_lowercase().contains(&needle)
                || node.stop_id.to_lowercase().contains(&needle)
            {
                hits.push(node.id);
            }
        }
        hits.truncate(limit);
        hits
    }

    /// Nearest node by great-circle distance; `None` on an empty graph.
    /// Linear scan; used once per request endpoint, not in the inner loop.
    pub fn nearest_node(&self, point: GeoPoint) -> Option<NodeId> {
        self.nearest_where(point, |_| true).map(|(id, _)| id)
    }

    /// Nearest node whose stop id matches one of the mask's mode prefixes.
    /// Falls back to the unfiltered lookup when nothing mode-matching lies
    /// within 5 km. A mask with no transit mode filters nothing.
    pub fn nearest_node_for_mask(&self, point: GeoPoint, mask: ModeMask) -> Option<NodeId> {
        let prefixes = mask.stop_id_prefixes();
        if prefixes.is_empty() {
            return self.nearest_node(point);
        }
        match self.nearest_where(point, |n| matches_prefixes(&n.stop_id, &prefixes)) {
            Some((id, dist)) if dist <= NEAREST_MODE_FALLBACK_M => Some(id),
            _ => self.nearest_node(point),
        }
    }

    fn nearest_where<F>(&self, point: GeoPoint, mut keep: F) -> Option<(NodeId, f64)>
    where
        F: FnMut(&Node) -> bool,
    {
        let mut best: Option<(NodeId, f64)> = None;
        for node in &self.nodes {
            if !keep(node) {
                continue;
            }
            let dist = point.distance_to(&node.location);
            if best.is_none_or(|(_, d)| dist < d) {
                best = Some((node.id, dist));
            }
        }
        best
    }

    /// Nodes within `radius_m` of `point`, with their distances.
    /// Grid-accelerated: only the covering cell block is scanned.
    pub fn nodes_within_radius(&self, point: GeoPoint, radius_m: f64) -> Vec<(NodeId, f64)> {
        self.radius_where(point, radius_m, |_| true)
    }

    /// Mode-filtered variant of [`Self::nodes_within_radius`].
    pub fn nodes_within_radius_for_mask(
        &self,
        point: GeoPoint,
        radius_m: f64,
        mask: ModeMask,
    ) -> Vec<(NodeId, f64)> {
        let prefixes = mask.stop_id_prefixes();
        if prefixes.is_empty() {
            return self.nodes_within_radius(point, radius_m);
        }
        self.radius_where(point, radius_m, |n| matches_prefixes(&n.stop_id, &prefixes))
    }

    fn radius_where<F>(&self, point: GeoPoint, radius_m: f64, mut keep: F) -> Vec<(NodeId, f64)>
    where
        F: FnMut(&Node) -> bool,
    {
        let mut hits = Vec::new();
        for id in self.grid.covering(point, radius_m) {
            let node = self.node(id);
            if !keep(node) {
                continue;
            }
            let dist = point.distance_to(&node.location);
            if dist <= radius_m {
                hits.push((id, dist));
            }
        }
        hits
    }
}

fn matches_prefixes(stop_id: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|p| stop_id.starts_with(p))
}
