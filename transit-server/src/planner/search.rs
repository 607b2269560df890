//! Mode-masked A* route search.
//!
//! Finds an itinerary between two coordinates over the transit graph,
//! restricted to the modes in a request mask. The search is multi-source
//! and multi-target: several candidate stops around the origin are seeded
//! with their access-walk cost, and the search keeps running until no
//! destination candidate can improve on the best known total.
//!
//! All mutable state lives in the invocation; the graph is read through a
//! shared reference, so concurrent searches over one graph are safe.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};

use ordered_float::OrderedFloat;
use tracing::{debug, instrument, trace};

use crate::domain::{
    EdgeTrip, GeoPoint, Mode, ModeMask, NodeId, RouteKind, RouteResult, RouteSegment,
};
use crate::graph::Graph;

use super::config::SearchConfig;

/// One route search: endpoints, the allowed modes, and the label the
/// resulting itinerary carries.
#[derive(Debug, Clone)]
pub struct RouteQuery {
    pub origin: GeoPoint,
    pub destination: GeoPoint,
    pub mask: ModeMask,
    pub kind: RouteKind,
}

impl RouteQuery {
    /// A query for one of the four standard variants, using its mask.
    pub fn for_kind(origin: GeoPoint, destination: GeoPoint, kind: RouteKind) -> Self {
        Self {
            origin,
            destination,
            mask: kind.mask(),
            kind,
        }
    }
}

/// Entry in the open set, ordered as a min-heap on f-score.
#[derive(Clone, Copy, PartialEq)]
struct QueueEntry {
    f: OrderedFloat<f64>,
    g: f64,
    node: NodeId,
    /// Trip the path arrived on; drives the transfer penalty.
    arrival: EdgeTrip,
}

impl Eq for QueueEntry {}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Per-node search record, allocated per invocation.
#[derive(Clone)]
struct PathRecord {
    g: f64,
    parent: Option<NodeId>,
    arrival: EdgeTrip,
}

impl Default for PathRecord {
    fn default() -> Self {
        Self {
            g: f64::INFINITY,
            parent: None,
            arrival: EdgeTrip::Walk,
        }
    }
}

/// The mode-masked A* pathfinder over a shared graph.
pub struct Pathfinder<'a> {
    graph: &'a Graph,
    config: &'a SearchConfig,
}

impl<'a> Pathfinder<'a> {
    pub fn new(graph: &'a Graph, config: &'a SearchConfig) -> Self {
        Self { graph, config }
    }

    /// Search for an itinerary. Returns an unreachable result (infinite
    /// duration, no segments) when nothing connects the endpoints.
    #[instrument(skip(self, query), fields(kind = %query.kind))]
    pub fn find_route(&self, query: &RouteQuery) -> RouteResult {
        self.search(query, None)
    }

    /// Like [`Self::find_route`], but checks `cancel` between pops. A
    /// cancelled search returns the best itinerary found so far, which may
    /// be the direct walk or unreachable.
    pub fn find_route_cancellable(&self, query: &RouteQuery, cancel: &AtomicBool) -> RouteResult {
        self.search(query, Some(cancel))
    }

    fn search(&self, query: &RouteQuery, cancel: Option<&AtomicBool>) -> RouteResult {
        let walk_speed = Mode::Walk.speed_mps();
        let direct_distance = query.origin.distance_to(&query.destination);
        let direct_applies = direct_distance <= self.config.direct_walk_threshold_m();
        let direct_total = direct_distance / walk_speed;

        let (origin_candidates, dest_candidates) = self.expand_candidates(query);
        if origin_candidates.is_empty() || dest_candidates.is_empty() {
            debug!(
                origin_candidates = origin_candidates.len(),
                dest_candidates = dest_candidates.len(),
                "no candidate stops at any probe radius"
            );
            return if direct_applies {
                self.direct_walk_result(query, direct_total)
            } else {
                RouteResult::unreachable(query.kind)
            };
        }

        // Final walk distance per destination candidate, for pop-time totals.
        let dest_walk: HashMap<NodeId, f64> = dest_candidates.into_iter().collect();

        // The direct walk, when close enough, is both a fallback itinerary
        // and an upper bound on anything the search may return.
        let mut best_total = if direct_applies {
            direct_total
        } else {
            f64::INFINITY
        };
        let mut best_end: Option<NodeId> = None;

        let heuristic = |id: NodeId| {
            self.graph.node(id).location.distance_to(&query.destination) / self.config.max_speed_mps
        };

        let mut records: Vec<PathRecord> = vec![PathRecord::default(); self.graph.len()];
        let mut heap: BinaryHeap<QueueEntry> = BinaryHeap::new();

        for &(id, walk_dist) in &origin_candidates {
            let g = walk_dist / walk_speed;
            if g < records[id.index()].g {
                records[id.index()].g = g;
                heap.push(QueueEntry {
                    f: OrderedFloat(g + heuristic(id)),
                    g,
                    node: id,
                    arrival: EdgeTrip::Walk,
                });
            }
        }

        while let Some(entry) = heap.pop() {
            if cancel.is_some_and(|flag| flag.load(AtomicOrdering::Relaxed)) {
                debug!("search cancelled");
                break;
            }
            // Stale entry: the node was reached more cheaply since.
            if entry.g > records[entry.node.index()].g {
                continue;
            }
            // Entries pop in f order; once f cannot beat the best total,
            // nothing later can either.
            if entry.f.into_inner() >= best_total {
                break;
            }

            if let Some(&final_walk) = dest_walk.get(&entry.node) {
                let candidate_total = entry.g + final_walk / walk_speed;
                if candidate_total < best_total {
                    trace!(node = %entry.node, total = candidate_total, "improved best total");
                    best_total = candidate_total;
                    best_end = Some(entry.node);
                }
            }

            for edge in &self.graph.node(entry.node).edges {
                if !query.mask.contains(edge.mode) {
                    continue;
                }
                let mut cost = edge.weight;
                if let (EdgeTrip::Transit(prev), EdgeTrip::Transit(next)) =
                    (entry.arrival, edge.trip)
                    && prev != next
                {
                    cost += self.config.transfer_penalty_seconds;
                }
                let new_g = entry.g + cost;
                if new_g >= best_total {
                    continue;
                }
                if new_g < records[edge.to.index()].g {
                    let record = &mut records[edge.to.index()];
                    record.g = new_g;
                    record.parent = Some(entry.node);
                    record.arrival = edge.trip;
                    heap.push(QueueEntry {
                        f: OrderedFloat(new_g + heuristic(edge.to)),
                        g: new_g,
                        node: edge.to,
                        arrival: edge.trip,
                    });
                }
            }
        }

        if best_total.is_infinite() {
            debug!("unreachable");
            return RouteResult::unreachable(query.kind);
        }

        match best_end {
            None => self.direct_walk_result(query, best_total),
            Some(end) => self.reconstruct(query, &records, end, best_total),
        }
    }

    /// Collect mode-masked candidate stops around both endpoints, widening
    /// the probe radius until both sides are non-empty.
    fn expand_candidates(
        &self,
        query: &RouteQuery,
    ) -> (Vec<(NodeId, f64)>, Vec<(NodeId, f64)>) {
        for &radius in &self.config.probe_radii_m {
            let origin = self
                .graph
                .nodes_within_radius_for_mask(query.origin, radius, query.mask);
            let dest = self
                .graph
                .nodes_within_radius_for_mask(query.destination, radius, query.mask);
            if !origin.is_empty() && !dest.is_empty() {
                trace!(
                    radius,
                    origin_candidates = origin.len(),
                    dest_candidates = dest.len(),
                    "candidates found"
                );
                return (origin, dest);
            }
        }
        (Vec::new(), Vec::new())
    }

    /// The single-walking-segment itinerary from origin to destination.
    fn direct_walk_result(&self, query: &RouteQuery, total: f64) -> RouteResult {
        RouteResult {
            kind: query.kind,
            total_duration: total,
            segments: vec![RouteSegment {
                start: query.origin,
                start_name: "Origin".to_string(),
                end: query.destination,
                end_name: "Destination".to_string(),
                method: Mode::Walk,
                num_stops: 0,
            }],
        }
    }

    /// Rebuild the winning node path and group it into segments: an access
    /// walk, one segment per trip (or contiguous walk), and an egress walk.
    fn reconstruct(
        &self,
        query: &RouteQuery,
        records: &[PathRecord],
        end: NodeId,
        total: f64,
    ) -> RouteResult {
        let mut path = Vec::new();
        let mut current = Some(end);
        while let Some(id) = current {
            path.push(id);
            current = records[id.index()].parent;
        }
        path.reverse();

        let mut segments = Vec::new();

        let first = self.graph.node(path[0]);
        segments.push(RouteSegment {
            start: query.origin,
            start_name: "Origin".to_string(),
            end: first.location,
            end_name: first.name.clone(),
            method: Mode::Walk,
            num_stops: 0,
        });

        if path.len() > 1 {
            let mut leg_start = 0;
            for i in 1..path.len() {
                let trip = records[path[i].index()].arrival;
                let is_last = i == path.len() - 1;
                let boundary =
                    is_last || records[path[i + 1].index()].arrival != trip;
                if boundary {
                    let u = self.graph.node(path[leg_start]);
                    let v = self.graph.node(path[i]);
                    segments.push(RouteSegment {
                        start: u.location,
                        start_name: u.name.clone(),
                        end: v.location,
                        end_name: v.name.clone(),
                        method: self.graph.trip_mode(trip),
                        num_stops: i - leg_start,
                    });
                    leg_start = i;
                }
            }
        }

        let last = self.graph.node(end);
        segments.push(RouteSegment {
            start: last.location,
            start_name: last.name.clone(),
            end: query.destination,
            end_name: "Destination".to_string(),
            method: Mode::Walk,
            num_stops: 0,
        });

        RouteResult {
            kind: query.kind,
            total_duration: total,
            segments,
        }
    }
}
