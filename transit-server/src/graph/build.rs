//! Graph construction from a loaded feed.
//!
//! Transit edges come from consecutive stop-times within a trip; walking
//! transfer edges are densified between spatially close stops using the
//! grid index, which keeps transfer generation near-linear in the number
//! of stops.

use std::collections::HashMap;

use tracing::info;

use crate::domain::{Edge, EdgeTrip, Mode, Node, NodeId, TripIdx};
use crate::gtfs::Feed;

use super::grid::SpatialGrid;
use super::{Graph, TripInfo};

/// Physical parameters of graph construction.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Maximum walking transfer distance in meters.
    pub max_walk_distance_m: f64,
    /// Fixed dwell added to every transit edge, in seconds.
    pub stop_dwell_seconds: f64,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            max_walk_distance_m: 1_500.0,
            stop_dwell_seconds: 30.0,
        }
    }
}

impl Graph {
    /// Build the immutable graph from a parsed feed.
    pub fn from_feed(feed: &Feed, config: &BuildConfig) -> Graph {
        let mut nodes: Vec<Node> = Vec::with_capacity(feed.stops.len());
        let mut stop_index: HashMap<String, NodeId> = HashMap::with_capacity(feed.stops.len());

        for stop in &feed.stops {
            let id = NodeId(nodes.len() as u32);
            stop_index.insert(stop.stop_id.clone(), id);
            nodes.push(Node {
                id,
                stop_id: stop.stop_id.clone(),
                name: stop.name.clone(),
                location: stop.location,
                edges: Vec::new(),
            });
        }

        let mut trips: Vec<TripInfo> = Vec::new();
        let mut trip_index: HashMap<&str, TripIdx> = HashMap::new();

        let transit_edges = add_transit_edges(
            feed,
            config,
            &mut nodes,
            &stop_index,
            &mut trips,
            &mut trip_index,
        );

        let mut grid = SpatialGrid::new(config.max_walk_distance_m);
        for node in &nodes {
            grid.insert(node.location, node.id);
        }

        let transfer_pairs = add_transfer_edges(config, &mut nodes, &grid);

        info!(
            nodes = nodes.len(),
            transit_edges,
            transfer_pairs,
            "graph built"
        );

        Graph::new(nodes, stop_index, trips, grid)
    }
}

/// Emit directed transit edges for consecutive stop-times of each trip.
/// Returns the number of edges created.
fn add_transit_edges<'a>(
    feed: &'a Feed,
    config: &BuildConfig,
    nodes: &mut [Node],
    stop_index: &HashMap<String, NodeId>,
    trips: &mut Vec<TripInfo>,
    trip_index: &mut HashMap<&'a str, TripIdx>,
) -> usize {
    let mut entries: Vec<_> = feed.stop_times.iter().collect();
    entries.sort_by(|a, b| a.trip_id.cmp(&b.trip_id).then(a.seq.cmp(&b.seq)));

    let mut edge_count = 0;
    for pair in entries.windows(2) {
        let (prev, curr) = (pair[0], pair[1]);
        if prev.trip_id != curr.trip_id {
            continue;
        }
        let (Some(&u), Some(&v)) = (stop_index.get(&prev.stop_id), stop_index.get(&curr.stop_id))
        else {
            continue;
        };
        if u == v {
            continue;
        }

        let mode = feed.trip_mode(&prev.trip_id);
        let trip = *trip_index.entry(prev.trip_id.as_str()).or_insert_with(|| {
            let idx = TripIdx(trips.len() as u32);
            trips.push(TripInfo {
                gtfs_id: prev.trip_id.clone(),
                route_id: feed
                    .trips
                    .get(&prev.trip_id)
                    .map(|t| t.route_id.clone())
                    .unwrap_or_default(),
                mode,
            });
            idx
        });

        let dist = nodes[u.index()]
            .location
            .distance_to(&nodes[v.index()].location);
        let weight = dist / mode.speed_mps() + config.stop_dwell_seconds;

        nodes[u.index()].edges.push(Edge {
            to: v,
            weight,
            trip: EdgeTrip::Transit(trip),
            mode,
        });
        edge_count += 1;

        // Microbus lines run both directions but the feed describes them
        // one-way; mirror the edge. Metro and bus stay unidirectional.
        if mode == Mode::Microbus {
            nodes[v.index()].edges.push(Edge {
                to: u,
                weight,
                trip: EdgeTrip::Transit(trip),
                mode,
            });
            edge_count += 1;
        }
    }
    edge_count
}

/// Emit symmetric walking edges between every pair of stops within the
/// maximum walk distance. Returns the number of pairs connected.
fn add_transfer_edges(config: &BuildConfig, nodes: &mut [Node], grid: &SpatialGrid) -> usize {
    let mut pair_count = 0;
    for i in 0..nodes.len() {
        let origin = nodes[i].location;
        for j in grid.neighborhood(origin) {
            // i < j keeps each pair considered once.
            if j.index() <= i {
                continue;
            }
            let dist = origin.distance_to(&nodes[j.index()].location);
            if dist > config.max_walk_distance_m || dist <= 0.0 {
                continue;
            }
            let weight = dist / Mode::Walk.speed_mps();
            nodes[i].edges.push(Edge {
                to: j,
                weight,
                trip: EdgeTrip::Walk,
                mode: Mode::Walk,
            });
            nodes[j.index()].edges.push(Edge {
                to: NodeId(i as u32),
                weight,
                trip: EdgeTrip::Walk,
                mode: Mode::Walk,
            });
            pair_count += 1;
        }
    }
    pair_count
}


#[cfg(test)]
mod proptests {
    use super::tests::make_feed;
    use super::*;
    use crate::domain::EdgeTrip;
    use proptest::prelude::*;

    /// Random stops in a ~11 km square around Cairo.
    fn stops_strategy() -> impl Strategy<Value = Vec<(f64, f64)>> {
        prop::collection::vec((30.0f64..30.1, 31.0f64..31.1), 2..25)
    }

    fn build_random(positions: Vec<(f64, f64)>, trip_stops: Vec<usize>, mode_pick: u8) -> Graph {
        let ids: Vec<String> = (0..positions.len()).map(|i| format!("B1_{i}")).collect();
        let stops: Vec<(&str, f64, f64)> = ids
            .iter()
            .zip(&positions)
            .map(|(id, (lat, lon))| (id.as_str(), *lat, *lon))
            .collect();
        let path: Vec<&str> = trip_stops
            .iter()
            .map(|i| ids[i % ids.len()].as_str())
            .collect();
        let mode = match mode_pick % 3 {
            0 => Mode::Bus,
            1 => Mode::Metro,
            _ => Mode::Microbus,
        };
        let feed = make_feed(&stops, &[("T_rand", mode, &path)]);
        Graph::from_feed(&feed, &BuildConfig::default())
    }

    proptest! {
        /// Every edge targets a valid node id.
        #[test]
        fn edge_targets_valid(
            positions in stops_strategy(),
            trip in prop::collection::vec(0usize..25, 0..8),
            mode in 0u8..3,
        ) {
            let graph = build_random(positions, trip, mode);
            for node in graph.nodes() {
                for edge in &node.edges {
                    prop_assert!(edge.to.index() < graph.len());
                }
            }
        }

        /// Every walking edge has a symmetric twin with identical weight,
        /// and spans at most the maximum walk distance.
        #[test]
        fn walk_edges_symmetric_and_bounded(
            positions in stops_strategy(),
            trip in prop::collection::vec(0usize..25, 0..8),
            mode in 0u8..3,
        ) {
            let graph = build_random(positions, trip, mode);
            for node in graph.nodes() {
                for edge in node.edges.iter().filter(|e| e.mode == Mode::Walk) {
                    let dist = node
                        .location
                        .distance_to(&graph.node(edge.to).location);
                    prop_assert!(dist <= 1_500.0 + 1e-6);
                    prop_assert!(dist > 0.0);
                    let twin = graph
                        .node(edge.to)
                        .edges
                        .iter()
                        .find(|e| e.to == node.id && e.mode == Mode::Walk);
                    prop_assert!(twin.is_some_and(|t| t.weight == edge.weight));
                }
            }
        }

        /// Transit edges weigh at least the stop dwell time, and their
        /// trips are interned with a mode.
        #[test]
        fn transit_edges_dwell_and_mode(
            positions in stops_strategy(),
            trip in prop::collection::vec(0usize..25, 2..8),
            mode in 0u8..3,
        ) {
            let graph = build_random(positions, trip, mode);
            for node in graph.nodes() {
                for edge in node.edges.iter().filter(|e| e.mode != Mode::Walk) {
                    prop_assert!(edge.weight >= 30.0);
                    match edge.trip {
                        EdgeTrip::Transit(idx) => {
                            prop_assert_eq!(graph.trip(idx).mode, edge.mode);
                        }
                        EdgeTrip::Walk => prop_assert!(false, "transit edge with walk trip"),
                    }
                }
            }
        }

        /// Node count equals the number of unique stop ids fed in.
        #[test]
        fn node_count_matches_unique_stops(positions in stops_strategy()) {
            let n = positions.len();
            let graph = build_random(positions, vec![], 0);
            prop_assert_eq!(graph.len(), n);
        }
    }
}
