//! The route planner: one search per mode variant.

use std::sync::atomic::AtomicBool;

use tracing::info;

use crate::domain::{GeoPoint, RouteKind, RouteResult};
use crate::graph::Graph;

use super::config::SearchConfig;
use super::search::{Pathfinder, RouteQuery};

/// Plans all four route variants for a pair of coordinates.
pub struct RoutePlanner<'a> {
    pathfinder: Pathfinder<'a>,
}

impl<'a> RoutePlanner<'a> {
    pub fn new(graph: &'a Graph, config: &'a SearchConfig) -> Self {
        Self {
            pathfinder: Pathfinder::new(graph, config),
        }
    }

    /// Run the four searches (bus, metro, microbus, optimal) and return
    /// their results in that order. Unreachable variants are returned with
    /// infinite duration rather than dropped.
    pub fn plan(&self, origin: GeoPoint, destination: GeoPoint) -> Vec<RouteResult> {
        self.plan_inner(origin, destination, None)
    }

    /// Like [`Self::plan`], with a cancellation flag checked inside each
    /// search's main loop.
    pub fn plan_cancellable(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
        cancel: &AtomicBool,
    ) -> Vec<RouteResult> {
        self.plan_inner(origin, destination, Some(cancel))
    }

    fn plan_inner(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
        cancel: Option<&AtomicBool>,
    ) -> Vec<RouteResult> {
        let results: Vec<RouteResult> = RouteKind::ALL
            .iter()
            .map(|kind| {
                let query = RouteQuery::for_kind(origin, destination, *kind);
                match cancel {
                    Some(flag) => self.pathfinder.find_route_cancellable(&query, flag),
                    None => self.pathfinder.find_route(&query),
                }
            })
            .collect();

        for result in &results {
            if result.is_found() {
                info!(
                    kind = %result.kind,
                    minutes = (result.total_duration / 60.0) as i64,
                    segments = result.segments.len(),
                    "route found"
                );
            } else {
                info!(kind = %result.kind, "no route");
            }
        }
        results
    }
}
