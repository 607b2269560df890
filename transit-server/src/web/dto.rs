//! Data transfer objects for the route API.
//!
//! The response carries both the structured `routes` array (one entry per
//! mode variant) and the legacy flat "best route" fields that predate it;
//! callers that have not migrated read the flat view.

use serde::{Deserialize, Serialize};

use crate::domain::{GeoPoint, RouteResult, RouteSegment};
use crate::graph::Graph;

/// A latitude/longitude pair on the wire.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl From<GeoPoint> for LatLon {
    fn from(p: GeoPoint) -> Self {
        Self { lat: p.lat, lon: p.lon }
    }
}

impl From<LatLon> for GeoPoint {
    fn from(p: LatLon) -> Self {
        GeoPoint::new(p.lat, p.lon)
    }
}

/// Request for a route between two coordinates.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteRequest {
    pub origin: LatLon,
    pub destination: LatLon,
}

/// Echo of the queried coordinates.
#[derive(Debug, Serialize)]
pub struct QueryEcho {
    pub origin: LatLon,
    pub destination: LatLon,
}

/// One segment of an itinerary.
#[derive(Debug, Serialize)]
pub struct SegmentResult {
    pub start_location: LatLon,
    pub start_name: String,
    pub end_location: LatLon,
    pub end_name: String,
    pub method: String,
    pub num_stops: usize,
    pub distance_meters: i64,
    pub duration_seconds: i64,
}

/// One of the four route variants.
#[derive(Debug, Serialize)]
pub struct RouteOption {
    #[serde(rename = "type")]
    pub kind: String,
    pub found: bool,
    /// Rounded total, 0 when not found.
    pub total_duration_seconds: i64,
    /// "M min S sec", empty when not found.
    pub total_duration_formatted: String,
    pub total_segments: usize,
    pub total_distance_meters: f64,
    pub segments: Vec<SegmentResult>,
}

/// Legacy flat step, derived from the best found route.
#[derive(Debug, Serialize)]
pub struct LegacyStep {
    pub instruction: String,
    pub distance_meters: f64,
    pub duration_seconds: f64,
    #[serde(rename = "type")]
    pub method: String,
    pub line_name: String,
    pub start_location: LatLon,
    pub end_location: LatLon,
}

/// The full route response.
#[derive(Debug, Serialize)]
pub struct RouteResponse {
    pub query: QueryEcho,
    pub routes: Vec<RouteOption>,
    /// Legacy: total duration of the best found route, in seconds.
    pub total_duration_seconds: f64,
    /// Legacy: summed segment distance of the best found route.
    pub total_distance_meters: f64,
    /// Legacy: flat steps of the best found route.
    pub steps: Vec<LegacyStep>,
}

/// Request to search stops by id or name.
#[derive(Debug, Deserialize)]
pub struct StopSearchRequest {
    pub q: String,
    pub limit: Option<usize>,
}

/// A stop in search results.
#[derive(Debug, Serialize)]
pub struct StopResult {
    pub stop_id: String,
    pub name: String,
    pub location: LatLon,
}

/// Response for stop search.
#[derive(Debug, Serialize)]
pub struct StopSearchResponse {
    pub stops: Vec<StopResult>,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub error: String,
}

/// Round a duration to whole non-negative seconds.
fn to_int_seconds(value: f64) -> i64 {
    if value <= 0.0 { 0 } else { value.round() as i64 }
}

/// Format whole seconds as "M min S sec".
fn format_duration(total_seconds: i64) -> String {
    format!("{} min {} sec", total_seconds / 60, total_seconds % 60)
}

impl SegmentResult {
    /// Segment durations are recomputed from distance and cruise speed;
    /// the itinerary-level total is the search total (which also carries
    /// dwell and transfer costs).
    pub fn from_segment(segment: &RouteSegment) -> Self {
        let distance = segment.distance_meters();
        let duration = if distance > 0.0 {
            to_int_seconds(distance / segment.method.speed_mps())
        } else {
            0
        };
        Self {
            start_location: segment.start.into(),
            start_name: segment.start_name.clone(),
            end_location: segment.end.into(),
            end_name: segment.end_name.clone(),
            method: segment.method.as_str().to_string(),
            num_stops: segment.num_stops,
            distance_meters: distance.round() as i64,
            duration_seconds: duration,
        }
    }
}

impl RouteOption {
    pub fn from_result(result: &RouteResult) -> Self {
        if !result.is_found() {
            return Self {
                kind: result.kind.as_str().to_string(),
                found: false,
                total_duration_seconds: 0,
                total_duration_formatted: String::new(),
                total_segments: 0,
                total_distance_meters: 0.0,
                segments: Vec::new(),
            };
        }

        let total = to_int_seconds(result.total_duration);
        Self {
            kind: result.kind.as_str().to_string(),
            found: true,
            total_duration_seconds: total,
            total_duration_formatted: format_duration(total),
            total_segments: result.segments.len(),
            total_distance_meters: result.total_distance_meters(),
            segments: result.segments.iter().map(SegmentResult::from_segment).collect(),
        }
    }
}

impl LegacyStep {
    pub fn from_segment(segment: &RouteSegment) -> Self {
        let distance = segment.distance_meters();
        let duration = if distance > 0.0 {
            distance / segment.method.speed_mps()
        } else {
            0.0
        };
        Self {
            instruction: format!("Take {} to {}", segment.method, segment.end_name),
            distance_meters: distance,
            duration_seconds: duration,
            method: segment.method.as_str().to_string(),
            line_name: String::new(),
            start_location: segment.start.into(),
            end_location: segment.end.into(),
        }
    }
}

impl RouteResponse {
    /// Assemble the response from the four planner results. The caller
    /// guarantees at least one result is found.
    pub fn build(origin: LatLon, destination: LatLon, results: &[RouteResult]) -> Self {
        let routes = results.iter().map(RouteOption::from_result).collect();

        let best = results
            .iter()
            .filter(|r| r.is_found())
            .min_by(|a, b| a.cmp_by_duration(b));

        let (total_duration_seconds, total_distance_meters, steps) = match best {
            Some(best) => (
                best.total_duration,
                best.total_distance_meters(),
                best.segments.iter().map(LegacyStep::from_segment).collect(),
            ),
            None => (0.0, 0.0, Vec::new()),
        };

        Self {
            query: QueryEcho { origin, destination },
            routes,
            total_duration_seconds,
            total_distance_meters,
            steps,
        }
    }
}

impl StopResult {
    pub fn from_node(graph: &Graph, id: crate::domain::NodeId) -> Self {
        let node = graph.node(id);
        Self {
            stop_id: node.stop_id.clone(),
            name: node.name.clone(),
            location: node.location.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Mode, RouteKind};

    fn found_result(kind: RouteKind, duration: f64) -> RouteResult {
        let a = GeoPoint::new(30.0, 31.0);
        let b = GeoPoint::new(30.02, 31.0);
        RouteResult {
            kind,
            total_duration: duration,
            segments: vec![
                RouteSegment {
                    start: a,
                    start_name: "Origin".into(),
                    end: b,
                    end_name: "Stop B".into(),
                    method: Mode::Bus,
                    num_stops: 1,
                },
                RouteSegment {
                    start: b,
                    start_name: "Stop B".into(),
                    end: b,
                    end_name: "Destination".into(),
                    method: Mode::Walk,
                    num_stops: 0,
                },
            ],
        }
    }

    #[test]
    fn format_duration_wire_shape() {
        assert_eq!(format_duration(0), "0 min 0 sec");
        assert_eq!(format_duration(59), "0 min 59 sec");
        assert_eq!(format_duration(297), "4 min 57 sec");
        assert_eq!(format_duration(3600), "60 min 0 sec");
    }

    #[test]
    fn to_int_seconds_clamps_and_rounds() {
        assert_eq!(to_int_seconds(-5.0), 0);
        assert_eq!(to_int_seconds(0.0), 0);
        assert_eq!(to_int_seconds(1.4), 1);
        assert_eq!(to_int_seconds(1.5), 2);
    }

    #[test]
    fn option_from_found_result() {
        let result = found_result(RouteKind::BusOnly, 296.7);
        let option = RouteOption::from_result(&result);

        assert_eq!(option.kind, "bus_only");
        assert!(option.found);
        assert_eq!(option.total_duration_seconds, 297);
        assert_eq!(option.total_duration_formatted, "4 min 57 sec");
        assert_eq!(option.total_segments, 2);
        assert_eq!(option.segments.len(), 2);

        let ride = &option.segments[0];
        assert_eq!(ride.method, "bus");
        assert_eq!(ride.num_stops, 1);
        assert!(ride.distance_meters > 2_000);
        // Recomputed from distance / bus speed, not the search weight.
        let dist = GeoPoint::new(30.0, 31.0).distance_to(&GeoPoint::new(30.02, 31.0));
        assert_eq!(ride.duration_seconds, to_int_seconds(dist / 8.33));

        // Degenerate final walk has zero distance and duration.
        let walk = &option.segments[1];
        assert_eq!(walk.distance_meters, 0);
        assert_eq!(walk.duration_seconds, 0);
    }

    #[test]
    fn option_from_unreachable_result() {
        let option = RouteOption::from_result(&RouteResult::unreachable(RouteKind::MetroOnly));
        assert_eq!(option.kind, "metro_only");
        assert!(!option.found);
        assert_eq!(option.total_duration_seconds, 0);
        assert_eq!(option.total_duration_formatted, "");
        assert_eq!(option.total_segments, 0);
        assert!(option.segments.is_empty());
    }

    #[test]
    fn response_legacy_fields_follow_best_route() {
        let origin = LatLon { lat: 30.0, lon: 31.0 };
        let destination = LatLon { lat: 30.02, lon: 31.0 };
        let results = vec![
            found_result(RouteKind::BusOnly, 500.0),
            RouteResult::unreachable(RouteKind::MetroOnly),
            RouteResult::unreachable(RouteKind::MicrobusOnly),
            found_result(RouteKind::Optimal, 300.0),
        ];

        let response = RouteResponse::build(origin, destination, &results);

        assert_eq!(response.routes.len(), 4);
        assert_eq!(response.routes[0].kind, "bus_only");
        assert_eq!(response.routes[3].kind, "optimal");

        // Legacy view mirrors the fastest found route (optimal, 300 s).
        assert_eq!(response.total_duration_seconds, 300.0);
        assert_eq!(response.steps.len(), 2);
        assert_eq!(response.steps[0].method, "bus");
        assert!(response.steps[0].instruction.starts_with("Take bus to"));
        assert_eq!(response.steps[0].line_name, "");
        assert!(response.total_distance_meters > 0.0);
    }

    #[test]
    fn serializes_type_field_name() {
        let option = RouteOption::from_result(&RouteResult::unreachable(RouteKind::Optimal));
        let json = serde_json::to_value(&option).unwrap();
        assert_eq!(json["type"], "optimal");
        assert_eq!(json["found"], false);
    }
}
