//! Itinerary output types.

use std::cmp::Ordering;

use super::geo::GeoPoint;
use super::mode::{Mode, RouteKind};

/// One user-facing element of an itinerary: a single walk or a single
/// vehicle ride on one trip.
#[derive(Debug, Clone)]
pub struct RouteSegment {
    pub start: GeoPoint,
    pub start_name: String,
    pub end: GeoPoint,
    pub end_name: String,
    pub method: Mode,
    /// Number of consecutive graph edges grouped into this segment.
    pub num_stops: usize,
}

impl RouteSegment {
    /// Straight-line length of the segment in meters.
    pub fn distance_meters(&self) -> f64 {
        self.start.distance_to(&self.end)
    }
}

/// A labeled itinerary for one search mask.
///
/// An unreachable variant carries an infinite duration and no segments;
/// it is still returned so callers see all four variants.
#[derive(Debug, Clone)]
pub struct RouteResult {
    pub kind: RouteKind,
    /// Total door-to-door duration in seconds; infinite when unreachable.
    pub total_duration: f64,
    pub segments: Vec<RouteSegment>,
}

impl RouteResult {
    /// An unreachable result for the given variant.
    pub fn unreachable(kind: RouteKind) -> Self {
        Self {
            kind,
            total_duration: f64::INFINITY,
            segments: Vec::new(),
        }
    }

    pub fn is_found(&self) -> bool {
        self.total_duration.is_finite()
    }

    /// Sum of segment straight-line distances in meters.
    pub fn total_distance_meters(&self) -> f64 {
        self.segments.iter().map(|s| s.distance_meters()).sum()
    }

    /// Orders results by total duration; unreachable results sort last.
    pub fn cmp_by_duration(&self, other: &Self) -> Ordering {
        self.total_duration
            .partial_cmp(&other.total_duration)
            .unwrap_or(Ordering::Equal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk_segment(from: GeoPoint, to: GeoPoint) -> RouteSegment {
        RouteSegment {
            start: from,
            start_name: "Origin".into(),
            end: to,
            end_name: "Destination".into(),
            method: Mode::Walk,
            num_stops: 0,
        }
    }

    #[test]
    fn unreachable_result() {
        let r = RouteResult::unreachable(RouteKind::MetroOnly);
        assert!(!r.is_found());
        assert!(r.segments.is_empty());
        assert_eq!(r.total_distance_meters(), 0.0);
    }

    #[test]
    fn distance_sums_segments() {
        let a = GeoPoint::new(30.0, 31.0);
        let b = GeoPoint::new(30.01, 31.0);
        let c = GeoPoint::new(30.02, 31.0);
        let r = RouteResult {
            kind: RouteKind::Optimal,
            total_duration: 100.0,
            segments: vec![walk_segment(a, b), walk_segment(b, c)],
        };
        let expected = a.distance_to(&b) + b.distance_to(&c);
        assert!((r.total_distance_meters() - expected).abs() < 1e-9);
    }

    #[test]
    fn duration_ordering_puts_unreachable_last() {
        let mut results = vec![
            RouteResult::unreachable(RouteKind::BusOnly),
            RouteResult {
                kind: RouteKind::Optimal,
                total_duration: 300.0,
                segments: Vec::new(),
            },
            RouteResult {
                kind: RouteKind::MetroOnly,
                total_duration: 120.0,
                segments: Vec::new(),
            },
        ];
        results.sort_by(|a, b| a.cmp_by_duration(b));
        assert_eq!(results[0].kind, RouteKind::MetroOnly);
        assert_eq!(results[1].kind, RouteKind::Optimal);
        assert_eq!(results[2].kind, RouteKind::BusOnly);
    }
}
