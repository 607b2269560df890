//! Search configuration for the route planner.

/// Tunable parameters of the mode-masked A* search.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Cost in seconds of switching between two distinct transit trips.
    pub transfer_penalty_seconds: f64,

    /// Optimistic speed bound for the A* heuristic, in m/s. Must be at
    /// least the fastest mode speed or the heuristic stops underestimating.
    pub max_speed_mps: f64,

    /// Maximum walking transfer distance in meters. The direct-walk
    /// shortcut applies up to twice this distance.
    pub max_walk_distance_m: f64,

    /// Radii probed when collecting candidate boarding/alighting stops
    /// around the origin and destination, in meters. Probing stops at the
    /// first radius where both sides have candidates.
    pub probe_radii_m: Vec<f64>,
}

impl SearchConfig {
    /// Distance up to which a plain walk is offered as an itinerary.
    pub fn direct_walk_threshold_m(&self) -> f64 {
        2.0 * self.max_walk_distance_m
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            transfer_penalty_seconds: 60.0,
            max_speed_mps: 25.0,
            max_walk_distance_m: 1_500.0,
            probe_radii_m: vec![1_500.0, 2_500.0, 4_000.0, 6_000.0],
        }
    }
}
