//! Transport modes and mode masks.
//!
//! Modes compose by bitwise OR into a [`ModeMask`]; edge filtering during
//! search is a single AND against the mask. Every request mask includes the
//! walk bit so single-mode searches can still use walking transfers.

use std::fmt;

/// A single transport mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Metro,
    Bus,
    Microbus,
    Walk,
}

impl Mode {
    /// The bitmask bit for this mode.
    pub fn bit(self) -> u8 {
        match self {
            Mode::Metro => 1 << 0,
            Mode::Bus => 1 << 1,
            Mode::Microbus => 1 << 2,
            Mode::Walk => 1 << 3,
        }
    }

    /// Cruise speed used for physics-based edge weights, in m/s.
    pub fn speed_mps(self) -> f64 {
        match self {
            Mode::Metro => 16.67,    // ~60 km/h
            Mode::Bus => 8.33,       // ~30 km/h
            Mode::Microbus => 11.11, // ~40 km/h
            Mode::Walk => 1.4,       // ~5 km/h
        }
    }

    /// Wire name for segment methods.
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Metro => "metro",
            Mode::Bus => "bus",
            Mode::Microbus => "microbus",
            Mode::Walk => "walking",
        }
    }

    /// GTFS stop-id prefix used by the feed's naming convention, if the
    /// mode has one. Walking has no stops of its own.
    pub fn stop_id_prefix(self) -> Option<&'static str> {
        match self {
            Mode::Metro => Some("M_"),
            Mode::Bus => Some("B1_"),
            Mode::Microbus => Some("MB_"),
            Mode::Walk => None,
        }
    }

    /// The transit modes (everything except walking).
    pub const TRANSIT: [Mode; 3] = [Mode::Metro, Mode::Bus, Mode::Microbus];
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A set of modes, stored as a bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModeMask(u8);

impl ModeMask {
    pub fn from_modes(modes: &[Mode]) -> Self {
        ModeMask(modes.iter().fold(0, |acc, m| acc | m.bit()))
    }

    pub fn contains(self, mode: Mode) -> bool {
        self.0 & mode.bit() != 0
    }

    /// Stop-id prefixes for the transit modes in this mask. Empty when the
    /// mask carries no transit mode (a walk-only search filters nothing).
    pub fn stop_id_prefixes(self) -> Vec<&'static str> {
        Mode::TRANSIT
            .iter()
            .filter(|m| self.contains(**m))
            .filter_map(|m| m.stop_id_prefix())
            .collect()
    }
}

/// The label of one of the four planned route variants. Each variant maps
/// to a fixed search mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteKind {
    BusOnly,
    MetroOnly,
    MicrobusOnly,
    Optimal,
}

impl RouteKind {
    /// All variants, in response order.
    pub const ALL: [RouteKind; 4] = [
        RouteKind::BusOnly,
        RouteKind::MetroOnly,
        RouteKind::MicrobusOnly,
        RouteKind::Optimal,
    ];

    /// The search mask for this variant. Walking is always included.
    pub fn mask(self) -> ModeMask {
        match self {
            RouteKind::BusOnly => ModeMask::from_modes(&[Mode::Bus, Mode::Walk]),
            RouteKind::MetroOnly => ModeMask::from_modes(&[Mode::Metro, Mode::Walk]),
            RouteKind::MicrobusOnly => ModeMask::from_modes(&[Mode::Microbus, Mode::Walk]),
            RouteKind::Optimal => {
                ModeMask::from_modes(&[Mode::Bus, Mode::Metro, Mode::Microbus, Mode::Walk])
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RouteKind::BusOnly => "bus_only",
            RouteKind::MetroOnly => "metro_only",
            RouteKind::MicrobusOnly => "microbus_only",
            RouteKind::Optimal => "optimal",
        }
    }
}

impl fmt::Display for RouteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
