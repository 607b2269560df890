//! Spatial grid index over node coordinates.
//!
//! Cells are squares of roughly MAX_WALK_DISTANCE on a side (one degree of
//! latitude approximated as 111 km), so any point within walking distance
//! of a node lies in the node's cell or one of its eight neighbors. Cell
//! row and column pack into a single i64 key as `row * 1_000_000 + col`;
//! cell indices stay well inside ±10^6 at Earth scale.

use std::collections::HashMap;

use crate::domain::{GeoPoint, NodeId};

/// Meters per degree of latitude, used to size grid cells.
pub const METERS_PER_DEGREE: f64 = 111_000.0;

#[derive(Debug)]
pub struct SpatialGrid {
    /// Cell side length in degrees.
    cell_size_deg: f64,
    /// Cell side length in meters, for sizing probe blocks.
    cell_size_m: f64,
    cells: HashMap<i64, Vec<NodeId>>,
}

impl SpatialGrid {
    /// A grid whose cells are `cell_size_m` meters on a side.
    pub fn new(cell_size_m: f64) -> Self {
        Self {
            cell_size_deg: cell_size_m / METERS_PER_DEGREE,
            cell_size_m,
            cells: HashMap::new(),
        }
    }

    fn cell_of(&self, point: GeoPoint) -> (i64, i64) {
        let row = (point.lat / self.cell_size_deg).floor() as i64;
        let col = (point.lon / self.cell_size_deg).floor() as i64;
        (row, col)
    }

    fn key(row: i64, col: i64) -> i64 {
        row * 1_000_000 + col
    }

    pub fn insert(&mut self, point: GeoPoint, id: NodeId) {
        let (row, col) = self.cell_of(point);
        self.cells.entry(Self::key(row, col)).or_default().push(id);
    }

    /// Nodes in the 3×3 cell block centered on `point`'s cell. Sufficient
    /// for queries whose radius is at most one cell side.
    pub fn neighborhood(&self, point: GeoPoint) -> impl Iterator<Item = NodeId> + '_ {
        self.block(point, 1)
    }

    /// Nodes in the cell block wide enough to cover `radius_m` meters
    /// around `point`. Degenerates to the 3×3 block for radii up to one
    /// cell side.
    pub fn covering(&self, point: GeoPoint, radius_m: f64) -> impl Iterator<Item = NodeId> + '_ {
        let ring = (radius_m / self.cell_size_m).ceil().max(1.0) as i64;
        self.block(point, ring)
    }

    fn block(&self, point: GeoPoint, ring: i64) -> impl Iterator<Item = NodeId> + '_ {
        let (row, col) = self.cell_of(point);
        (-ring..=ring).flat_map(move |dr| {
            (-ring..=ring).flat_map(move |dc| {
                self.cells
                    .get(&Self::key(row + dr, col + dc))
                    .map(|ids| ids.iter().copied())
                    .into_iter()
                    .flatten()
            })
        })
    }
}
