//! Grid coordinates for map chunks

use std::fmt;

use glam::{IVec2, Vec3};
use serde::{Deserialize, Serialize};

/// Integer coordinate identifying a chunk cell in the map grid.
///
/// `x` follows world X and `y` follows world Z; the map is flat on the
/// world Y axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoordinate {
    pub x: i32,
    pub y: i32,
}

/// Largest chunk coordinate magnitude the streaming window arithmetic accepts
pub const COORD_LIMIT: i32 = i32::MAX / 4;

impl GridCoordinate {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    /// Create a new grid coordinate
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Convert a world position to the chunk coordinate containing it.
    ///
    /// Chunks are centred on `coord * chunk_size`, so this rounds to the
    /// nearest cell. Exact half-cell positions round to the even cell.
    /// Returns `None` for non-finite positions or cells beyond
    /// [`COORD_LIMIT`].
    pub fn try_from_world_pos(pos: Vec3, chunk_size: f32) -> Option<Self> {
        let cell = |v: f32| {
            let c = (v / chunk_size).round_ties_even();
            (c.is_finite() && c.abs() <= COORD_LIMIT as f32).then_some(c as i32)
        };
        Some(Self::new(cell(pos.x)?, cell(pos.z)?))
    }

    /// Like [`try_from_world_pos`](Self::try_from_world_pos), but clamps far
    /// positions to [`COORD_LIMIT`]. NaN maps to cell 0.
    pub fn from_world_pos(pos: Vec3, chunk_size: f32) -> Self {
        let cell = |v: f32| {
            let c = (v / chunk_size).round_ties_even();
            c.clamp(-(COORD_LIMIT as f32), COORD_LIMIT as f32) as i32
        };
        Self::new(cell(pos.x), cell(pos.z))
    }

    /// World-space position of this chunk (its centre, on the ground plane)
    pub fn world_origin(&self, chunk_size: f32) -> Vec3 {
        Vec3::new(self.x as f32 * chunk_size, 0.0, self.y as f32 * chunk_size)
    }

    /// Offset this coordinate by `dx`, `dy` cells
    pub const fn offset(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl From<IVec2> for GridCoordinate {
    fn from(v: IVec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<GridCoordinate> for IVec2 {
    fn from(c: GridCoordinate) -> Self {
        IVec2::new(c.x, c.y)
    }
}

impl From<GridCoordinate> for [i32; 2] {
    fn from(c: GridCoordinate) -> Self {
        [c.x, c.y]
    }
}

impl fmt::Display for GridCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Chunk ({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_world_pos_rounds_to_nearest() {
        assert_eq!(GridCoordinate::from_world_pos(Vec3::new(0.0, 5.0, 0.0), 12.0), GridCoordinate::ORIGIN);
        assert_eq!(GridCoordinate::from_world_pos(Vec3::new(5.9, 0.0, -5.9), 12.0), GridCoordinate::ORIGIN);
        assert_eq!(GridCoordinate::from_world_pos(Vec3::new(6.1, 0.0, -6.1), 12.0), GridCoordinate::new(1, -1));
        assert_eq!(GridCoordinate::from_world_pos(Vec3::new(30.0, 0.0, 100.0), 12.0), GridCoordinate::new(2, 8));
    }

    #[test]
    fn test_from_world_pos_half_cell_rounds_to_even() {
        // 6/12 = 0.5 -> 0, 18/12 = 1.5 -> 2, -6/12 = -0.5 -> 0
        assert_eq!(GridCoordinate::from_world_pos(Vec3::new(6.0, 0.0, 18.0), 12.0), GridCoordinate::new(0, 2));
        assert_eq!(GridCoordinate::from_world_pos(Vec3::new(-6.0, 0.0, -18.0), 12.0), GridCoordinate::new(0, -2));
    }

    #[test]
    fn test_try_from_world_pos_rejects_unusable_positions() {
        assert_eq!(GridCoordinate::try_from_world_pos(Vec3::new(f32::NAN, 0.0, 0.0), 12.0), None);
        assert_eq!(GridCoordinate::try_from_world_pos(Vec3::new(0.0, 0.0, f32::INFINITY), 12.0), None);
        assert_eq!(GridCoordinate::try_from_world_pos(Vec3::new(1.0e12, 0.0, 0.0), 12.0), None);
        assert_eq!(
            GridCoordinate::try_from_world_pos(Vec3::new(24.0, 0.0, -12.0), 12.0),
            Some(GridCoordinate::new(2, -1))
        );
    }

    #[test]
    fn test_from_world_pos_clamps_far_positions() {
        let coord = GridCoordinate::from_world_pos(Vec3::new(1.0e12, 0.0, -1.0e12), 12.0);
        assert!(coord.x <= COORD_LIMIT && coord.y >= -COORD_LIMIT);
        assert!(coord.x > 0 && coord.y < 0);
    }

    #[test]
    fn test_uses_world_z_for_grid_y() {
        let coord = GridCoordinate::from_world_pos(Vec3::new(0.0, 1000.0, 24.0), 12.0);
        assert_eq!(coord, GridCoordinate::new(0, 2));
    }

    #[test]
    fn test_world_origin() {
        let origin = GridCoordinate::new(-2, 3).world_origin(12.0);
        assert_eq!(origin, Vec3::new(-24.0, 0.0, 36.0));
    }

    #[test]
    fn test_display_name() {
        assert_eq!(GridCoordinate::new(-1, 4).to_string(), "Chunk (-1, 4)");
    }

    #[test]
    fn test_equality_and_hash() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(GridCoordinate::new(1, 2));
        set.insert(GridCoordinate::new(1, 2));
        set.insert(GridCoordinate::new(2, 1));
        assert_eq!(set.len(), 2);
    }
}
