//! View window: the square of chunks kept active around the observer

use crate::core::{Error, Result};
use crate::streaming::GridCoordinate;

/// Largest accepted view distance in chunks
pub const MAX_VIEW_DISTANCE: u32 = 4096;

/// Immutable window geometry.
///
/// The window around observer chunk `o` covers
/// `[o - half_floor, o + half_ceil)` on both axes. For odd view distances the
/// extra cell sits on the positive side.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewWindow {
    chunk_size: f32,
    view_distance: u32,
    half_floor: i32,
    half_ceil: i32,
}

impl ViewWindow {
    /// Validate and build a window.
    ///
    /// Fails with [`Error::InvalidConfiguration`] if `chunk_size` is not a
    /// finite positive number or `view_distance` is zero.
    pub fn new(chunk_size: f32, view_distance: u32) -> Result<Self> {
        if !chunk_size.is_finite() || chunk_size <= 0.0 {
            return Err(Error::InvalidConfiguration(format!(
                "chunk_size must be a positive number, got {}",
                chunk_size
            )));
        }
        if view_distance < 1 {
            return Err(Error::InvalidConfiguration(
                "view_distance must be at least 1".to_string(),
            ));
        }
        if view_distance > MAX_VIEW_DISTANCE {
            return Err(Error::InvalidConfiguration(format!(
                "view_distance {} is too large (max {})",
                view_distance, MAX_VIEW_DISTANCE
            )));
        }

        let half_floor = (view_distance / 2) as i32;
        let half_ceil = view_distance.div_ceil(2) as i32;

        Ok(Self {
            chunk_size,
            view_distance,
            half_floor,
            half_ceil,
        })
    }

    /// World units per chunk along each axis
    pub fn chunk_size(&self) -> f32 {
        self.chunk_size
    }

    /// Number of chunks per axis kept active
    pub fn view_distance(&self) -> u32 {
        self.view_distance
    }

    /// View distance as a signed cell count for window arithmetic
    pub fn span(&self) -> i32 {
        self.view_distance as i32
    }

    /// Trailing half-extent, `floor(view_distance / 2)`
    pub fn half_floor(&self) -> i32 {
        self.half_floor
    }

    /// Leading half-extent, `ceil(view_distance / 2)`
    pub fn half_ceil(&self) -> i32 {
        self.half_ceil
    }

    /// Number of chunks in a full window
    pub fn area(&self) -> usize {
        (self.view_distance as usize).pow(2)
    }

    /// Whether `coord` lies inside the window centred on `center`
    pub fn contains(&self, center: GridCoordinate, coord: GridCoordinate) -> bool {
        let in_range = |c: i32, v: i32| c - self.half_floor <= v && v < c + self.half_ceil;
        in_range(center.x, coord.x) && in_range(center.y, coord.y)
    }

    /// Every coordinate of the window centred on `center`, row by row
    pub fn cells(&self, center: GridCoordinate) -> impl Iterator<Item = GridCoordinate> + use<> {
        let (lo, hi) = (-self.half_floor, self.half_ceil);
        (lo..hi).flat_map(move |dy| (lo..hi).map(move |dx| center.offset(dx, dy)))
    }
}
