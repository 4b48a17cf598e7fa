//! Sparse registry of every chunk ever spawned

use std::collections::HashMap;

use crate::core::{Error, Result};
use crate::streaming::{ChunkContent, GridCoordinate};

/// Per-cell record. Content is always generated before a state exists.
#[derive(Debug)]
pub struct ChunkState<C> {
    coord: GridCoordinate,
    active: bool,
    content: C,
}

impl<C: ChunkContent> ChunkState<C> {
    /// Wrap freshly generated content. The chunk starts inactive.
    pub fn new(coord: GridCoordinate, content: C) -> Self {
        Self {
            coord,
            active: false,
            content,
        }
    }

    pub fn coord(&self) -> GridCoordinate {
        self.coord
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn content(&self) -> &C {
        &self.content
    }

    /// Set the active flag, forwarding visibility to the content only when
    /// the flag changes. Returns whether it changed.
    fn set_active(&mut self, active: bool) -> bool {
        if self.active == active {
            return false;
        }
        self.active = active;
        self.content.set_visible(active);
        true
    }
}

/// Mapping from grid coordinate to chunk state.
///
/// Chunks are never removed; disabling is the only form of removal.
#[derive(Debug)]
pub struct ChunkRegistry<C> {
    chunks: HashMap<GridCoordinate, ChunkState<C>>,
    active_count: usize,
}

impl<C> Default for ChunkRegistry<C> {
    fn default() -> Self {
        Self {
            chunks: HashMap::new(),
            active_count: 0,
        }
    }
}

impl<C: ChunkContent> ChunkRegistry<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry sized for `capacity` chunks
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            chunks: HashMap::with_capacity(capacity),
            active_count: 0,
        }
    }

    pub fn get(&self, coord: GridCoordinate) -> Option<&ChunkState<C>> {
        self.chunks.get(&coord)
    }

    pub fn contains(&self, coord: GridCoordinate) -> bool {
        self.chunks.contains_key(&coord)
    }

    /// Insert a new chunk.
    ///
    /// Fails with [`Error::DuplicateChunk`] if `coord` is already present;
    /// the existing state is left untouched.
    pub fn insert(&mut self, coord: GridCoordinate, state: ChunkState<C>) -> Result<()> {
        use std::collections::hash_map::Entry;

        match self.chunks.entry(coord) {
            Entry::Occupied(_) => Err(Error::DuplicateChunk(coord)),
            Entry::Vacant(slot) => {
                if state.active {
                    self.active_count += 1;
                }
                slot.insert(state);
                Ok(())
            }
        }
    }

    /// Toggle a chunk's active flag.
    ///
    /// Returns `Ok(true)` if the flag changed, `Ok(false)` if it already had
    /// the requested value, and [`Error::UnknownChunk`] if `coord` is absent.
    pub fn set_active(&mut self, coord: GridCoordinate, active: bool) -> Result<bool> {
        let state = self
            .chunks
            .get_mut(&coord)
            .ok_or(Error::UnknownChunk(coord))?;

        let changed = state.set_active(active);
        if changed {
            if active {
                self.active_count += 1;
            } else {
                self.active_count -= 1;
            }
        }
        Ok(changed)
    }

    /// Number of chunks ever created
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Number of chunks currently active
    pub fn active_count(&self) -> usize {
        self.active_count
    }

    /// Iterate over all chunks, active or not, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = &ChunkState<C>> {
        self.chunks.values()
    }

    /// Iterate over active chunks, in no particular order
    pub fn active(&self) -> impl Iterator<Item = &ChunkState<C>> {
        self.chunks.values().filter(|state| state.active)
    }
}
