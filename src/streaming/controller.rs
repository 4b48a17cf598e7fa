//! Streaming controller - keeps a square window of chunks active around a
//! moving observer
//!
//! Two cursors track the last observer chunk processed for each purpose:
//! - the spawn cursor drives the leading edge, creating or re-enabling the
//!   columns/rows that enter the window
//! - the disable cursor drives the trailing edge, disabling the
//!   columns/rows that leave it
//!
//! Each step only touches the cells along the window edges that moved.

use std::ops::Range;

use glam::Vec3;

use crate::core::Error;
use crate::streaming::{ChunkFactory, ChunkRegistry, ChunkState, GridCoordinate, ViewWindow};

/// Upper bound on chunk slots reserved up front
const INITIAL_CAPACITY_LIMIT: usize = 1 << 16;

/// Counters exposed for tooling and logging
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreamingStats {
    /// Chunks ever created (equals factory invocations)
    pub total_chunks: usize,
    /// Chunks currently active
    pub active_chunks: usize,
    /// Number of `step` calls so far
    pub steps: u64,
}

/// Axis of the chunk grid
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Axis {
    X,
    Y,
}

impl Axis {
    fn of(self, coord: GridCoordinate) -> i32 {
        match self {
            Axis::X => coord.x,
            Axis::Y => coord.y,
        }
    }

    fn other(self) -> Axis {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }

    /// Build a coordinate from a position on this axis and one on the other
    fn coord(self, along: i32, across: i32) -> GridCoordinate {
        match self {
            Axis::X => GridCoordinate::new(along, across),
            Axis::Y => GridCoordinate::new(across, along),
        }
    }

    fn set(self, coord: &mut GridCoordinate, value: i32) {
        match self {
            Axis::X => coord.x = value,
            Axis::Y => coord.y = value,
        }
    }
}

/// Owns the chunk registry and both cursors for a single observer.
pub struct StreamingController<F: ChunkFactory> {
    window: ViewWindow,
    factory: F,
    registry: ChunkRegistry<F::Content>,
    spawn_cursor: GridCoordinate,
    disable_cursor: GridCoordinate,
    initialized: bool,
    steps: u64,
}

impl<F: ChunkFactory> StreamingController<F> {
    /// Create a controller. Nothing is spawned until [`initialize`](Self::initialize).
    pub fn new(window: ViewWindow, factory: F) -> Self {
        Self {
            window,
            factory,
            registry: ChunkRegistry::with_capacity((window.area() * 2).min(INITIAL_CAPACITY_LIMIT)),
            spawn_cursor: GridCoordinate::ORIGIN,
            disable_cursor: GridCoordinate::ORIGIN,
            initialized: false,
            steps: 0,
        }
    }

    /// Spawn the full window around the origin and reset both cursors to it.
    pub fn initialize(&mut self) {
        if self.initialized {
            log::warn!("StreamingController already initialized, ignoring");
            return;
        }

        for coord in self.window.cells(GridCoordinate::ORIGIN) {
            self.spawn(coord);
        }
        self.spawn_cursor = GridCoordinate::ORIGIN;
        self.disable_cursor = GridCoordinate::ORIGIN;
        self.initialized = true;

        log::info!(
            "Initial fill: {} chunks (view distance {}, chunk size {})",
            self.registry.len(),
            self.window.view_distance(),
            self.window.chunk_size()
        );
    }

    /// Advance streaming for one tick.
    ///
    /// Spawns before disabling so the shared boundary is never empty.
    /// Returns the observer's chunk coordinate. A non-finite or out-of-range
    /// position skips the tick and leaves both cursors where they were.
    pub fn step(&mut self, observer_pos: Vec3) -> GridCoordinate {
        if !self.initialized {
            self.initialize();
        }

        let Some(observer) = self.observer_coord(observer_pos) else {
            log::warn!("Ignoring unusable observer position {}", observer_pos);
            return self.spawn_cursor;
        };
        let moved = observer != self.spawn_cursor || observer != self.disable_cursor;
        let created_before = self.registry.len();

        self.advance_spawn_front(observer);
        self.advance_disable_front(observer);
        self.steps += 1;

        if moved {
            log::debug!(
                "Observer entered {}: {} created, {} active, {} total",
                observer,
                self.registry.len() - created_before,
                self.registry.active_count(),
                self.registry.len()
            );
        }

        observer
    }

    /// Chunk coordinate of a world position, `None` if streaming cannot use it
    pub fn observer_coord(&self, observer_pos: Vec3) -> Option<GridCoordinate> {
        GridCoordinate::try_from_world_pos(observer_pos, self.window.chunk_size())
    }

    /// Create or re-enable the columns/rows entering the window, x axis then y.
    pub fn advance_spawn_front(&mut self, observer: GridCoordinate) {
        for axis in [Axis::X, Axis::Y] {
            let delta = axis.of(observer) - axis.of(self.spawn_cursor);
            if delta == 0 {
                continue;
            }

            let lines = self.spawn_lines(axis.of(observer), delta);
            let across = self.window_range(axis.other().of(observer));
            for along in lines {
                for c in across.clone() {
                    self.enable_or_spawn(axis.coord(along, c));
                }
            }

            axis.set(&mut self.spawn_cursor, axis.of(observer));
        }
    }

    /// Disable the columns/rows leaving the window, x axis then y.
    ///
    /// Each line is swept wider than the window by the perpendicular axis's
    /// pending delta so corners vacated by diagonal movement are caught.
    pub fn advance_disable_front(&mut self, observer: GridCoordinate) {
        let prior = self.disable_cursor;

        for axis in [Axis::X, Axis::Y] {
            let delta = axis.of(observer) - axis.of(prior);
            if delta == 0 {
                continue;
            }

            let other = axis.other();
            let across = self.sweep_range(other.of(observer), other.of(prior));
            for along in self.disable_lines(axis.of(prior), delta) {
                for c in across.clone() {
                    self.try_disable(axis.coord(along, c));
                }
            }

            axis.set(&mut self.disable_cursor, axis.of(observer));
        }
    }

    /// Lines entering the window on an axis after moving `delta` cells to
    /// `observer`. Jumps wider than the window only spawn the new window.
    fn spawn_lines(&self, observer: i32, delta: i32) -> Range<i32> {
        let count = delta.abs().min(self.window.span());
        if delta > 0 {
            // cursor + half_ceil when count == delta
            let end = observer + self.window.half_ceil();
            (end - count)..end
        } else {
            let start = observer - self.window.half_floor();
            start..(start + count)
        }
    }

    /// Lines leaving the window, walked one at a time from the cursor's prior
    /// trailing edge.
    fn disable_lines(&self, cursor: i32, delta: i32) -> impl Iterator<Item = i32> + use<F> {
        let count = delta.abs().min(self.window.span());
        let trailing_low = cursor - self.window.half_floor();
        let trailing_high = cursor + self.window.half_ceil() - 1;
        (0..count).map(move |i| {
            if delta > 0 {
                trailing_low + i
            } else {
                trailing_high - i
            }
        })
    }

    /// Cells of the window along one axis around `center`
    fn window_range(&self, center: i32) -> Range<i32> {
        (center - self.window.half_floor())..(center + self.window.half_ceil())
    }

    /// Perpendicular extent swept when disabling a line: the window widened
    /// by the pending perpendicular delta. A jump wider than the window only
    /// needs the prior window's extent, nothing between was ever spawned.
    fn sweep_range(&self, observer: i32, prior: i32) -> Range<i32> {
        let additional = (observer - prior).abs();
        if additional <= self.window.span() {
            let window = self.window_range(observer);
            (window.start - additional)..(window.end + additional)
        } else {
            self.window_range(prior)
        }
    }

    fn enable_or_spawn(&mut self, coord: GridCoordinate) {
        if self.registry.contains(coord) {
            self.activate(coord);
        } else {
            self.spawn(coord);
        }
    }

    /// Generate a new chunk and mark it active
    fn spawn(&mut self, coord: GridCoordinate) {
        log::trace!("Creating {}", coord);
        let content = self.factory.create(coord);
        if let Err(e) = self.registry.insert(coord, ChunkState::new(coord, content)) {
            bookkeeping_fault(e);
        }
        self.activate(coord);
    }

    fn activate(&mut self, coord: GridCoordinate) {
        if let Err(e) = self.registry.set_active(coord, true) {
            bookkeeping_fault(e);
        }
    }

    /// Disable a chunk if it exists; absent coordinates are skipped.
    fn try_disable(&mut self, coord: GridCoordinate) -> bool {
        if !self.registry.contains(coord) {
            return false;
        }
        match self.registry.set_active(coord, false) {
            Ok(changed) => changed,
            Err(e) => {
                bookkeeping_fault(e);
                false
            }
        }
    }

    /// Active chunks with their content, in no particular order.
    ///
    /// Each call yields a fresh pass over the registry as it is now.
    pub fn list_active_tiles(&self) -> impl Iterator<Item = (GridCoordinate, &F::Content)> + '_ {
        self.registry
            .active()
            .map(|state| (state.coord(), state.content()))
    }

    pub fn stats(&self) -> StreamingStats {
        StreamingStats {
            total_chunks: self.registry.len(),
            active_chunks: self.registry.active_count(),
            steps: self.steps,
        }
    }

    pub fn window(&self) -> &ViewWindow {
        &self.window
    }

    pub fn registry(&self) -> &ChunkRegistry<F::Content> {
        &self.registry
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn spawn_cursor(&self) -> GridCoordinate {
        self.spawn_cursor
    }

    pub fn disable_cursor(&self) -> GridCoordinate {
        self.disable_cursor
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}

/// Registry faults inside a step mean the cursor bookkeeping is broken.
fn bookkeeping_fault(err: Error) {
    if cfg!(debug_assertions) {
        panic!("streaming bookkeeping fault: {}", err);
    }
    log::error!("Streaming bookkeeping fault: {}", err);
}
