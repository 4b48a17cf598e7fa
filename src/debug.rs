//! Bridge between the streaming host loop and the debug server
//!
//! The host loop owns the controller. After each step it publishes a
//! snapshot into [`SharedDebugState`]; the debug handler answers commands
//! from that snapshot and queues observer moves for the next tick.

use std::sync::{Arc, Mutex, PoisonError};

use glam::Vec3;
use procmap_debug::{DebugCommand, DebugHandler, DebugResponse, ResponseData, TileInfo};

use crate::streaming::{GridCoordinate, StreamingController, StreamingStats};
use crate::terrain::TerrainGenerator;

/// State shared between the host loop and the debug server
#[derive(Debug, Default)]
pub struct SharedDebugState {
    /// Observer position requested by tooling, consumed by the host loop
    pub observer_override: Option<Vec3>,
    pub observer_position: Vec3,
    pub observer_chunk: GridCoordinate,
    pub spawn_cursor: GridCoordinate,
    pub disable_cursor: GridCoordinate,
    pub chunk_size: f32,
    pub view_distance: u32,
    pub stats: StreamingStats,
    /// Active tiles sorted by coordinate
    pub tiles: Vec<TileInfo>,
}

impl SharedDebugState {
    /// Capture the controller state after a step
    pub fn publish(&mut self, controller: &StreamingController<TerrainGenerator>, observer_pos: Vec3) {
        let mut tiles: Vec<TileInfo> = controller
            .list_active_tiles()
            .map(|(coord, chunk)| TileInfo {
                x: coord.x,
                y: coord.y,
                name: chunk.name().to_string(),
                world_origin: chunk.world_origin().to_array(),
                min_height: chunk.min_height(),
                max_height: chunk.max_height(),
            })
            .collect();
        tiles.sort_by_key(|t| (t.y, t.x));

        self.observer_position = observer_pos;
        self.observer_chunk = controller
            .observer_coord(observer_pos)
            .unwrap_or(controller.spawn_cursor());
        self.spawn_cursor = controller.spawn_cursor();
        self.disable_cursor = controller.disable_cursor();
        self.chunk_size = controller.window().chunk_size();
        self.view_distance = controller.window().view_distance();
        self.stats = controller.stats();
        self.tiles = tiles;
    }

    /// Take the pending observer move, if any
    pub fn take_observer_override(&mut self) -> Option<Vec3> {
        self.observer_override.take()
    }
}

/// Debug command handler backed by [`SharedDebugState`]
pub struct StreamingDebugHandler {
    state: Arc<Mutex<SharedDebugState>>,
}

impl StreamingDebugHandler {
    pub fn new(state: Arc<Mutex<SharedDebugState>>) -> Self {
        Self { state }
    }
}

impl DebugHandler for StreamingDebugHandler {
    fn handle_command(&mut self, cmd: DebugCommand) -> DebugResponse {
        let mut s = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        match cmd {
            DebugCommand::Ping => DebugResponse::pong(),

            DebugCommand::GetTiles => DebugResponse::ok(ResponseData::Tiles {
                tiles: s.tiles.clone(),
            }),

            DebugCommand::GetStreamingState => DebugResponse::ok(ResponseData::StreamingState {
                observer_position: s.observer_position.to_array(),
                observer_chunk: s.observer_chunk.into(),
                spawn_cursor: s.spawn_cursor.into(),
                disable_cursor: s.disable_cursor.into(),
                chunk_size: s.chunk_size,
                view_distance: s.view_distance,
                total_chunks: s.stats.total_chunks as u32,
                active_chunks: s.stats.active_chunks as u32,
                steps: s.stats.steps,
            }),

            DebugCommand::SetObserver { x, y, z } => {
                if !(x.is_finite() && y.is_finite() && z.is_finite()) {
                    return DebugResponse::error("Observer position must be finite");
                }
                s.observer_override = Some(Vec3::new(x, y, z));
                DebugResponse::none()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::streaming::ViewWindow;
    use crate::terrain::TerrainParams;

    fn published_state() -> Arc<Mutex<SharedDebugState>> {
        let window = ViewWindow::new(12.0, 3).unwrap();
        let generator = TerrainGenerator::new(TerrainParams { tiles_per_side: 2, ..Default::default() }, 12.0);
        let mut controller = StreamingController::new(window, generator);
        controller.initialize();
        let pos = Vec3::new(13.0, 0.0, 0.0);
        controller.step(pos);

        let state = Arc::new(Mutex::new(SharedDebugState::default()));
        state.lock().unwrap().publish(&controller, pos);
        state
    }

    #[test]
    fn test_get_tiles_lists_active_window() {
        let mut handler = StreamingDebugHandler::new(published_state());
        let response = handler.handle_command(DebugCommand::GetTiles);

        let tiles = match response {
            DebugResponse::Ok { data: ResponseData::Tiles { tiles } } => tiles,
            other => panic!("Expected tiles, got {:?}", other),
        };
        assert_eq!(tiles.len(), 9);
        assert_eq!(tiles[0].name, "Chunk (0, -1)");
        assert_eq!((tiles[8].x, tiles[8].y), (2, 1));
    }

    #[test]
    fn test_get_streaming_state() {
        let mut handler = StreamingDebugHandler::new(published_state());
        let response = handler.handle_command(DebugCommand::GetStreamingState);

        match response {
            DebugResponse::Ok {
                data: ResponseData::StreamingState { observer_chunk, spawn_cursor, disable_cursor, active_chunks, total_chunks, steps, .. },
            } => {
                assert_eq!(observer_chunk, [1, 0]);
                assert_eq!(spawn_cursor, [1, 0]);
                assert_eq!(disable_cursor, [1, 0]);
                assert_eq!(active_chunks, 9);
                assert_eq!(total_chunks, 12);
                assert_eq!(steps, 1);
            }
            other => panic!("Expected streaming state, got {:?}", other),
        }
    }

    #[test]
    fn test_set_observer_queues_override() {
        let state = published_state();
        let mut handler = StreamingDebugHandler::new(state.clone());

        assert_eq!(handler.handle_command(DebugCommand::SetObserver { x: 48.0, y: 0.0, z: -12.0 }), DebugResponse::none());
        assert_eq!(state.lock().unwrap().take_observer_override(), Some(Vec3::new(48.0, 0.0, -12.0)));
        assert_eq!(state.lock().unwrap().take_observer_override(), None);

        let rejected = handler.handle_command(DebugCommand::SetObserver { x: f32::NAN, y: 0.0, z: 0.0 });
        assert!(matches!(rejected, DebugResponse::Error { .. }));
    }

    #[test]
    fn test_ping() {
        let mut handler = StreamingDebugHandler::new(Arc::new(Mutex::new(SharedDebugState::default())));
        assert_eq!(handler.handle_command(DebugCommand::Ping), DebugResponse::pong());
    }
}
