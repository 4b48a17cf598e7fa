//! Debug protocol - JSON command/response definitions

use serde::{Deserialize, Serialize};

/// Commands sent from tooling to the debug server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", content = "params")]
pub enum DebugCommand {
    /// List every active tile (chunk) with its content summary
    GetTiles,
    /// Get cursor positions and chunk counters
    GetStreamingState,
    /// Move the observer to an absolute world position
    SetObserver { x: f32, y: f32, z: f32 },
    /// Ping (health check)
    Ping,
}

/// Responses from debug server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum DebugResponse {
    #[serde(rename = "ok")]
    Ok { data: ResponseData },
    #[serde(rename = "error")]
    Error { message: String },
}

/// Response data variants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseData {
    Pong { message: String },
    Tiles { tiles: Vec<TileInfo> },
    StreamingState {
        observer_position: [f32; 3],
        observer_chunk: [i32; 2],
        spawn_cursor: [i32; 2],
        disable_cursor: [i32; 2],
        chunk_size: f32,
        view_distance: u32,
        total_chunks: u32,
        active_chunks: u32,
        steps: u64,
    },
    None,
}

/// One active tile as seen by tooling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileInfo {
    pub x: i32,
    pub y: i32,
    pub name: String,
    pub world_origin: [f32; 3],
    pub min_height: f32,
    pub max_height: f32,
}

impl DebugResponse {
    pub fn ok(data: ResponseData) -> Self {
        Self::Ok { data }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self::Error {
            message: msg.into(),
        }
    }

    pub fn pong() -> Self {
        Self::ok(ResponseData::Pong {
            message: "pong".into(),
        })
    }

    pub fn none() -> Self {
        Self::ok(ResponseData::None)
    }
}
