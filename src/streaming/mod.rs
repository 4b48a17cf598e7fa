//! Chunk streaming around a moving observer

pub mod coord;
pub mod window;
pub mod factory;
pub mod registry;
pub mod controller;
pub mod config;

pub use coord::GridCoordinate;
pub use window::ViewWindow;
pub use factory::{ChunkContent, ChunkFactory};
pub use registry::{ChunkRegistry, ChunkState};
pub use controller::{StreamingController, StreamingStats};
pub use config::StreamingConfig;
