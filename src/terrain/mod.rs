//! Procedural terrain content for map chunks

pub mod generator;
pub use generator::{TerrainChunk, TerrainGenerator, TerrainParams};
