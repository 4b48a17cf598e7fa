//! Noise-based procedural tile generation

use glam::Vec3;
use noise::{Fbm, MultiFractal, NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};
use crate::streaming::{ChunkContent, ChunkFactory, GridCoordinate};

/// Maximum octaves supported by the FBM noise source
const MAX_OCTAVES: u32 = 32;

/// Parameters controlling terrain generation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainParams {
    pub seed: u32,
    pub scale: f32,          // Horizontal scale (larger = smoother)
    pub height_scale: f32,   // Vertical scale (max height)
    pub octaves: u32,        // FBM octaves (detail levels)
    pub persistence: f32,    // FBM persistence (0.5 typical)
    pub lacunarity: f32,     // FBM lacunarity (2.0 typical)
    pub tiles_per_side: u32, // Tile grid resolution inside one chunk
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            seed: 12345,
            scale: 100.0,
            height_scale: 16.0,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
            tiles_per_side: 12,
        }
    }
}

impl TerrainParams {
    pub fn validate(&self) -> Result<()> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(Error::InvalidConfiguration(format!(
                "terrain scale must be a positive number, got {}",
                self.scale
            )));
        }
        if self.octaves == 0 || self.octaves > MAX_OCTAVES {
            return Err(Error::InvalidConfiguration(format!(
                "terrain octaves must be in 1..={}, got {}",
                MAX_OCTAVES, self.octaves
            )));
        }
        if self.tiles_per_side == 0 {
            return Err(Error::InvalidConfiguration(
                "tiles_per_side must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Generated content of one chunk: a square grid of tile heights.
#[derive(Clone, Debug)]
pub struct TerrainChunk {
    coord: GridCoordinate,
    name: String,
    world_origin: Vec3,
    tiles_per_side: u32,
    heights: Vec<f32>,
    visible: bool,
}

impl TerrainChunk {
    pub fn coord(&self) -> GridCoordinate {
        self.coord
    }

    /// Display name, e.g. `Chunk (3, -1)`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// World-space centre of the chunk
    pub fn world_origin(&self) -> Vec3 {
        self.world_origin
    }

    pub fn tiles_per_side(&self) -> u32 {
        self.tiles_per_side
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Height of tile (`tx`, `ty`), or `None` outside the chunk
    pub fn height(&self, tx: u32, ty: u32) -> Option<f32> {
        if tx >= self.tiles_per_side || ty >= self.tiles_per_side {
            return None;
        }
        self.heights.get((ty * self.tiles_per_side + tx) as usize).copied()
    }

    /// Row-major tile heights
    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    pub fn min_height(&self) -> f32 {
        self.heights.iter().copied().fold(f32::INFINITY, f32::min)
    }

    pub fn max_height(&self) -> f32 {
        self.heights.iter().copied().fold(f32::NEG_INFINITY, f32::max)
    }
}

impl ChunkContent for TerrainChunk {
    fn set_visible(&mut self, visible: bool) {
        log::trace!("{} visible={}", self.name, visible);
        self.visible = visible;
    }
}

/// Procedural tile generator using fractal Brownian motion (FBM).
///
/// Output depends only on the parameters and the chunk coordinate.
pub struct TerrainGenerator {
    params: TerrainParams,
    chunk_size: f32,
    noise: Fbm<Perlin>,
}

impl TerrainGenerator {
    /// Create a new generator for chunks `chunk_size` world units wide
    pub fn new(params: TerrainParams, chunk_size: f32) -> Self {
        let noise = Fbm::<Perlin>::new(params.seed)
            .set_octaves(params.octaves as usize)
            .set_persistence(params.persistence as f64)
            .set_lacunarity(params.lacunarity as f64);

        Self {
            params,
            chunk_size,
            noise,
        }
    }

    pub fn params(&self) -> &TerrainParams {
        &self.params
    }

    /// Get terrain height at world position (x, z)
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        let nx = (x / self.params.scale) as f64;
        let nz = (z / self.params.scale) as f64;

        // Noise is in [-1, 1]; map to [0, height_scale]
        let noise_value = self.noise.get([nx, nz]).clamp(-1.0, 1.0);
        let normalized = (noise_value + 1.0) / 2.0;
        (normalized * self.params.height_scale as f64) as f32
    }

    /// Generate the tile grid for one chunk
    pub fn generate(&self, coord: GridCoordinate) -> TerrainChunk {
        let tiles = self.params.tiles_per_side;
        let origin = coord.world_origin(self.chunk_size);
        let tile_size = self.chunk_size / tiles as f32;
        // Chunks are centred on their origin
        let corner = origin - Vec3::new(self.chunk_size, 0.0, self.chunk_size) * 0.5;

        let mut heights = Vec::with_capacity((tiles * tiles) as usize);
        for ty in 0..tiles {
            for tx in 0..tiles {
                let x = corner.x + (tx as f32 + 0.5) * tile_size;
                let z = corner.z + (ty as f32 + 0.5) * tile_size;
                heights.push(self.height_at(x, z));
            }
        }

        TerrainChunk {
            coord,
            name: coord.to_string(),
            world_origin: origin,
            tiles_per_side: tiles,
            heights,
            visible: false,
        }
    }
}

impl ChunkFactory for TerrainGenerator {
    type Content = TerrainChunk;

    fn create(&mut self, coord: GridCoordinate) -> TerrainChunk {
        self.generate(coord)
    }
}
