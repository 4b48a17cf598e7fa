//! Streaming configuration, loadable from JSON

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};
use crate::streaming::ViewWindow;
use crate::terrain::TerrainParams;

/// Configuration for a streamed map. Fixed once streaming starts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamingConfig {
    /// World units per chunk along each axis
    pub chunk_size: f32,
    /// Chunks per axis kept active around the observer
    pub view_distance: u32,
    /// Terrain generation parameters for chunk content
    pub terrain: TerrainParams,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 12.0,
            view_distance: 5,
            terrain: TerrainParams::default(),
        }
    }
}

impl StreamingConfig {
    /// Validate and derive the view window
    pub fn view_window(&self) -> Result<ViewWindow> {
        ViewWindow::new(self.chunk_size, self.view_distance)
    }

    /// Check the configuration without building anything
    pub fn validate(&self) -> Result<()> {
        self.view_window()?;
        self.terrain.validate()
    }

    /// Load from a JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save as pretty-printed JSON, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| Error::Config(e.to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, json)?;
        Ok(())
    }
}
