//! Error types for procmap

use thiserror::Error;

use crate::streaming::GridCoordinate;

/// Main error type for the crate
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0} is already registered")]
    DuplicateChunk(GridCoordinate),

    #[error("{0} is not registered")]
    UnknownChunk(GridCoordinate),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),
}
