//! Collaborators the streaming controller drives: chunk content creation
//! and visibility toggling

use crate::streaming::GridCoordinate;

/// Generated payload of a chunk.
pub trait ChunkContent {
    /// Show or hide the content (rendering/physics presence).
    ///
    /// Called only when the chunk's active flag actually changes.
    fn set_visible(&mut self, visible: bool);
}

/// Produces chunk content for a grid cell.
///
/// Implementations must be deterministic in `coord`: the controller calls
/// `create` at most once per coordinate and reuses the result across every
/// later disable/enable cycle.
pub trait ChunkFactory {
    type Content: ChunkContent;

    fn create(&mut self, coord: GridCoordinate) -> Self::Content;
}

impl<F: ChunkFactory + ?Sized> ChunkFactory for &mut F {
    type Content = F::Content;

    fn create(&mut self, coord: GridCoordinate) -> Self::Content {
        (**self).create(coord)
    }
}

impl<F: ChunkFactory + ?Sized> ChunkFactory for Box<F> {
    type Content = F::Content;

    fn create(&mut self, coord: GridCoordinate) -> Self::Content {
        (**self).create(coord)
    }
}
