//! Error types surfaced by the world store and the configuration loader.

use thiserror::Error;

/// Failures of world-level block queries and edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TerrainError {
    /// No resident chunk covers the addressed column. The region has not
    /// streamed in yet, so callers should treat it as "no collision, no action".
    #[error("no chunk covers block ({x}, {y}, {z})")]
    OutOfChunkRange { x: i32, y: i32, z: i32 },

    /// The chunk exists but its zone is still being generated or meshed.
    #[error("chunk at ({x}, {z}) is still being generated")]
    ChunkNotReady { x: i32, z: i32 },
}

/// Failures while loading a [`crate::config::TerrainConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config format: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_coordinates() {
        let err = TerrainError::OutOfChunkRange { x: 3, y: 140, z: -70 };
        assert_eq!(err.to_string(), "no chunk covers block (3, 140, -70)");

        let err = TerrainError::ChunkNotReady { x: 64, z: 0 };
        assert_eq!(err.to_string(), "chunk at (64, 0) is still being generated");
    }
}
