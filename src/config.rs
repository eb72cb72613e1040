//! # Terrain Configuration
//!
//! Tunables for world generation and streaming, loaded from JSON with
//! `serde_json`. Every field has a default, so a config file only needs to
//! name what it changes:
//!
//! ```rust
//! use voxel_terrain::config::TerrainConfig;
//!
//! let config = TerrainConfig::from_json_str(r#"{ "seed": 7, "zone_radius": 1 }"#).unwrap();
//! assert_eq!(config.seed, 7);
//! assert_eq!(config.generation.base_height, 100.0);
//! ```

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Which neighbor columns a biome lookup pre-fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiomeLookahead {
    /// Only the four corner columns, as the legacy generator did.
    Diagonal,
    /// All eight surrounding columns.
    Full,
}

/// Parameters of the terrain generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Added to the biome height field to get the column height.
    pub base_height: f32,
    /// Neighbor anchors farther than this never influence a column.
    pub blend_radius: f32,
    /// Bias subtracted from the anchor distance difference before blending.
    pub blend_bias: f32,
    /// Upper edge of the smoothstep mapping a blend distance to a probability.
    pub blend_falloff: f32,
    pub biome_lookahead: BiomeLookahead,
    /// Probability that a streamed zone gets a river.
    pub river_chance: f32,
    /// Probability that a streamed zone gets a cave pocket with ore veins.
    pub cave_chance: f32,
    /// Lava floor of caves in streamed zones.
    pub cave_floor: i32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_height: 100.0,
            blend_radius: 60.0,
            blend_bias: 20.0,
            blend_falloff: 64.0,
            biome_lookahead: BiomeLookahead::Full,
            river_chance: 0.35,
            cave_chance: 0.5,
            cave_floor: 84,
        }
    }
}

/// Top-level configuration of a [`crate::streaming::WorldStreamer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Seeds every random draw made during generation.
    pub seed: u64,
    pub worker_threads: usize,
    /// Zones kept loaded on each side of the observer's zone.
    pub zone_radius: i32,
    pub generation: GenerationConfig,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            seed: 0x5eed,
            worker_threads: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            zone_radius: 2,
            generation: GenerationConfig::default(),
        }
    }
}

impl TerrainConfig {
    /// Parses a config from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let config = TerrainConfig::from_json_str("{}").unwrap();
        assert_eq!(config.zone_radius, 2);
        assert_eq!(config.generation, GenerationConfig::default());
        assert!(config.worker_threads >= 1);
    }

    #[test]
    fn nested_fields_override_individually() {
        let config = TerrainConfig::from_json_str(
            r#"{ "generation": { "biome_lookahead": "diagonal", "river_chance": 1.0 } }"#,
        )
        .unwrap();
        assert_eq!(config.generation.biome_lookahead, BiomeLookahead::Diagonal);
        assert_eq!(config.generation.river_chance, 1.0);
        assert_eq!(config.generation.blend_radius, 60.0);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = TerrainConfig::from_json_str("{ seed: }").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = TerrainConfig::load("/nonexistent/terrain.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
