//! # Terrain Generator
//!
//! Turns empty block volumes into terrain. Each column gets:
//!
//! 1. a height from the biome height field plus the configured base height
//! 2. a biome: its chunk column's entry, possibly overridden by a neighbor
//!    column whose anchor is almost as close (soft biome borders)
//! 3. a block type classified from biome and height
//! 4. a fill from the bottom of the world up to the height, where only the
//!    top cell of a grass column is grass and everything under it is dirt
//!
//! Streamed zones may then get a river and a cave pocket, each gated by its
//! configured chance.

use std::sync::Arc;

use cgmath::{InnerSpace, Vector2};
use log::debug;

use super::{
    biome::{Biome, BiomeEntry, BiomeMap},
    caves::carve_caves,
    noise_field::{biome_height, fractal_perlin, perlin, smoothstep},
    river::{carve_bank_slopes, carve_river, trace_path},
};
use crate::{
    config::GenerationConfig,
    voxels::{
        block::block_type::BlockType,
        chunk::{zone_volume::ZoneVolume, BlockVolume, CHUNK_HEIGHT, CHUNK_WIDTH},
        spatial_key::{SpatialKey, ZONE_WIDTH},
    },
};

pub struct TerrainGenerator {
    config: GenerationConfig,
    biome_map: Arc<BiomeMap>,
}

impl TerrainGenerator {
    pub fn new(config: GenerationConfig, biome_map: Arc<BiomeMap>) -> Self {
        TerrainGenerator { config, biome_map }
    }

    pub fn biome_map(&self) -> &Arc<BiomeMap> {
        &self.biome_map
    }

    /// Surface height of world column `(x, z)`, capped at the world height.
    pub fn column_height(&self, x: i32, z: i32) -> f32 {
        let height = biome_height(Vector2::new(x as f32, z as f32)) + self.config.base_height;
        height.min(CHUNK_HEIGHT as f32)
    }

    /// Resolves the biome at world position `p` from its own column entry and
    /// the entries of the surrounding columns.
    ///
    /// Every neighbor anchor within the blend radius gets a chance to take
    /// over, with a probability that grows as its anchor distance approaches
    /// the own anchor distance.
    pub fn resolve_biome(
        &self,
        p: Vector2<f32>,
        own: BiomeEntry,
        neighbors: &[BiomeEntry],
        rng: &mut fastrand::Rng,
    ) -> Biome {
        let primary = (p - own.anchor).magnitude();
        let mut biome = own.biome;
        for neighbor in neighbors {
            let secondary = (p - neighbor.anchor).magnitude();
            if secondary < self.config.blend_radius {
                let dist = self.config.blend_bias - (secondary - primary);
                let probability = smoothstep(0.0, self.config.blend_falloff, dist);
                if rng.f32() < probability {
                    biome = neighbor.biome;
                }
            }
        }
        biome
    }

    /// Block type of a column of `biome` whose surface sits at `height`.
    ///
    /// Grassland turns rocky where a high-frequency Perlin mask (sampled at
    /// the chunk column's position within its zone) saturates: below the
    /// mountain height field it is stone, exactly at its ceiling snow.
    pub fn classify(&self, biome: Biome, height: f32, column: SpatialKey) -> BlockType {
        match biome {
            Biome::Desert => BlockType::Sand,
            Biome::Mountain => BlockType::Stone,
            Biome::Tundra => BlockType::Snow,
            Biome::Grassland => {
                let (x, z) = column.decode();
                let p = Vector2::new(
                    x.rem_euclid(ZONE_WIDTH) as f32 / ZONE_WIDTH as f32,
                    z.rem_euclid(ZONE_WIDTH) as f32 / ZONE_WIDTH as f32,
                );
                let mountain = fractal_perlin(p) * 70.0 + 110.0;
                let rocky = smoothstep(0.25, 0.75, 2.0 * perlin(p).abs());
                if rocky > 0.9 && height < mountain {
                    BlockType::Stone
                } else if rocky > 0.9 && height == mountain.ceil() {
                    BlockType::Snow
                } else {
                    BlockType::Grass
                }
            }
        }
    }

    /// Fills every column of `volume` with biome-classified terrain.
    pub fn fill<V: BlockVolume>(&self, volume: &mut V, rng: &mut fastrand::Rng) {
        let (origin_x, origin_z) = volume.origin();
        let chunks = volume.width() / CHUNK_WIDTH;

        for cz in 0..chunks {
            for cx in 0..chunks {
                let column = SpatialKey::encode(origin_x + cx * CHUNK_WIDTH, origin_z + cz * CHUNK_WIDTH);
                let own = self.biome_map.get_biome(column);
                let neighbors = self.biome_map.neighbors_of(column);

                for i in 0..CHUNK_WIDTH {
                    for j in 0..CHUNK_WIDTH {
                        let x = cx * CHUNK_WIDTH + i;
                        let z = cz * CHUNK_WIDTH + j;
                        let (world_x, world_z) = (origin_x + x, origin_z + z);
                        let height = self.column_height(world_x, world_z);
                        let position = Vector2::new(world_x as f32, world_z as f32);
                        let biome = self.resolve_biome(position, own, &neighbors, rng);
                        let block = self.classify(biome, height, column);
                        fill_column(volume, x, z, height, block);
                    }
                }
            }
        }
    }

    /// Generates a complete zone: terrain, then an optional river and an
    /// optional cave pocket.
    pub fn generate_zone(&self, zone: SpatialKey, rng: &mut fastrand::Rng) -> ZoneVolume {
        let mut volume = ZoneVolume::new(zone);
        self.fill(&mut volume, rng);

        if rng.f32() < self.config.river_chance {
            let water_level = lowest_surface(&volume) - 1;
            let path = trace_path(rng);
            carve_river(&mut volume, &path, water_level);
            carve_bank_slopes(&mut volume, water_level);
            debug!("Carved river through zone {:?} at y={}", zone, water_level);
        }

        if rng.f32() < self.config.cave_chance {
            carve_caves(&mut volume, self.config.cave_floor, rng);
            debug!("Carved cave into zone {:?}", zone);
        }

        volume
    }
}

/// Fills one column from y=0 up to `height`. Grass only ever caps a column.
fn fill_column<V: BlockVolume>(volume: &mut V, x: i32, z: i32, height: f32, block: BlockType) {
    let mut y = 0;
    while (y as f32) < height {
        let cell = if block == BlockType::Grass && (y as f32) < height - 1.0 {
            BlockType::Dirt
        } else {
            block
        };
        volume.set_block(x, y, z, cell);
        y += 1;
    }
}

/// Highest non-empty y of a column, or -1 for an empty column.
pub fn surface_at<V: BlockVolume>(volume: &V, x: i32, z: i32) -> i32 {
    (0..CHUNK_HEIGHT)
        .rev()
        .find(|&y| volume.block(x, y, z) != BlockType::Empty)
        .unwrap_or(-1)
}

/// The lowest column surface in `volume`.
fn lowest_surface<V: BlockVolume>(volume: &V) -> i32 {
    let extent = volume.width();
    (0..extent)
        .flat_map(|x| (0..extent).map(move |z| (x, z)))
        .map(|(x, z)| surface_at(volume, x, z))
        .min()
        .unwrap_or(0)
}
