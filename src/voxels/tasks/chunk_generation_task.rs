//! # Chunk Generation Task
//!
//! This module defines the `ChunkGenerationTask`, which generates the terrain
//! of one zone on a worker thread. It is scheduled by the streamer when a zone
//! first comes within range of the observer.

use std::sync::Arc;

use log::trace;
use web_time::Instant;

use crate::{
    core::{HandoffQueue, MtResource},
    task_management::task::{Task, TaskReport},
    voxels::{
        chunk::Chunk,
        generation::terrain_generator::TerrainGenerator,
        spatial_key::SpatialKey,
    },
};

/// Seed of a zone's random stream, derived from the world seed.
pub fn zone_seed(world_seed: u64, zone: SpatialKey) -> u64 {
    zone.mix_seed(world_seed)
}

/// A task that generates the 16 chunks of one zone.
///
/// This task is responsible for:
/// 1. Generating the zone into a private volume
/// 2. Committing each chunk's blocks with a single swap
/// 3. Handing the chunk keys to the meshing stage
pub struct ChunkGenerationTask {
    zone: SpatialKey,
    /// The zone's chunks in `ZoneVolume::chunk_keys` order
    chunks: Vec<MtResource<Chunk>>,
    generator: Arc<TerrainGenerator>,
    seed: u64,
    generated: Arc<HandoffQueue<SpatialKey>>,
}

impl ChunkGenerationTask {
    /// Creates a new chunk generation task.
    ///
    /// # Arguments
    /// * `zone` - Key of the zone to generate
    /// * `chunks` - Handles of the zone's chunks, in `ZoneVolume::chunk_keys` order
    /// * `generator` - The shared terrain generator
    /// * `world_seed` - Seed the zone's random stream is derived from
    /// * `generated` - Queue receiving the keys of generated chunks
    ///
    /// # Returns
    /// A new `ChunkGenerationTask` instance
    pub fn new(
        zone: SpatialKey,
        chunks: Vec<MtResource<Chunk>>,
        generator: Arc<TerrainGenerator>,
        world_seed: u64,
        generated: Arc<HandoffQueue<SpatialKey>>,
    ) -> Self {
        ChunkGenerationTask {
            zone,
            chunks,
            generator,
            seed: zone_seed(world_seed, zone),
            generated,
        }
    }
}

impl Task for ChunkGenerationTask {
    /// Generates the zone and commits it chunk by chunk.
    ///
    /// No chunk lock is held while terrain is computed; each chunk is
    /// write-locked only for its block swap.
    fn process(&self) -> TaskReport {
        let start = Instant::now();
        let mut rng = fastrand::Rng::with_seed(self.seed);
        let volume = self.generator.generate_zone(self.zone, &mut rng);

        let mut keys = Vec::with_capacity(self.chunks.len());
        for (chunk, (key, blocks)) in self.chunks.iter().zip(volume.into_chunks()) {
            let mut chunk = chunk.get_mut();
            debug_assert_eq!(chunk.key(), key);
            chunk.replace_blocks(blocks);
            keys.push(key);
        }
        self.generated.extend(keys);

        trace!("Generated zone {:?}", self.zone);
        TaskReport {
            kind: "generation",
            elapsed: start.elapsed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::GenerationConfig,
        voxels::{block::block_type::BlockType, chunk::zone_volume::ZoneVolume, generation::biome::BiomeMap},
    };

    #[test]
    fn generation_fills_every_chunk_and_hands_it_on() {
        let config = GenerationConfig::default();
        let biome_map = Arc::new(BiomeMap::new(1, config.biome_lookahead));
        let generator = Arc::new(TerrainGenerator::new(config, biome_map));
        let zone = SpatialKey::encode(-64, 128);
        let chunks: Vec<_> = ZoneVolume::chunk_keys(zone)
            .map(|key| MtResource::new(Chunk::new(key)))
            .collect();
        let queue = Arc::new(HandoffQueue::new());

        let task = ChunkGenerationTask::new(zone, chunks.clone(), generator, 7, queue.clone());
        let report = task.process();

        assert_eq!(report.kind, "generation");
        let keys = queue.drain_all();
        assert_eq!(keys, ZoneVolume::chunk_keys(zone).collect::<Vec<_>>());
        for chunk in &chunks {
            assert_ne!(chunk.get().get_block_at(0, 0, 0), BlockType::Empty);
            assert!(!chunk.get().is_meshed());
        }
    }

    #[test]
    fn zones_get_distinct_seeds() {
        let a = zone_seed(1, SpatialKey::encode(0, 64));
        let b = zone_seed(1, SpatialKey::encode(64, 0));
        assert_ne!(a, b);
        assert_eq!(a, zone_seed(1, SpatialKey::encode(0, 64)));
    }
}
