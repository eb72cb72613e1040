//! # World Streaming
//!
//! The `WorldStreamer` keeps the world generated around a moving observer.
//! It owns the chunk table, the worker pool and the two handoff queues that
//! connect the pipeline stages.
//!
//! ## Pipeline
//!
//! 1. `tick` dispatches one `ChunkGenerationTask` per unseen zone in range
//! 2. Generation workers push finished chunk keys onto queue A
//! 3. The main thread drains queue A and dispatches one mesh task per chunk
//! 4. Mesh workers push finished meshes onto queue B
//! 5. The main thread drains queue B, stores each mesh in its chunk and
//!    promotes zones whose 16 chunks are all merged
//!
//! Workers only append to the queues and the main thread only drains them,
//! so the queues are the sole points of contention between the two sides.
//!
//! ## Cancellation
//!
//! There is none. A dispatched zone always completes, even if the observer
//! has moved away, and is drawn again once it is back in view.

pub mod zone_tracker;

use std::sync::Arc;

use cgmath::{Matrix4, Point3, Vector3};
use log::{debug, info, trace};

use crate::{
    config::TerrainConfig,
    core::HandoffQueue,
    error::TerrainError,
    rendering::{
        tasks::chunk_mesh_generation_task::{ChunkMeshGenerationTask, MeshResult},
        ChunkRenderer, RenderLayer,
    },
    task_management::TaskManager,
    voxels::{
        block::block_type::BlockType,
        chunk::{zone_volume::ZoneVolume, CHUNK_WIDTH},
        generation::{biome::BiomeMap, terrain_generator::TerrainGenerator, test_scene},
        spatial_key::{align_down, SpatialKey, ZONE_WIDTH},
        tasks::chunk_generation_task::{zone_seed, ChunkGenerationTask},
        world::World,
    },
};

use zone_tracker::{ZoneState, ZoneTracker};

/// Running totals of the pipeline's work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamingStats {
    pub zones_dispatched: usize,
    pub zones_completed: usize,
    pub chunks_generated: usize,
    pub chunks_meshed: usize,
    /// Meshes built synchronously at draw time.
    pub lazy_meshes: usize,
    /// Worker meshes discarded because their chunk was edited meanwhile.
    pub stale_meshes: usize,
    pub tasks_finished: usize,
}

pub struct WorldStreamer {
    config: TerrainConfig,
    world: World,
    zones: ZoneTracker,
    generator: Arc<TerrainGenerator>,
    task_manager: TaskManager,
    /// Stage A: chunks whose generation finished.
    generated: Arc<HandoffQueue<SpatialKey>>,
    /// Stage B: meshes waiting to be merged.
    meshed: Arc<HandoffQueue<MeshResult>>,
    stats: StreamingStats,
}

impl WorldStreamer {
    /// Creates a streamer with an empty world and a worker pool sized from
    /// `config.worker_threads`.
    pub fn new(config: TerrainConfig) -> Self {
        let biome_map = Arc::new(BiomeMap::new(config.seed, config.generation.biome_lookahead));
        let generator = Arc::new(TerrainGenerator::new(config.generation.clone(), biome_map));
        let task_manager = TaskManager::new(config.worker_threads);

        WorldStreamer {
            config,
            world: World::new(),
            zones: ZoneTracker::new(),
            generator,
            task_manager,
            generated: Arc::new(HandoffQueue::new()),
            meshed: Arc::new(HandoffQueue::new()),
            stats: StreamingStats::default(),
        }
    }

    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn stats(&self) -> StreamingStats {
        self.stats
    }

    pub fn zone_state(&self, zone: SpatialKey) -> ZoneState {
        self.zones.state(zone)
    }

    /// Advances the pipeline by one step for an observer at `observer`.
    ///
    /// Never blocks on workers: everything not finished yet is picked up by
    /// a later tick.
    pub fn tick(&mut self, observer: Point3<f32>) {
        self.stats.tasks_finished += self.task_manager.process_completed_tasks().len();

        let center = SpatialKey::zone_containing(observer.x.floor() as i32, observer.z.floor() as i32);
        let radius = self.config.zone_radius;
        for dz in -radius..=radius {
            for dx in -radius..=radius {
                let Some(zone) = center.checked_offset(dx, dz, ZONE_WIDTH) else {
                    continue;
                };
                if self.zones.state(zone) == ZoneState::Unseen {
                    self.dispatch_zone(zone);
                }
            }
        }

        self.drain_generated();
        self.drain_meshed();
        self.task_manager.process_queued_tasks();
    }

    /// Allocates and links the zone's chunks and schedules its generation.
    fn dispatch_zone(&mut self, zone: SpatialKey) {
        let chunks = ZoneVolume::chunk_keys(zone)
            .map(|key| self.world.instantiate_chunk_at(key))
            .collect();
        self.zones.mark_pending(zone);
        self.generator.biome_map().get_biome(zone);

        self.task_manager.publish_task(Box::new(ChunkGenerationTask::new(
            zone,
            chunks,
            self.generator.clone(),
            self.config.seed,
            self.generated.clone(),
        )));
        self.stats.zones_dispatched += 1;
        debug!("Dispatched zone {:?}", zone);
    }

    /// Stage A: schedules a mesh build for every freshly generated chunk.
    fn drain_generated(&mut self) {
        let keys = self.generated.drain_all();
        if keys.is_empty() {
            return;
        }
        trace!("Stage A drained {} chunks", keys.len());

        for key in keys {
            self.stats.chunks_generated += 1;
            if let Some(source) = self.world.mesh_source(key) {
                self.task_manager.publish_task(Box::new(ChunkMeshGenerationTask::new(
                    key,
                    source,
                    self.meshed.clone(),
                )));
            }
        }
    }

    /// Stage B: stores finished meshes and promotes completed zones.
    fn drain_meshed(&mut self) {
        let results = self.meshed.drain_all();
        if results.is_empty() {
            return;
        }
        trace!("Stage B drained {} meshes", results.len());

        for MeshResult { key, revision, mesh } in results {
            let Some(chunk) = self.world.get_chunk(key) else {
                continue;
            };
            {
                let mut chunk = chunk.get_mut();
                if chunk.revision() == revision {
                    chunk.set_mesh(mesh);
                    self.stats.chunks_meshed += 1;
                } else {
                    // Edited while the build ran. Left unmeshed for the next draw.
                    self.stats.stale_meshes += 1;
                    trace!("Dropped stale mesh for chunk {:?}", key);
                }
            }

            if self.zones.record_meshed(key) {
                self.stats.zones_completed += 1;
                info!("Zone {:?} complete", key.zone());
            }
        }
    }

    /// No work is queued, running, or waiting in a handoff queue.
    pub fn is_settled(&self) -> bool {
        self.task_manager.is_idle() && self.generated.is_empty() && self.meshed.is_empty()
    }

    /// Draws every resident chunk whose column intersects the block range
    /// `[min_x, max_x] x [min_z, max_z]`.
    ///
    /// Chunks of pending zones are skipped. Chunks that have no mesh yet are
    /// meshed on the spot. Each drawn chunk is submitted twice, opaque layer
    /// first, with a model transform translating it to its world origin.
    ///
    /// # Returns
    /// The number of chunks drawn.
    pub fn draw(&mut self, min_x: i32, max_x: i32, min_z: i32, max_z: i32, renderer: &mut dyn ChunkRenderer) -> usize {
        let mut drawn = 0;
        for z in (align_down(min_z, CHUNK_WIDTH)..=max_z).step_by(CHUNK_WIDTH as usize) {
            for x in (align_down(min_x, CHUNK_WIDTH)..=max_x).step_by(CHUNK_WIDTH as usize) {
                if self.draw_chunk(SpatialKey::encode(x, z), renderer) {
                    drawn += 1;
                }
            }
        }
        drawn
    }

    fn draw_chunk(&mut self, key: SpatialKey, renderer: &mut dyn ChunkRenderer) -> bool {
        let Some(chunk) = self.world.get_chunk(key) else {
            return false;
        };
        if self.zones.state(key.zone()) == ZoneState::Pending {
            return false;
        }

        if !chunk.get().is_meshed() {
            if let Some(source) = self.world.mesh_source(key) {
                let mesh = source.build();
                chunk.get_mut().set_mesh(mesh);
                self.stats.lazy_meshes += 1;
            }
        }

        let (x, z) = key.decode();
        let model = Matrix4::from_translation(Vector3::new(x as f32, 0.0, z as f32));
        let chunk = chunk.get();
        for layer in RenderLayer::all() {
            renderer.submit(model, &*chunk, layer);
        }
        true
    }

    /// Returns the block at world coordinates.
    pub fn get_block_at(&self, x: i32, y: i32, z: i32) -> Result<BlockType, TerrainError> {
        self.world.get_block_at(x, y, z)
    }

    /// Writes the block at world coordinates.
    ///
    /// Edits to chunks of zones that are still pending are rejected with
    /// `ChunkNotReady`, since workers may be reading or replacing their blocks.
    pub fn set_block_at(&self, x: i32, y: i32, z: i32, block_type: BlockType) -> Result<(), TerrainError> {
        let key = SpatialKey::chunk_containing(x, z);
        if self.world.contains(key) && self.zones.state(key.zone()) == ZoneState::Pending {
            let (chunk_x, chunk_z) = key.decode();
            debug!("Rejected edit at ({}, {}, {}): zone still pending", x, y, z);
            return Err(TerrainError::ChunkNotReady { x: chunk_x, z: chunk_z });
        }
        self.world.set_block_at(x, y, z, block_type)
    }

    /// Fills zone `(0, 0)` with the hand-tuned test scene on the calling
    /// thread and marks it complete. Its chunks are meshed at first draw.
    ///
    /// Does nothing if the zone has already been seen.
    pub fn create_test_scene(&mut self) {
        let zone = SpatialKey::encode(0, 0);
        if self.zones.state(zone) != ZoneState::Unseen {
            return;
        }

        let chunks: Vec<_> = ZoneVolume::chunk_keys(zone)
            .map(|key| self.world.instantiate_chunk_at(key))
            .collect();
        self.zones.mark_complete(zone);

        let mut volume = ZoneVolume::new(zone);
        let mut rng = fastrand::Rng::with_seed(zone_seed(self.config.seed, zone));
        test_scene::fill_test_scene(&mut volume, &mut rng);
        for (chunk, (_, blocks)) in chunks.iter().zip(volume.into_chunks()) {
            chunk.get_mut().replace_blocks(blocks);
        }
        info!("Created test scene in zone {:?}", zone);
    }
}
