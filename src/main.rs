//! # Voxel Terrain Headless Driver
//!
//! Streams the world around an observer walking along +X and draws it into a
//! renderer that only counts what it is given.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- [config.json]
//! ```

use std::{thread, time::Duration};

use anyhow::Context;
use cgmath::{Matrix4, Point3};
use log::info;
use voxel_terrain::{
    config::TerrainConfig,
    rendering::{ChunkRenderer, Drawable, RenderLayer},
    streaming::WorldStreamer,
};

const WALK_TICKS: usize = 240;
const WALK_SPEED: f32 = 1.5;
const VIEW_DISTANCE: i32 = 96;

#[derive(Default)]
struct CountingRenderer {
    submissions: usize,
    opaque_indices: usize,
    transparent_indices: usize,
}

impl ChunkRenderer for CountingRenderer {
    fn submit(&mut self, _model: Matrix4<f32>, drawable: &dyn Drawable, layer: RenderLayer) {
        self.submissions += 1;
        match layer {
            RenderLayer::Opaque => self.opaque_indices += drawable.element_count(layer),
            RenderLayer::Transparent => self.transparent_indices += drawable.element_count(layer),
        }
    }
}

fn main() -> anyhow::Result<()> {
    voxel_terrain::init_logging();

    let config = match std::env::args().nth(1) {
        Some(path) => TerrainConfig::load(&path).with_context(|| format!("loading config from {path}"))?,
        None => TerrainConfig::default(),
    };
    info!("Seed {}, {} workers, zone radius {}", config.seed, config.worker_threads, config.zone_radius);

    let mut streamer = WorldStreamer::new(config);
    streamer.create_test_scene();

    let mut renderer = CountingRenderer::default();
    let mut observer = Point3::new(32.0, 180.0, 32.0);
    for _ in 0..WALK_TICKS {
        streamer.tick(observer);
        let (x, z) = (observer.x as i32, observer.z as i32);
        streamer.draw(x - VIEW_DISTANCE, x + VIEW_DISTANCE, z - VIEW_DISTANCE, z + VIEW_DISTANCE, &mut renderer);
        observer.x += WALK_SPEED;
        thread::sleep(Duration::from_millis(4));
    }

    while !streamer.is_settled() {
        streamer.tick(observer);
        thread::sleep(Duration::from_millis(4));
    }

    let stats = streamer.stats();
    info!(
        "Zones dispatched {}, completed {}; chunks generated {}, meshed {} (+{} at draw time, {} stale)",
        stats.zones_dispatched,
        stats.zones_completed,
        stats.chunks_generated,
        stats.chunks_meshed,
        stats.lazy_meshes,
        stats.stale_meshes
    );
    info!(
        "{} draw submissions, {} opaque and {} transparent indices",
        renderer.submissions, renderer.opaque_indices, renderer.transparent_indices
    );
    Ok(())
}
