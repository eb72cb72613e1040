#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Terrain
//!
//! An infinite, chunked voxel world streamed in around a moving observer.
//!
//! This crate generates terrain (biomes, rivers, caves and ore veins), stores
//! it in 16x256x16 chunks linked into a neighbor graph, builds face-culled
//! meshes with separate opaque and transparent streams, and runs both stages
//! on a worker pool without ever blocking the caller's loop. It produces
//! vertex and index data; drawing it is up to a [`rendering::ChunkRenderer`].
//!
//! ## Key Modules
//!
//! * `voxels` - Blocks, chunks, spatial keys, the world table and terrain generation
//! * `rendering` - The draw contract and the chunk mesher
//! * `streaming` - The `WorldStreamer` pipeline coordinator
//! * `interaction` - Ray picking and block edits
//! * `task_management` - The worker pool
//! * `core` - Shared-ownership and handoff primitives
//! * `config` / `error` - Configuration loading and error types
//!
//! ## Usage
//!
//! ```rust,no_run
//! use cgmath::Point3;
//! use voxel_terrain::{config::TerrainConfig, streaming::WorldStreamer};
//!
//! voxel_terrain::init_logging();
//! let mut streamer = WorldStreamer::new(TerrainConfig::default());
//! streamer.create_test_scene();
//! loop {
//!     streamer.tick(Point3::new(32.0, 180.0, 32.0));
//!     // streamer.draw(min_x, max_x, min_z, max_z, &mut renderer);
//! }
//! ```
//!
//! ## Performance Considerations
//!
//! * Generation works on a private zone volume and swaps finished blocks into
//!   chunks, so chunk locks are held only for the swap
//! * Mesh builds copy neighbor border slices first, never holding two chunk
//!   locks at once
//! * The two handoff queues are drained with a single swap under their lock

pub mod config;
pub mod core;
pub mod error;
pub mod interaction;
pub mod rendering;
pub mod streaming;
pub mod task_management;
pub mod voxels;

/// Initializes `env_logger` writing to stdout, filtered by `RUST_LOG`.
pub fn init_logging() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    log::info!("Logger initialized");
}
