//! # Terrain Generation
//!
//! Procedural content for the voxel world.
//!
//! * **noise_field**: hash, Perlin, fBm and cellular noise, plus the height
//!   fields built on top of them
//! * **biome**: the lazily populated per-column biome map
//! * **terrain_generator**: height, biome blending and column fill
//! * **river**: L-system river paths, channel carving and bank grading
//! * **caves**: cave pockets, ore veins and lava floors
//! * **test_scene**: the hand-tuned scene at the world origin
//!
//! Everything here writes through [`BlockVolume`](crate::voxels::chunk::BlockVolume),
//! so the same code fills a single chunk or a whole zone.

pub mod biome;
pub mod caves;
pub mod noise_field;
pub mod river;
pub mod terrain_generator;
pub mod test_scene;
