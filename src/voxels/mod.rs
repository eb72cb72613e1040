//! # Voxel World
//!
//! Representation and generation of the block world.
//!
//! ## Architecture
//!
//! * **Block**: block types, face directions and their atlas cells
//! * **Chunk**: fixed 16x256x16 block volumes linked into a neighbor graph
//! * **SpatialKey**: the 64-bit key addressing chunks and zones
//! * **World**: the shared chunk table and world-coordinate block access
//! * **Generation**: noise, biomes, rivers and caves
//! * **Tasks**: zone generation run on the worker pool
//!
//! ## Data Flow
//!
//! 1. The streamer instantiates the 16 chunks of a zone and links them
//! 2. A generation task fills a private zone volume and commits it chunk by chunk
//! 3. Generated chunk keys are handed back to the streamer for meshing
//!
//! ## Thread Safety
//!
//! Chunks live behind `MtResource` locks. Generation never holds a chunk lock
//! while computing terrain, only for the final block swap.

pub mod block;
pub mod chunk;
pub mod generation;
pub mod spatial_key;
pub mod tasks;
pub mod world;
