//! Background tasks for the rendering system.
//!
//! # Available Tasks
//! - `ChunkMeshGenerationTask`: Builds the mesh of one chunk on a worker

pub mod chunk_mesh_generation_task;
