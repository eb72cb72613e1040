//! Task for building chunk meshes on a worker thread.
//!
//! A `ChunkMeshGenerationTask` is dispatched for every chunk the generation
//! stage hands over. The finished mesh is not written into the chunk here;
//! it goes to the meshing handoff queue and is merged on the main thread.

use std::sync::Arc;

use web_time::Instant;

use crate::{
    core::HandoffQueue,
    rendering::meshing::{neighborhood::MeshSource, ChunkMesh},
    task_management::task::{Task, TaskReport},
    voxels::spatial_key::SpatialKey,
};

/// A finished mesh waiting to be merged into its chunk.
#[derive(Debug)]
pub struct MeshResult {
    pub key: SpatialKey,
    /// Chunk revision the mesh was built from.
    pub revision: u64,
    pub mesh: ChunkMesh,
}

/// A task that builds the mesh of one chunk.
pub struct ChunkMeshGenerationTask {
    key: SpatialKey,
    source: MeshSource,
    meshed: Arc<HandoffQueue<MeshResult>>,
}

impl ChunkMeshGenerationTask {
    /// Creates a new chunk mesh generation task.
    ///
    /// # Arguments
    /// * `key` - Key of the chunk to mesh
    /// * `source` - The chunk and its neighbor handles
    /// * `meshed` - Queue receiving the finished mesh
    ///
    /// # Returns
    /// A new `ChunkMeshGenerationTask` instance
    pub fn new(key: SpatialKey, source: MeshSource, meshed: Arc<HandoffQueue<MeshResult>>) -> Self {
        ChunkMeshGenerationTask { key, source, meshed }
    }
}

impl Task for ChunkMeshGenerationTask {
    fn process(&self) -> TaskReport {
        let start = Instant::now();
        let mesh = self.source.build();
        self.meshed.push(MeshResult {
            key: self.key,
            revision: self.source.revision(),
            mesh,
        });
        TaskReport {
            kind: "meshing",
            elapsed: start.elapsed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::MtResource,
        voxels::{block::block_type::BlockType, chunk::Chunk},
    };

    #[test]
    fn mesh_lands_in_the_queue_not_the_chunk() {
        let key = SpatialKey::encode(0, 0);
        let mut chunk = Chunk::new(key);
        chunk.set_block_at(1, 1, 1, BlockType::Dirt);
        let chunk = MtResource::new(chunk);
        let queue = Arc::new(HandoffQueue::new());

        let task = ChunkMeshGenerationTask::new(key, MeshSource::new(chunk.clone(), Default::default()), queue.clone());
        assert_eq!(task.process().kind, "meshing");

        let results = queue.drain_all();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].key, key);
        assert_eq!(results[0].revision, chunk.get().revision());
        assert_eq!(results[0].mesh.opaque.face_count(), 6);
        assert!(!chunk.get().is_meshed());
    }
}
