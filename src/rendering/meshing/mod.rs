//! Mesh generation for voxel chunks.
//!
//! This module converts a chunk's blocks into the geometry streams a renderer
//! draws. Every exposed block face becomes one quad; no faces are merged, so
//! the face count is proportional to the exposed surface area.
//!
//! # Architecture
//! - [`ChunkMesh`]: the opaque and transparent streams of one chunk
//! - [`MeshStream`]: interleaved vertex records, parallel UVs and indices
//! - [`face::Face`]: the four vertices and UVs of a single block face
//! - [`neighborhood`]: cross-border block lookups against linked chunks
//!
//! # Visibility
//! A face is emitted iff the cell it faces is `Empty`, or is transparent and
//! of a different type than the block itself. Touching liquids of one kind
//! therefore never show internal walls, while water against lava does.
//!
//! # Usage
//! ```
//! use voxel_terrain::rendering::meshing::{neighborhood::ChunkNeighborhood, ChunkMesh};
//! use voxel_terrain::voxels::{block::block_type::BlockType, chunk::Chunk, spatial_key::SpatialKey};
//!
//! let mut chunk = Chunk::new(SpatialKey::encode(0, 0));
//! chunk.set_block_at(0, 0, 0, BlockType::Stone);
//! let mesh = ChunkMesh::build(&ChunkNeighborhood::isolated(&chunk));
//! assert_eq!(mesh.opaque.indices.len(), 36);
//! ```

pub mod face;
pub mod neighborhood;

use face::{Face, QUAD_INDICES};
use neighborhood::ChunkNeighborhood;

use crate::voxels::{
    block::{block_type::BlockType, direction::Direction},
    chunk::{CHUNK_HEIGHT, CHUNK_WIDTH},
};

use super::{RenderLayer, VertexRecord};

/// One geometry stream of a chunk mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshStream {
    pub indices: Vec<u32>,
    pub vertices: Vec<VertexRecord>,
    pub uvs: Vec<[f32; 2]>,
}

impl MeshStream {
    /// Appends a face, offsetting its indices past the existing vertices.
    pub fn push_face(&mut self, face: &Face) {
        let base = self.vertices.len() as u32;
        self.indices.extend(QUAD_INDICES.iter().map(|i| base + i));
        self.vertices.extend_from_slice(&face.vertices);
        self.uvs.extend_from_slice(&face.uvs);
    }

    pub fn face_count(&self) -> usize {
        self.indices.len() / QUAD_INDICES.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// The complete mesh of one chunk.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChunkMesh {
    pub opaque: MeshStream,
    pub transparent: MeshStream,
}

impl ChunkMesh {
    pub fn stream(&self, layer: RenderLayer) -> &MeshStream {
        match layer {
            RenderLayer::Opaque => &self.opaque,
            RenderLayer::Transparent => &self.transparent,
        }
    }

    /// Builds the mesh of `neighborhood`'s center chunk.
    ///
    /// Liquid faces go into the transparent stream, everything else into the
    /// opaque one. The result depends only on the blocks read, so building an
    /// unchanged chunk twice yields identical streams.
    pub fn build(neighborhood: &ChunkNeighborhood) -> Self {
        let chunk = neighborhood.center();
        let mut mesh = ChunkMesh::default();

        for z in 0..CHUNK_WIDTH {
            for y in 0..CHUNK_HEIGHT {
                for x in 0..CHUNK_WIDTH {
                    let block = chunk.get_block_at(x, y, z);
                    if block.is_empty() {
                        continue;
                    }
                    let stream = if block.is_transparent() {
                        &mut mesh.transparent
                    } else {
                        &mut mesh.opaque
                    };

                    for direction in Direction::all() {
                        let step = direction.offset();
                        let facing = neighborhood.block_at(x + step.x, y + step.y, z + step.z);
                        if face_visible(block, facing) {
                            stream.push_face(&Face::new(x, y, z, block, direction));
                        }
                    }
                }
            }
        }

        mesh
    }
}

/// Whether the face of `block` toward a cell holding `facing` is drawn.
pub fn face_visible(block: BlockType, facing: BlockType) -> bool {
    facing.is_empty() || (facing.is_transparent() && facing != block)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxels::{chunk::Chunk, spatial_key::SpatialKey};

    fn chunk_with(blocks: &[((i32, i32, i32), BlockType)]) -> Chunk {
        let mut chunk = Chunk::new(SpatialKey::encode(0, 0));
        for &((x, y, z), block) in blocks {
            chunk.set_block_at(x, y, z, block);
        }
        chunk
    }

    fn build(chunk: &Chunk) -> ChunkMesh {
        ChunkMesh::build(&ChunkNeighborhood::isolated(chunk))
    }

    #[test]
    fn lone_block_has_six_faces() {
        let chunk = chunk_with(&[((0, 0, 0), BlockType::Stone)]);
        let mesh = build(&chunk);
        assert_eq!(mesh.opaque.face_count(), 6);
        assert_eq!(mesh.opaque.vertices.len(), 24);
        assert_eq!(mesh.opaque.uvs.len(), 24);
        assert_eq!(mesh.opaque.indices.len(), 36);
        assert!(mesh.transparent.is_empty());
        assert_eq!(&mesh.opaque.indices[6..12], &[4, 5, 6, 4, 6, 7]);
    }

    #[test]
    fn touching_blocks_hide_their_shared_faces() {
        let chunk = chunk_with(&[((0, 0, 0), BlockType::Stone), ((1, 0, 0), BlockType::Stone)]);
        assert_eq!(build(&chunk).opaque.face_count(), 10);
    }

    #[test]
    fn water_shows_its_face_against_lava() {
        let chunk = chunk_with(&[((5, 5, 5), BlockType::Water), ((6, 5, 5), BlockType::Lava)]);
        let mesh = build(&chunk);
        assert_eq!(mesh.transparent.face_count(), 12);
        assert!(mesh.opaque.is_empty());
    }

    #[test]
    fn water_hides_its_face_against_water() {
        let chunk = chunk_with(&[((5, 5, 5), BlockType::Water), ((6, 5, 5), BlockType::Water)]);
        assert_eq!(build(&chunk).transparent.face_count(), 10);
    }

    #[test]
    fn solid_faces_show_through_liquid() {
        let chunk = chunk_with(&[((5, 5, 5), BlockType::Stone), ((5, 6, 5), BlockType::Water)]);
        let mesh = build(&chunk);
        assert_eq!(mesh.opaque.face_count(), 6);
        assert_eq!(mesh.transparent.face_count(), 5);
    }

    #[test]
    fn building_twice_is_identical() {
        let chunk = chunk_with(&[
            ((0, 0, 0), BlockType::Grass),
            ((3, 9, 15), BlockType::Water),
            ((3, 10, 15), BlockType::OreC),
            ((15, 255, 15), BlockType::Snow),
        ]);
        assert_eq!(build(&chunk), build(&chunk));
    }

    #[test]
    fn face_count_matches_exposed_pairs() {
        let mut chunk = Chunk::new(SpatialKey::encode(0, 0));
        let mut rng = fastrand::Rng::with_seed(12);
        for x in 0..CHUNK_WIDTH {
            for z in 0..CHUNK_WIDTH {
                for y in 0..8 {
                    let block = BlockType::from_int(rng.u8(0..12)).unwrap_or_default();
                    chunk.set_block_at(x, y, z, block);
                }
            }
        }

        let neighborhood = ChunkNeighborhood::isolated(&chunk);
        let mut opaque = 0;
        let mut transparent = 0;
        for x in 0..CHUNK_WIDTH {
            for y in 0..CHUNK_HEIGHT {
                for z in 0..CHUNK_WIDTH {
                    let block = chunk.get_block_at(x, y, z);
                    if block.is_empty() {
                        continue;
                    }
                    for direction in Direction::all() {
                        let step = direction.offset();
                        let facing = neighborhood.block_at(x + step.x, y + step.y, z + step.z);
                        if face_visible(block, facing) {
                            if block.is_transparent() {
                                transparent += 1;
                            } else {
                                opaque += 1;
                            }
                        }
                    }
                }
            }
        }

        let mesh = ChunkMesh::build(&neighborhood);
        assert_eq!(mesh.opaque.face_count(), opaque);
        assert_eq!(mesh.transparent.face_count(), transparent);
    }

    #[test]
    fn border_faces_are_culled_against_linked_neighbors() {
        let chunk = chunk_with(&[((15, 0, 0), BlockType::Stone)]);
        let mut east = Chunk::new(SpatialKey::encode(16, 0));
        east.set_block_at(0, 0, 0, BlockType::Stone);

        assert_eq!(build(&chunk).opaque.face_count(), 6);
        let linked = ChunkNeighborhood::isolated(&chunk).with_neighbor(Direction::XPos, &east);
        assert_eq!(ChunkMesh::build(&linked).opaque.face_count(), 5);
    }
}
