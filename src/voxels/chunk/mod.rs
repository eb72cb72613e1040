//! # Chunk Module
//!
//! This module provides the `Chunk` struct, a fixed 16x256x16 volume of
//! blocks, together with the `BlockVolume` abstraction the terrain generator
//! writes through.
//!
//! ## Storage
//!
//! Blocks are stored densely, one byte each, addressed as
//! `x + 16 * y + 16 * 256 * z`. A chunk is 64 KiB of block data regardless of
//! content, which keeps reads during meshing a single index computation.
//!
//! ## Neighbor Graph
//!
//! Chunks never own each other. A neighbor link is the `SpatialKey` of the
//! adjacent chunk, resolved through the world's chunk table when needed.
//! Linking is always symmetric: if `a` links `b` along `d`, then `b` links `a`
//! along `d.opposite()`.

use crate::rendering::{meshing::ChunkMesh, DrawMode, Drawable, RenderLayer, VertexRecord};

use super::{
    block::{block_type::BlockType, direction::Direction},
    spatial_key::SpatialKey,
};

pub mod zone_volume;

/// Width and depth of a chunk in blocks.
pub const CHUNK_WIDTH: i32 = 16;
/// Height of a chunk (and of the world) in blocks.
pub const CHUNK_HEIGHT: i32 = 256;
/// The total number of blocks in a chunk.
pub const CHUNK_VOLUME: usize = (CHUNK_WIDTH * CHUNK_HEIGHT * CHUNK_WIDTH) as usize;
/// Index count of a chunk whose mesh has not been built yet.
pub const UNMESHED: i32 = -1;

/// Read/write access to a box of blocks in local coordinates.
///
/// Reads outside the box return `Empty` and writes outside it are ignored, so
/// generation passes can run off the edge of their bounds without checks.
pub trait BlockVolume {
    fn block(&self, x: i32, y: i32, z: i32) -> BlockType;
    fn set_block(&mut self, x: i32, y: i32, z: i32, block_type: BlockType);
    /// Extent along x and z.
    fn width(&self) -> i32;
    /// World-space block coordinates of local `(0, 0)`.
    fn origin(&self) -> (i32, i32);
}

/// Returns the flat index of `(x, y, z)` if it lies inside a chunk.
pub fn block_index(x: i32, y: i32, z: i32) -> Option<usize> {
    if !(0..CHUNK_WIDTH).contains(&x)
        || !(0..CHUNK_HEIGHT).contains(&y)
        || !(0..CHUNK_WIDTH).contains(&z)
    {
        return None;
    }
    Some((x + CHUNK_WIDTH * y + CHUNK_WIDTH * CHUNK_HEIGHT * z) as usize)
}

/// A 16x256x16 column of blocks and its cached mesh.
pub struct Chunk {
    key: SpatialKey,
    blocks: Vec<BlockType>,
    neighbors: [Option<SpatialKey>; 6],
    mesh: ChunkMesh,
    index_count: i32,
    /// Bumped whenever the blocks change or the mesh is invalidated.
    revision: u64,
}

impl Chunk {
    /// Creates an all-`Empty` chunk whose origin is encoded by `key`.
    pub fn new(key: SpatialKey) -> Self {
        Chunk {
            key,
            blocks: vec![BlockType::Empty; CHUNK_VOLUME],
            neighbors: [None; 6],
            mesh: ChunkMesh::default(),
            index_count: UNMESHED,
            revision: 0,
        }
    }

    pub fn key(&self) -> SpatialKey {
        self.key
    }

    /// World-space `(x, z)` of the chunk's minimum corner.
    pub fn origin(&self) -> (i32, i32) {
        self.key.decode()
    }

    /// Returns the block at chunk-local coordinates, or `Empty` if any axis
    /// is out of range.
    pub fn get_block_at(&self, x: i32, y: i32, z: i32) -> BlockType {
        match block_index(x, y, z) {
            Some(index) => self.blocks[index],
            None => BlockType::Empty,
        }
    }

    /// Writes the block at chunk-local coordinates.
    ///
    /// # Panics
    /// The caller guarantees the coordinates are in range. Out-of-range
    /// writes that alias a valid index land there; others panic.
    pub fn set_block_at(&mut self, x: i32, y: i32, z: i32, block_type: BlockType) {
        let index = (x + CHUNK_WIDTH * y + CHUNK_WIDTH * CHUNK_HEIGHT * z) as usize;
        self.blocks[index] = block_type;
    }

    /// Replaces the whole block array in one step.
    ///
    /// `blocks` must hold exactly `CHUNK_VOLUME` entries.
    pub fn replace_blocks(&mut self, blocks: Vec<BlockType>) {
        debug_assert_eq!(blocks.len(), CHUNK_VOLUME);
        self.blocks = blocks;
        self.revision = self.revision.wrapping_add(1);
    }

    pub fn neighbor(&self, direction: Direction) -> Option<SpatialKey> {
        self.neighbors[direction.index()]
    }

    /// Links `other` as this chunk's neighbor along `direction`, and this
    /// chunk as `other`'s neighbor along the opposite direction.
    ///
    /// Does nothing when `other` is `None`.
    pub fn link_neighbor(&mut self, other: Option<&mut Chunk>, direction: Direction) {
        if let Some(other) = other {
            self.neighbors[direction.index()] = Some(other.key);
            other.neighbors[direction.opposite().index()] = Some(self.key);
        }
    }

    /// Number of indices in the opaque stream, or `UNMESHED`.
    pub fn index_count(&self) -> i32 {
        self.index_count
    }

    pub fn is_meshed(&self) -> bool {
        self.index_count != UNMESHED
    }

    pub fn mesh(&self) -> &ChunkMesh {
        &self.mesh
    }

    /// Stores a freshly built mesh and records its face-index count.
    pub fn set_mesh(&mut self, mesh: ChunkMesh) {
        self.index_count = mesh.opaque.indices.len() as i32;
        self.mesh = mesh;
    }

    /// Marks the cached mesh stale so the next draw rebuilds it. Meshes
    /// built from an earlier revision are no longer accepted.
    pub fn invalidate_mesh(&mut self) {
        self.index_count = UNMESHED;
        self.revision = self.revision.wrapping_add(1);
    }

    /// Changes each time the chunk's blocks or its neighbors' border blocks
    /// are edited. A mesh is current only if built at the current revision.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub(crate) fn blocks(&self) -> &[BlockType] {
        &self.blocks
    }
}

impl BlockVolume for Chunk {
    fn block(&self, x: i32, y: i32, z: i32) -> BlockType {
        self.get_block_at(x, y, z)
    }

    fn set_block(&mut self, x: i32, y: i32, z: i32, block_type: BlockType) {
        if let Some(index) = block_index(x, y, z) {
            self.blocks[index] = block_type;
        }
    }

    fn width(&self) -> i32 {
        CHUNK_WIDTH
    }

    fn origin(&self) -> (i32, i32) {
        self.key.decode()
    }
}

impl Drawable for Chunk {
    fn vertex_stream(&self, layer: RenderLayer) -> &[VertexRecord] {
        &self.mesh.stream(layer).vertices
    }

    fn uv_stream(&self, layer: RenderLayer) -> &[[f32; 2]] {
        &self.mesh.stream(layer).uvs
    }

    fn index_stream(&self, layer: RenderLayer) -> &[u32] {
        &self.mesh.stream(layer).indices
    }

    fn draw_mode(&self) -> DrawMode {
        DrawMode::Triangles
    }
}
