//! # World Module
//!
//! This module provides the `World` struct, the table of every live chunk.
//! It is the sole owner of chunks: neighbor links are `SpatialKey`s that are
//! resolved here, never references held by the chunks themselves.
//!
//! ## Architecture
//!
//! Storage is sparse. Only chunks of zones the streamer has dispatched (or
//! the test scene) exist; any other column answers block queries with
//! `TerrainError::OutOfChunkRange`.
//!
//! ## Performance Considerations
//!
//! - Chunk lookup is O(1) using a hash map keyed by the column's `SpatialKey`
//! - Chunks sit in `MtResource` handles so worker tasks can hold them without
//!   borrowing the table
//! - No method ever holds two chunk locks at once

use std::collections::HashMap;

use log::trace;

use crate::{
    core::MtResource,
    error::TerrainError,
    rendering::meshing::neighborhood::MeshSource,
};

use super::{
    block::{block_type::BlockType, direction::Direction},
    chunk::{Chunk, CHUNK_HEIGHT, CHUNK_WIDTH},
    spatial_key::SpatialKey,
};

/// Represents the voxel world as a sparse table of chunk columns.
///
/// # Examples
///
/// ```
/// use voxel_terrain::voxels::{block::block_type::BlockType, spatial_key::SpatialKey, world::World};
///
/// let mut world = World::new();
/// world.instantiate_chunk_at(SpatialKey::encode(0, 0));
///
/// world.set_block_at(3, 70, 5, BlockType::Stone).unwrap();
/// assert_eq!(world.get_block_at(3, 70, 5), Ok(BlockType::Stone));
/// assert!(world.get_block_at(40, 70, 5).is_err());
/// ```
#[derive(Default)]
pub struct World {
    chunks: HashMap<SpatialKey, MtResource<Chunk>>,
}

impl World {
    /// Creates a new, empty world.
    pub fn new() -> Self {
        World {
            chunks: HashMap::new(),
        }
    }

    /// Creates the chunk for column `key` and links it to every horizontal
    /// neighbor that already exists.
    ///
    /// # Arguments
    ///
    /// * `key` - The 16-aligned column key of the chunk
    ///
    /// # Returns
    ///
    /// A handle to the chunk. If the chunk already exists it is returned
    /// untouched.
    pub fn instantiate_chunk_at(&mut self, key: SpatialKey) -> MtResource<Chunk> {
        if let Some(existing) = self.chunks.get(&key) {
            return existing.clone();
        }

        let mut chunk = Chunk::new(key);
        for direction in Direction::horizontal() {
            let step = direction.offset();
            let neighbor = key
                .checked_offset(step.x, step.z, CHUNK_WIDTH)
                .and_then(|neighbor_key| self.chunks.get(&neighbor_key));
            if let Some(neighbor) = neighbor {
                chunk.link_neighbor(Some(&mut *neighbor.get_mut()), direction);
            }
        }

        let handle = MtResource::new(chunk);
        self.chunks.insert(key, handle.clone());
        trace!("Instantiated chunk {:?}", key);
        handle
    }

    /// Retrieves the chunk at column `key`.
    ///
    /// # Returns
    ///
    /// A clone of the chunk's handle, or `None` if no chunk exists there.
    pub fn get_chunk(&self, key: SpatialKey) -> Option<MtResource<Chunk>> {
        self.chunks.get(&key).cloned()
    }

    pub fn contains(&self, key: SpatialKey) -> bool {
        self.chunks.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    fn covering_chunk(&self, x: i32, y: i32, z: i32) -> Result<&MtResource<Chunk>, TerrainError> {
        self.chunks
            .get(&SpatialKey::chunk_containing(x, z))
            .ok_or(TerrainError::OutOfChunkRange { x, y, z })
    }

    /// Returns the block at world coordinates.
    ///
    /// # Returns
    ///
    /// `Err(OutOfChunkRange)` if no chunk covers the column. A `y` outside
    /// the world's vertical range reads as `Empty`.
    pub fn get_block_at(&self, x: i32, y: i32, z: i32) -> Result<BlockType, TerrainError> {
        let chunk = self.covering_chunk(x, y, z)?;
        let (origin_x, origin_z) = chunk_origin(x, z);
        Ok(chunk.get().get_block_at(x - origin_x, y, z - origin_z))
    }

    /// Writes the block at world coordinates and invalidates the affected
    /// meshes: the owning chunk's, and a linked neighbor's when the block sits
    /// on their shared border.
    ///
    /// Writes with `y` outside the world's vertical range are ignored.
    pub fn set_block_at(&self, x: i32, y: i32, z: i32, block_type: BlockType) -> Result<(), TerrainError> {
        let chunk = self.covering_chunk(x, y, z)?;
        if !(0..CHUNK_HEIGHT).contains(&y) {
            return Ok(());
        }

        let (origin_x, origin_z) = chunk_origin(x, z);
        let (local_x, local_z) = (x - origin_x, z - origin_z);
        let border_neighbors = {
            let mut chunk = chunk.get_mut();
            chunk.set_block_at(local_x, y, local_z, block_type);
            chunk.invalidate_mesh();
            border_directions(local_x, local_z)
                .into_iter()
                .flatten()
                .filter_map(|direction| chunk.neighbor(direction))
                .collect::<Vec<_>>()
        };

        for key in border_neighbors {
            if let Some(neighbor) = self.chunks.get(&key) {
                neighbor.get_mut().invalidate_mesh();
            }
        }
        Ok(())
    }

    /// Resolves the chunk at `key` and its linked neighbors into the inputs
    /// of a mesh build.
    pub fn mesh_source(&self, key: SpatialKey) -> Option<MeshSource> {
        let center = self.chunks.get(&key)?.clone();
        let links = {
            let chunk = center.get();
            Direction::all().map(|direction| chunk.neighbor(direction))
        };
        let neighbors = links.map(|link| link.and_then(|key| self.chunks.get(&key).cloned()));
        Some(MeshSource::new(center, neighbors))
    }
}

fn chunk_origin(x: i32, z: i32) -> (i32, i32) {
    SpatialKey::chunk_containing(x, z).decode()
}

/// Directions of the chunk borders a local column touches.
fn border_directions(local_x: i32, local_z: i32) -> [Option<Direction>; 2] {
    let along_x = match local_x {
        0 => Some(Direction::XNeg),
        x if x == CHUNK_WIDTH - 1 => Some(Direction::XPos),
        _ => None,
    };
    let along_z = match local_z {
        0 => Some(Direction::ZNeg),
        z if z == CHUNK_WIDTH - 1 => Some(Direction::ZPos),
        _ => None,
    };
    [along_x, along_z]
}
