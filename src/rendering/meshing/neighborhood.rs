//! Block lookups across chunk borders for the mesher.
//!
//! A face on a chunk border is culled against the adjacent chunk's facing
//! slice. Those slices are copied out of the neighbors before the center
//! chunk is locked, so a mesh build never holds more than one chunk lock.

use crate::{
    core::MtResource,
    voxels::{
        block::{block_type::BlockType, direction::Direction},
        chunk::{Chunk, CHUNK_HEIGHT, CHUNK_WIDTH},
    },
};

use super::ChunkMesh;

/// The 16x256 slice of a chunk that faces a neighbor.
#[derive(Debug, Clone, PartialEq)]
pub struct BorderPlane {
    blocks: Vec<BlockType>,
}

impl BorderPlane {
    /// Copies the slice of `neighbor` that touches a chunk lying in
    /// `direction` from it, i.e. the neighbor's side facing `direction.opposite()`.
    ///
    /// Returns `None` for vertical directions, which never have neighbors.
    pub fn capture(neighbor: &Chunk, direction: Direction) -> Option<Self> {
        let fixed = match direction {
            Direction::XPos | Direction::ZPos => 0,
            Direction::XNeg | Direction::ZNeg => CHUNK_WIDTH - 1,
            Direction::YPos | Direction::YNeg => return None,
        };

        let mut blocks = Vec::with_capacity((CHUNK_WIDTH * CHUNK_HEIGHT) as usize);
        for y in 0..CHUNK_HEIGHT {
            for along in 0..CHUNK_WIDTH {
                let block = match direction {
                    Direction::XPos | Direction::XNeg => neighbor.get_block_at(fixed, y, along),
                    _ => neighbor.get_block_at(along, y, fixed),
                };
                blocks.push(block);
            }
        }
        Some(BorderPlane { blocks })
    }

    fn get(&self, along: i32, y: i32) -> BlockType {
        self.blocks[(along + CHUNK_WIDTH * y) as usize]
    }
}

/// A chunk together with the border planes of its linked neighbors.
pub struct ChunkNeighborhood<'a> {
    center: &'a Chunk,
    borders: [Option<BorderPlane>; 6],
}

impl<'a> ChunkNeighborhood<'a> {
    /// A neighborhood with no neighbors: every cell past a side is `Empty`.
    pub fn isolated(center: &'a Chunk) -> Self {
        ChunkNeighborhood {
            center,
            borders: Default::default(),
        }
    }

    pub fn new(center: &'a Chunk, borders: [Option<BorderPlane>; 6]) -> Self {
        ChunkNeighborhood { center, borders }
    }

    /// Attaches `neighbor` as the chunk lying in `direction`.
    pub fn with_neighbor(mut self, direction: Direction, neighbor: &Chunk) -> Self {
        self.borders[direction.index()] = BorderPlane::capture(neighbor, direction);
        self
    }

    pub fn center(&self) -> &Chunk {
        self.center
    }

    /// The block at chunk-local coordinates, reading one cell past a
    /// horizontal side through that side's neighbor. Cells outside the world
    /// height or past a side without a neighbor are `Empty`.
    pub fn block_at(&self, x: i32, y: i32, z: i32) -> BlockType {
        if !(0..CHUNK_HEIGHT).contains(&y) {
            return BlockType::Empty;
        }
        let (direction, along) = match (x, z) {
            (x, z) if x < 0 => (Direction::XNeg, z),
            (x, z) if x >= CHUNK_WIDTH => (Direction::XPos, z),
            (x, z) if z < 0 => (Direction::ZNeg, x),
            (x, z) if z >= CHUNK_WIDTH => (Direction::ZPos, x),
            _ => return self.center.get_block_at(x, y, z),
        };
        if !(0..CHUNK_WIDTH).contains(&along) {
            return BlockType::Empty;
        }
        match &self.borders[direction.index()] {
            Some(plane) => plane.get(along, y),
            None => BlockType::Empty,
        }
    }
}

/// Everything a background mesh build needs: the chunk and the handles of
/// its linked neighbors, indexed by direction.
///
/// The center's revision is recorded before any block is read. An edit that
/// lands during the build bumps the chunk past it, so the result can be
/// recognised as stale.
pub struct MeshSource {
    center: MtResource<Chunk>,
    neighbors: [Option<MtResource<Chunk>>; 6],
    revision: u64,
}

impl MeshSource {
    pub fn new(center: MtResource<Chunk>, neighbors: [Option<MtResource<Chunk>>; 6]) -> Self {
        let revision = center.get().revision();
        MeshSource {
            center,
            neighbors,
            revision,
        }
    }

    pub fn center(&self) -> &MtResource<Chunk> {
        &self.center
    }

    /// Revision of the center chunk when this source was resolved.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Builds the center chunk's mesh.
    ///
    /// Each neighbor is locked only while its border plane is copied, then
    /// the center is read-locked for the build itself.
    pub fn build(&self) -> ChunkMesh {
        let mut borders: [Option<BorderPlane>; 6] = Default::default();
        for direction in Direction::horizontal() {
            if let Some(neighbor) = &self.neighbors[direction.index()] {
                borders[direction.index()] = BorderPlane::capture(&neighbor.get(), direction);
            }
        }

        let center = self.center.get();
        ChunkMesh::build(&ChunkNeighborhood::new(&center, borders))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxels::spatial_key::SpatialKey;

    #[test]
    fn reads_cross_into_linked_neighbors() {
        let center = Chunk::new(SpatialKey::encode(0, 0));
        let mut east = Chunk::new(SpatialKey::encode(16, 0));
        let mut north = Chunk::new(SpatialKey::encode(0, -16));
        east.set_block_at(0, 40, 7, BlockType::Lava);
        north.set_block_at(3, 41, 15, BlockType::Sand);

        let neighborhood = ChunkNeighborhood::isolated(&center)
            .with_neighbor(Direction::XPos, &east)
            .with_neighbor(Direction::ZNeg, &north);

        assert_eq!(neighborhood.block_at(16, 40, 7), BlockType::Lava);
        assert_eq!(neighborhood.block_at(3, 41, -1), BlockType::Sand);
        assert_eq!(neighborhood.block_at(-1, 40, 7), BlockType::Empty);
        assert_eq!(neighborhood.block_at(16, 256, 7), BlockType::Empty);
    }

    #[test]
    fn vertical_directions_have_no_plane() {
        let chunk = Chunk::new(SpatialKey::encode(0, 0));
        assert!(BorderPlane::capture(&chunk, Direction::YPos).is_none());
        assert!(BorderPlane::capture(&chunk, Direction::ZNeg).is_some());
    }
}
