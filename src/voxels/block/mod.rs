//! # Block Module
//!
//! Block type definitions, face directions and the texture atlas lookup used
//! by the mesh builder.

use block_type::BlockType;
use direction::Direction;

pub mod block_type;
pub mod direction;

/// The underlying integer type used to represent block types in memory.
pub type BlockTypeSize = u8;

/// Width of one atlas cell in UV space (the atlas is a 16x16 grid).
pub const ATLAS_CELL: f32 = 1.0 / 16.0;

/// Atlas cell `(column, row)` for every block type and face direction.
///
/// The outer array is indexed by `BlockType as usize`, the inner one by
/// `Direction as usize`: [XPos, XNeg, YPos, YNeg, ZPos, ZNeg].
static BLOCK_TYPE_TO_ATLAS_CELLS: [[(u8, u8); 6]; 12] = [
    [(0, 0); 6],                                         // EMPTY (never meshed)
    [(3, 15), (3, 15), (8, 13), (2, 15), (3, 15), (3, 15)], // GRASS (top: 8/13, bottom: dirt)
    [(2, 15); 6],                                        // DIRT
    [(1, 15); 6],                                        // STONE
    [(2, 11); 6],                                        // SNOW
    [(2, 14); 6],                                        // SAND
    [(15, 3); 6],                                        // WATER
    [(15, 1); 6],                                        // LAVA
    [(2, 12); 6],                                        // ORE A
    [(3, 12); 6],                                        // ORE B
    [(0, 13); 6],                                        // ORE C
    [(1, 13); 6],                                        // ORE D
];

/// Returns the UV offset of the atlas cell textured onto the `direction` face
/// of a block of type `block_type`.
pub fn atlas_offset(block_type: BlockType, direction: Direction) -> [f32; 2] {
    let (column, row) = BLOCK_TYPE_TO_ATLAS_CELLS[block_type as usize][direction.index()];
    [column as f32 * ATLAS_CELL, row as f32 * ATLAS_CELL]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grass_has_distinct_top_and_bottom() {
        let top = atlas_offset(BlockType::Grass, Direction::YPos);
        let bottom = atlas_offset(BlockType::Grass, Direction::YNeg);
        let side = atlas_offset(BlockType::Grass, Direction::XPos);
        assert_eq!(top, [8.0 / 16.0, 13.0 / 16.0]);
        assert_eq!(bottom, atlas_offset(BlockType::Dirt, Direction::XPos));
        assert_ne!(side, top);
    }

    #[test]
    fn uniform_blocks_use_one_cell() {
        for direction in Direction::all() {
            assert_eq!(atlas_offset(BlockType::Lava, direction), [15.0 / 16.0, 1.0 / 16.0]);
        }
    }
}
