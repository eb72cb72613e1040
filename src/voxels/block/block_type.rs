//! # Block Type Module
//!
//! This module defines the different types of blocks in the voxel world.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use super::BlockTypeSize;

/// Enumerates all possible block types in the voxel world.
///
/// Stored one byte per cell. The `FromPrimitive` derive allows conversion
/// back from the compact representation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, FromPrimitive)]
#[repr(u8)]
pub enum BlockType {
    /// No geometry, fully see-through.
    #[default]
    Empty,
    Grass,
    Dirt,
    Stone,
    Snow,
    Sand,
    /// Liquid, rendered in the transparent stream.
    Water,
    /// Liquid, rendered in the transparent stream.
    Lava,
    OreA,
    OreB,
    OreC,
    OreD,
}

impl BlockType {
    /// Converts a `BlockTypeSize` back to a `BlockType`.
    ///
    /// # Returns
    /// `None` if the value does not name a block type.
    pub fn from_int(btype: BlockTypeSize) -> Option<Self> {
        FromPrimitive::from_u8(btype)
    }

    /// Liquids are transparent: faces behind them stay visible.
    pub fn is_transparent(self) -> bool {
        matches!(self, BlockType::Water | BlockType::Lava)
    }

    pub fn is_empty(self) -> bool {
        self == BlockType::Empty
    }
}
