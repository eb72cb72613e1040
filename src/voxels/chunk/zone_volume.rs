//! A private 64x256x64 scratch volume covering one zone's 4x4 chunks.
//!
//! Generation fills a `ZoneVolume` without touching any shared chunk, then
//! commits each 16x16 column into its chunk with a single block-array swap.
//! Zone-wide features (rivers, caves) can therefore cross chunk borders
//! freely while no chunk lock is held.

use crate::voxels::{
    block::block_type::BlockType,
    spatial_key::{SpatialKey, ZONE_WIDTH},
};

use super::{block_index, BlockVolume, CHUNK_VOLUME, CHUNK_WIDTH};

/// Chunks along one side of a zone.
pub const CHUNKS_PER_ZONE_SIDE: i32 = ZONE_WIDTH / CHUNK_WIDTH;
/// Chunks in one zone.
pub const CHUNKS_PER_ZONE: usize = (CHUNKS_PER_ZONE_SIDE * CHUNKS_PER_ZONE_SIDE) as usize;

pub struct ZoneVolume {
    zone: SpatialKey,
    columns: Vec<Vec<BlockType>>,
}

impl ZoneVolume {
    /// Creates an all-`Empty` volume for the zone with key `zone`.
    pub fn new(zone: SpatialKey) -> Self {
        ZoneVolume {
            zone,
            columns: vec![vec![BlockType::Empty; CHUNK_VOLUME]; CHUNKS_PER_ZONE],
        }
    }

    pub fn zone(&self) -> SpatialKey {
        self.zone
    }

    /// Keys of the zone's chunks in commit order.
    pub fn chunk_keys(zone: SpatialKey) -> impl Iterator<Item = SpatialKey> {
        (0..CHUNKS_PER_ZONE_SIDE).flat_map(move |cz| {
            (0..CHUNKS_PER_ZONE_SIDE).map(move |cx| zone.offset(cx, cz, CHUNK_WIDTH))
        })
    }

    /// Consumes the volume, yielding each chunk key with its block array.
    pub fn into_chunks(self) -> impl Iterator<Item = (SpatialKey, Vec<BlockType>)> {
        Self::chunk_keys(self.zone).zip(self.columns)
    }

    fn locate(x: i32, y: i32, z: i32) -> Option<(usize, usize)> {
        if !(0..ZONE_WIDTH).contains(&x) || !(0..ZONE_WIDTH).contains(&z) {
            return None;
        }
        let column = (x / CHUNK_WIDTH + CHUNKS_PER_ZONE_SIDE * (z / CHUNK_WIDTH)) as usize;
        let index = block_index(x % CHUNK_WIDTH, y, z % CHUNK_WIDTH)?;
        Some((column, index))
    }
}

impl BlockVolume for ZoneVolume {
    fn block(&self, x: i32, y: i32, z: i32) -> BlockType {
        match Self::locate(x, y, z) {
            Some((column, index)) => self.columns[column][index],
            None => BlockType::Empty,
        }
    }

    fn set_block(&mut self, x: i32, y: i32, z: i32, block_type: BlockType) {
        if let Some((column, index)) = Self::locate(x, y, z) {
            self.columns[column][index] = block_type;
        }
    }

    fn width(&self) -> i32 {
        ZONE_WIDTH
    }

    fn origin(&self) -> (i32, i32) {
        self.zone.decode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_keys_cover_the_zone_once() {
        let keys: Vec<_> = ZoneVolume::chunk_keys(SpatialKey::encode(-64, 128)).collect();
        assert_eq!(keys.len(), CHUNKS_PER_ZONE);
        assert_eq!(keys[0].decode(), (-64, 128));
        assert_eq!(keys[1].decode(), (-48, 128));
        assert_eq!(keys[4].decode(), (-64, 144));
        assert_eq!(keys[15].decode(), (-16, 176));
    }

    #[test]
    fn writes_land_in_the_owning_chunk() {
        let mut volume = ZoneVolume::new(SpatialKey::encode(0, 0));
        volume.set_block(17, 5, 33, BlockType::Sand);
        volume.set_block(64, 5, 0, BlockType::Sand);
        assert_eq!(volume.block(17, 5, 33), BlockType::Sand);
        assert_eq!(volume.block(-1, 5, 0), BlockType::Empty);

        let chunks: Vec<_> = volume.into_chunks().collect();
        let (key, blocks) = &chunks[1 + 4 * 2];
        assert_eq!(key.decode(), (16, 32));
        let index = block_index(1, 5, 1).unwrap();
        assert_eq!(blocks[index], BlockType::Sand);
        let total: usize = chunks
            .iter()
            .map(|(_, blocks)| blocks.iter().filter(|b| **b == BlockType::Sand).count())
            .sum();
        assert_eq!(total, 1);
    }
}
