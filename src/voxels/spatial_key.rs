//! # Spatial Keys
//!
//! Chunk columns and zones are identified by the world-space block
//! coordinates of their origin. `SpatialKey` packs such an `(x, z)` pair into
//! a single `i64` so it can serve as a hash map key: `x` lives in the high
//! 32 bits and `z` in the low 32 bits.
//!
//! Decoding sign-extends the low word explicitly, so negative `z` values
//! survive the round trip.

use std::fmt;

use super::chunk::CHUNK_WIDTH;

/// Width and depth of a generation zone in blocks (4x4 chunks).
pub const ZONE_WIDTH: i32 = 64;

/// A 64-bit bijective encoding of a 2D integer origin.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpatialKey(i64);

impl SpatialKey {
    /// Packs `x` into the high word and `z` into the low word.
    pub fn encode(x: i32, z: i32) -> Self {
        let high = (x as i64) << 32;
        let low = (z as u32) as i64;
        SpatialKey(high | low)
    }

    /// Splits the key back into its `(x, z)` pair.
    pub fn decode(self) -> (i32, i32) {
        let x = (self.0 >> 32) as i32;
        let low = self.0 & 0xFFFF_FFFF;
        let z = if low & 0x8000_0000 != 0 {
            (low | !0xFFFF_FFFF) as i32
        } else {
            low as i32
        };
        (x, z)
    }

    /// The raw packed value.
    pub fn raw(self) -> i64 {
        self.0
    }

    /// Key of the 16-aligned chunk column containing block column `(x, z)`.
    pub fn chunk_containing(x: i32, z: i32) -> Self {
        Self::encode(align_down(x, CHUNK_WIDTH), align_down(z, CHUNK_WIDTH))
    }

    /// Key of the 64-aligned zone containing block column `(x, z)`.
    pub fn zone_containing(x: i32, z: i32) -> Self {
        Self::encode(align_down(x, ZONE_WIDTH), align_down(z, ZONE_WIDTH))
    }

    /// Key of the zone this chunk column (or zone) key belongs to.
    pub fn zone(self) -> Self {
        let (x, z) = self.decode();
        Self::zone_containing(x, z)
    }

    /// Mixes the key into `seed`, giving every key its own reproducible
    /// random stream.
    pub fn mix_seed(self, seed: u64) -> u64 {
        seed ^ (self.0 as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
    }

    /// Key offset by whole `(dx, dz)` steps of `stride` blocks.
    pub fn offset(self, dx: i32, dz: i32, stride: i32) -> Self {
        let (x, z) = self.decode();
        Self::encode(x + dx * stride, z + dz * stride)
    }

    /// Like `offset`, but `None` when the result leaves the `i32` range.
    pub fn checked_offset(self, dx: i32, dz: i32, stride: i32) -> Option<Self> {
        let (x, z) = self.decode();
        let x = x.checked_add(dx.checked_mul(stride)?)?;
        let z = z.checked_add(dz.checked_mul(stride)?)?;
        Some(Self::encode(x, z))
    }
}

/// Rounds `value` down to a multiple of `step`, also for negative values.
pub fn align_down(value: i32, step: i32) -> i32 {
    value.div_euclid(step) * step
}

impl fmt::Debug for SpatialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (x, z) = self.decode();
        write!(f, "SpatialKey({x}, {z})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_mixed_signs() {
        assert_eq!(SpatialKey::encode(5, -3).decode(), (5, -3));
    }

    #[test]
    fn round_trips_extremes() {
        let samples = [i32::MIN, -65, -1, 0, 1, 16, 64, i32::MAX];
        for &x in &samples {
            for &z in &samples {
                assert_eq!(SpatialKey::encode(x, z).decode(), (x, z));
            }
        }
    }

    #[test]
    fn distinct_pairs_get_distinct_keys() {
        assert_ne!(SpatialKey::encode(0, -1), SpatialKey::encode(-1, 0));
        assert_ne!(SpatialKey::encode(1, 0), SpatialKey::encode(0, 1));
    }

    #[test]
    fn containing_keys_round_toward_negative_infinity() {
        assert_eq!(SpatialKey::chunk_containing(-1, 17).decode(), (-16, 16));
        assert_eq!(SpatialKey::zone_containing(-1, 63).decode(), (-64, 0));
        assert_eq!(SpatialKey::encode(-48, 80).zone().decode(), (-64, 64));
    }

    #[test]
    fn offset_steps_by_stride() {
        let key = SpatialKey::encode(16, -16);
        assert_eq!(key.offset(-1, 2, CHUNK_WIDTH).decode(), (0, 16));
    }

    #[test]
    fn checked_offset_stops_at_the_edge_of_the_range() {
        let edge = SpatialKey::zone_containing(i32::MAX, i32::MIN);
        assert_eq!(edge.checked_offset(1, 0, ZONE_WIDTH), None);
        assert_eq!(edge.checked_offset(0, -1, ZONE_WIDTH), None);
        assert_eq!(
            edge.checked_offset(-1, 1, ZONE_WIDTH).map(SpatialKey::decode),
            Some((i32::MAX - 127, i32::MIN + 64))
        );
    }

    #[test]
    fn keys_mix_into_distinct_seeds() {
        let a = SpatialKey::encode(0, 16);
        let b = SpatialKey::encode(16, 0);
        assert_ne!(a.mix_seed(7), b.mix_seed(7));
        assert_eq!(a.mix_seed(7), a.mix_seed(7));
    }
}
