//! # Biome Map
//!
//! A sparse, lazily populated map from chunk-column key to the column's biome
//! and its anchor point. Anchors are jittered column centers; the terrain
//! generator blends a column toward a neighbor's biome when the neighbor's
//! anchor is nearly as close as its own.
//!
//! ## Concurrency
//!
//! Generation workers share one `BiomeMap`. The miss path (roll an entry,
//! insert it, pre-fill the surrounding columns) runs under a single lock, so
//! two workers can never roll the same column twice. Entries are immutable
//! once inserted.

use std::collections::HashMap;

use cgmath::Vector2;
use parking_lot::Mutex;

use crate::{
    config::BiomeLookahead,
    voxels::{chunk::CHUNK_WIDTH, spatial_key::SpatialKey},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Biome {
    Desert,
    Tundra,
    Grassland,
    Mountain,
}

impl Biome {
    pub fn all() -> [Biome; 4] {
        [Biome::Desert, Biome::Tundra, Biome::Grassland, Biome::Mountain]
    }

    /// Picks one of the four kinds uniformly.
    pub fn random(rng: &mut fastrand::Rng) -> Biome {
        Biome::all()[rng.usize(0..4)]
    }
}

/// A column's biome and the point it radiates from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiomeEntry {
    pub anchor: Vector2<f32>,
    pub biome: Biome,
}

/// Offsets (in columns) of the eight columns surrounding a column.
pub const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

const DIAGONAL_OFFSETS: [(i32, i32); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// Maximum distance of an anchor from its column center along each axis.
const ANCHOR_JITTER: f32 = 4.0;

/// Separates biome rolls from the zone streams, which share keys with columns.
const BIOME_STREAM: u64 = 0xB10E_5EED;

struct BiomeMapState {
    entries: HashMap<SpatialKey, BiomeEntry>,
    seed: u64,
}

impl BiomeMapState {
    fn get_or_roll(&mut self, column: SpatialKey) -> BiomeEntry {
        if let Some(entry) = self.entries.get(&column) {
            return *entry;
        }
        let mut rng = fastrand::Rng::with_seed(column.mix_seed(self.seed ^ BIOME_STREAM));
        let (x, z) = column.decode();
        let half = CHUNK_WIDTH as f32 / 2.0;
        let anchor = Vector2::new(
            x as f32 + half + (rng.f32() * 2.0 - 1.0) * ANCHOR_JITTER,
            z as f32 + half + (rng.f32() * 2.0 - 1.0) * ANCHOR_JITTER,
        );
        let entry = BiomeEntry {
            anchor,
            biome: Biome::random(&mut rng),
        };
        self.entries.insert(column, entry);
        entry
    }
}

pub struct BiomeMap {
    state: Mutex<BiomeMapState>,
    lookahead: BiomeLookahead,
}

impl BiomeMap {
    /// Creates an empty map. Each column's roll is drawn from `seed` mixed
    /// with the column key, so entries do not depend on lookup order.
    pub fn new(seed: u64, lookahead: BiomeLookahead) -> Self {
        BiomeMap {
            state: Mutex::new(BiomeMapState {
                entries: HashMap::new(),
                seed,
            }),
            lookahead,
        }
    }

    /// Returns the entry for `column`, rolling it on first use.
    ///
    /// Every call also makes sure the surrounding columns selected by the
    /// lookahead policy have entries, without re-rolling existing ones.
    pub fn get_biome(&self, column: SpatialKey) -> BiomeEntry {
        let offsets: &[(i32, i32)] = match self.lookahead {
            BiomeLookahead::Full => &NEIGHBOR_OFFSETS,
            BiomeLookahead::Diagonal => &DIAGONAL_OFFSETS,
        };

        let mut state = self.state.lock();
        let entry = state.get_or_roll(column);
        for neighbor in offsets
            .iter()
            .filter_map(|&(dx, dz)| column.checked_offset(dx, dz, CHUNK_WIDTH))
        {
            state.get_or_roll(neighbor);
        }
        entry
    }

    /// Returns the entry for `column` if one exists, never inserting.
    pub fn peek(&self, column: SpatialKey) -> Option<BiomeEntry> {
        self.state.lock().entries.get(&column).copied()
    }

    /// Entries of the eight columns around `column` that exist so far.
    pub fn neighbors_of(&self, column: SpatialKey) -> Vec<BiomeEntry> {
        let state = self.state.lock();
        NEIGHBOR_OFFSETS
            .iter()
            .filter_map(|&(dx, dz)| column.checked_offset(dx, dz, CHUNK_WIDTH))
            .filter_map(|neighbor| state.entries.get(&neighbor).copied())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn first_lookup_fills_all_neighbors() {
        let map = BiomeMap::new(1, BiomeLookahead::Full);
        let column = SpatialKey::encode(32, -16);
        map.get_biome(column);
        assert_eq!(map.len(), 9);
        for (dx, dz) in NEIGHBOR_OFFSETS {
            assert!(map.peek(column.offset(dx, dz, CHUNK_WIDTH)).is_some());
        }
        assert_eq!(map.neighbors_of(column).len(), 8);
    }

    #[test]
    fn diagonal_lookahead_skips_cardinal_neighbors() {
        let map = BiomeMap::new(1, BiomeLookahead::Diagonal);
        let column = SpatialKey::encode(0, 0);
        map.get_biome(column);
        assert_eq!(map.len(), 5);
        assert!(map.peek(column.offset(1, 1, CHUNK_WIDTH)).is_some());
        assert!(map.peek(column.offset(1, 0, CHUNK_WIDTH)).is_none());
    }

    #[test]
    fn entries_never_reroll() {
        let map = BiomeMap::new(9, BiomeLookahead::Full);
        let column = SpatialKey::encode(0, 0);
        let neighbor = column.offset(1, 1, CHUNK_WIDTH);
        let first = map.get_biome(column);
        let neighbor_first = map.peek(neighbor).unwrap();

        assert_eq!(map.get_biome(column), first);
        assert_eq!(map.get_biome(neighbor), neighbor_first);
    }

    #[test]
    fn anchors_stay_near_the_column_center() {
        let map = BiomeMap::new(3, BiomeLookahead::Full);
        for i in -4..4 {
            let column = SpatialKey::encode(i * 16, -i * 16);
            let entry = map.get_biome(column);
            let (x, z) = column.decode();
            assert!((entry.anchor.x - (x as f32 + 8.0)).abs() <= ANCHOR_JITTER);
            assert!((entry.anchor.y - (z as f32 + 8.0)).abs() <= ANCHOR_JITTER);
        }
    }

    #[test]
    fn entries_do_not_depend_on_lookup_order() {
        let near = SpatialKey::encode(0, 0);
        let far = SpatialKey::encode(160, 160);

        let forward = BiomeMap::new(42, BiomeLookahead::Full);
        forward.get_biome(near);
        forward.get_biome(far);

        let reverse = BiomeMap::new(42, BiomeLookahead::Full);
        reverse.get_biome(far);
        reverse.get_biome(near);

        assert_eq!(forward.peek(near), reverse.peek(near));
        assert_eq!(forward.peek(far), reverse.peek(far));
        assert_eq!(forward.len(), reverse.len());
    }

    #[test]
    fn concurrent_lookups_agree() {
        let map = Arc::new(BiomeMap::new(5, BiomeLookahead::Full));
        let column = SpatialKey::encode(64, 64);
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let map = map.clone();
                thread::spawn(move || map.get_biome(column))
            })
            .collect();
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(results.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(map.len(), 9);
    }
}
