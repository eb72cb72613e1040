//! Generation state of every zone the streamer has seen.
//!
//! A zone is `Unseen` until dispatched, `Pending` while its chunks are being
//! generated and meshed, and `Complete` once all 16 chunks have been merged.
//! A zone is in at most one of the pending and complete sets, and
//! `Pending -> Complete` happens exactly once.

use std::collections::{HashMap, HashSet};

use crate::voxels::{chunk::zone_volume::CHUNKS_PER_ZONE, spatial_key::SpatialKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneState {
    Unseen,
    Pending,
    Complete,
}

#[derive(Debug, Default)]
pub struct ZoneTracker {
    pending: HashSet<SpatialKey>,
    complete: HashSet<SpatialKey>,
    /// Distinct chunks of each pending zone merged so far.
    meshed: HashMap<SpatialKey, HashSet<SpatialKey>>,
}

impl ZoneTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, zone: SpatialKey) -> ZoneState {
        if self.complete.contains(&zone) {
            ZoneState::Complete
        } else if self.pending.contains(&zone) {
            ZoneState::Pending
        } else {
            ZoneState::Unseen
        }
    }

    /// Marks an unseen zone pending. Returns `false` if the zone was already
    /// pending or complete.
    pub fn mark_pending(&mut self, zone: SpatialKey) -> bool {
        if self.state(zone) != ZoneState::Unseen {
            return false;
        }
        self.pending.insert(zone)
    }

    /// Marks a zone complete without going through the pipeline. Used for
    /// eagerly generated zones.
    pub fn mark_complete(&mut self, zone: SpatialKey) {
        self.pending.remove(&zone);
        self.meshed.remove(&zone);
        self.complete.insert(zone);
    }

    /// Records that `chunk`'s mesh has been merged.
    ///
    /// # Returns
    /// `true` exactly when this call promotes the chunk's zone to complete.
    /// Repeated chunks and chunks of zones that are not pending never count.
    pub fn record_meshed(&mut self, chunk: SpatialKey) -> bool {
        let zone = chunk.zone();
        if !self.pending.contains(&zone) {
            return false;
        }

        let meshed = self.meshed.entry(zone).or_default();
        meshed.insert(chunk);
        if meshed.len() < CHUNKS_PER_ZONE {
            return false;
        }

        self.meshed.remove(&zone);
        self.pending.remove(&zone);
        self.complete.insert(zone);
        true
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn complete_count(&self) -> usize {
        self.complete.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxels::chunk::zone_volume::ZoneVolume;

    #[test]
    fn zones_promote_once_all_chunks_are_meshed() {
        let mut tracker = ZoneTracker::new();
        let zone = SpatialKey::encode(64, -64);
        assert_eq!(tracker.state(zone), ZoneState::Unseen);
        assert!(tracker.mark_pending(zone));
        assert!(!tracker.mark_pending(zone));

        let keys: Vec<_> = ZoneVolume::chunk_keys(zone).collect();
        for key in &keys[..15] {
            assert!(!tracker.record_meshed(*key));
            assert_eq!(tracker.state(zone), ZoneState::Pending);
        }
        assert!(tracker.record_meshed(keys[15]));
        assert_eq!(tracker.state(zone), ZoneState::Complete);
        assert_eq!(tracker.pending_count(), 0);

        assert!(!tracker.record_meshed(keys[15]));
        assert!(!tracker.mark_pending(zone));
        assert_eq!(tracker.complete_count(), 1);
    }

    #[test]
    fn duplicate_results_do_not_promote_early() {
        let mut tracker = ZoneTracker::new();
        let zone = SpatialKey::encode(0, 0);
        tracker.mark_pending(zone);
        let first = ZoneVolume::chunk_keys(zone).next().unwrap();
        for _ in 0..32 {
            assert!(!tracker.record_meshed(first));
        }
        assert_eq!(tracker.state(zone), ZoneState::Pending);
    }

    #[test]
    fn results_for_unknown_zones_are_ignored() {
        let mut tracker = ZoneTracker::new();
        assert!(!tracker.record_meshed(SpatialKey::encode(16, 16)));
        assert_eq!(tracker.state(SpatialKey::encode(0, 0)), ZoneState::Unseen);
    }
}
