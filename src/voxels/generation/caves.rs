//! # Caves and Ore Veins
//!
//! Carves a cave pocket into a zone volume inside a 12-block band above a
//! lava floor: 3D gradient noise hollows out the pocket, ore stalactites hang
//! from its ceiling, two tunnel walls are studded with ore, and a short
//! side tunnel is broken open toward the zone's far edge.
//!
//! All x/z positions are zone-local. The noise is sampled at world
//! coordinates so neighboring zones never repeat the same pocket.

use noise::NoiseFn;

use super::noise_field::GradientNoise;
use crate::voxels::{block::block_type::BlockType, chunk::BlockVolume};

/// Height of the cave band above its floor.
pub const CAVE_BAND: i32 = 12;
/// Pocket cells with `|noise|` below this are hollowed out.
const HOLLOW_THRESHOLD: f64 = 0.1;

fn vein_ore(roll: u32) -> BlockType {
    match roll {
        0 => BlockType::OreB,
        1 => BlockType::OreC,
        _ => BlockType::OreD,
    }
}

/// Carves the pocket, ore veins, lava floor and side tunnel with the floor at
/// `floor`.
pub fn carve_caves<V: BlockVolume>(volume: &mut V, floor: i32, rng: &mut fastrand::Rng) {
    hollow_pocket(volume, floor);
    hang_stalactites(volume, floor, rng);
    line_tunnel_walls(volume, floor, rng);
    stud_end_walls(volume, floor, rng);
    flood_floor(volume, floor);
    open_side_tunnel(volume, floor, rng);
}

fn hollow_pocket<V: BlockVolume>(volume: &mut V, floor: i32) {
    let source = GradientNoise;
    let (origin_x, origin_z) = volume.origin();
    let extent = volume.width();
    let scale = extent as f64;

    for x in 8..28 {
        for z in 18..extent {
            for y in floor..floor + CAVE_BAND {
                let sample = source.get([
                    (origin_x + x) as f64 / scale,
                    y as f64 / CAVE_BAND as f64,
                    (origin_z + z) as f64 / scale,
                ]);
                if sample.abs() < HOLLOW_THRESHOLD {
                    volume.set_block(x, y, z, BlockType::Empty);
                }
            }
        }
    }
}

fn hang_stalactites<V: BlockVolume>(volume: &mut V, floor: i32, rng: &mut fastrand::Rng) {
    let ceiling = floor + CAVE_BAND;
    for x in 10..28 {
        for z in 20..30 {
            let length = rng.i32(0..8);
            if rng.u32(0..3) == 0 {
                for k in 0..length {
                    volume.set_block(x, ceiling - k, z, BlockType::OreA);
                }
            }
        }
    }
}

fn line_tunnel_walls<V: BlockVolume>(volume: &mut V, floor: i32, rng: &mut fastrand::Rng) {
    for x in 8..28 {
        for y in floor + 2..floor + CAVE_BAND {
            let shape = rng.u32(0..4);
            let ore = rng.u32(0..4);
            match shape {
                0 => {
                    volume.set_block(x, y, 17, BlockType::Empty);
                    match ore {
                        0 | 1 => volume.set_block(x, y, 16, vein_ore(ore)),
                        _ => volume.set_block(x, y, 19, BlockType::OreD),
                    }
                }
                1 => volume.set_block(x, y, 18, BlockType::Stone),
                2 => {
                    volume.set_block(x, y, 18, BlockType::Stone);
                    volume.set_block(x, y, 19, vein_ore(ore));
                }
                _ => {}
            }
        }
    }
}

fn stud_end_walls<V: BlockVolume>(volume: &mut V, floor: i32, rng: &mut fastrand::Rng) {
    for z in 18..28 {
        for y in floor..floor + CAVE_BAND - 2 {
            let near = rng.u32(0..3);
            let ore = rng.u32(0..3);
            let far = rng.u32(0..3);
            match near {
                0 => volume.set_block(7, y, z, vein_ore(ore)),
                1 => volume.set_block(7, y, z, BlockType::Empty),
                _ => {}
            }
            match far {
                1 => volume.set_block(28, y, z, vein_ore(ore)),
                2 => {
                    volume.set_block(28, y, z, BlockType::Empty);
                    volume.set_block(29, y, z, vein_ore(ore));
                }
                _ => volume.set_block(28, y, z, BlockType::Empty),
            }
        }
    }
}

fn flood_floor<V: BlockVolume>(volume: &mut V, floor: i32) {
    for x in 8..28 {
        for z in 18..28 {
            if volume.block(x, floor, z) != BlockType::Stone {
                volume.set_block(x, floor, z, BlockType::Lava);
            }
        }
    }
}

fn open_side_tunnel<V: BlockVolume>(volume: &mut V, floor: i32, rng: &mut fastrand::Rng) {
    for x in 8..28 {
        for z in 28..36 {
            if rng.u32(0..3) == 0 {
                for k in 0..4 {
                    volume.set_block(x, floor + 2 + k, z, BlockType::Empty);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxels::{chunk::zone_volume::ZoneVolume, spatial_key::SpatialKey};

    fn solid_zone(x: i32, z: i32) -> ZoneVolume {
        let mut volume = ZoneVolume::new(SpatialKey::encode(x, z));
        for x in 0..64 {
            for z in 0..64 {
                for y in 0..120 {
                    volume.set_block(x, y, z, BlockType::Stone);
                }
            }
        }
        volume
    }

    #[test]
    fn everything_stays_inside_the_band() {
        let mut volume = solid_zone(0, 0);
        let mut rng = fastrand::Rng::with_seed(4);
        carve_caves(&mut volume, 84, &mut rng);
        for x in 0..64 {
            for z in 0..64 {
                for y in (0..84).chain(97..120) {
                    assert_eq!(volume.block(x, y, z), BlockType::Stone, "({x}, {y}, {z})");
                }
            }
        }
    }

    #[test]
    fn floor_is_stone_or_lava_under_the_pocket() {
        let mut volume = solid_zone(64, -64);
        let mut rng = fastrand::Rng::with_seed(8);
        carve_caves(&mut volume, 84, &mut rng);
        for x in 8..28 {
            for z in 18..28 {
                let floor = volume.block(x, 84, z);
                assert!(matches!(floor, BlockType::Stone | BlockType::Lava));
            }
        }
    }

    #[test]
    fn hollowed_cells_match_the_noise() {
        let mut volume = solid_zone(0, 0);
        hollow_pocket(&mut volume, 84);
        let mut hollow = 0;
        for x in 8..28 {
            for z in 18..64 {
                for y in 84..96 {
                    let sample = GradientNoise.get([x as f64 / 64.0, y as f64 / 12.0, z as f64 / 64.0]);
                    let empty = volume.block(x, y, z) == BlockType::Empty;
                    assert_eq!(empty, sample.abs() < HOLLOW_THRESHOLD, "({x}, {y}, {z})");
                    if empty {
                        hollow += 1;
                    }
                }
            }
        }
        assert!(hollow > 0);
    }

    #[test]
    fn veins_contain_ore() {
        let mut volume = solid_zone(0, 0);
        let mut rng = fastrand::Rng::with_seed(21);
        carve_caves(&mut volume, 84, &mut rng);
        let mut ores = 0;
        for x in 0..64 {
            for z in 0..64 {
                for y in 84..97 {
                    if matches!(
                        volume.block(x, y, z),
                        BlockType::OreA | BlockType::OreB | BlockType::OreC | BlockType::OreD
                    ) {
                        ores += 1;
                    }
                }
            }
        }
        assert!(ores > 0);
    }
}
