//! The hand-tuned scene at the world origin.
//!
//! Zone `(0, 0)` gets a blend of grassland and mountain height fields over a
//! stone base, a river at y=128 with graded banks, and a cave pocket whose
//! lava floor sits at y=154. It is generated eagerly on the calling thread.

use cgmath::Vector2;

use super::{
    caves::carve_caves,
    noise_field::{fractal_perlin, grassland_height, perlin, smoothstep},
    river::{carve_bank_slopes, carve_river, trace_path},
};
use crate::voxels::{
    block::block_type::BlockType,
    chunk::{zone_volume::ZoneVolume, BlockVolume, CHUNK_HEIGHT},
};

pub const SEA_LEVEL: i32 = 128;
pub const CAVE_FLOOR: i32 = 154;
/// Mountain columns only get a snow cap above this height.
const SNOW_LINE: f32 = 172.0;
/// Blended columns topping out above this are rocky.
const ROCK_LINE: f32 = 150.0;

/// Fills `volume` with the test scene.
pub fn fill_test_scene(volume: &mut ZoneVolume, rng: &mut fastrand::Rng) {
    let extent = volume.width();
    for x in 0..extent {
        for z in 0..extent {
            fill_column(volume, x, z, rng);
        }
    }

    let path = trace_path(rng);
    carve_river(volume, &path, SEA_LEVEL);
    carve_bank_slopes(volume, SEA_LEVEL);
    carve_caves(volume, CAVE_FLOOR, rng);
}

fn fill_column(volume: &mut ZoneVolume, x: i32, z: i32, rng: &mut fastrand::Rng) {
    let extent = volume.width() as f32;
    let p = Vector2::new(x as f32 / extent, z as f32 / extent);
    let grass = grassland_height(p) * 32.0 + 110.0;
    let mountain = fractal_perlin(p) * 70.0 + 110.0;
    let mix = smoothstep(0.25, 0.75, 2.0 * perlin(p).abs());
    let blended = (1.0 - mix) * grass + mix * mountain;

    for y in 0..=SEA_LEVEL {
        volume.set_block(x, y, z, BlockType::Stone);
    }

    for y in SEA_LEVEL..CHUNK_HEIGHT {
        let fy = y as f32;
        if mix > 0.9 {
            if fy < mountain {
                volume.set_block(x, y, z, BlockType::Stone);
            } else if fy == mountain.ceil() && mountain.ceil() > SNOW_LINE {
                volume.set_block(x, y, z, BlockType::Snow);
            }
        } else if mix == 0.0 {
            cap_soil(volume, x, y, z, grass);
        } else if blended.ceil() > ROCK_LINE {
            let speckle = rng.u32(0..5) == 0;
            if fy < blended {
                let stone = !speckle || fy == blended.ceil() || fy < ROCK_LINE;
                let block = if stone { BlockType::Stone } else { BlockType::Dirt };
                volume.set_block(x, y, z, block);
            }
        } else {
            cap_soil(volume, x, y, z, blended);
        }
    }
}

/// Dirt below `height`, a grass cap on top, or water at sea level when the
/// column never rises above it.
fn cap_soil(volume: &mut ZoneVolume, x: i32, y: i32, z: i32, height: f32) {
    let fy = y as f32;
    if fy < height {
        volume.set_block(x, y, z, BlockType::Dirt);
    } else if fy == height.ceil() && y > SEA_LEVEL {
        volume.set_block(x, y, z, BlockType::Grass);
    } else if height.ceil() <= SEA_LEVEL as f32 {
        volume.set_block(x, SEA_LEVEL, z, BlockType::Water);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxels::spatial_key::SpatialKey;

    fn scene() -> ZoneVolume {
        let mut volume = ZoneVolume::new(SpatialKey::encode(0, 0));
        let mut rng = fastrand::Rng::with_seed(42);
        fill_test_scene(&mut volume, &mut rng);
        volume
    }

    #[test]
    fn base_is_solid_stone() {
        let volume = scene();
        for x in 0..64 {
            for z in 0..64 {
                for y in 0..SEA_LEVEL {
                    assert_eq!(volume.block(x, y, z), BlockType::Stone);
                }
            }
        }
    }

    #[test]
    fn surface_lies_above_sea_level() {
        let volume = scene();
        let mut surfaced = 0;
        for x in 0..64 {
            for z in 0..64 {
                if (SEA_LEVEL..CHUNK_HEIGHT).any(|y| volume.block(x, y, z) != BlockType::Empty) {
                    surfaced += 1;
                }
            }
        }
        assert_eq!(surfaced, 64 * 64);
    }

    #[test]
    fn scene_is_reproducible_from_its_seed() {
        let a: Vec<_> = scene().into_chunks().collect();
        let b: Vec<_> = scene().into_chunks().collect();
        assert!(a == b);
    }
}
