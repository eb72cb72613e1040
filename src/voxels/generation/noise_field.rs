//! # Noise Field
//!
//! Deterministic scalar noise used by every generation pass. All functions
//! here are pure: the same input always yields the same output, which is what
//! makes a world reproducible from its coordinates alone.
//!
//! ## Building Blocks
//!
//! * `hash1`/`hash2`/`hash3`: sine-dot-product hashes mapping a lattice point
//!   to pseudo-random values in `[0, 1)`
//! * `surflet`/`perlin`: gradient noise built from quintic-windowed
//!   contributions of the surrounding lattice points (4 in 2D, 8 in 3D)
//! * `interp_noise`/`fbm`: bilinear value noise and its 8-octave sum
//! * `fractal_perlin`: ridged 8-octave Perlin sum used for mountains
//! * `cell_noise`: Worley F2-F1 distance with Perlin-driven jitter
//! * `biome_height`: the canonical column height of the streamed world
//!
//! `GradientNoise` exposes the Perlin field through the `noise` crate's
//! `NoiseFn` trait so it can be sampled like any other noise source.
//!
//! ## Precision
//!
//! The hashes amplify rounding differences, so everything is computed in
//! `f32`. Switching to `f64` yields a different world.

use cgmath::{InnerSpace, Vector2, Vector3};
use noise::NoiseFn;

const HASH_SCALE: f32 = 43758.5453;

fn fract(x: f32) -> f32 {
    x - x.floor()
}

fn fract2(p: Vector2<f32>) -> Vector2<f32> {
    Vector2::new(fract(p.x), fract(p.y))
}

fn floor2(p: Vector2<f32>) -> Vector2<f32> {
    Vector2::new(p.x.floor(), p.y.floor())
}

fn mix(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Hermite interpolation of `x` between `edge0` and `edge1`, clamped to `[0, 1]`.
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

pub fn hash1(p: Vector2<f32>) -> f32 {
    fract(p.dot(Vector2::new(127.1, 311.7)).sin() * HASH_SCALE)
}

pub fn hash2(p: Vector2<f32>) -> Vector2<f32> {
    Vector2::new(
        fract(p.dot(Vector2::new(127.1, 311.7)).sin() * HASH_SCALE),
        fract(p.dot(Vector2::new(269.5, 183.3)).sin() * HASH_SCALE),
    )
}

pub fn hash3(p: Vector3<f32>) -> Vector3<f32> {
    let shifted = p - Vector3::new(5.555, 10.95645, 70.266);
    Vector3::new(
        fract(p.dot(Vector3::new(127.1, 311.7, 420.69)).sin() * HASH_SCALE),
        fract(p.dot(Vector3::new(269.5, 183.3, 632.897)).sin() * HASH_SCALE),
        fract(shifted.dot(Vector3::new(765.54, 631.2, 109.21)).sin() * HASH_SCALE),
    )
}

/// Quintic falloff, 1 at distance 0 and 0 at distance 1.
fn falloff(t: f32) -> f32 {
    1.0 - 6.0 * t.powi(5) + 15.0 * t.powi(4) - 10.0 * t.powi(3)
}

/// Contribution of lattice point `grid_point` to the gradient noise at `p`.
pub fn surflet(p: Vector2<f32>, grid_point: Vector2<f32>) -> f32 {
    let diff = p - grid_point;
    let gradient = hash2(grid_point) * 2.0 - Vector2::new(1.0, 1.0);
    diff.dot(gradient) * falloff(diff.x.abs()) * falloff(diff.y.abs())
}

/// 2D gradient noise, roughly in `[-0.5, 0.5]` and zero on lattice points.
pub fn perlin(p: Vector2<f32>) -> f32 {
    let base = floor2(p);
    let mut sum = 0.0;
    for dx in 0..=1 {
        for dy in 0..=1 {
            sum += surflet(p, base + Vector2::new(dx as f32, dy as f32));
        }
    }
    sum
}

pub fn surflet_3d(p: Vector3<f32>, grid_point: Vector3<f32>) -> f32 {
    let diff = p - grid_point;
    let gradient = hash3(grid_point) * 2.0 - Vector3::new(1.0, 1.0, 1.0);
    diff.dot(gradient) * falloff(diff.x.abs()) * falloff(diff.y.abs()) * falloff(diff.z.abs())
}

pub fn perlin_3d(p: Vector3<f32>) -> f32 {
    let base = Vector3::new(p.x.floor(), p.y.floor(), p.z.floor());
    let mut sum = 0.0;
    for dx in 0..=1 {
        for dy in 0..=1 {
            for dz in 0..=1 {
                sum += surflet_3d(p, base + Vector3::new(dx as f32, dy as f32, dz as f32));
            }
        }
    }
    sum
}

/// Ridged Perlin sum: 8 octaves starting at frequency 4, amplitude halving
/// and frequency doubling each octave.
pub fn fractal_perlin(p: Vector2<f32>) -> f32 {
    let mut amp = 0.5;
    let mut freq = 4.0;
    let mut sum = 0.0;
    for _ in 0..8 {
        sum += (1.0 - perlin(p * freq).abs()) * amp;
        amp *= 0.5;
        freq *= 2.0;
    }
    sum
}

/// Bilinearly interpolated value noise over the integer lattice.
pub fn interp_noise(p: Vector2<f32>) -> f32 {
    let base = floor2(p);
    let frac = fract2(p);
    let v1 = hash1(base);
    let v2 = hash1(base + Vector2::new(1.0, 0.0));
    let v3 = hash1(base + Vector2::new(0.0, 1.0));
    let v4 = hash1(base + Vector2::new(1.0, 1.0));
    mix(mix(v1, v2, frac.x), mix(v3, v4, frac.x), frac.y)
}

/// 8-octave fractal sum of `interp_noise` with persistence 0.5.
pub fn fbm(p: Vector2<f32>) -> f32 {
    let mut total = 0.0;
    for octave in 0..8 {
        let freq = 2f32.powi(octave);
        let amp = 0.5f32.powi(octave);
        total += interp_noise(p * freq) * amp;
    }
    total
}

/// Output of [`cell_noise`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellSample {
    /// Squared distance to the second closest feature point minus that to the closest.
    pub edge: f32,
    /// Per-cell random height in `[0.5, 1]`.
    pub cell_height: f32,
}

/// Worley noise over jittered cell centers.
///
/// The sample position itself is nudged by a quarter cell along an angle
/// taken from Perlin noise, which bends the cell borders.
pub fn cell_noise(p: Vector2<f32>) -> CellSample {
    let cell = floor2(p);
    let angle = perlin(p * 2.0) * std::f32::consts::PI;
    let local = fract2(p) + Vector2::new(angle.cos(), angle.sin()) * 0.25;

    let mut nearest = 1.0;
    let mut second = 1.0;
    let mut cell_height = 1.0;
    for y in -1..=1 {
        for x in -1..=1 {
            let neighbor = Vector2::new(x as f32, y as f32);
            let point = hash2(cell + neighbor);
            let diff = neighbor + point - local;
            let dist = diff.magnitude2();
            if dist < nearest {
                cell_height = hash2(point).x;
                second = nearest;
                nearest = dist;
            } else if dist < second {
                second = dist;
            }
        }
    }

    CellSample {
        edge: second - nearest,
        cell_height: 0.5 * cell_height + 0.5,
    }
}

/// Column height above the base level at world position `(x, z)`.
///
/// A 16-octave value-noise sum at persistence 0.45 with base amplitude 50,
/// sampled at `p / 64`.
pub fn biome_height(p: Vector2<f32>) -> f32 {
    let p = p / 64.0;
    let mut height = 0.0;
    for octave in 1..=16 {
        let freq = 2f32.powi(octave);
        let amp = 0.45f32.powi(octave) * 50.0;
        height += interp_noise(p * freq) * amp;
    }
    height
}

/// Rolling grassland field: mostly `fbm`, with a third of its weight given to
/// raised plateaus along cell-noise borders.
pub fn grassland_height(p: Vector2<f32>) -> f32 {
    let sample = cell_noise(p * 4.0);
    let ridge = smoothstep(0.0, 1.0, (sample.edge - 0.1).max(0.0)) * sample.cell_height;
    fbm(p) * 0.67 + ridge * 0.33
}

/// The gradient noise field as a `noise::NoiseFn` source.
#[derive(Debug, Clone, Copy, Default)]
pub struct GradientNoise;

impl NoiseFn<f64, 2> for GradientNoise {
    fn get(&self, point: [f64; 2]) -> f64 {
        perlin(Vector2::new(point[0] as f32, point[1] as f32)) as f64
    }
}

impl NoiseFn<f64, 3> for GradientNoise {
    fn get(&self, point: [f64; 3]) -> f64 {
        perlin_3d(Vector3::new(point[0] as f32, point[1] as f32, point[2] as f32)) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples() -> impl Iterator<Item = Vector2<f32>> {
        (0..40).map(|i| Vector2::new(i as f32 * 1.37 - 20.0, i as f32 * -0.91 + 7.5))
    }

    #[test]
    fn hashes_stay_in_unit_range() {
        for p in samples() {
            let h1 = hash1(p);
            let h2 = hash2(p);
            let h3 = hash3(Vector3::new(p.x, p.y, p.x - p.y));
            for v in [h1, h2.x, h2.y, h3.x, h3.y, h3.z] {
                assert!((0.0..=1.0).contains(&v), "{v} out of range");
            }
        }
    }

    #[test]
    fn functions_are_deterministic() {
        for p in samples() {
            assert_eq!(perlin(p), perlin(p));
            assert_eq!(fbm(p), fbm(p));
            assert_eq!(cell_noise(p), cell_noise(p));
            assert_eq!(biome_height(p * 50.0), biome_height(p * 50.0));
        }
    }

    #[test]
    fn perlin_vanishes_on_lattice_points() {
        for x in -3..3 {
            for y in -3..3 {
                let p = Vector2::new(x as f32, y as f32);
                assert_eq!(perlin(p), 0.0);
                assert_eq!(perlin_3d(Vector3::new(p.x, p.y, 2.0)), 0.0);
            }
        }
    }

    #[test]
    fn fractal_sums_are_bounded() {
        for p in samples() {
            let f = fbm(p);
            assert!((0.0..2.0).contains(&f));
            let h = biome_height(p * 64.0);
            assert!((0.0..41.0).contains(&h), "height {h}");
            let c = cell_noise(p);
            assert!((0.5..=1.0).contains(&c.cell_height));
            assert!(c.edge >= 0.0);
        }
    }

    #[test]
    fn noise_fn_matches_free_functions() {
        let p = [0.3, -1.7];
        let source = GradientNoise;
        assert_eq!(
            NoiseFn::<f64, 2>::get(&source, p),
            perlin(Vector2::new(0.3, -1.7)) as f64
        );
    }

    #[test]
    fn smoothstep_clamps() {
        assert_eq!(smoothstep(0.0, 64.0, -5.0), 0.0);
        assert_eq!(smoothstep(0.0, 64.0, 100.0), 1.0);
        assert_eq!(smoothstep(0.0, 1.0, 0.5), 0.5);
    }
}
