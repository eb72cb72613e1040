//! # Rivers
//!
//! Rivers are traced by an L-system turtle and then carved into a block
//! volume at a fixed water level. A second pass grades the banks so the
//! channel is not lined with vertical cliffs.
//!
//! ## Path Grammar
//!
//! Starting from `X`, the rule `X -> [-FX]+FX` is applied three times. The
//! turtle then walks the string:
//!
//! * `F` steps forward and increments the branch depth
//! * `-`/`+` turn left/right by a random angle in `[45, 55)` degrees
//! * `[`/`]` push/pop the turtle state
//!
//! Every move, push and pop records a sample. Consecutive samples whose depth
//! increases by exactly one form a channel segment.

use cgmath::Vector2;
use log::trace;

use crate::voxels::{
    block::block_type::BlockType,
    chunk::{BlockVolume, CHUNK_HEIGHT},
};

const AXIOM: &str = "X";
const RULE: &str = "[-FX]+FX";
const ITERATIONS: usize = 3;
const STEP_LENGTH: f32 = 10.0;
const START: (f32, f32) = (12.0, 48.0);
const START_HEADING: f32 = 90.0;
/// Columns a bank slope may reach from the water's edge.
const BANK_REACH: i32 = 6;
/// A bank whose top stands this far above the water gets the steep grade.
const STEEP_BANK: i32 = 7;

/// A point the turtle passed through, at a given branch depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathSample {
    pub position: Vector2<f32>,
    pub depth: i32,
}

#[derive(Clone, Copy)]
struct Turtle {
    position: Vector2<f32>,
    heading: f32,
    depth: i32,
}

/// Expands the river grammar.
pub fn expand_grammar() -> String {
    let mut current = AXIOM.to_string();
    for _ in 0..ITERATIONS {
        current = current
            .chars()
            .map(|c| match c {
                'X' => RULE.to_string(),
                other => other.to_string(),
            })
            .collect();
    }
    current
}

/// Walks the expanded grammar and records the turtle's samples in zone-local
/// coordinates.
pub fn trace_path(rng: &mut fastrand::Rng) -> Vec<PathSample> {
    let mut turtle = Turtle {
        position: Vector2::new(START.0, START.1),
        heading: START_HEADING,
        depth: 0,
    };
    let mut stack = Vec::new();
    let mut samples = Vec::new();

    for c in expand_grammar().chars() {
        match c {
            '[' => {
                stack.push(turtle);
            }
            ']' => {
                if let Some(saved) = stack.pop() {
                    turtle = saved;
                }
            }
            'F' => {
                let radians = turtle.heading.to_radians();
                turtle.position += Vector2::new(radians.cos(), radians.sin()) * STEP_LENGTH;
                turtle.depth += 1;
            }
            '-' => {
                turtle.heading += 45.0 + rng.u32(0..10) as f32;
                continue;
            }
            '+' => {
                turtle.heading -= 45.0 + rng.u32(0..10) as f32;
                continue;
            }
            _ => continue,
        }
        samples.push(PathSample {
            position: turtle.position,
            depth: turtle.depth,
        });
    }

    samples
}

/// Carves the traced path into `volume` as a water channel at `water_level`.
///
/// Each segment is walked in unit steps from its deeper end. The channel is
/// `4 - depth / 2` cells wide; channel cells become `Water` and everything
/// above them is cleared. Cells on or outside the volume border are skipped.
pub fn carve_river<V: BlockVolume>(volume: &mut V, path: &[PathSample], water_level: i32) {
    let extent = volume.width() as f32;
    let inside = |x: f32, z: f32| x > 0.0 && x < extent && z > 0.0 && z < extent;

    for pair in path.windows(2) {
        let (start, end) = (pair[1], pair[0]);
        if start.depth != end.depth + 1 {
            continue;
        }

        let x1 = start.position.x.trunc();
        let z1 = start.position.y.trunc();
        let x2 = end.position.x.trunc();
        let z2 = end.position.y.trunc();
        let dist = ((x1 - x2).powi(2) + (z1 - z2).powi(2)).sqrt();
        let dx = (x2 - x1) / dist;
        let dz = (z2 - z1) / dist;
        let width = (4.0 - start.depth as f32 / 2.0) as i32;

        let mut i = 1;
        while i as f32 <= dist {
            let x = x1 + i as f32 * dx;
            let z = z1 + i as f32 * dz;
            i += 1;
            if !inside(x, z) {
                continue;
            }
            for j in 0..=width {
                let offset = j as f32;
                if !inside(x + offset, z + offset) {
                    continue;
                }
                let cells = [
                    ((x + offset) as i32, z as i32),
                    (x as i32, (z + offset) as i32),
                    ((x + offset) as i32, (z + offset) as i32),
                ];
                for (cx, cz) in cells {
                    volume.set_block(cx, water_level, cz, BlockType::Water);
                    for y in water_level + 1..CHUNK_HEIGHT {
                        volume.set_block(cx, y, cz, BlockType::Empty);
                    }
                }
            }
        }
    }
}

/// Lowest y at or above `from` holding `Grass`, or `CHUNK_HEIGHT` if none.
fn first_grass<V: BlockVolume>(volume: &V, x: i32, z: i32, from: i32) -> i32 {
    (from..CHUNK_HEIGHT)
        .find(|&y| volume.block(x, y, z) == BlockType::Grass)
        .unwrap_or(CHUNK_HEIGHT)
}

/// Grades the terrain next to every water cell at `water_level` into a
/// terraced slope.
///
/// From each such cell the pass looks up to six columns outward in each
/// cardinal direction. If the grass at the far column stands high, the slope
/// climbs two blocks per column, otherwise one. Columns whose grass is above
/// the slope get a grass cap at the slope height with everything above cleared.
pub fn carve_bank_slopes<V: BlockVolume>(volume: &mut V, water_level: i32) {
    let extent = volume.width();
    let mut sources = Vec::new();
    for x in 0..extent {
        for z in 0..extent {
            if volume.block(x, water_level, z) == BlockType::Water {
                sources.push((x, z));
            }
        }
    }
    trace!("Grading banks around {} water columns", sources.len());

    for (x, z) in sources {
        for (sx, sz) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
            let room = match (sx, sz) {
                (1, 0) => extent - x,
                (-1, 0) => x,
                (0, 1) => extent - z,
                _ => z,
            };
            let reach = room.min(BANK_REACH);
            let far = first_grass(
                volume,
                x + sx * (reach - 1),
                z + sz * (reach - 1),
                water_level,
            );
            let grade = if far > water_level + STEEP_BANK { 2 } else { 1 };

            for i in 1..reach - 1 {
                let (cx, cz) = (x + sx * i, z + sz * i);
                let h = first_grass(volume, cx, cz, water_level);
                let target = water_level + grade * i;
                if h != CHUNK_HEIGHT && h > target {
                    volume.set_block(cx, target, cz, BlockType::Grass);
                    for y in target + 1..CHUNK_HEIGHT {
                        volume.set_block(cx, y, cz, BlockType::Empty);
                    }
                }
            }
        }
    }
}
