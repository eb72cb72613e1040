//! # Block Interaction
//!
//! Ray picking and single-block edits against the world store.
//!
//! `grid_march` walks a ray cell by cell (a 3D DDA): at every step it
//! advances to the nearest cell boundary along whichever axis reaches one
//! first, then tests the cell it entered. Cells with no resident chunk are
//! stepped over rather than treated as hits.
//!
//! ## Reach
//! `remove_block` and `place_block` march three units along the look vector,
//! the same reach a player has.

use cgmath::{InnerSpace, Point3, Vector3};

use crate::{
    error::TerrainError,
    streaming::WorldStreamer,
    voxels::{block::block_type::BlockType, block::direction::Direction, world::World},
};

/// Distance a player can reach along the look vector.
pub const REACH: f32 = 3.0;
/// Hits on liquids report a shortened distance.
const LIQUID_DISTANCE_SCALE: f32 = 0.67;

/// Block reads and writes at world coordinates.
pub trait BlockAccess {
    fn block_at(&self, x: i32, y: i32, z: i32) -> Result<BlockType, TerrainError>;
    fn set_block(&mut self, x: i32, y: i32, z: i32, block_type: BlockType) -> Result<(), TerrainError>;
}

impl BlockAccess for World {
    fn block_at(&self, x: i32, y: i32, z: i32) -> Result<BlockType, TerrainError> {
        self.get_block_at(x, y, z)
    }

    fn set_block(&mut self, x: i32, y: i32, z: i32, block_type: BlockType) -> Result<(), TerrainError> {
        self.set_block_at(x, y, z, block_type)
    }
}

impl BlockAccess for WorldStreamer {
    fn block_at(&self, x: i32, y: i32, z: i32) -> Result<BlockType, TerrainError> {
        self.get_block_at(x, y, z)
    }

    fn set_block(&mut self, x: i32, y: i32, z: i32, block_type: BlockType) -> Result<(), TerrainError> {
        self.set_block_at(x, y, z, block_type)
    }
}

/// The first non-empty cell along a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub cell: Vector3<i32>,
    /// Distance travelled, scaled down for liquids.
    pub distance: f32,
    /// Where the ray entered `cell`.
    pub intersection: Point3<f32>,
    /// The face of `cell` the ray entered through.
    pub face: Direction,
}

fn cell_of(point: Point3<f32>) -> Vector3<i32> {
    Vector3::new(point.x.floor() as i32, point.y.floor() as i32, point.z.floor() as i32)
}

/// Marches from `origin` along `direction` for `direction`'s length.
///
/// # Returns
/// The first non-`Empty` cell entered, or `None` if the ray ends first.
///
/// # Panics
/// Panics if no axis advances the ray, which only happens for a zero or
/// NaN direction.
pub fn grid_march<W: BlockAccess + ?Sized>(
    origin: Point3<f32>,
    direction: Vector3<f32>,
    world: &W,
) -> Option<RayHit> {
    let max_len = direction.magnitude();
    let direction = direction.normalize();
    let mut position = origin;
    let mut cell = cell_of(origin);
    let mut travelled = 0.0;

    loop {
        let mut min_t = f32::INFINITY;
        let mut interface_axis = None;
        for axis in 0..3 {
            if direction[axis] == 0.0 || direction[axis].is_nan() {
                continue;
            }
            let mut offset = if direction[axis] > 0.0 { 1.0 } else { 0.0 };
            if cell[axis] as f32 == position[axis] && offset == 0.0 {
                offset = -1.0;
            }
            let next_intercept = cell[axis] as f32 + offset;
            let axis_t = ((next_intercept - position[axis]) / direction[axis]).min(max_len);
            if axis_t < min_t {
                min_t = axis_t;
                interface_axis = Some(axis);
            }
        }
        let Some(axis) = interface_axis else {
            panic!("grid march found no advancing axis for direction {direction:?}");
        };

        travelled += min_t;
        position += direction * min_t;
        let mut step_back = Vector3::new(0, 0, 0);
        if direction[axis] < 0.0 {
            step_back[axis] = -1;
        }
        cell = cell_of(position) + step_back;

        if let Ok(block) = world.block_at(cell.x, cell.y, cell.z) {
            if !block.is_empty() {
                let distance = travelled.min(max_len);
                let distance = if block.is_transparent() {
                    LIQUID_DISTANCE_SCALE * distance
                } else {
                    distance
                };
                return Some(RayHit {
                    cell,
                    distance,
                    intersection: position,
                    face: entry_face(axis, direction[axis]),
                });
            }
        }

        if travelled >= max_len {
            return None;
        }
    }
}

fn entry_face(axis: usize, component: f32) -> Direction {
    let positive = component > 0.0;
    match (axis, positive) {
        (0, true) => Direction::XNeg,
        (0, false) => Direction::XPos,
        (1, true) => Direction::YNeg,
        (1, false) => Direction::YPos,
        (_, true) => Direction::ZNeg,
        (_, false) => Direction::ZPos,
    }
}

/// Clears the block the player looks at, if one is within reach.
///
/// # Returns
/// The cleared cell, or `None` if nothing was in reach.
pub fn remove_block<W: BlockAccess + ?Sized>(
    world: &mut W,
    eye: Point3<f32>,
    look: Vector3<f32>,
) -> Result<Option<Vector3<i32>>, TerrainError> {
    let Some(hit) = grid_march(eye, look * REACH, world) else {
        return Ok(None);
    };
    world.set_block(hit.cell.x, hit.cell.y, hit.cell.z, BlockType::Empty)?;
    Ok(Some(hit.cell))
}

/// Places `block_type` against the face the player looks at, or in the cell
/// at full reach when nothing is in reach. Occupied cells are left alone.
///
/// # Returns
/// The filled cell, or `None` if the target cell was occupied.
pub fn place_block<W: BlockAccess + ?Sized>(
    world: &mut W,
    eye: Point3<f32>,
    look: Vector3<f32>,
    block_type: BlockType,
) -> Result<Option<Vector3<i32>>, TerrainError> {
    let target = match grid_march(eye, look * REACH, world) {
        Some(hit) => hit.cell + hit.face.offset(),
        None => cell_of(eye + look * REACH),
    };
    if !world.block_at(target.x, target.y, target.z)?.is_empty() {
        return Ok(None);
    }
    world.set_block(target.x, target.y, target.z, block_type)?;
    Ok(Some(target))
}
