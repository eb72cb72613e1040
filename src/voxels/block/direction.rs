//! # Direction Module
//!
//! The six axis-aligned directions a block face can point in.

use cgmath::Vector3;

/// An axis-aligned direction.
///
/// The discriminants index per-direction tables (neighbor links, atlas
/// offsets, face templates).
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum Direction {
    XPos = 0,
    XNeg = 1,
    YPos = 2,
    YNeg = 3,
    ZPos = 4,
    ZNeg = 5,
}

impl Direction {
    /// Returns an array containing all six directions in discriminant order.
    pub fn all() -> [Direction; 6] {
        [
            Direction::XPos,
            Direction::XNeg,
            Direction::YPos,
            Direction::YNeg,
            Direction::ZPos,
            Direction::ZNeg,
        ]
    }

    /// The four directions along which chunks have neighbors.
    pub fn horizontal() -> [Direction; 4] {
        [
            Direction::XPos,
            Direction::XNeg,
            Direction::ZPos,
            Direction::ZNeg,
        ]
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::XPos => Direction::XNeg,
            Direction::XNeg => Direction::XPos,
            Direction::YPos => Direction::YNeg,
            Direction::YNeg => Direction::YPos,
            Direction::ZPos => Direction::ZNeg,
            Direction::ZNeg => Direction::ZPos,
        }
    }

    /// Integer step of one cell in this direction.
    pub fn offset(self) -> Vector3<i32> {
        match self {
            Direction::XPos => Vector3::new(1, 0, 0),
            Direction::XNeg => Vector3::new(-1, 0, 0),
            Direction::YPos => Vector3::new(0, 1, 0),
            Direction::YNeg => Vector3::new(0, -1, 0),
            Direction::ZPos => Vector3::new(0, 0, 1),
            Direction::ZNeg => Vector3::new(0, 0, -1),
        }
    }

    pub fn unit_vector(self) -> Vector3<f32> {
        let offset = self.offset();
        Vector3::new(offset.x as f32, offset.y as f32, offset.z as f32)
    }

    pub fn index(self) -> usize {
        self as usize
    }
}
