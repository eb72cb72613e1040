use cgmath::Vector3;

use crate::voxels::block::{atlas_offset, block_type::BlockType, direction::Direction, ATLAS_CELL};

use super::super::VertexRecord;

/// Unit-quad UV template, added to a block's atlas offset.
const UV_TEMPLATE: [[f32; 2]; 4] = [
    [0.0, 0.0],
    [ATLAS_CELL, 0.0],
    [ATLAS_CELL, ATLAS_CELL],
    [0.0, ATLAS_CELL],
];

/// Index pattern of one quad: two triangles, `(0, 1, 2)` and `(0, 2, 3)`.
pub const QUAD_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

/// A single visible face of a block, ready to be appended to a mesh stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    pub vertices: [VertexRecord; 4],
    pub uvs: [[f32; 2]; 4],
}

impl Face {
    /// Creates the face of the block at `(x, y, z)` pointing in `direction`.
    ///
    /// # Arguments
    /// * `x`, `y`, `z` - The coordinates of the block in chunk space
    /// * `block_type` - The block's type, used for the atlas lookup and the
    ///   animatable flag
    /// * `direction` - Which side of the block this face represents
    ///
    /// # Returns
    /// A new `Face` whose corners wind counter-clockwise seen from outside.
    pub fn new(x: i32, y: i32, z: i32, block_type: BlockType, direction: Direction) -> Self {
        let base = Vector3::new(x as f32, y as f32, z as f32);
        let animatable = block_type.is_transparent();
        let vertices = corners(direction)
            .map(|corner| VertexRecord::new(base + Vector3::from(corner), direction, animatable));

        let [u, v] = atlas_offset(block_type, direction);
        let uvs = UV_TEMPLATE.map(|[du, dv]| [u + du, v + dv]);

        Face { vertices, uvs }
    }
}

/// Corner offsets of a unit cube face.
fn corners(direction: Direction) -> [[f32; 3]; 4] {
    match direction {
        Direction::XPos => [[1.0, 0.0, 1.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [1.0, 1.0, 1.0]],
        Direction::XNeg => [[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 1.0], [0.0, 1.0, 0.0]],
        Direction::YPos => [[0.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
        Direction::YNeg => [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 1.0], [0.0, 0.0, 1.0]],
        Direction::ZPos => [[0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [1.0, 1.0, 1.0], [0.0, 1.0, 1.0]],
        Direction::ZNeg => [[1.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0]],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::InnerSpace;

    fn position(record: &VertexRecord) -> Vector3<f32> {
        Vector3::new(record.position[0], record.position[1], record.position[2])
    }

    #[test]
    fn corners_lie_on_the_face_plane() {
        for direction in Direction::all() {
            let face = Face::new(0, 0, 0, BlockType::Stone, direction);
            let normal = direction.unit_vector();
            let center = Vector3::new(0.5, 0.5, 0.5) + normal * 0.5;
            for record in &face.vertices {
                assert_eq!((position(record) - center).dot(normal), 0.0);
            }
        }
    }

    #[test]
    fn winding_faces_outward() {
        for direction in Direction::all() {
            let face = Face::new(4, 7, 2, BlockType::Dirt, direction);
            let [a, b, c, _] = face.vertices.map(|v| position(&v));
            let winding = (b - a).cross(c - a);
            assert!(winding.dot(direction.unit_vector()) > 0.0, "{direction:?}");
        }
    }

    #[test]
    fn liquid_faces_are_animatable() {
        let water = Face::new(0, 0, 0, BlockType::Water, Direction::YPos);
        let sand = Face::new(0, 0, 0, BlockType::Sand, Direction::YPos);
        assert!(water.vertices.iter().all(|v| v.animatable[0] == 1.0));
        assert!(sand.vertices.iter().all(|v| v.animatable[0] == 0.0));
    }

    #[test]
    fn uvs_span_one_atlas_cell() {
        let face = Face::new(0, 0, 0, BlockType::Grass, Direction::YPos);
        let [u, v] = atlas_offset(BlockType::Grass, Direction::YPos);
        assert_eq!(face.uvs[0], [u, v]);
        assert_eq!(face.uvs[2], [u + ATLAS_CELL, v + ATLAS_CELL]);
    }
}
