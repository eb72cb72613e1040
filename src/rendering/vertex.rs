//! Vertex data structures for chunk meshes.
//!
//! This module defines the vertex record the mesher emits and a renderer
//! uploads as-is.

use cgmath::{Vector3, Vector4};

use crate::voxels::block::direction::Direction;

/// Placeholder color written into every vertex.
pub const PLACEHOLDER_COLOR: [f32; 4] = [1.0, 0.0, 0.0, 1.0];

/// A vertex of a chunk mesh.
///
/// # Memory Layout
/// Four consecutive 4-component float groups:
/// - Position: chunk-local, `w = 1` (16 bytes)
/// - Normal: face direction, `w = 0` (16 bytes)
/// - Color: placeholder (16 bytes)
/// - Animatable: `x` is 1.0 for liquid faces, 0.0 otherwise (16 bytes)
///
/// Total size: 64 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct VertexRecord {
    pub position: [f32; 4],
    pub normal: [f32; 4],
    pub color: [f32; 4],
    pub animatable: [f32; 4],
}

impl VertexRecord {
    /// Creates a new vertex record.
    ///
    /// # Arguments
    /// * `position` - Chunk-local position of the vertex
    /// * `direction` - Direction the face points in
    /// * `animatable` - Whether the face belongs to a liquid
    ///
    /// # Returns
    /// A new `VertexRecord` instance
    pub fn new(position: Vector3<f32>, direction: Direction, animatable: bool) -> Self {
        let normal = direction.unit_vector();
        VertexRecord {
            position: position.extend(1.0).into(),
            normal: Vector4::new(normal.x, normal.y, normal.z, 0.0).into(),
            color: PLACEHOLDER_COLOR,
            animatable: [if animatable { 1.0 } else { 0.0 }, 0.0, 0.0, 0.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_is_four_vec4s() {
        assert_eq!(std::mem::size_of::<VertexRecord>(), 64);
        let record = VertexRecord::new(Vector3::new(1.0, 2.0, 3.0), Direction::YNeg, true);
        let floats: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&record));
        assert_eq!(
            floats,
            &[
                1.0, 2.0, 3.0, 1.0, //
                0.0, -1.0, 0.0, 0.0, //
                1.0, 0.0, 0.0, 1.0, //
                1.0, 0.0, 0.0, 0.0,
            ]
        );
    }
}
