//! Rendering contract of the voxel world.
//!
//! The world never talks to a graphics API. It produces vertex, UV and index
//! streams and hands them, together with a model transform, to whatever
//! implements [`ChunkRenderer`]. Meshing lives in [`meshing`]; background
//! mesh builds in [`tasks`].

use cgmath::Matrix4;

pub mod meshing;
pub mod tasks;
pub mod vertex;

pub use vertex::VertexRecord;

/// The two disjoint geometry streams of a mesh.
///
/// Opaque geometry is drawn first; liquids go in the transparent layer so
/// they can be drawn with blending enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderLayer {
    Opaque,
    Transparent,
}

impl RenderLayer {
    pub fn all() -> [RenderLayer; 2] {
        [RenderLayer::Opaque, RenderLayer::Transparent]
    }
}

/// Primitive topology of a drawable's index stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawMode {
    Triangles,
    Lines,
    Points,
}

/// Anything that can hand a renderer its geometry streams.
///
/// `uv_stream` is parallel to `vertex_stream`: one UV per vertex, in the
/// same order.
pub trait Drawable {
    fn vertex_stream(&self, layer: RenderLayer) -> &[VertexRecord];
    fn uv_stream(&self, layer: RenderLayer) -> &[[f32; 2]];
    fn index_stream(&self, layer: RenderLayer) -> &[u32];
    fn draw_mode(&self) -> DrawMode;

    /// Number of indices to draw for `layer`.
    fn element_count(&self, layer: RenderLayer) -> usize {
        self.index_stream(layer).len()
    }
}

/// The collaborator that uploads and draws geometry.
pub trait ChunkRenderer {
    /// Draws one layer of `drawable` with the given model transform.
    fn submit(&mut self, model: Matrix4<f32>, drawable: &dyn Drawable, layer: RenderLayer);
}
