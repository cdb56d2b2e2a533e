//! Vertex types for decoded meshes

use bytemuck::{Pod, Zeroable};

/// Renderer-ready vertex with homogeneous position, normal, and texture coordinates
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// xyz from the source, w = 1.0
    pub position: [f32; 4],
    /// Unit length, or zero when the source has no usable normal
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
}

impl Vertex {
    /// Create a new vertex from a 3-component position
    pub fn new(position: [f32; 3], normal: [f32; 3], tex_coords: [f32; 2]) -> Self {
        Self {
            position: [position[0], position[1], position[2], 1.0],
            normal,
            tex_coords,
        }
    }

    /// Vertex at `position` with zero normal and zero texture coordinates
    pub fn at(position: [f32; 3]) -> Self {
        Self::new(position, [0.0; 3], [0.0; 2])
    }

    /// Byte stride of one vertex in a tightly packed vertex buffer
    pub const STRIDE: usize = std::mem::size_of::<Self>();

    /// View a vertex slice as raw bytes for upload
    pub fn as_bytes(vertices: &[Vertex]) -> &[u8] {
        bytemuck::cast_slice(vertices)
    }
}
