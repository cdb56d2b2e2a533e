use glint_core::Vertex;

use crate::backend::{DrawTables, TextureHandle};
use crate::material::Material;

/// A renderer-ready mesh: one source primitive with its own vertex and index lists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    /// Material for the whole mesh; `None` draws with [`Material::default`]
    pub material: Option<usize>,
}

/// The material chain of a mesh, followed through the model's tables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedMaterial {
    pub material: Material,
    /// Decoded image sampled as base color
    pub image: Option<usize>,
    /// Device texture for `image`, if it uploaded
    pub texture: Option<TextureHandle>,
}

impl Mesh {
    /// Create an empty mesh
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Follow mesh → material → texture → image. Missing links end the chain.
    pub fn resolve(&self, tables: &DrawTables<'_>) -> ResolvedMaterial {
        let material = self
            .material
            .and_then(|i| tables.materials.get(i))
            .copied()
            .unwrap_or_default();
        let image = material
            .base_color_texture
            .and_then(|i| tables.textures.get(i))
            .and_then(|texture| texture.image_index)
            .filter(|&i| i < tables.images.len());
        let texture = image
            .and_then(|i| tables.image_handles.get(i))
            .copied()
            .filter(TextureHandle::is_valid);

        ResolvedMaterial {
            material,
            image,
            texture,
        }
    }
}
