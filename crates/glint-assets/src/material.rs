use glint_core::Color;
use tracing::warn;

use crate::document::{MaterialDesc, TextureDesc};

/// A texture slot: which decoded image it samples.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Texture {
    pub image_index: Option<usize>,
}

/// Base-color material. Other material properties are not decoded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub base_color_factor: Color,
    pub base_color_texture: Option<usize>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            base_color_factor: Color::WHITE,
            base_color_texture: None,
        }
    }
}

impl From<&MaterialDesc> for Material {
    fn from(desc: &MaterialDesc) -> Self {
        let mut material = Material::default();
        if let Some(factor) = desc.base_color_factor {
            material.base_color_factor = Color::from_array(factor);
        }
        if let Some(texture) = desc.base_color_texture {
            material.base_color_texture = Some(texture);
        }
        material
    }
}

/// Copy each texture's image source index.
pub fn build_textures(descs: &[TextureDesc]) -> Vec<Texture> {
    descs
        .iter()
        .map(|desc| Texture {
            image_index: desc.source,
        })
        .collect()
}

pub fn build_materials(descs: &[MaterialDesc]) -> Vec<Material> {
    descs.iter().map(Material::from).collect()
}

/// Clear references that point past the end of their target table.
///
/// Returns how many references were cleared.
pub fn clear_dangling(
    textures: &mut [Texture],
    image_count: usize,
    materials: &mut [Material],
) -> usize {
    let mut cleared = 0;

    for (i, texture) in textures.iter_mut().enumerate() {
        if let Some(image) = texture.image_index.filter(|&image| image >= image_count) {
            warn!("Texture {} references missing image {}", i, image);
            texture.image_index = None;
            cleared += 1;
        }
    }

    let texture_count = textures.len();
    for (i, material) in materials.iter_mut().enumerate() {
        if let Some(texture) = material
            .base_color_texture
            .filter(|&texture| texture >= texture_count)
        {
            warn!("Material {} references missing texture {}", i, texture);
            material.base_color_texture = None;
            cleared += 1;
        }
    }

    cleared
}
