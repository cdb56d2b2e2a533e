//! In-memory asset document: the parsed container, flattened into plain indexed tables.
//!
//! Produced by [`import`](crate::import) from a `.glb` container, or built directly
//! (tests, procedural sources). Every cross reference is a plain index and is checked
//! where it is followed, never trusted.

use glint_core::Transform;

/// Scalar type of one accessor component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentType {
    I8,
    U8,
    I16,
    U16,
    U32,
    F32,
}

impl ComponentType {
    /// Size of one component in bytes
    pub fn size(self) -> usize {
        match self {
            ComponentType::I8 | ComponentType::U8 => 1,
            ComponentType::I16 | ComponentType::U16 => 2,
            ComponentType::U32 | ComponentType::F32 => 4,
        }
    }
}

/// A raw binary buffer owned by the document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Buffer {
    pub data: Vec<u8>,
}

/// A byte sub-range of one buffer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BufferView {
    pub buffer: usize,
    pub byte_offset: usize,
    pub byte_length: usize,
    /// Distance between consecutive elements; `None` means tightly packed
    pub byte_stride: Option<usize>,
}

/// Describes how a byte range of a view is read as typed elements.
#[derive(Debug, Clone, PartialEq)]
pub struct Accessor {
    /// `None` for accessors without data (sparse-only or zero-filled)
    pub view: Option<usize>,
    pub byte_offset: usize,
    pub count: usize,
    pub component_type: ComponentType,
    /// Components per element: 1 for scalars, 2 for VEC2, 3 for VEC3, ...
    pub components: usize,
    /// Integer components read as floats map onto [0, 1] (unsigned) or [-1, 1] (signed)
    pub normalized: bool,
}

impl Accessor {
    /// Size of one element in bytes
    pub fn element_size(&self) -> usize {
        self.component_type.size() * self.components
    }
}

/// Decoded pixel data for one image, as the container decoder produced it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageDesc {
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    pub pixels: Vec<u8>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextureDesc {
    pub source: Option<usize>,
}

/// The base-color subset of a material's properties, resolved once at import.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MaterialDesc {
    pub base_color_factor: Option<[f32; 4]>,
    pub base_color_texture: Option<usize>,
}

/// One drawable unit: attribute accessors, index accessor, and material.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrimitiveDesc {
    pub position: Option<usize>,
    pub normal: Option<usize>,
    pub tex_coord: Option<usize>,
    pub indices: Option<usize>,
    pub material: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshDesc {
    pub name: Option<String>,
    pub primitives: Vec<PrimitiveDesc>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeDesc {
    pub children: Vec<usize>,
    pub mesh: Option<usize>,
    pub transform: Transform,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneDesc {
    pub nodes: Vec<usize>,
}

/// The whole parsed asset. Read-only input to the decoding pipeline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetDocument {
    pub buffers: Vec<Buffer>,
    pub views: Vec<BufferView>,
    pub accessors: Vec<Accessor>,
    pub images: Vec<ImageDesc>,
    pub textures: Vec<TextureDesc>,
    pub materials: Vec<MaterialDesc>,
    pub meshes: Vec<MeshDesc>,
    pub nodes: Vec<NodeDesc>,
    pub scenes: Vec<SceneDesc>,
    pub default_scene: Option<usize>,
}

impl AssetDocument {
    /// Root nodes of the default scene, falling back to the first scene.
    pub fn root_nodes(&self) -> &[usize] {
        self.default_scene
            .and_then(|i| self.scenes.get(i))
            .or_else(|| self.scenes.first())
            .map(|scene| scene.nodes.as_slice())
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_nodes_prefers_default_scene() {
        let doc = AssetDocument {
            scenes: vec![
                SceneDesc { nodes: vec![0] },
                SceneDesc { nodes: vec![1, 2] },
            ],
            default_scene: Some(1),
            ..Default::default()
        };
        assert_eq!(doc.root_nodes(), &[1, 2]);
    }

    #[test]
    fn root_nodes_falls_back_to_first_scene() {
        let mut doc = AssetDocument {
            scenes: vec![SceneDesc { nodes: vec![3] }],
            default_scene: Some(7),
            ..Default::default()
        };
        assert_eq!(doc.root_nodes(), &[3]);

        doc.scenes.clear();
        assert!(doc.root_nodes().is_empty());
    }

    #[test]
    fn element_size() {
        let accessor = Accessor {
            view: None,
            byte_offset: 0,
            count: 1,
            component_type: ComponentType::F32,
            components: 3,
            normalized: false,
        };
        assert_eq!(accessor.element_size(), 12);
        assert_eq!(ComponentType::U16.size(), 2);
    }
}
