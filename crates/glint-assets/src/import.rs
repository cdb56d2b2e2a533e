use std::path::Path;

use glint_core::Transform;
use gltf::accessor::DataType;
use gltf::image::Format;
use gltf::mesh::Semantic;
use tracing::{debug, warn};

use crate::document::{
    Accessor, AssetDocument, Buffer, BufferView, ComponentType, ImageDesc, MaterialDesc, MeshDesc,
    NodeDesc, PrimitiveDesc, SceneDesc, TextureDesc,
};
use crate::error::AssetError;

/// Parse a glTF container (`.glb`, or `.gltf` with embedded data) held in memory.
pub fn parse_slice(bytes: &[u8]) -> Result<AssetDocument, AssetError> {
    let (document, buffers, images) =
        gltf::import_slice(bytes).map_err(|e| AssetError::Parse(e.to_string()))?;
    Ok(flatten(&document, buffers, images))
}

/// Parse a glTF file, resolving external buffers and images relative to it.
pub fn parse_file(path: &Path) -> Result<AssetDocument, AssetError> {
    if !path.exists() {
        return Err(AssetError::NotFound(path.to_path_buf()));
    }
    let (document, buffers, images) = gltf::import(path).map_err(|e| match e {
        gltf::Error::Io(io) => AssetError::Io(path.to_path_buf(), io),
        other => AssetError::Parse(other.to_string()),
    })?;
    Ok(flatten(&document, buffers, images))
}

/// Copy the parts of a glTF document the pipeline reads into plain tables.
fn flatten(
    document: &gltf::Document,
    buffers: Vec<gltf::buffer::Data>,
    images: Vec<gltf::image::Data>,
) -> AssetDocument {
    let buffers = buffers
        .into_iter()
        .map(|data| Buffer { data: data.0 })
        .collect();

    let views = document
        .views()
        .map(|view| BufferView {
            buffer: view.buffer().index(),
            byte_offset: view.offset(),
            byte_length: view.length(),
            byte_stride: view.stride(),
        })
        .collect();

    let accessors = document
        .accessors()
        .map(|accessor| Accessor {
            view: accessor.view().map(|view| view.index()),
            byte_offset: accessor.offset(),
            count: accessor.count(),
            component_type: component_type(accessor.data_type()),
            components: accessor.dimensions().multiplicity(),
            normalized: accessor.normalized(),
        })
        .collect();

    let images = images.into_iter().map(image_desc).collect();

    let textures = document
        .textures()
        .map(|texture| TextureDesc {
            source: Some(texture.source().index()),
        })
        .collect();

    let materials = document
        .materials()
        .map(|material| {
            let pbr = material.pbr_metallic_roughness();
            MaterialDesc {
                base_color_factor: Some(pbr.base_color_factor()),
                base_color_texture: pbr.base_color_texture().map(|info| info.texture().index()),
            }
        })
        .collect();

    let meshes = document
        .meshes()
        .map(|mesh| MeshDesc {
            name: mesh.name().map(str::to_string),
            primitives: mesh
                .primitives()
                .map(|primitive| PrimitiveDesc {
                    position: primitive.get(&Semantic::Positions).map(|a| a.index()),
                    normal: primitive.get(&Semantic::Normals).map(|a| a.index()),
                    tex_coord: primitive.get(&Semantic::TexCoords(0)).map(|a| a.index()),
                    indices: primitive.indices().map(|a| a.index()),
                    material: primitive.material().index(),
                })
                .collect(),
        })
        .collect();

    let nodes = document
        .nodes()
        .map(|node| {
            let (translation, rotation, scale) = node.transform().decomposed();
            NodeDesc {
                children: node.children().map(|child| child.index()).collect(),
                mesh: node.mesh().map(|mesh| mesh.index()),
                transform: Transform::from_trs(translation, rotation, scale),
            }
        })
        .collect();

    let scenes = document
        .scenes()
        .map(|scene| SceneDesc {
            nodes: scene.nodes().map(|node| node.index()).collect(),
        })
        .collect();

    let doc = AssetDocument {
        buffers,
        views,
        accessors,
        images,
        textures,
        materials,
        meshes,
        nodes,
        scenes,
        default_scene: document.default_scene().map(|scene| scene.index()),
    };

    debug!(
        "glTF document: {} buffers, {} accessors, {} images, {} materials, {} meshes, {} nodes",
        doc.buffers.len(),
        doc.accessors.len(),
        doc.images.len(),
        doc.materials.len(),
        doc.meshes.len(),
        doc.nodes.len()
    );

    doc
}

fn component_type(data_type: DataType) -> ComponentType {
    match data_type {
        DataType::I8 => ComponentType::I8,
        DataType::U8 => ComponentType::U8,
        DataType::I16 => ComponentType::I16,
        DataType::U16 => ComponentType::U16,
        DataType::U32 => ComponentType::U32,
        DataType::F32 => ComponentType::F32,
    }
}

/// 8-bit formats pass through; 16-bit formats keep their high byte.
fn image_desc(data: gltf::image::Data) -> ImageDesc {
    let gltf::image::Data {
        pixels,
        format,
        width,
        height,
    } = data;

    let (channels, pixels) = match format {
        Format::R8 => (1, pixels),
        Format::R8G8 => (2, pixels),
        Format::R8G8B8 => (3, pixels),
        Format::R8G8B8A8 => (4, pixels),
        Format::R16 => (1, high_bytes(&pixels)),
        Format::R16G16 => (2, high_bytes(&pixels)),
        Format::R16G16B16 => (3, high_bytes(&pixels)),
        Format::R16G16B16A16 => (4, high_bytes(&pixels)),
        other => {
            warn!("Image format {:?} not supported", other);
            (0, Vec::new())
        }
    };

    ImageDesc {
        width,
        height,
        channels,
        pixels,
    }
}

fn high_bytes(pixels: &[u8]) -> Vec<u8> {
    pixels
        .chunks_exact(2)
        .map(|c| (u16::from_ne_bytes([c[0], c[1]]) >> 8) as u8)
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Assemble a binary glTF container from a JSON document and a BIN payload.
    pub(crate) fn glb(json: &str, bin: &[u8]) -> Vec<u8> {
        let mut json = json.as_bytes().to_vec();
        while json.len() % 4 != 0 {
            json.push(b' ');
        }
        let mut bin = bin.to_vec();
        while bin.len() % 4 != 0 {
            bin.push(0);
        }

        let total = 12 + 8 + json.len() + if bin.is_empty() { 0 } else { 8 + bin.len() };
        let mut out = Vec::with_capacity(total);
        out.extend_from_slice(b"glTF");
        out.extend_from_slice(&2u32.to_le_bytes());
        out.extend_from_slice(&(total as u32).to_le_bytes());
        out.extend_from_slice(&(json.len() as u32).to_le_bytes());
        out.extend_from_slice(b"JSON");
        out.extend_from_slice(&json);
        if !bin.is_empty() {
            out.extend_from_slice(&(bin.len() as u32).to_le_bytes());
            out.extend_from_slice(b"BIN\0");
            out.extend_from_slice(&bin);
        }
        out
    }

    /// Four-vertex quad, u16 indices `[0, 1, 2, 2, 3, 0]`, two materials.
    pub(crate) fn quad_glb() -> Vec<u8> {
        let mut bin = Vec::new();
        for p in [
            [0.0f32, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ] {
            for f in p {
                bin.extend_from_slice(&f.to_le_bytes());
            }
        }
        for i in [0u16, 1, 2, 2, 3, 0] {
            bin.extend_from_slice(&i.to_le_bytes());
        }

        let json = r#"{
            "asset": {"version": "2.0"},
            "scene": 0,
            "scenes": [{"nodes": [0]}],
            "nodes": [
                {"children": [1]},
                {"children": [2], "translation": [0.0, 2.0, 0.0]},
                {"mesh": 0}
            ],
            "meshes": [{
                "name": "quad",
                "primitives": [{
                    "attributes": {"POSITION": 0},
                    "indices": 1,
                    "material": 0
                }]
            }],
            "materials": [
                {"pbrMetallicRoughness": {"baseColorFactor": [0.2, 0.3, 0.4, 1.0]}},
                {}
            ],
            "buffers": [{"byteLength": 60}],
            "bufferViews": [
                {"buffer": 0, "byteOffset": 0, "byteLength": 48},
                {"buffer": 0, "byteOffset": 48, "byteLength": 12}
            ],
            "accessors": [
                {"bufferView": 0, "componentType": 5126, "count": 4, "type": "VEC3",
                 "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0]},
                {"bufferView": 1, "componentType": 5123, "count": 6, "type": "SCALAR"}
            ]
        }"#;
        glb(json, &bin)
    }

    #[test]
    fn parses_quad_container() {
        let doc = parse_slice(&quad_glb()).unwrap();

        assert_eq!(doc.buffers.len(), 1);
        assert!(doc.buffers[0].data.len() >= 60);
        assert_eq!(doc.views[1].byte_offset, 48);
        assert_eq!(doc.accessors[0].component_type, ComponentType::F32);
        assert_eq!(doc.accessors[0].components, 3);
        assert_eq!(doc.accessors[1].component_type, ComponentType::U16);
        assert_eq!(doc.accessors[1].count, 6);

        assert_eq!(doc.root_nodes(), &[0]);
        assert_eq!(doc.nodes[0].children, vec![1]);
        assert_eq!(doc.nodes[2].mesh, Some(0));
        assert_eq!(doc.nodes[1].transform.position, glint_core::Vec3::new(0.0, 2.0, 0.0));

        let primitive = &doc.meshes[0].primitives[0];
        assert_eq!(primitive.position, Some(0));
        assert_eq!(primitive.normal, None);
        assert_eq!(primitive.indices, Some(1));
        assert_eq!(primitive.material, Some(0));
        assert_eq!(doc.meshes[0].name.as_deref(), Some("quad"));

        assert_eq!(doc.materials[0].base_color_factor, Some([0.2, 0.3, 0.4, 1.0]));
        assert_eq!(doc.materials[1].base_color_factor, Some([1.0, 1.0, 1.0, 1.0]));
        assert_eq!(doc.materials[1].base_color_texture, None);
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            parse_slice(b"definitely not a glTF container"),
            Err(AssetError::Parse(_))
        ));
    }

    #[test]
    fn missing_file() {
        let path = Path::new("/nonexistent/scene.glb");
        assert!(matches!(parse_file(path), Err(AssetError::NotFound(_))));
    }

    #[test]
    fn sixteen_bit_images_keep_high_byte() {
        let desc = image_desc(gltf::image::Data {
            pixels: [0x1234u16, 0xFF00]
                .iter()
                .flat_map(|v| v.to_ne_bytes())
                .collect(),
            format: Format::R16G16,
            width: 1,
            height: 1,
        });
        assert_eq!(desc.channels, 2);
        assert_eq!(desc.pixels, vec![0x12, 0xFF]);
    }

    #[test]
    fn float_images_are_marked_unsupported() {
        let desc = image_desc(gltf::image::Data {
            pixels: vec![0; 12],
            format: Format::R32G32B32FLOAT,
            width: 1,
            height: 1,
        });
        assert_eq!(desc.channels, 0);
        assert!(desc.pixels.is_empty());
    }
}
