use std::path::Path;

use tracing::{error, info, warn};

use crate::backend::{DrawTables, MeshRenderer, TextureHandle, TextureUploader};
use crate::config::LoadOptions;
use crate::document::AssetDocument;
use crate::error::{AssetError, Diagnostic};
use crate::import;
use crate::material::{build_materials, build_textures, clear_dangling, Material, Texture};
use crate::mesh::Mesh;
use crate::pixels::DecodedImage;
use crate::primitive::convert_primitive;
use crate::scene::collect_primitives;

/// A decoded scene: images, textures, materials, and one mesh per source primitive.
///
/// Built once; nothing is mutated after construction. A container that fails to
/// parse yields an empty model rather than an error.
#[derive(Debug, Default)]
pub struct Model {
    images: Vec<DecodedImage>,
    image_handles: Vec<TextureHandle>,
    textures: Vec<Texture>,
    materials: Vec<Material>,
    meshes: Vec<Mesh>,
    diagnostics: Vec<Diagnostic>,
}

impl Model {
    /// Decode a glTF container held in memory.
    pub fn from_slice(
        bytes: &[u8],
        options: &LoadOptions,
        uploader: &mut dyn TextureUploader,
    ) -> Self {
        match import::parse_slice(bytes) {
            Ok(doc) => Self::from_document(doc, options, uploader),
            Err(e) => Self::failed(e),
        }
    }

    /// Decode a glTF file from disk.
    pub fn open(path: &Path, options: &LoadOptions, uploader: &mut dyn TextureUploader) -> Self {
        match import::parse_file(path) {
            Ok(doc) => {
                let model = Self::from_document(doc, options, uploader);
                info!("Loaded '{}'", path.display());
                model
            }
            Err(e) => Self::failed(e),
        }
    }

    fn failed(e: AssetError) -> Self {
        error!("{}", e);
        Self {
            diagnostics: vec![Diagnostic::Parse(e.to_string())],
            ..Default::default()
        }
    }

    /// Build a model from an already parsed document, uploading every image.
    pub fn from_document(
        mut doc: AssetDocument,
        options: &LoadOptions,
        uploader: &mut dyn TextureUploader,
    ) -> Self {
        let mut diagnostics = Vec::new();

        let mut images = Vec::with_capacity(doc.images.len());
        let mut image_handles = Vec::with_capacity(doc.images.len());
        for (i, desc) in std::mem::take(&mut doc.images).into_iter().enumerate() {
            let (width, height) = (desc.width, desc.height);
            let image = DecodedImage::from_desc(desc).unwrap_or_else(|e| {
                error!("Image {}: {}", i, e);
                diagnostics.push(Diagnostic::Image { image: i, error: e });
                DecodedImage::empty(width, height)
            });

            let handle = uploader
                .upload(image.width, image.height, &image.pixels)
                .unwrap_or_else(|e| {
                    warn!("Image {}: {}", i, e);
                    diagnostics.push(Diagnostic::Upload { image: i, error: e });
                    TextureHandle::INVALID
                });

            images.push(image);
            image_handles.push(handle);
        }

        let mut textures = build_textures(&doc.textures);
        let mut materials = build_materials(&doc.materials);
        let mut dangling = clear_dangling(&mut textures, images.len(), &mut materials);

        let mut found = Vec::new();
        let scene_errors =
            collect_primitives(&doc, doc.root_nodes(), options.max_depth, &mut found);
        diagnostics.extend(scene_errors.into_iter().map(Diagnostic::Scene));

        let mut meshes = Vec::with_capacity(found.len());
        for p in &found {
            let world = options.apply_node_transforms.then_some(&p.world);
            let mut ignored = Vec::new();
            let converted = convert_primitive(&doc, p.desc, world, options, &mut ignored);
            for error in ignored {
                warn!(
                    "Primitive {} of mesh {} on node {}: ignoring {}",
                    p.primitive, p.mesh, p.node, error
                );
                diagnostics.push(Diagnostic::Attribute {
                    node: p.node,
                    mesh: p.mesh,
                    primitive: p.primitive,
                    error,
                });
            }
            match converted {
                Ok(mut mesh) => {
                    if let Some(material) = mesh.material.filter(|&m| m >= materials.len()) {
                        warn!("Mesh {} references missing material {}", meshes.len(), material);
                        mesh.material = None;
                        dangling += 1;
                    }
                    meshes.push(mesh);
                }
                Err(e) => {
                    warn!(
                        "Skipping primitive {} of mesh {} on node {}: {}",
                        p.primitive, p.mesh, p.node, e
                    );
                    diagnostics.push(Diagnostic::Primitive {
                        node: p.node,
                        mesh: p.mesh,
                        primitive: p.primitive,
                        error: e,
                    });
                }
            }
        }

        if dangling > 0 {
            diagnostics.push(Diagnostic::DanglingReferences(dangling));
        }

        info!(
            "Model: {} images, {} textures, {} materials, {} meshes ({} issues)",
            images.len(),
            textures.len(),
            materials.len(),
            meshes.len(),
            diagnostics.len()
        );

        Self {
            images,
            image_handles,
            textures,
            materials,
            meshes,
            diagnostics,
        }
    }

    /// Draw every mesh, in order, with the shared tables.
    pub fn draw(&self, renderer: &mut dyn MeshRenderer) {
        let tables = self.tables();
        for mesh in &self.meshes {
            renderer.draw(mesh, &tables);
        }
    }

    pub fn tables(&self) -> DrawTables<'_> {
        DrawTables {
            images: &self.images,
            image_handles: &self.image_handles,
            textures: &self.textures,
            materials: &self.materials,
        }
    }

    pub fn images(&self) -> &[DecodedImage] {
        &self.images
    }

    /// Device texture per image; [`TextureHandle::INVALID`] where upload failed
    pub fn texture_handles(&self) -> &[TextureHandle] {
        &self.image_handles
    }

    pub fn textures(&self) -> &[Texture] {
        &self.textures
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    /// Everything that went wrong without stopping the load
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// True when no mesh was decoded
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(|m| m.vertices.len()).sum()
    }

    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(Mesh::triangle_count).sum()
    }
}
