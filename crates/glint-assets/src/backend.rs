//! Device-facing collaborators: texture upload and mesh drawing.
//!
//! The model never talks to a graphics API directly. A renderer implements
//! [`TextureUploader`] and [`MeshRenderer`]; [`HeadlessBackend`] implements both
//! without a device.

use tracing::debug;

use crate::error::UploadError;
use crate::material::{Material, Texture};
use crate::mesh::Mesh;
use crate::pixels::DecodedImage;

/// Opaque handle to a texture living on a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

impl TextureHandle {
    /// Stored for images whose upload failed
    pub const INVALID: TextureHandle = TextureHandle(0);

    pub fn is_valid(&self) -> bool {
        *self != Self::INVALID
    }
}

impl Default for TextureHandle {
    fn default() -> Self {
        Self::INVALID
    }
}

/// Uploads normalized RGBA8 images to a device.
pub trait TextureUploader {
    /// Called once per image during load. Empty `rgba` must be reported as
    /// [`UploadError::EmptyPixels`].
    fn upload(&mut self, width: u32, height: u32, rgba: &[u8]) -> Result<TextureHandle, UploadError>;
}

/// The model's shared lookup tables, handed to every draw.
#[derive(Debug, Clone, Copy, Default)]
pub struct DrawTables<'a> {
    pub images: &'a [DecodedImage],
    /// Device texture per image, same indexing as `images`
    pub image_handles: &'a [TextureHandle],
    pub textures: &'a [Texture],
    pub materials: &'a [Material],
}

/// Issues draw calls for meshes.
pub trait MeshRenderer {
    fn draw(&mut self, mesh: &Mesh, tables: &DrawTables<'_>);
}

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub vertex_count: usize,
    pub index_count: usize,
    pub material: Material,
    pub texture: Option<TextureHandle>,
}

/// Uploader and renderer without a device. Hands out sequential handles and
/// records every draw.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    uploaded: u32,
    uploaded_bytes: usize,
    draws: Vec<DrawCall>,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful uploads
    pub fn upload_count(&self) -> usize {
        self.uploaded as usize
    }

    pub fn uploaded_bytes(&self) -> usize {
        self.uploaded_bytes
    }

    pub fn draws(&self) -> &[DrawCall] {
        &self.draws
    }
}

impl TextureUploader for HeadlessBackend {
    fn upload(&mut self, width: u32, height: u32, rgba: &[u8]) -> Result<TextureHandle, UploadError> {
        if rgba.is_empty() {
            return Err(UploadError::EmptyPixels);
        }
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(UploadError::Backend(format!(
                "{}x{} RGBA needs {} bytes, got {}",
                width,
                height,
                expected,
                rgba.len()
            )));
        }

        self.uploaded += 1;
        self.uploaded_bytes += rgba.len();
        debug!("Uploaded {}x{} texture as handle {}", width, height, self.uploaded);
        Ok(TextureHandle(self.uploaded))
    }
}

impl MeshRenderer for HeadlessBackend {
    fn draw(&mut self, mesh: &Mesh, tables: &DrawTables<'_>) {
        let resolved = mesh.resolve(tables);
        debug!(
            "Draw {} vertices, {} indices, texture {:?}",
            mesh.vertices.len(),
            mesh.indices.len(),
            resolved.texture
        );
        self.draws.push(DrawCall {
            vertex_count: mesh.vertices.len(),
            index_count: mesh.indices.len(),
            material: resolved.material,
            texture: resolved.texture,
        });
    }
}
