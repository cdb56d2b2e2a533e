//! Glint Assets - Binary glTF decoding
//!
//! Turns a glTF container into a renderer-ready [`Model`]: RGBA8 images,
//! texture and material tables, and one mesh per primitive found by walking
//! the scene graph. Device work (texture upload, draw calls) goes through the
//! [`TextureUploader`] and [`MeshRenderer`] traits.

pub mod accessor;
mod backend;
mod config;
pub mod document;
mod error;
mod import;
mod material;
mod mesh;
mod model;
mod pixels;
mod primitive;
mod scene;

pub use backend::{DrawCall, DrawTables, HeadlessBackend, MeshRenderer, TextureHandle, TextureUploader};
pub use config::LoadOptions;
pub use document::AssetDocument;
pub use error::{AssetError, DecodeError, Diagnostic, ImageError, SceneError, UploadError};
pub use import::{parse_file, parse_slice};
pub use material::{build_materials, build_textures, Material, Texture};
pub use mesh::{Mesh, ResolvedMaterial};
pub use model::Model;
pub use pixels::{normalize_pixels, DecodedImage, OPAQUE_ALPHA};
pub use primitive::convert_primitive;
pub use scene::{collect_primitives, ScenePrimitive};
