//! Glint Core - Shared types for the Glint scene decoder
//!
//! This crate provides the foundational types used by the decoding pipeline:
//! - Mathematical primitives (re-exported from glam)
//! - Node transforms
//! - Colors for material factors
//! - The renderer-ready vertex layout

pub mod types;
pub mod vertex;

pub use glam::{Mat3, Mat4, Vec3};
pub use types::{normal_matrix, Color, Transform};
pub use vertex::Vertex;
