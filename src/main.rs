//! Glint - decode a binary glTF scene and report what a renderer would receive
//!
//! Usage: `glint <scene.glb>`, or `glint --write-settings` to save the current
//! settings (defaults on first run) to the config directory.

mod settings;

use std::path::PathBuf;

use anyhow::{Context, Result};
use glint_assets::{HeadlessBackend, Model};
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

use crate::settings::Settings;

fn main() -> Result<()> {
    let loaded = Settings::load();
    let settings = loaded.as_ref().cloned().unwrap_or_default();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(settings.logging.level())
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    if let Err(e) = &loaded {
        warn!("{:#}, using defaults", e);
    }

    let arg = std::env::args_os()
        .nth(1)
        .context("usage: glint <scene.glb> | glint --write-settings")?;
    if arg == "--write-settings" {
        return settings.save();
    }
    let path = PathBuf::from(arg);

    let bytes = std::fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?;
    info!("Decoding {} ({} bytes)", path.display(), bytes.len());

    let mut backend = HeadlessBackend::new();
    let model = Model::from_slice(&bytes, &settings.load, &mut backend);

    for diagnostic in model.diagnostics() {
        warn!("{}", diagnostic);
    }
    if model.is_empty() {
        anyhow::bail!("{} produced no meshes", path.display());
    }

    model.draw(&mut backend);

    println!("{}", path.display());
    println!(
        "  images: {} ({} uploaded, {} bytes)",
        model.images().len(),
        backend.upload_count(),
        backend.uploaded_bytes()
    );
    println!("  textures: {}", model.textures().len());
    println!("  materials: {}", model.materials().len());
    println!(
        "  meshes: {} ({} vertices, {} triangles)",
        model.meshes().len(),
        model.vertex_count(),
        model.triangle_count()
    );
    for (i, draw) in backend.draws().iter().enumerate() {
        println!(
            "  draw {}: {} vertices, {} indices, base color {:?}, texture {:?}",
            i,
            draw.vertex_count,
            draw.index_count,
            draw.material.base_color_factor.to_array(),
            draw.texture.map(|t| t.0)
        );
    }

    Ok(())
}
