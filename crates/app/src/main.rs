//! Entry point for the Zorya3D scene loader.
//! Loads an OBJ/MTL scene from disk and logs what came out of it.

use anyhow::Result;
use asset::{FsSource, ImageTextureLoader, Model};

fn parse_path_args() -> (String, String) {
    // Accept: --dir=<assets dir> --file=<scene.obj>
    let mut dir = String::from(".");
    let mut file = String::from("scene.obj");
    for arg in std::env::args() {
        if let Some(val) = arg.strip_prefix("--dir=") {
            dir = val.to_string();
        } else if let Some(val) = arg.strip_prefix("--file=") {
            file = val.to_string();
        }
    }
    (dir, file)
}

fn log_model(model: &Model, depth: usize) {
    let indent = "  ".repeat(depth);
    log::info!(
        "{}'{}': {} triangle(s), material '{}'{}",
        indent,
        model.name,
        model.buffers.triangle_count(),
        model.material.name,
        match &model.material.albedo_texture {
            Some(stem) => format!(", albedo '{stem}'"),
            None => String::new(),
        }
    );
    for child in &model.children {
        log_model(child, depth + 1);
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let (dir, file) = parse_path_args();
    log::info!("Starting Zorya3D loader. dir={}, file={}", dir, file);

    let source = FsSource;
    let mut textures = ImageTextureLoader::new();
    let model = asset::load_model(&source, &mut textures, &dir, &file)?;

    log_model(&model, 0);
    log::info!(
        "Done: {} model(s), {} texture(s) resident.",
        model.count(),
        textures.len()
    );
    Ok(())
}
