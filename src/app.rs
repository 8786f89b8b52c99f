use crate::core::rasterizer::CullMode;
use crate::error::Result;
use crate::io::config::Config;
use crate::io::image::save_framebuffer;
use crate::pipeline::renderer::{RenderMode, RenderOptions, render_scene_with};
use crate::scene::loader::build_scene;
use log::info;
use nalgebra::Vector3;
use std::path::Path;
use std::time::Instant;

/// Renders the configured scene once and writes the image.
///
/// `base_dir` anchors relative mesh paths, normally the config file's directory.
/// The output path is taken as given.
pub fn run(config: &Config, base_dir: &Path) -> Result<()> {
    let mode: RenderMode = config.render.mode.parse()?;
    let cull_mode: CullMode = config.render.cull_mode.parse()?;
    let options = RenderOptions {
        background: Vector3::from(config.render.background),
        wireframe_color: Vector3::from(config.render.wireframe_color),
        cull_mode,
    };

    info!(
        "Rendering {}x{} ({:?}, cull {:?})...",
        config.render.width, config.render.height, mode, cull_mode
    );
    let start_time = Instant::now();

    let scene = build_scene(config, base_dir)?;
    let framebuffer = render_scene_with(
        &scene,
        config.render.width,
        config.render.height,
        mode,
        &options,
    )?;
    info!("Render completed in {:.2?}", start_time.elapsed());

    let output = Path::new(&config.render.output);
    info!("Saving output to '{}'...", output.display());
    save_framebuffer(&framebuffer, output)?;
    info!("Done.");
    Ok(())
}
