use clap::Parser;
use log::{error, info};
use phong_raster::app;
use phong_raster::io::config::Config;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// TOML-driven software rasterizer.
#[derive(Parser, Debug)]
#[command(name = "phong-raster")]
#[command(about = "Renders triangle-mesh scenes as wireframe, Gouraud or Phong images")]
struct Cli {
    /// Scene description (TOML). A built-in demo scene is used when omitted.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the render mode: wireframe, gouraud or phong.
    #[arg(short, long)]
    mode: Option<String>,

    /// Override the output image path (.ppm writes plain-text PPM).
    #[arg(short, long, value_name = "FILE")]
    output: Option<String>,

    #[arg(long)]
    width: Option<usize>,

    #[arg(long)]
    height: Option<usize>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp(None)
        .format_level(true)
        .init();

    let cli = Cli::parse();

    let (mut config, base_dir) = match &cli.config {
        Some(path) => {
            info!("Loading configuration: {}", path.display());
            match Config::load(path) {
                Ok(config) => {
                    let base_dir = path.parent().unwrap_or(Path::new(".")).to_path_buf();
                    (config, base_dir)
                }
                Err(e) => {
                    error!("Failed to load configuration: {e}");
                    return ExitCode::FAILURE;
                }
            }
        }
        None => {
            info!("No configuration given, using the demo scene");
            (Config::default(), PathBuf::from("."))
        }
    };

    // CLI flags override file settings.
    if let Some(mode) = cli.mode {
        config.render.mode = mode;
    }
    if let Some(output) = cli.output {
        config.render.output = output;
    }
    if let Some(width) = cli.width {
        config.render.width = width;
    }
    if let Some(height) = cli.height {
        config.render.height = height;
    }

    match app::run(&config, &base_dir) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
