use clap::Parser;
use log::warn;
use model_viewer::io::config::ViewerConfig;
use model_viewer::io::gltf_loader::check_extension;
use model_viewer::io::hdr::load_hdr;
use model_viewer::scene::backend::HeadlessBackend;
use model_viewer::{ViewerError, ViewerSession};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

/// Headless model inspector: loads a GLB/glTF file through the full viewer
/// pipeline (normalization, palette suggestion, camera framing) and prints
/// the result.
#[derive(Parser)]
#[command(name = "viewer", version, about)]
struct Args {
    /// GLB or glTF model to inspect
    model: PathBuf,

    /// TOML viewer configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Panoramic .hdr environment image (overrides the config)
    #[arg(long)]
    hdr: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::init();
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), ViewerError> {
    // 1. Configuration
    let config = match &args.config {
        Some(path) => ViewerConfig::load(path)?,
        None => ViewerConfig::default(),
    };

    // 2. Session with a bookkeeping-only backend
    let mut session = ViewerSession::new(&config, HeadlessBackend::new());

    // 3. Optional HDRI environment; a bad image keeps the studio default
    let hdr_path = args
        .hdr
        .or_else(|| config.environment.hdr_path.as_ref().map(PathBuf::from));
    if let Some(path) = hdr_path {
        match load_hdr(&path) {
            Ok(texture) => {
                let name = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("environment.hdr")
                    .to_string();
                session.set_environment(&name, texture);
            }
            Err(e) => warn!("keeping studio environment: {e}"),
        }
    }

    // 4. Load the model through the same path the interactive viewer uses
    let file_name = args
        .model
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();
    check_extension(&file_name)?;
    let bytes = fs::read(&args.model)?;
    let info = session.load_model(&file_name, &bytes)?;

    // 5. Report
    println!("Loaded '{}'", info.name);
    println!(
        "  size:   {:.3} x {:.3} x {:.3} units (scale {:.4})",
        info.scaled_size.x, info.scaled_size.y, info.scaled_size.z, info.scale_factor
    );
    println!(
        "  center: ({:.3}, {:.3}, {:.3})",
        info.bounding_center.x, info.bounding_center.y, info.bounding_center.z
    );
    match &info.palette {
        Some(palette) => {
            println!(
                "  average color: ({:.3}, {:.3}, {:.3})",
                palette.average.x, palette.average.y, palette.average.z
            );
            println!(
                "  suggested background: ({:.3}, {:.3}, {:.3}), floor: ({:.3}, {:.3}, {:.3})",
                palette.background.x,
                palette.background.y,
                palette.background.z,
                palette.floor.x,
                palette.floor.y,
                palette.floor.z
            );
        }
        None => println!("  no materials with a base color"),
    }
    println!(
        "  camera: ({:.3}, {:.3}, {:.3}) at distance {:.2}",
        session.camera.position.x,
        session.camera.position.y,
        session.camera.position.z,
        session.camera.distance_to_target()
    );
    println!("  environment: {}", session.environment().display_name());
    println!(
        "  lights: {}, shadow map {}px",
        session.lights.len(),
        session.shadow.map_size
    );

    session.dispose();
    Ok(())
}
