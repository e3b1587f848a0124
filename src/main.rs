//! Render a scene file to an image
use std::io::{self, BufWriter};

use anyhow::Context;
use clap::{CommandFactory, Parser};
use log::{info, warn, LevelFilter};

use raytracer::cli::{normalize_args, Args};
use raytracer::prelude::*;
use raytracer::output;

/// Initialize the logger with the specified level
fn init_logger(level: LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() -> anyhow::Result<()> {
    let raw: Vec<String> = std::env::args().collect();
    // Usage goes to stderr; stdout is reserved for the image
    if raw.len() <= 1 {
        eprintln!("{}", Args::command().render_help());
        return Ok(());
    }

    let normalized = normalize_args(raw);
    let args = Args::parse_from(&normalized.args);
    init_logger(args.log_level.into());
    for flag in &normalized.ignored {
        warn!("Ignoring {flag}: missing or invalid value");
    }

    let scene = Scene::load(&args.scene)
        .with_context(|| format!("could not build scene from {}", args.scene.display()))?;

    let mut config = scene.camera.clone();
    args.apply_overrides(&mut config);
    let camera = Camera::new(config)?;

    let image = render(&camera, scene.world(), &args.render_options())?;

    match &args.output {
        Some(path) => {
            output::save(&image, path)
                .with_context(|| format!("could not write {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut out = BufWriter::new(stdout.lock());
            output::write_ppm(&image, &mut out).context("could not write image to stdout")?;
        }
    }
    Ok(())
}
