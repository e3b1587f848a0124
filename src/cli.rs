//! Command line surface
//!
//! The scene-override flags are historically spelled with a single dash
//! (`-ar 1.5`, `-bg 0 0 0`). They are rewritten to clap long options before
//! parsing, and a flag whose values are missing or not numeric is dropped so
//! the scene file's value stays in effect.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

use crate::cameras::CameraConfig;
use crate::renderer::RenderOptions;
use crate::{Color, Point, Vec3};

/// Log levels selectable from the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Command line arguments structure using clap derive macros
#[derive(Debug, Parser)]
#[command(name = "raytracer")]
#[command(about = "Render a YAML scene with a tiled Monte-Carlo path tracer")]
pub struct Args {
    /// Ratio of image width over height
    #[arg(long = "ar", value_name = "DOUBLE", allow_negative_numbers = true)]
    pub aspect_ratio: Option<f64>,

    /// Rendered image width in pixel count
    #[arg(long = "iw", value_name = "INT")]
    pub image_width: Option<u32>,

    /// Number of rays sent into each pixel
    #[arg(long = "spp", value_name = "INT")]
    pub samples_per_pixel: Option<u32>,

    /// Maximum number of ray bounces into the scene
    #[arg(long = "md", value_name = "INT")]
    pub max_depth: Option<u32>,

    /// Background color of the rendered scene
    #[arg(long = "bg", num_args = 3, value_names = ["R", "G", "B"], allow_negative_numbers = true)]
    pub background: Option<Vec<f64>>,

    /// Vertical field of view in degrees
    #[arg(long = "vf", value_name = "DOUBLE", allow_negative_numbers = true)]
    pub vfov: Option<f64>,

    /// Camera position (x, y, z)
    #[arg(long = "lf", num_args = 3, value_names = ["X", "Y", "Z"], allow_negative_numbers = true)]
    pub look_from: Option<Vec<f64>>,

    /// Point the camera is aimed at (x, y, z)
    #[arg(long = "la", num_args = 3, value_names = ["X", "Y", "Z"], allow_negative_numbers = true)]
    pub look_at: Option<Vec<f64>>,

    /// Up direction of the camera (x, y, z)
    #[arg(long = "vu", num_args = 3, value_names = ["X", "Y", "Z"], allow_negative_numbers = true)]
    pub vup: Option<Vec<f64>>,

    /// Defocus angle in degrees; 0 gives a pinhole camera
    #[arg(long = "da", value_name = "DOUBLE", allow_negative_numbers = true)]
    pub defocus_angle: Option<f64>,

    /// Distance from the camera to the plane of perfect focus
    #[arg(long = "fd", value_name = "DOUBLE", allow_negative_numbers = true)]
    pub focus_dist: Option<f64>,

    /// Output file (.png for PNG, anything else for P3 text); stdout when absent
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Worker threads
    #[arg(long, default_value_t = 16)]
    pub threads: usize,

    /// Tiles along each image axis
    #[arg(long, default_value_t = 16)]
    pub tiles: u32,

    /// Base seed for all sampling
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Set the logging level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Scene description file
    pub scene: PathBuf,
}

impl Args {
    /// Replace scene-file camera values with any given on the command line
    pub fn apply_overrides(&self, config: &mut CameraConfig) {
        if let Some(v) = self.aspect_ratio {
            config.aspect_ratio = v;
        }
        if let Some(v) = self.image_width {
            config.image_width = v;
        }
        if let Some(v) = self.samples_per_pixel {
            config.samples_per_pixel = v;
        }
        if let Some(v) = self.max_depth {
            config.max_depth = v;
        }
        if let Some(v) = triple(&self.background) {
            config.background = Color::from(v);
        }
        if let Some(v) = self.vfov {
            config.vfov = v;
        }
        if let Some(v) = triple(&self.look_from) {
            config.look_from = Point::from(v);
        }
        if let Some(v) = triple(&self.look_at) {
            config.look_at = Point::from(v);
        }
        if let Some(v) = triple(&self.vup) {
            config.vup = Vec3::from(v);
        }
        if let Some(v) = self.defocus_angle {
            config.defocus_angle = v;
        }
        if let Some(v) = self.focus_dist {
            config.focus_dist = v;
        }
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            threads: self.threads,
            tiles_per_axis: self.tiles,
            seed: self.seed,
            show_progress: !self.no_progress,
        }
    }
}

fn triple(values: &Option<Vec<f64>>) -> Option<[f64; 3]> {
    match values.as_deref() {
        Some(&[x, y, z]) => Some([x, y, z]),
        _ => None,
    }
}

#[derive(Clone, Copy)]
enum Arity {
    Float(usize),
    Int,
}

/// Single-dash flag, its clap spelling and the values it expects
const SCENE_FLAGS: &[(&str, &str, Arity)] = &[
    ("-ar", "--ar", Arity::Float(1)),
    ("-iw", "--iw", Arity::Int),
    ("-spp", "--spp", Arity::Int),
    ("-md", "--md", Arity::Int),
    ("-bg", "--bg", Arity::Float(3)),
    ("-vf", "--vf", Arity::Float(1)),
    ("-lf", "--lf", Arity::Float(3)),
    ("-la", "--la", Arity::Float(3)),
    ("-vu", "--vu", Arity::Float(3)),
    ("-da", "--da", Arity::Float(1)),
    ("-fd", "--fd", Arity::Float(1)),
];

/// Result of rewriting raw arguments for clap
#[derive(Debug, Default, PartialEq)]
pub struct Normalized {
    pub args: Vec<String>,
    /// Flags dropped because their values were missing or malformed
    pub ignored: Vec<String>,
}

/// Rewrite single-dash scene flags to their long form and drop incomplete ones
///
/// The last argument is the scene path and is never consumed as a flag value.
pub fn normalize_args<I>(raw: I) -> Normalized
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    let raw: Vec<String> = raw.into_iter().map(Into::into).collect();
    let mut out = Normalized::default();
    let Some((program, rest)) = raw.split_first() else {
        return out;
    };
    out.args.push(program.clone());

    // Values may not run into the trailing scene path
    let value_end = rest.len().saturating_sub(1);
    let mut i = 0;
    while i < rest.len() {
        let token = &rest[i];
        let flag = SCENE_FLAGS
            .iter()
            .find(|(short, long, _)| token == short || token == long);
        let Some(&(_, long, arity)) = flag else {
            out.args.push(token.clone());
            i += 1;
            continue;
        };

        let wanted = match arity {
            Arity::Float(n) => n,
            Arity::Int => 1,
        };
        let available = &rest[(i + 1).min(value_end)..(i + 1 + wanted).min(value_end)];
        let valid = available
            .iter()
            .take_while(|v| match arity {
                Arity::Float(_) => v.parse::<f64>().is_ok(),
                Arity::Int => v.parse::<u32>().is_ok(),
            })
            .count();

        if valid == wanted {
            out.args.push(long.to_owned());
            out.args.extend(available.iter().cloned());
            i += 1 + wanted;
        } else {
            out.ignored.push(token.clone());
            // Drop the flag with its partial values, but not a following option
            let consumed = available.iter().take_while(|v| !is_option(v)).count();
            i += 1 + consumed;
        }
    }
    out
}

fn is_option(token: &str) -> bool {
    token.starts_with('-') && token.parse::<f64>().is_err()
}
