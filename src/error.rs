//! Errors raised while building a scene or producing an image

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("scene load failed: cannot read {}", path.display())]
    SceneRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("scene load failed: {0}")]
    SceneParse(#[from] serde_yaml::Error),

    #[error("unknown material `{name}` referenced by object {index}")]
    UnknownMaterial { name: String, index: usize },

    #[error("invalid material `{name}`: {reason}")]
    InvalidMaterial { name: String, reason: String },

    #[error("invalid object {index}: {reason}")]
    InvalidObject { index: usize, reason: String },

    #[error("invalid camera configuration: {0}")]
    InvalidCamera(String),

    #[error("failed to start render workers")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("failed to write image")]
    Io(#[from] std::io::Error),

    #[error("failed to encode image")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, Error>;
