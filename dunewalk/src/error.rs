use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by Dunewalk while building or loading a session.
///
/// Nothing in here is produced by a tick: per-frame queries coerce bad input
/// instead of failing.
#[derive(Debug, Error)]
pub enum DuneError {
    /// An image could not be read or decoded. Fatal: no session can exist without sprites.
    #[error("failed to load asset `{path}`")]
    AssetLoad {
        path: String,
        #[source]
        source: image::ImageError,
    },

    /// A texture the level needs was not loaded before the session was built.
    #[error("asset `{key}` was not loaded")]
    MissingAsset { key: String },

    /// Static layout data contained a rectangle with zero, negative or non-finite size.
    #[error("collider #{index} has degenerate size {width}x{height}")]
    DegenerateRectangle { index: usize, width: f32, height: f32 },

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("failed to read `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type DuneResult<T> = std::result::Result<T, DuneError>;
