//! Error types shared across Storyline crates.

use std::path::PathBuf;

/// Top-level error type for Storyline operations.
///
/// Editing operations themselves never fail (invalid ids are no-ops); this
/// type covers the boundaries: scene input, configuration, and file I/O.
#[derive(Debug, thiserror::Error)]
pub enum StorylineError {
    #[error("Scene input error: {message}")]
    Scene { message: String },

    #[error("Project error: {message}")]
    Project { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Unsupported operation: {message}")]
    Unsupported { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using StorylineError.
pub type StorylineResult<T> = Result<T, StorylineError>;

impl StorylineError {
    pub fn scene(msg: impl Into<String>) -> Self {
        Self::Scene {
            message: msg.into(),
        }
    }

    pub fn project(msg: impl Into<String>) -> Self {
        Self::Project {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported {
            message: msg.into(),
        }
    }
}
