//! Error types shared across facegest crates.

use std::path::PathBuf;

/// Top-level error type for facegest operations.
#[derive(Debug, thiserror::Error)]
pub enum FacegestError {
    /// A landmark index required by the layout is missing from the frame.
    ///
    /// Fatal to the current frame only; session state is left untouched.
    #[error("Insufficient landmarks: index {index} requested but only {available} points supplied")]
    InsufficientLandmarks { index: usize, available: usize },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Sink error: {message}")]
    Sink { message: String },

    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using FacegestError.
pub type FacegestResult<T> = Result<T, FacegestError>;

impl FacegestError {
    pub fn insufficient_landmarks(index: usize, available: usize) -> Self {
        Self::InsufficientLandmarks { index, available }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn sink(msg: impl Into<String>) -> Self {
        Self::Sink {
            message: msg.into(),
        }
    }

    pub fn parse(line: usize, msg: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: msg.into(),
        }
    }

    /// Whether the error only invalidates a single frame.
    pub fn is_frame_local(&self) -> bool {
        matches!(self, Self::InsufficientLandmarks { .. })
    }
}
