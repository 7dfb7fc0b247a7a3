use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GridError {
    #[error("Input not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Failed to read image: {}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Invalid character specification: {0}")]
    CharSpec(String),

    #[error("on-char and off-char must be single characters, got {0:?}")]
    Glyph(String),

    #[error("Unknown method: {0}")]
    UnknownMethod(String),

    #[error("Unknown morphological operation: {0}")]
    UnknownMorph(String),

    #[error("Processing failed: {0}")]
    Processing(String),

    #[error("Failed to write {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to save preview to: {}", .path.display())]
    Preview {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl GridError {
    /// Process exit code reported for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            GridError::InputNotFound(_) => 1,
            GridError::Decode { .. } => 2,
            GridError::CharSpec(_) | GridError::UnknownMethod(_) | GridError::UnknownMorph(_) => 2,
            GridError::Glyph(_) => 3,
            GridError::Write { .. } | GridError::Preview { .. } => 4,
            GridError::Processing(_) => 4,
        }
    }
}
