//! Error types shared by every stage of the pixel art pipeline.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a conversion run.
#[derive(Error, Debug)]
pub enum PixelArtError {
    /// The source image or a user supplied value cannot be used.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An output file could not be written.
    #[error("failed to write {}: {source}", path.display())]
    IoFailure {
        /// The file that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Options are missing or contradict each other.
    #[error("configuration error: {0}")]
    ConfigurationError(String),
}

impl PixelArtError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError(message.into())
    }

    pub fn io_failure(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::IoFailure {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, PixelArtError>;
