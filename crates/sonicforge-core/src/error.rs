//! Error types for Sonic Forge.

use thiserror::Error;

/// Main error type for Sonic Forge operations.
#[derive(Error, Debug)]
pub enum SonicForgeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Playback error: {0}")]
    Playback(String),

    #[error("Operation failed: {0}")]
    Operation(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Resource not found: {0}")]
    NotFound(String),
}

/// The three kinds of failure a user can observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Input was rejected before any state changed.
    Validation,
    /// The playback driver could not start or keep running.
    Playback,
    /// Anything else: export, save, load, configuration.
    Operation,
}

impl SonicForgeError {
    /// Classify this error for user notification.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) | Self::InvalidParameter(_) => ErrorKind::Validation,
            Self::Playback(_) => ErrorKind::Playback,
            Self::Io(_)
            | Self::Operation(_)
            | Self::Serialization(_)
            | Self::Config(_)
            | Self::NotFound(_) => ErrorKind::Operation,
        }
    }
}

/// Result type alias for Sonic Forge operations.
pub type Result<T> = std::result::Result<T, SonicForgeError>;
