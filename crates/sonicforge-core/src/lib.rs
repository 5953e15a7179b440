//! Sonic Forge Core - Foundation types for the audio editor
//!
//! This crate provides the fundamental types used throughout Sonic Forge:
//! - Time ranges and duration formatting
//! - The shared error type and its user-facing classification
//! - Editor configuration (canvas, zoom, playback, validation limits)

pub mod config;
pub mod error;
pub mod time;

pub use config::{
    CanvasConfig, EditorConfig, LoggingConfig, PlaybackConfig, ValidationLimits, ZoomBounds,
};
pub use error::{ErrorKind, Result, SonicForgeError};
pub use time::{clamp_time, format_duration, TimeRange};

/// Byte-size constants used by import validation.
pub mod size_limits {
    /// Largest accepted input file.
    pub const MAX_FILE_SIZE: u64 = 500 * 1024 * 1024; // 500 MiB

    /// Smallest accepted input file; anything below is treated as empty.
    pub const MIN_FILE_SIZE: u64 = 1024; // 1 KiB

    /// Files above this size are accepted with a warning.
    pub const LARGE_FILE_WARNING: u64 = 100 * 1024 * 1024; // 100 MiB
}
