//! Editor configuration.
//!
//! Stored as JSON. Every field has a default so a partial file (or no file)
//! is valid.

use crate::error::{Result, SonicForgeError};
use crate::size_limits;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Top-level editor configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EditorConfig {
    pub canvas: CanvasConfig,
    pub zoom: ZoomBounds,
    pub playback: PlaybackConfig,
    pub validation: ValidationLimits,
    pub logging: LoggingConfig,
    /// Where the project library is persisted. `None` uses the data dir.
    pub library_path: Option<PathBuf>,
}

/// Waveform canvas geometry and synthetic data shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Logical width in pixels.
    pub width: f32,
    /// Logical height in pixels.
    pub height: f32,
    /// Length of the amplitude series.
    pub sample_count: usize,
    /// Duration assumed when no media has reported one.
    pub default_duration: f64,
    /// Seed for the synthetic source. `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 200.0,
            sample_count: 2000,
            default_duration: 180.0,
            seed: None,
        }
    }
}

/// Zoom factor limits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomBounds {
    pub min: f64,
    pub max: f64,
}

impl ZoomBounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Clamp a requested factor. Non-finite requests fall back to 1.0 first.
    pub fn clamp(self, factor: f64) -> f64 {
        let factor = if factor.is_finite() { factor } else { 1.0 };
        factor.clamp(self.min, self.max)
    }
}

impl Default for ZoomBounds {
    fn default() -> Self {
        Self::new(0.1, 8.0)
    }
}

/// Simulated playback timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Wall-clock period between ticks.
    pub tick_interval_ms: u64,
    /// Seconds of media advanced per tick.
    pub tick_step: f64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 100,
            tick_step: 0.1,
        }
    }
}

/// Input file acceptance limits in bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationLimits {
    pub max_bytes: u64,
    pub min_bytes: u64,
    pub large_file_warning_bytes: u64,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            max_bytes: size_limits::MAX_FILE_SIZE,
            min_bytes: size_limits::MIN_FILE_SIZE,
            large_file_warning_bytes: size_limits::LARGE_FILE_WARNING,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

impl EditorConfig {
    /// Default config file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sonicforge")
            .join("config.json")
    }

    /// Default project library path.
    pub fn default_library_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sonicforge")
            .join("projects.json")
    }

    /// The configured library path, or the default one.
    pub fn library_path(&self) -> PathBuf {
        self.library_path
            .clone()
            .unwrap_or_else(Self::default_library_path)
    }

    /// Parse from JSON bytes and validate.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let config: Self = serde_json::from_slice(data)
            .map_err(|e| SonicForgeError::Config(format!("Invalid config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON bytes.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self)
            .map_err(|e| SonicForgeError::Serialization(format!("Failed to serialize config: {}", e)))
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        let data = std::fs::read(path)?;
        let config = Self::from_json(&data)?;
        info!(path = %path.display(), "Loaded editor config");
        Ok(config)
    }

    /// Write to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Reject configurations the editor cannot honour.
    pub fn validate(&self) -> Result<()> {
        let zoom = self.zoom;
        if !(zoom.min.is_finite() && zoom.max.is_finite()) || zoom.min <= 0.0 || zoom.min > zoom.max
        {
            return Err(SonicForgeError::Config(format!(
                "zoom bounds must satisfy 0 < min <= max, got {}..{}",
                zoom.min, zoom.max
            )));
        }
        if self.canvas.width <= 0.0 || self.canvas.height <= 0.0 {
            return Err(SonicForgeError::Config(
                "canvas dimensions must be positive".into(),
            ));
        }
        if self.canvas.sample_count == 0 {
            return Err(SonicForgeError::Config(
                "canvas sample_count must be non-zero".into(),
            ));
        }
        if !(self.canvas.default_duration.is_finite() && self.canvas.default_duration > 0.0) {
            return Err(SonicForgeError::Config(
                "default_duration must be positive".into(),
            ));
        }
        if self.playback.tick_interval_ms == 0 || self.playback.tick_step <= 0.0 {
            return Err(SonicForgeError::Config(
                "playback tick interval and step must be positive".into(),
            ));
        }
        if self.validation.min_bytes > self.validation.max_bytes {
            return Err(SonicForgeError::Config(
                "validation min_bytes exceeds max_bytes".into(),
            ));
        }
        Ok(())
    }
}
