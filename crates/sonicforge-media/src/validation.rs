//! Validation of audio files offered for import.
//!
//! Checks run in a fixed order and the first hard failure wins. MIME
//! mismatches and large files only produce warnings.

use serde::{Deserialize, Serialize};
use sonicforge_core::{Result, SonicForgeError, ValidationLimits};
use std::fmt;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

/// Longest project name kept by [`sanitize_project_name`].
pub const MAX_PROJECT_NAME_LEN: usize = 100;

/// Supported audio container formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AudioFormat {
    Mp3,
    Wav,
    Ogg,
    M4a,
    Flac,
    Aac,
}

impl AudioFormat {
    pub const ALL: [Self; 6] = [
        Self::Mp3,
        Self::Wav,
        Self::Ogg,
        Self::M4a,
        Self::Flac,
        Self::Aac,
    ];

    pub fn extension(self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Wav => "wav",
            Self::Ogg => "ogg",
            Self::M4a => "m4a",
            Self::Flac => "flac",
            Self::Aac => "aac",
        }
    }

    /// Expected MIME type.
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Mp3 => "audio/mpeg",
            Self::Wav => "audio/wav",
            Self::Ogg => "audio/ogg",
            Self::M4a => "audio/mp4",
            Self::Flac => "audio/flac",
            Self::Aac => "audio/aac",
        }
    }

    /// Case-insensitive lookup by extension (without the dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_ascii_lowercase();
        Self::ALL.into_iter().find(|f| f.extension() == ext)
    }

    /// Comma-separated list of supported extensions.
    pub fn supported_list() -> String {
        Self::ALL
            .iter()
            .map(|f| f.extension())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Reasons a file is refused.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("No file provided")]
    NoFile,

    #[error("File size exceeds maximum limit of {max_mb}MB")]
    TooLarge { max_mb: u64 },

    #[error("File appears to be empty or corrupted")]
    TooSmall,

    #[error("File has no extension")]
    NoExtension,

    #[error("Unsupported audio format. Supported formats: {supported}")]
    UnsupportedFormat { supported: String },

    #[error("Invalid filename detected")]
    InvalidFilename,
}

impl From<ValidationError> for SonicForgeError {
    fn from(err: ValidationError) -> Self {
        SonicForgeError::Validation(err.to_string())
    }
}

/// What the host knows about a file before reading it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFileCandidate {
    /// File name as presented by the picker, not a full path.
    pub name: String,
    pub size: u64,
    /// MIME type, when the host reports one.
    pub mime: Option<String>,
}

impl AudioFileCandidate {
    pub fn new(name: impl Into<String>, size: u64, mime: Option<String>) -> Self {
        Self {
            name: name.into(),
            size,
            mime,
        }
    }

    /// Build a candidate from a file on disk. The MIME type is left unset.
    pub fn from_path(path: &Path) -> Result<Self> {
        let metadata = std::fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(SonicForgeError::InvalidParameter(format!(
                "Not a file: {}",
                path.display()
            )));
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                SonicForgeError::InvalidParameter(format!("Not a file: {}", path.display()))
            })?;
        Ok(Self::new(name, metadata.len(), None))
    }
}

/// An accepted file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub format: AudioFormat,
    pub warnings: Vec<String>,
}

/// Extension after the last dot, if any.
pub fn get_file_extension(name: &str) -> Option<&str> {
    let (_, ext) = name.rsplit_once('.')?;
    if ext.is_empty() {
        None
    } else {
        Some(ext)
    }
}

/// Validate an import candidate against `limits`.
pub fn validate(
    candidate: &AudioFileCandidate,
    limits: &ValidationLimits,
) -> std::result::Result<ValidationReport, ValidationError> {
    let mut warnings = Vec::new();

    if candidate.name.is_empty() {
        return Err(ValidationError::NoFile);
    }

    if candidate.size > limits.max_bytes {
        return Err(ValidationError::TooLarge {
            max_mb: limits.max_bytes / 1024 / 1024,
        });
    }
    if candidate.size < limits.min_bytes {
        return Err(ValidationError::TooSmall);
    }

    let ext = get_file_extension(&candidate.name).ok_or(ValidationError::NoExtension)?;
    let format =
        AudioFormat::from_extension(ext).ok_or_else(|| ValidationError::UnsupportedFormat {
            supported: AudioFormat::supported_list(),
        })?;

    if let Some(mime) = candidate.mime.as_deref().filter(|m| !m.is_empty()) {
        if mime != format.mime_type() && !mime.starts_with("audio/") {
            warnings.push(format!(
                "File MIME type \"{}\" doesn't match expected type for {}",
                mime, format
            ));
        }
    }

    let name = &candidate.name;
    if name.contains("..") || name.contains('/') || name.contains('\\') {
        return Err(ValidationError::InvalidFilename);
    }

    if candidate.size > limits.large_file_warning_bytes {
        warnings.push("Large file detected. Processing may take longer.".to_string());
    }

    for warning in &warnings {
        warn!(file = %name, "{}", warning);
    }
    debug!(file = %name, %format, size = candidate.size, "File accepted");

    Ok(ValidationReport { format, warnings })
}

/// Human-readable size with up to two decimals: `1.5 KB`, `0 Bytes`.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = (value * 100.0).round() / 100.0;
    // Drop trailing zeros the way a plain number print would.
    let text = format!("{:.2}", rounded);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", text, UNITS[unit])
}

/// Make a project name safe for use as a file name.
///
/// Keeps ASCII letters, digits, `-`, `_`, `.` and spaces, turns each run of
/// spaces into one underscore, and caps the length.
pub fn sanitize_project_name(name: &str) -> String {
    let kept: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ' '))
        .collect();

    let mut out = String::with_capacity(kept.len());
    let mut in_space = false;
    for c in kept.chars() {
        if c == ' ' {
            if !in_space {
                out.push('_');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out.truncate(MAX_PROJECT_NAME_LEN);
    out
}
