//! Sonic Forge Media - audio file I/O
//!
//! This crate handles:
//! - Import validation (format, MIME, size, file name)
//! - Identity export under a derived file name

pub mod export;
pub mod validation;

pub use export::{export_bytes, export_file_name, ExportCancel, ExportJob, ExportProgress};
pub use validation::{
    format_file_size, get_file_extension, sanitize_project_name, validate, AudioFileCandidate,
    AudioFormat, ValidationError, ValidationReport,
};
