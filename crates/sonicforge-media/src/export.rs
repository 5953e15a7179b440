//! Export of the loaded audio file.
//!
//! Export is an identity transform: the original bytes are written under a
//! derived file name. Supports progress reporting and cancellation.

use sonicforge_core::{Result, SonicForgeError};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

use crate::validation::{get_file_extension, sanitize_project_name};

/// Bytes copied between progress reports.
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Output file name for an export of `source_name`: `<stem>_export.<ext>`.
///
/// The stem is sanitized; a missing extension yields `<stem>_export`.
pub fn export_file_name(source_name: &str) -> String {
    let (stem, ext) = match get_file_extension(source_name) {
        Some(ext) => (&source_name[..source_name.len() - ext.len() - 1], Some(ext)),
        None => (source_name, None),
    };
    let stem = match sanitize_project_name(stem) {
        s if s.is_empty() => "audio".to_string(),
        s => s,
    };
    match ext {
        Some(ext) => format!("{}_export.{}", stem, ext.to_ascii_lowercase()),
        None => format!("{}_export", stem),
    }
}

/// In-memory export: the same bytes under the derived name.
pub fn export_bytes(source_name: &str, data: &[u8]) -> (String, Vec<u8>) {
    (export_file_name(source_name), data.to_vec())
}

/// Export progress information.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportProgress {
    pub bytes_written: u64,
    pub total_bytes: u64,
}

impl ExportProgress {
    /// Completion fraction (0.0 to 1.0).
    pub fn fraction(&self) -> f64 {
        if self.total_bytes == 0 {
            return 1.0;
        }
        self.bytes_written as f64 / self.total_bytes as f64
    }
}

/// An export job configuration.
#[derive(Debug, Clone)]
pub struct ExportJob {
    /// File being exported.
    pub source: PathBuf,
    /// Directory receiving the exported file.
    pub output_dir: PathBuf,
    pub chunk_size: usize,
}

impl ExportJob {
    pub fn new(source: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            output_dir: output_dir.into(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Where the exported file will be written.
    pub fn output_path(&self) -> Result<PathBuf> {
        let name = self
            .source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                SonicForgeError::InvalidParameter(format!(
                    "Export source has no file name: {}",
                    self.source.display()
                ))
            })?;
        Ok(self.output_dir.join(export_file_name(&name)))
    }

    /// Run the export.
    ///
    /// * `on_progress` – called after every chunk.
    /// * `cancel` – checked before every chunk.
    ///
    /// A cancelled or failed export removes its partial output.
    pub fn run(
        &self,
        on_progress: impl Fn(ExportProgress),
        cancel: &ExportCancel,
    ) -> Result<PathBuf> {
        let output = self.output_path()?;
        if same_file(&self.source, &output) {
            return Err(SonicForgeError::Operation(format!(
                "Refusing to overwrite source file {}",
                self.source.display()
            )));
        }

        let mut reader = File::open(&self.source)?;
        let total_bytes = reader.metadata()?.len();
        let mut writer = File::create(&output)?;

        let copied = self.copy(&mut reader, &mut writer, total_bytes, on_progress, cancel);
        drop(writer);
        let bytes_written = match copied {
            Ok(n) => n,
            Err(e) => {
                if let Err(rm) = std::fs::remove_file(&output) {
                    warn!(path = %output.display(), "Failed to remove partial export: {}", rm);
                }
                return Err(e);
            }
        };

        info!(
            source = %self.source.display(),
            output = %output.display(),
            bytes = bytes_written,
            "Export finished"
        );
        Ok(output)
    }

    /// Chunked copy; returns the number of bytes written.
    fn copy(
        &self,
        reader: &mut impl Read,
        writer: &mut impl Write,
        total_bytes: u64,
        on_progress: impl Fn(ExportProgress),
        cancel: &ExportCancel,
    ) -> Result<u64> {
        let mut buf = vec![0u8; self.chunk_size.max(1)];
        let mut bytes_written = 0u64;
        loop {
            if cancel.is_cancelled() {
                return Err(SonicForgeError::Operation("Export cancelled".into()));
            }
            let n = reader.read(&mut buf)?;
            if n == 0 {
                break;
            }
            writer.write_all(&buf[..n])?;
            bytes_written += n as u64;
            on_progress(ExportProgress {
                bytes_written,
                total_bytes,
            });
        }
        writer.flush()?;
        Ok(bytes_written)
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Handle for cancelling an in-progress export.
#[derive(Debug, Clone)]
pub struct ExportCancel(Arc<AtomicBool>);

impl ExportCancel {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    /// Signal cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

impl Default for ExportCancel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_export_file_name() {
        assert_eq!(export_file_name("My Song.MP3"), "My_Song_export.mp3");
        assert_eq!(export_file_name("take.1.wav"), "take.1_export.wav");
        assert_eq!(export_file_name("raw"), "raw_export");
        assert_eq!(export_file_name("!!!.ogg"), "audio_export.ogg");
    }

    #[test]
    fn test_export_bytes_is_identity() {
        let data = [1u8, 2, 3, 4];
        let (name, out) = export_bytes("a.flac", &data);
        assert_eq!(name, "a_export.flac");
        assert_eq!(out, data);
    }

    #[test]
    fn test_run_copies_bytes_with_progress() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("mix.wav");
        let data: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
        std::fs::write(&source, &data).unwrap();

        let reports = RefCell::new(Vec::new());
        let job = ExportJob::new(&source, dir.path()).with_chunk_size(4096);
        let output = job
            .run(|p| reports.borrow_mut().push(p), &ExportCancel::new())
            .unwrap();

        assert_eq!(output, dir.path().join("mix_export.wav"));
        assert_eq!(std::fs::read(&output).unwrap(), data);
        let reports = reports.into_inner();
        assert_eq!(reports.len(), 3);
        assert_eq!(reports.last().unwrap().fraction(), 1.0);
    }

    #[test]
    fn test_cancelled_export_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("mix.wav");
        std::fs::write(&source, vec![7u8; 2048]).unwrap();

        let cancel = ExportCancel::new();
        cancel.cancel();
        let job = ExportJob::new(&source, dir.path());
        let err = job.run(|_| {}, &cancel).unwrap_err();
        assert!(matches!(err, SonicForgeError::Operation(_)));
        assert!(!dir.path().join("mix_export.wav").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_refuses_to_overwrite_source() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("mix.wav");
        std::fs::write(&source, vec![1u8; 2048]).unwrap();
        // The export target is a link back to the source.
        std::os::unix::fs::symlink(&source, dir.path().join("mix_export.wav")).unwrap();

        let job = ExportJob::new(&source, dir.path());
        let err = job.run(|_| {}, &ExportCancel::new()).unwrap_err();
        assert!(err.to_string().contains("Refusing to overwrite"));
        assert_eq!(std::fs::read(&source).unwrap(), vec![1u8; 2048]);
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_copy_removes_partial_output() {
        let dir = tempfile::tempdir().unwrap();
        // Opening a directory succeeds on unix; reading from it fails after
        // the output file exists.
        let source = dir.path().join("mix.wav");
        std::fs::create_dir(&source).unwrap();
        let out_dir = dir.path().join("out");
        std::fs::create_dir(&out_dir).unwrap();

        let job = ExportJob::new(&source, &out_dir);
        let err = job.run(|_| {}, &ExportCancel::new()).unwrap_err();
        assert!(matches!(err, SonicForgeError::Io(_)));
        assert!(!out_dir.join("mix_export.wav").exists());
    }

    #[test]
    fn test_cancel_mid_copy_removes_partial_output() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("mix.wav");
        std::fs::write(&source, vec![3u8; 8192]).unwrap();
        let out_dir = dir.path().join("out");
        std::fs::create_dir(&out_dir).unwrap();

        let cancel = ExportCancel::new();
        let job = ExportJob::new(&source, &out_dir).with_chunk_size(1024);
        let result = job.run(
            |p| {
                if p.bytes_written == 2048 {
                    cancel.cancel();
                }
            },
            &cancel,
        );
        assert!(result.is_err());
        assert!(!out_dir.join("mix_export.wav").exists());
    }

    #[test]
    fn test_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let job = ExportJob::new(dir.path().join("nope.mp3"), dir.path());
        assert!(matches!(
            job.run(|_| {}, &ExportCancel::new()),
            Err(SonicForgeError::Io(_))
        ));
    }
}
