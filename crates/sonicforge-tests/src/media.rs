//! Integration tests for import validation and export.

use sonicforge_core::{EditorConfig, ValidationLimits};
use sonicforge_media::{export_file_name, ExportCancel, ExportJob};
use sonicforge_ui::{EditorState, Severity, TimerDriver};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

fn editor(dir: &Path, validation: ValidationLimits) -> EditorState {
    let config = EditorConfig {
        validation,
        library_path: Some(dir.join("library.json")),
        ..EditorConfig::default()
    };
    EditorState::new(config, TimerDriver::Manual)
}

fn write_audio(dir: &Path, name: &str, len: usize) -> std::path::PathBuf {
    let path = dir.join(name);
    let bytes: Vec<u8> = (0..len).map(|i| (i * 7 % 251) as u8).collect();
    std::fs::write(&path, bytes).unwrap();
    path
}

#[test]
fn import_resets_session_view() {
    let dir = tempfile::tempdir().unwrap();
    let mut ed = editor(dir.path(), ValidationLimits::default());
    ed.canvas.seek(50.0);
    ed.canvas.select_all();
    ed.canvas.play();

    let path = write_audio(dir.path(), "Take 1.FLAC", 2048);
    let loaded = ed.import(&path).unwrap();
    assert_eq!(loaded.name, "Take 1.FLAC");
    assert_eq!(loaded.size, 2048);
    assert!(loaded.warnings.is_empty());

    assert!(!ed.canvas.is_playing());
    assert_eq!(ed.canvas.position(), 0.0);
    assert_eq!(ed.canvas.selection(), None);
    assert!(!ed.canvas.can_undo_selection());
    assert_eq!(ed.canvas.series().len(), 2000);
}

#[test]
fn too_small_and_unsupported_files_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut ed = editor(dir.path(), ValidationLimits::default());

    let tiny = write_audio(dir.path(), "tiny.wav", 100);
    let text = write_audio(dir.path(), "readme.txt", 4096);
    assert!(!ed.import_or_report(&tiny));
    assert!(!ed.import_or_report(&text));
    assert!(ed.loaded_file().is_none());

    let errors = ed.errors.errors();
    assert_eq!(errors.len(), 2);
    assert!(errors.iter().all(|e| e.severity == Severity::Warning));
}

#[test]
fn directory_named_like_audio_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut ed = editor(dir.path(), ValidationLimits::default());
    let album = dir.path().join("album.wav");
    std::fs::create_dir(&album).unwrap();

    assert!(!ed.import_or_report(&album));
    assert!(ed.loaded_file().is_none());
    assert_eq!(ed.errors.errors()[0].code.as_deref(), Some("validation"));
}

#[test]
fn large_file_is_accepted_with_warning_toast() {
    let dir = tempfile::tempdir().unwrap();
    let limits = ValidationLimits {
        large_file_warning_bytes: 2000,
        ..ValidationLimits::default()
    };
    let mut ed = editor(dir.path(), limits);

    let path = write_audio(dir.path(), "long.mp3", 4096);
    assert!(ed.import_or_report(&path));
    assert_eq!(ed.loaded_file().map(|f| f.warnings.len()), Some(1));

    let toasts = ed.errors.take_toasts();
    assert_eq!(toasts.len(), 2);
    assert_eq!(toasts[0].severity, Severity::Warning);
    assert_eq!(toasts[1].severity, Severity::Info);
}

#[test]
fn export_copies_bytes_with_progress() {
    let dir = tempfile::tempdir().unwrap();
    let mut ed = editor(dir.path(), ValidationLimits::default());
    let path = write_audio(dir.path(), "mix.ogg", 200_000);
    ed.import(&path).unwrap();

    let out_dir = dir.path().join("exports");
    std::fs::create_dir(&out_dir).unwrap();
    let reports = AtomicUsize::new(0);
    let out = ed
        .export(
            &out_dir,
            |p| {
                assert!(p.fraction() <= 1.0);
                reports.fetch_add(1, Ordering::Relaxed);
            },
            &ExportCancel::new(),
        )
        .unwrap();

    assert_eq!(out, out_dir.join(export_file_name("mix.ogg")));
    assert_eq!(std::fs::read(&out).unwrap(), std::fs::read(&path).unwrap());
    // 200 000 bytes in 64 KiB chunks
    assert_eq!(reports.load(Ordering::Relaxed), 4);
}

#[test]
fn cancelled_export_leaves_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_audio(dir.path(), "song.wav", 10_000);
    let out_dir = dir.path().join("out");
    std::fs::create_dir(&out_dir).unwrap();

    let cancel = ExportCancel::new();
    let job = ExportJob::new(&source, &out_dir).with_chunk_size(1024);
    let result = job.run(
        |p| {
            if p.bytes_written >= 4096 {
                cancel.cancel();
            }
        },
        &cancel,
    );

    assert!(result.is_err());
    assert!(!out_dir.join("song_export.wav").exists());
}

#[test]
fn export_into_source_directory_keeps_source() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_audio(dir.path(), "song.wav", 3000);
    let out = ExportJob::new(&source, dir.path())
        .run(|_| {}, &ExportCancel::new())
        .unwrap();
    assert_eq!(out, dir.path().join("song_export.wav"));
    assert_eq!(std::fs::read(&out).unwrap(), std::fs::read(&source).unwrap());
}
