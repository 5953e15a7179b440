//! Integration tests for the persisted project library.

use sonicforge_core::{EditorConfig, ErrorKind, SonicForgeError};
use sonicforge_timeline::serialization::CURRENT_VERSION;
use sonicforge_timeline::{
    load_library_or, EffectKind, LibraryFile, ProjectLibrary, SessionSummary, TrackList,
};
use sonicforge_ui::{EditorState, TimerDriver};
use std::path::Path;
use uuid::Uuid;

fn editor_at(path: &Path) -> EditorState {
    let config = EditorConfig {
        library_path: Some(path.to_path_buf()),
        ..EditorConfig::default()
    };
    EditorState::new(config, TimerDriver::Manual)
}

#[test]
fn saved_session_records_tracks_and_active_effects() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("library.json");
    let mut ed = editor_at(&path);

    ed.rack.toggle(EffectKind::Distortion).unwrap();
    let saved = ed.save_project("Demo Take").unwrap();
    assert_eq!(saved.duration, 180.0);
    assert_eq!(saved.tracks, 3);
    assert_eq!(saved.effects, vec!["Reverb", "Compressor", "Distortion"]);

    let on_disk = LibraryFile::load_from_file(&path).unwrap();
    assert_eq!(on_disk.version, CURRENT_VERSION);
    assert_eq!(on_disk.projects.len(), 4);
    assert_eq!(on_disk.projects[3], saved);
}

#[test]
fn library_survives_restart_and_lists_newest_first() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("library.json");
    let saved_id = {
        let mut ed = editor_at(&path);
        ed.save_project("Fresh").unwrap().id
    };

    let mut ed = editor_at(&path);
    assert_eq!(ed.library.len(), 4);
    assert_eq!(ed.library.list()[0].id, saved_id);

    let demo_id = ed.library.list()[3].id;
    ed.load_project(demo_id).unwrap();
    assert_eq!(ed.library.list()[0].id, demo_id);
    assert_eq!(ed.current_project(), ed.library.get(demo_id).map(|p| p.name.as_str()));

    let ed = editor_at(&path);
    assert_eq!(ed.library.list()[0].id, demo_id);
}

#[test]
fn deleting_unknown_project_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let mut ed = editor_at(&dir.path().join("library.json"));
    let err = ed.delete_project(Uuid::new_v4()).unwrap_err();
    assert!(matches!(err, SonicForgeError::NotFound(_)));
    assert_eq!(ed.library.len(), 3);
}

#[test]
fn blank_name_is_a_validation_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut ed = editor_at(&dir.path().join("library.json"));
    let err = ed.save_project(" \t ").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn corrupt_library_falls_back_to_demos_and_reports() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("library.json");
    std::fs::write(&path, b"{ not json").unwrap();

    let ed = editor_at(&path);
    assert_eq!(ed.library.len(), 3);
    assert_eq!(ed.errors.len(), 1);
    // The broken file is left for the user to inspect
    assert_eq!(std::fs::read(&path).unwrap(), b"{ not json");
}

#[test]
fn bare_project_array_migrates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("library.json");
    let mut library = ProjectLibrary::new();
    let summary = SessionSummary::capture(42.0, &TrackList::starter(), &Default::default());
    let id = library.save("Legacy", summary, 1_700_000_000).unwrap().id;
    let legacy = serde_json::to_vec(library.projects()).unwrap();
    std::fs::write(&path, legacy).unwrap();

    let loaded = load_library_or(&path, ProjectLibrary::new).unwrap();
    let project = loaded.get(id).unwrap();
    assert_eq!(project.name, "Legacy");
    assert_eq!(project.duration, 42.0);
}

#[test]
fn newer_library_version_is_rejected() {
    let data = serde_json::json!({
        "version": CURRENT_VERSION + 1,
        "projects": [],
        "app_version": "9.9.9",
    });
    let err = LibraryFile::from_json(&serde_json::to_vec(&data).unwrap()).unwrap_err();
    assert!(err.to_string().contains("newer"));
}
