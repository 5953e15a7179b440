//! Integration tests for keyboard-driven editing sessions.

use sonicforge_core::{CanvasConfig, EditorConfig, TimeRange};
use sonicforge_ui::{Action, CommandRegistry, EditorState, HostRequest, Modifiers, TimerDriver};
use std::path::Path;

fn session(dir: &Path) -> EditorState {
    let config = EditorConfig {
        canvas: CanvasConfig {
            seed: Some(42),
            ..CanvasConfig::default()
        },
        library_path: Some(dir.join("library.json")),
        ..EditorConfig::default()
    };
    EditorState::new(config, TimerDriver::Manual)
}

/// Resolve a key press and dispatch it, like the egui shortcut handler.
fn press(
    registry: &CommandRegistry,
    editor: &mut EditorState,
    key: &str,
    modifiers: Modifiers,
) -> Option<HostRequest> {
    let action = registry.resolve(key, modifiers, false)?;
    editor.dispatch(action)
}

#[test]
fn mark_in_out_then_play_loops_back_to_mark_in() {
    let dir = tempfile::tempdir().unwrap();
    let registry = CommandRegistry::new();
    let mut ed = session(dir.path());

    for _ in 0..2 {
        press(&registry, &mut ed, "Right", Modifiers::SHIFT);
    }
    press(&registry, &mut ed, "i", Modifiers::NONE);
    press(&registry, &mut ed, "Right", Modifiers::NONE);
    press(&registry, &mut ed, "o", Modifiers::NONE);
    assert_eq!(ed.canvas.selection(), Some(TimeRange::new(20.0, 21.0)));
    assert_eq!(ed.reported_selection(), Some(TimeRange::new(20.0, 21.0)));

    press(&registry, &mut ed, "Space", Modifiers::NONE);
    assert!(ed.canvas.is_playing());
    assert_eq!(ed.canvas.position(), 20.0);

    for _ in 0..10 {
        ed.canvas.tick();
    }
    assert!(!ed.canvas.is_playing());
    assert_eq!(ed.canvas.position(), 20.0);
    assert_eq!(ed.canvas.selection(), Some(TimeRange::new(20.0, 21.0)));
}

#[test]
fn typing_suppresses_shortcuts() {
    let registry = CommandRegistry::new();
    assert_eq!(registry.resolve("Space", Modifiers::NONE, true), None);
    assert_eq!(
        registry.resolve("Space", Modifiers::NONE, false),
        Some(Action::PlayPause)
    );
}

#[test]
fn ctrl_and_command_resolve_alike() {
    let registry = CommandRegistry::new();
    let ctrl = Modifiers {
        ctrl: true,
        ..Modifiers::NONE
    };
    assert_eq!(registry.resolve("a", ctrl, false), Some(Action::SelectAll));
    assert_eq!(registry.resolve("a", Modifiers::CMD, false), Some(Action::SelectAll));
}

#[test]
fn undo_redo_walks_selection_history_through_shortcuts() {
    let dir = tempfile::tempdir().unwrap();
    let registry = CommandRegistry::new();
    let mut ed = session(dir.path());

    press(&registry, &mut ed, "A", Modifiers::CMD);
    assert_eq!(ed.canvas.selection(), Some(TimeRange::new(0.0, 180.0)));
    press(&registry, &mut ed, "A", Modifiers::CMD_SHIFT);
    assert_eq!(ed.canvas.selection(), None);

    press(&registry, &mut ed, "Z", Modifiers::CMD);
    assert_eq!(ed.canvas.selection(), Some(TimeRange::new(0.0, 180.0)));
    press(&registry, &mut ed, "Z", Modifiers::CMD_SHIFT);
    assert_eq!(ed.canvas.selection(), None);
    assert_eq!(ed.reported_selection(), None);
}

#[test]
fn copy_paste_keeps_clip_length_and_clamps_at_end() {
    let dir = tempfile::tempdir().unwrap();
    let registry = CommandRegistry::new();
    let mut ed = session(dir.path());

    ed.canvas.seek(30.0);
    ed.canvas.mark_in();
    ed.canvas.seek(36.0);
    ed.canvas.mark_out();
    press(&registry, &mut ed, "C", Modifiers::CMD);
    assert_eq!(ed.clipboard(), Some(TimeRange::new(30.0, 36.0)));
    assert_eq!(ed.canvas.selection(), Some(TimeRange::new(30.0, 36.0)));

    ed.canvas.seek(177.0);
    press(&registry, &mut ed, "V", Modifiers::CMD);
    assert_eq!(ed.canvas.selection(), Some(TimeRange::new(177.0, 180.0)));
}

#[test]
fn delete_clears_selection_without_touching_clipboard() {
    let dir = tempfile::tempdir().unwrap();
    let registry = CommandRegistry::new();
    let mut ed = session(dir.path());

    press(&registry, &mut ed, "A", Modifiers::CMD);
    press(&registry, &mut ed, "Delete", Modifiers::NONE);
    assert_eq!(ed.canvas.selection(), None);
    assert_eq!(ed.clipboard(), None);
}

#[test]
fn zoom_shortcuts_move_toolbar_and_canvas_together() {
    let dir = tempfile::tempdir().unwrap();
    let registry = CommandRegistry::new();
    let mut ed = session(dir.path());

    press(&registry, &mut ed, "+", Modifiers::CMD_SHIFT);
    press(&registry, &mut ed, "=", Modifiers::CMD);
    assert_eq!(ed.zoom.level(), 150);
    assert_eq!(ed.canvas.zoom(), 1.5);
    let visible = ed.canvas.visible_range();
    assert_eq!(visible.len(), 1333);

    for _ in 0..10 {
        press(&registry, &mut ed, "-", Modifiers::CMD);
    }
    assert_eq!(ed.zoom.level(), 10);
    assert_eq!(ed.canvas.zoom(), 0.1);
    assert_eq!(ed.canvas.visible_range(), 0..2000);

    press(&registry, &mut ed, "0", Modifiers::CMD);
    assert_eq!(ed.canvas.zoom(), 1.0);
}

#[test]
fn file_shortcuts_ask_host() {
    let dir = tempfile::tempdir().unwrap();
    let registry = CommandRegistry::new();
    let mut ed = session(dir.path());

    assert_eq!(
        press(&registry, &mut ed, "O", Modifiers::CMD),
        Some(HostRequest::PickImportFile)
    );
    assert_eq!(
        press(&registry, &mut ed, "S", Modifiers::CMD),
        Some(HostRequest::PromptProjectName)
    );
    // Nothing loaded yet
    assert_eq!(press(&registry, &mut ed, "E", Modifiers::CMD), None);
    assert_eq!(ed.errors.take_toasts().len(), 1);
}

#[test]
fn escape_stops_and_rewinds() {
    let dir = tempfile::tempdir().unwrap();
    let registry = CommandRegistry::new();
    let mut ed = session(dir.path());

    press(&registry, &mut ed, "End", Modifiers::NONE);
    assert_eq!(ed.canvas.position(), 180.0);
    press(&registry, &mut ed, "Left", Modifiers::SHIFT);
    press(&registry, &mut ed, "Space", Modifiers::NONE);
    ed.canvas.tick();
    assert!(ed.canvas.is_playing());

    press(&registry, &mut ed, "Escape", Modifiers::NONE);
    assert!(!ed.canvas.is_playing());
    assert_eq!(ed.canvas.position(), 0.0);
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    const KEYS: [(&str, Modifiers); 14] = [
        ("Space", Modifiers::NONE),
        ("Escape", Modifiers::NONE),
        ("Home", Modifiers::NONE),
        ("End", Modifiers::NONE),
        ("Left", Modifiers::SHIFT),
        ("Right", Modifiers::SHIFT),
        ("I", Modifiers::NONE),
        ("O", Modifiers::NONE),
        ("A", Modifiers::CMD),
        ("Z", Modifiers::CMD),
        ("Y", Modifiers::CMD),
        ("X", Modifiers::CMD),
        ("V", Modifiers::CMD),
        ("=", Modifiers::CMD),
    ];

    proptest! {
        #[test]
        fn any_key_sequence_keeps_state_in_bounds(
            presses in proptest::collection::vec((0usize..KEYS.len(), 0usize..12), 1..40),
        ) {
            let dir = tempfile::tempdir().unwrap();
            let registry = CommandRegistry::new();
            let mut ed = session(dir.path());
            for (key, ticks) in presses {
                let (name, mods) = KEYS[key];
                press(&registry, &mut ed, name, mods);
                for _ in 0..ticks {
                    ed.canvas.tick();
                }
                let duration = ed.canvas.duration();
                prop_assert!((0.0..=duration).contains(&ed.canvas.position()));
                if let Some(sel) = ed.canvas.selection() {
                    prop_assert!(sel.start <= sel.end);
                    prop_assert!(sel.start >= 0.0 && sel.end <= duration);
                }
                prop_assert_eq!(ed.reported_selection(), ed.canvas.selection());
            }
        }
    }
}
