//! Command registry and keyboard shortcut system.
//!
//! Every user-facing action is a `Command` with an ID, display name,
//! one or more keyboard shortcuts and a help category. Ctrl and Cmd are
//! treated as the same modifier.

use std::collections::HashMap;
use tracing::trace;

// ── Shortcut representation ─────────────────────────────────────

/// Keyboard modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub command: bool, // ⌘ on macOS
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        shift: false,
        alt: false,
        command: false,
    };
    pub const CMD: Self = Self {
        ctrl: false,
        shift: false,
        alt: false,
        command: true,
    };
    pub const CMD_SHIFT: Self = Self {
        ctrl: false,
        shift: true,
        alt: false,
        command: true,
    };
    pub const SHIFT: Self = Self {
        ctrl: false,
        shift: true,
        alt: false,
        command: false,
    };

    /// Fold Ctrl into Cmd.
    pub fn normalized(self) -> Self {
        Self {
            ctrl: false,
            command: self.ctrl || self.command,
            ..self
        }
    }

    pub fn without_shift(self) -> Self {
        Self {
            shift: false,
            ..self
        }
    }
}

/// A keyboard shortcut (modifier + key name).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shortcut {
    pub modifiers: Modifiers,
    pub key: &'static str,
}

impl Shortcut {
    pub const fn new(modifiers: Modifiers, key: &'static str) -> Self {
        Self { modifiers, key }
    }

    /// Format for display: "Ctrl+S", "Ctrl+Shift+Z", "Space".
    pub fn display(&self) -> String {
        let m = self.modifiers.normalized();
        let mut parts: Vec<&str> = Vec::with_capacity(4);
        if m.command {
            parts.push("Ctrl");
        }
        if m.alt {
            parts.push("Alt");
        }
        if m.shift {
            parts.push("Shift");
        }
        parts.push(match self.key {
            "Left" => "←",
            "Right" => "→",
            "Escape" => "Esc",
            other => other,
        });
        parts.join("+")
    }
}

// ── Actions and categories ──────────────────────────────────────

/// What a command does. Dispatched by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    PlayPause,
    Stop,
    GoToStart,
    GoToEnd,
    SeekBack,
    SeekForward,
    SeekBackFast,
    SeekForwardFast,
    Import,
    SaveProject,
    Export,
    Undo,
    Redo,
    Cut,
    Copy,
    Paste,
    SelectAll,
    DeselectAll,
    DeleteSelection,
    MarkIn,
    MarkOut,
    ZoomIn,
    ZoomOut,
    ZoomFit,
    ToggleHelp,
}

/// Help grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Playback,
    File,
    Editing,
    Selection,
    View,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Playback,
        Category::File,
        Category::Editing,
        Category::Selection,
        Category::View,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Playback => "Playback",
            Category::File => "File Operations",
            Category::Editing => "Editing",
            Category::Selection => "Selection",
            Category::View => "View & Navigation",
        }
    }
}

// ── Command definition ──────────────────────────────────────────

/// A registered command.
#[derive(Debug, Clone)]
pub struct Command {
    /// Unique command ID (e.g., "edit.undo").
    pub id: &'static str,
    /// Display name (e.g., "Undo").
    pub name: &'static str,
    pub description: &'static str,
    pub category: Category,
    /// Every shortcut bound to this command; the first is shown in help.
    pub shortcuts: Vec<Shortcut>,
    pub action: Action,
}

// ── Registry ────────────────────────────────────────────────────

/// Central registry of all commands with shortcut lookup and fuzzy search.
pub struct CommandRegistry {
    commands: Vec<Command>,
    by_id: HashMap<&'static str, usize>,
    /// Keyed by normalized modifiers and key name.
    by_shortcut: HashMap<(Modifiers, String), usize>,
}

impl CommandRegistry {
    /// Create a new registry with all built-in commands.
    pub fn new() -> Self {
        let mut reg = Self {
            commands: Vec::new(),
            by_id: HashMap::new(),
            by_shortcut: HashMap::new(),
        };
        reg.register_builtins();
        reg
    }

    /// Register a command. Later registrations win a shortcut conflict.
    pub fn register(&mut self, cmd: Command) {
        let idx = self.commands.len();
        self.by_id.insert(cmd.id, idx);
        for shortcut in &cmd.shortcuts {
            self.by_shortcut.insert(shortcut_key(shortcut.modifiers, shortcut.key), idx);
        }
        self.commands.push(cmd);
    }

    /// Look up a command by ID.
    pub fn get(&self, id: &str) -> Option<&Command> {
        self.by_id.get(id).map(|&i| &self.commands[i])
    }

    /// Look up a command by exact shortcut (Ctrl and Cmd equivalent).
    pub fn get_by_shortcut(&self, shortcut: &Shortcut) -> Option<&Command> {
        self.by_shortcut
            .get(&shortcut_key(shortcut.modifiers, shortcut.key))
            .map(|&i| &self.commands[i])
    }

    /// All registered commands.
    pub fn all(&self) -> &[Command] {
        &self.commands
    }

    /// Resolve a key press to an action.
    ///
    /// `key` is a key name as produced by the UI layer ("Space", "Left",
    /// "S", "="). Nothing resolves while a text field has focus. Symbol
    /// keys that need Shift on some layouts ("+") also match their
    /// unshifted binding.
    pub fn resolve(&self, key: &str, modifiers: Modifiers, typing: bool) -> Option<Action> {
        if typing {
            return None;
        }
        let key = normalize_key(key);
        let modifiers = modifiers.normalized();
        let lookup = |m: Modifiers| {
            self.by_shortcut
                .get(&(m, key.clone()))
                .map(|&i| &self.commands[i])
        };
        let cmd = lookup(modifiers).or_else(|| {
            if modifiers.shift && is_symbol_key(&key) {
                lookup(modifiers.without_shift())
            } else {
                None
            }
        })?;
        trace!(id = cmd.id, key = %key, "Shortcut resolved");
        Some(cmd.action)
    }

    /// Fuzzy search commands by name. Returns matching commands sorted by relevance.
    pub fn search(&self, query: &str) -> Vec<&Command> {
        if query.is_empty() {
            return self.commands.iter().collect();
        }

        let query_lower = query.to_lowercase();
        let mut results: Vec<(&Command, i32)> = self
            .commands
            .iter()
            .filter_map(|cmd| {
                let name_lower = cmd.name.to_lowercase();
                if name_lower.starts_with(&query_lower) {
                    return Some((cmd, 100));
                }
                if name_lower
                    .split_whitespace()
                    .any(|w| w.starts_with(&query_lower))
                {
                    return Some((cmd, 80));
                }
                if is_subsequence(&query_lower, &name_lower) {
                    return Some((cmd, 60));
                }
                if cmd.id.contains(&query_lower) {
                    return Some((cmd, 40));
                }
                None
            })
            .collect();

        // Stable sort keeps registration order within a score.
        results.sort_by(|a, b| b.1.cmp(&a.1));
        results.into_iter().map(|(cmd, _)| cmd).collect()
    }

    /// Commands grouped by category, in help display order.
    pub fn help_catalog(&self) -> Vec<(Category, Vec<&Command>)> {
        Category::ALL
            .iter()
            .map(|&cat| {
                let cmds: Vec<&Command> = self
                    .commands
                    .iter()
                    .filter(|c| c.category == cat && !c.shortcuts.is_empty())
                    .collect();
                (cat, cmds)
            })
            .filter(|entry| !entry.1.is_empty())
            .collect()
    }

    /// Register all built-in commands.
    fn register_builtins(&mut self) {
        use Action::*;
        use Category::*;

        // ── Playback ─────────────────────────────────
        self.register(Command {
            id: "transport.play_pause",
            name: "Play/Pause",
            description: "Toggle playback",
            category: Playback,
            shortcuts: vec![Shortcut::new(Modifiers::NONE, "Space")],
            action: PlayPause,
        });
        self.register(Command {
            id: "transport.stop",
            name: "Stop",
            description: "Stop playback and clear the selection",
            category: Playback,
            shortcuts: vec![Shortcut::new(Modifiers::NONE, "Escape")],
            action: Stop,
        });
        self.register(Command {
            id: "transport.goto_start",
            name: "Go to Start",
            description: "Move the playhead to the beginning",
            category: Playback,
            shortcuts: vec![Shortcut::new(Modifiers::NONE, "Home")],
            action: GoToStart,
        });
        self.register(Command {
            id: "transport.goto_end",
            name: "Go to End",
            description: "Move the playhead to the end",
            category: Playback,
            shortcuts: vec![Shortcut::new(Modifiers::NONE, "End")],
            action: GoToEnd,
        });
        self.register(Command {
            id: "transport.seek_back",
            name: "Seek Backward",
            description: "Move back 1 second",
            category: Playback,
            shortcuts: vec![Shortcut::new(Modifiers::NONE, "Left")],
            action: SeekBack,
        });
        self.register(Command {
            id: "transport.seek_forward",
            name: "Seek Forward",
            description: "Move forward 1 second",
            category: Playback,
            shortcuts: vec![Shortcut::new(Modifiers::NONE, "Right")],
            action: SeekForward,
        });
        self.register(Command {
            id: "transport.seek_back_fast",
            name: "Fast Seek Backward",
            description: "Move back 10 seconds",
            category: Playback,
            shortcuts: vec![Shortcut::new(Modifiers::SHIFT, "Left")],
            action: SeekBackFast,
        });
        self.register(Command {
            id: "transport.seek_forward_fast",
            name: "Fast Seek Forward",
            description: "Move forward 10 seconds",
            category: Playback,
            shortcuts: vec![Shortcut::new(Modifiers::SHIFT, "Right")],
            action: SeekForwardFast,
        });

        // ── File ─────────────────────────────────────
        self.register(Command {
            id: "file.import",
            name: "Import Audio",
            description: "Open an audio file",
            category: File,
            shortcuts: vec![Shortcut::new(Modifiers::CMD, "O")],
            action: Import,
        });
        self.register(Command {
            id: "file.save",
            name: "Save Project",
            description: "Save the current session to the library",
            category: File,
            shortcuts: vec![Shortcut::new(Modifiers::CMD, "S")],
            action: SaveProject,
        });
        self.register(Command {
            id: "file.export",
            name: "Export Audio",
            description: "Export the loaded audio file",
            category: File,
            shortcuts: vec![Shortcut::new(Modifiers::CMD, "E")],
            action: Export,
        });

        // ── Editing ──────────────────────────────────
        self.register(Command {
            id: "edit.undo",
            name: "Undo",
            description: "Undo the last selection change",
            category: Editing,
            shortcuts: vec![Shortcut::new(Modifiers::CMD, "Z")],
            action: Undo,
        });
        self.register(Command {
            id: "edit.redo",
            name: "Redo",
            description: "Redo the last undone change",
            category: Editing,
            shortcuts: vec![
                Shortcut::new(Modifiers::CMD_SHIFT, "Z"),
                Shortcut::new(Modifiers::CMD, "Y"),
            ],
            action: Redo,
        });
        self.register(Command {
            id: "edit.cut",
            name: "Cut",
            description: "Cut the selection",
            category: Editing,
            shortcuts: vec![Shortcut::new(Modifiers::CMD, "X")],
            action: Cut,
        });
        self.register(Command {
            id: "edit.copy",
            name: "Copy",
            description: "Copy the selection",
            category: Editing,
            shortcuts: vec![Shortcut::new(Modifiers::CMD, "C")],
            action: Copy,
        });
        self.register(Command {
            id: "edit.paste",
            name: "Paste",
            description: "Paste at the playhead",
            category: Editing,
            shortcuts: vec![Shortcut::new(Modifiers::CMD, "V")],
            action: Paste,
        });
        self.register(Command {
            id: "edit.delete",
            name: "Delete Selection",
            description: "Remove the selected region",
            category: Editing,
            shortcuts: vec![
                Shortcut::new(Modifiers::NONE, "Delete"),
                Shortcut::new(Modifiers::NONE, "Backspace"),
            ],
            action: DeleteSelection,
        });

        // ── Selection ────────────────────────────────
        self.register(Command {
            id: "select.all",
            name: "Select All",
            description: "Select the whole file",
            category: Selection,
            shortcuts: vec![Shortcut::new(Modifiers::CMD, "A")],
            action: SelectAll,
        });
        self.register(Command {
            id: "select.none",
            name: "Deselect All",
            description: "Clear the selection",
            category: Selection,
            shortcuts: vec![Shortcut::new(Modifiers::CMD_SHIFT, "A")],
            action: DeselectAll,
        });
        self.register(Command {
            id: "select.mark_in",
            name: "Set In Point",
            description: "Start the selection at the playhead",
            category: Selection,
            shortcuts: vec![Shortcut::new(Modifiers::NONE, "I")],
            action: MarkIn,
        });
        self.register(Command {
            id: "select.mark_out",
            name: "Set Out Point",
            description: "End the selection at the playhead",
            category: Selection,
            shortcuts: vec![Shortcut::new(Modifiers::NONE, "O")],
            action: MarkOut,
        });

        // ── View ─────────────────────────────────────
        self.register(Command {
            id: "view.zoom_in",
            name: "Zoom In",
            description: "Increase the zoom level",
            category: View,
            shortcuts: vec![
                Shortcut::new(Modifiers::CMD, "="),
                Shortcut::new(Modifiers::CMD, "+"),
            ],
            action: ZoomIn,
        });
        self.register(Command {
            id: "view.zoom_out",
            name: "Zoom Out",
            description: "Decrease the zoom level",
            category: View,
            shortcuts: vec![Shortcut::new(Modifiers::CMD, "-")],
            action: ZoomOut,
        });
        self.register(Command {
            id: "view.zoom_fit",
            name: "Zoom to Fit",
            description: "Show the whole waveform",
            category: View,
            shortcuts: vec![Shortcut::new(Modifiers::CMD, "0")],
            action: ZoomFit,
        });
        self.register(Command {
            id: "view.help",
            name: "Keyboard Shortcuts",
            description: "Show this help",
            category: View,
            shortcuts: vec![Shortcut::new(Modifiers::NONE, "F1")],
            action: ToggleHelp,
        });
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Single letters compare case-insensitively; named keys pass through.
fn normalize_key(key: &str) -> String {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => c.to_uppercase().collect(),
        _ => key.to_string(),
    }
}

fn shortcut_key(modifiers: Modifiers, key: &str) -> (Modifiers, String) {
    (modifiers.normalized(), normalize_key(key))
}

fn is_symbol_key(key: &str) -> bool {
    let mut chars = key.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if !c.is_alphanumeric())
}

/// Check if `needle` is a subsequence of `haystack`.
fn is_subsequence(needle: &str, haystack: &str) -> bool {
    let mut haystack_chars = haystack.chars();
    for needle_char in needle.chars() {
        loop {
            match haystack_chars.next() {
                Some(c) if c == needle_char => break,
                Some(_) => continue,
                None => return false,
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctrl() -> Modifiers {
        Modifiers {
            ctrl: true,
            ..Modifiers::NONE
        }
    }

    #[test]
    fn test_registry_lookup() {
        let reg = CommandRegistry::new();
        let cmd = reg.get("edit.undo").unwrap();
        assert_eq!(cmd.name, "Undo");
        assert_eq!(cmd.category, Category::Editing);
    }

    #[test]
    fn test_shortcut_lookup() {
        let reg = CommandRegistry::new();
        let cmd = reg.get_by_shortcut(&Shortcut::new(Modifiers::CMD, "Z")).unwrap();
        assert_eq!(cmd.id, "edit.undo");
    }

    #[test]
    fn test_ctrl_and_cmd_equivalent() {
        let reg = CommandRegistry::new();
        assert_eq!(reg.resolve("s", ctrl(), false), Some(Action::SaveProject));
        assert_eq!(reg.resolve("S", Modifiers::CMD, false), Some(Action::SaveProject));
    }

    #[test]
    fn test_resolve_core_bindings() {
        let reg = CommandRegistry::new();
        assert_eq!(reg.resolve("Space", Modifiers::NONE, false), Some(Action::PlayPause));
        assert_eq!(reg.resolve("Escape", Modifiers::NONE, false), Some(Action::Stop));
        assert_eq!(reg.resolve("e", ctrl(), false), Some(Action::Export));
        assert_eq!(reg.resolve("z", ctrl(), false), Some(Action::Undo));
        assert_eq!(reg.resolve("y", ctrl(), false), Some(Action::Redo));
        assert_eq!(reg.resolve("Backspace", Modifiers::NONE, false), Some(Action::DeleteSelection));
        assert_eq!(reg.resolve("0", ctrl(), false), Some(Action::ZoomFit));
        assert_eq!(reg.resolve("i", Modifiers::NONE, false), Some(Action::MarkIn));
    }

    #[test]
    fn test_shift_changes_binding() {
        let reg = CommandRegistry::new();
        let ctrl_shift = Modifiers {
            shift: true,
            ..ctrl()
        };
        assert_eq!(reg.resolve("Z", ctrl_shift, false), Some(Action::Redo));
        assert_eq!(reg.resolve("Left", Modifiers::NONE, false), Some(Action::SeekBack));
        assert_eq!(reg.resolve("Left", Modifiers::SHIFT, false), Some(Action::SeekBackFast));
    }

    #[test]
    fn test_shifted_symbol_falls_back() {
        let reg = CommandRegistry::new();
        let ctrl_shift = Modifiers {
            shift: true,
            ..ctrl()
        };
        assert_eq!(reg.resolve("+", ctrl_shift, false), Some(Action::ZoomIn));
        assert_eq!(reg.resolve("=", ctrl(), false), Some(Action::ZoomIn));
        // Letters do not fall back: Ctrl+Shift+S is unbound.
        assert_eq!(reg.resolve("S", ctrl_shift, false), None);
    }

    #[test]
    fn test_typing_suppresses_shortcuts() {
        let reg = CommandRegistry::new();
        assert_eq!(reg.resolve("Space", Modifiers::NONE, true), None);
        assert_eq!(reg.resolve("s", ctrl(), true), None);
    }

    #[test]
    fn test_unbound_key() {
        let reg = CommandRegistry::new();
        assert_eq!(reg.resolve("Q", Modifiers::NONE, false), None);
    }

    #[test]
    fn test_shortcut_display() {
        assert_eq!(Shortcut::new(Modifiers::CMD_SHIFT, "Z").display(), "Ctrl+Shift+Z");
        assert_eq!(Shortcut::new(Modifiers::SHIFT, "Left").display(), "Shift+←");
        assert_eq!(Shortcut::new(Modifiers::NONE, "Escape").display(), "Esc");
    }

    #[test]
    fn test_fuzzy_search() {
        let reg = CommandRegistry::new();
        let results = reg.search("undo");
        assert_eq!(results[0].id, "edit.undo");
        let results = reg.search("zfit");
        assert_eq!(results[0].id, "view.zoom_fit");
    }

    #[test]
    fn test_help_catalog_grouped() {
        let reg = CommandRegistry::new();
        let catalog = reg.help_catalog();
        let cats: Vec<Category> = catalog.iter().map(|(c, _)| *c).collect();
        assert_eq!(cats, Category::ALL.to_vec());
        let total: usize = catalog.iter().map(|(_, cmds)| cmds.len()).sum();
        assert_eq!(total, reg.all().len());
        assert_eq!(catalog[0].1[0].action, Action::PlayPause);
    }

    #[test]
    fn test_is_subsequence() {
        assert!(is_subsequence("udo", "undo"));
        assert!(is_subsequence("zfit", "zoom to fit"));
        assert!(!is_subsequence("xyz", "undo"));
    }

    #[test]
    fn test_all_commands_have_unique_ids_and_shortcuts() {
        let reg = CommandRegistry::new();
        let mut ids: Vec<&str> = reg.all().iter().map(|c| c.id).collect();
        let count = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), count, "duplicate command IDs found");

        let bound: usize = reg.all().iter().map(|c| c.shortcuts.len()).sum();
        assert_eq!(reg.by_shortcut.len(), bound, "conflicting shortcuts found");
    }

    #[test]
    fn test_every_builtin_shortcut_resolves_to_its_command() {
        let reg = CommandRegistry::new();
        for cmd in reg.all() {
            for shortcut in &cmd.shortcuts {
                assert_eq!(
                    reg.resolve(shortcut.key, shortcut.modifiers, false),
                    Some(cmd.action),
                    "{} via {}",
                    cmd.id,
                    shortcut.display()
                );
                assert_eq!(reg.get_by_shortcut(shortcut).map(|c| c.id), Some(cmd.id));
            }
        }
    }

    #[test]
    fn test_later_registration_overrides_shortcut() {
        let mut reg = CommandRegistry::new();
        reg.register(Command {
            id: "custom.fit",
            name: "Fit on Space",
            description: "Rebind Space to zoom-to-fit",
            category: Category::View,
            shortcuts: vec![Shortcut::new(Modifiers::NONE, "Space")],
            action: Action::ZoomFit,
        });
        reg.register(Command {
            id: "custom.lower",
            name: "Lowercase Binding",
            description: "Registered with a lowercase key",
            category: Category::View,
            shortcuts: vec![Shortcut::new(ctrl(), "k")],
            action: Action::ZoomOut,
        });

        assert_eq!(reg.resolve("Space", Modifiers::NONE, false), Some(Action::ZoomFit));
        let by_shortcut = reg.get_by_shortcut(&Shortcut::new(Modifiers::NONE, "Space"));
        assert_eq!(by_shortcut.map(|c| c.id), Some("custom.fit"));

        assert_eq!(reg.resolve("K", Modifiers::CMD, false), Some(Action::ZoomOut));
        let by_shortcut = reg.get_by_shortcut(&Shortcut::new(Modifiers::CMD, "K"));
        assert_eq!(by_shortcut.map(|c| c.id), Some("custom.lower"));
    }
}
