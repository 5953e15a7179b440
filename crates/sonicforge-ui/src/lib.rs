//! Sonic Forge UI - editor state and egui widgets
//!
//! Provides:
//! - `WaveformCanvas`: selection, zoom and playhead state machine
//! - `PlaybackTimer`: per-canvas tick source
//! - Draw-command rendering for waveform, meters and spectrum
//! - Command registry, zoom toolbar, notifications
//! - `EditorState` and the egui panels that present it

pub mod canvas;
pub mod commands;
pub mod editor;
pub mod history;
pub mod notifications;
pub mod painter;
pub mod panels;
pub mod playback;
pub mod render;
pub mod theme;
pub mod zoom;

pub use canvas::WaveformCanvas;
pub use commands::{Action, Category, Command, CommandRegistry, Modifiers, Shortcut};
pub use editor::{EditorState, HostRequest, LoadedFile};
pub use history::SelectionHistory;
pub use notifications::{AppError, ErrorLog, Severity, Toast};
pub use panels::PanelState;
pub use playback::{PlaybackTimer, TimerDriver};
pub use render::{DrawCommand, Fill, RenderOptions};
pub use theme::Theme;
pub use zoom::{ViewMode, ZoomControls};
