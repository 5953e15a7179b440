//! Editor session state.
//!
//! Owns the canvas and every display leaf, dispatches command actions and
//! performs file operations. Failures are reported to the [`ErrorLog`] and
//! leave state unchanged.

use parking_lot::Mutex;
use sonicforge_audio::{demo_source, AnalysisSource, MeterState, SpectrumAnalyzer};
use sonicforge_core::{EditorConfig, Result, SonicForgeError, TimeRange};
use sonicforge_media::{validate, AudioFileCandidate, ExportCancel, ExportJob, ExportProgress};
use sonicforge_timeline::{
    load_library_or, unix_now, EffectRack, EqBands, LibraryFile, ProjectData, ProjectLibrary,
    SessionSummary, TrackList,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::canvas::WaveformCanvas;
use crate::commands::Action;
use crate::notifications::{ErrorLog, Severity};
use crate::playback::TimerDriver;
use crate::zoom::ZoomControls;

/// Arrow-key seek step in seconds.
pub const SEEK_STEP: f64 = 1.0;
/// Shift+arrow seek step in seconds.
pub const FAST_SEEK_STEP: f64 = 10.0;

/// Something the host must do on the editor's behalf (usually open a dialog).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostRequest {
    PickImportFile,
    PickExportDir,
    PromptProjectName,
}

/// The file currently open in the editor.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedFile {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
    pub warnings: Vec<String>,
}

pub struct EditorState {
    pub canvas: WaveformCanvas,
    pub zoom: ZoomControls,
    pub meters: MeterState,
    pub spectrum: SpectrumAnalyzer,
    pub tracks: TrackList,
    pub rack: EffectRack,
    pub eq: EqBands,
    pub library: ProjectLibrary,
    pub errors: ErrorLog,
    pub show_help: bool,
    source: Box<dyn AnalysisSource>,
    config: EditorConfig,
    library_path: PathBuf,
    loaded: Option<LoadedFile>,
    clipboard: Option<TimeRange>,
    current_project: Option<String>,
    /// Last selection reported by the canvas callback.
    reported_selection: Arc<Mutex<Option<TimeRange>>>,
}

impl EditorState {
    /// Build a session from `config`. A missing or unreadable project
    /// library falls back to the demo projects.
    pub fn new(config: EditorConfig, driver: TimerDriver) -> Self {
        let source = demo_source(config.canvas.seed);
        Self::with_source(config, driver, source)
    }

    pub fn with_source(
        config: EditorConfig,
        driver: TimerDriver,
        mut source: Box<dyn AnalysisSource>,
    ) -> Self {
        let errors = ErrorLog::new();
        let library_path = config.library_path();
        let library = match load_library_or(&library_path, || {
            ProjectLibrary::with_demo_projects(unix_now())
        }) {
            Ok(lib) => lib,
            Err(e) => {
                errors.report(&e);
                ProjectLibrary::with_demo_projects(unix_now())
            }
        };

        let mut canvas = WaveformCanvas::from_source(source.as_mut(), &config).with_driver(driver);
        let reported_selection = Arc::new(Mutex::new(None));
        let sink = reported_selection.clone();
        canvas.set_on_selection_change(move |sel| *sink.lock() = sel);

        let zoom = ZoomControls::new();
        canvas.set_zoom(zoom.factor());

        info!(
            library = %library_path.display(),
            projects = library.len(),
            "Editor session ready"
        );

        Self {
            canvas,
            zoom,
            meters: MeterState::default(),
            spectrum: SpectrumAnalyzer::default(),
            tracks: TrackList::starter(),
            rack: EffectRack::default(),
            eq: EqBands::default(),
            library,
            errors,
            show_help: false,
            source,
            config,
            library_path,
            loaded: None,
            clipboard: None,
            current_project: None,
            reported_selection,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn loaded_file(&self) -> Option<&LoadedFile> {
        self.loaded.as_ref()
    }

    pub fn current_project(&self) -> Option<&str> {
        self.current_project.as_deref()
    }

    pub fn clipboard(&self) -> Option<TimeRange> {
        self.clipboard
    }

    pub fn library_path(&self) -> &Path {
        &self.library_path
    }

    /// Selection as last reported through the canvas callback.
    pub fn reported_selection(&self) -> Option<TimeRange> {
        *self.reported_selection.lock()
    }

    /// Per-frame update: apply timer ticks, then refresh meters and spectrum.
    pub fn frame_update(&mut self) {
        self.canvas.poll_timer();
        let playing = self.canvas.is_playing();
        let position = self.canvas.position();
        let levels = self.source.levels(position, playing);
        self.meters.update(levels);
        self.spectrum.advance(self.source.as_mut(), position, playing);
    }

    /// Apply the zoom toolbar level to the canvas.
    pub fn sync_zoom(&mut self) {
        self.canvas.set_zoom(self.zoom.factor());
    }

    /// Run a command action. Returns a request when the host has to
    /// collect input first.
    pub fn dispatch(&mut self, action: Action) -> Option<HostRequest> {
        debug!(?action, "Dispatch");
        match action {
            Action::PlayPause => self.canvas.toggle_play(),
            Action::Stop => self.canvas.stop(),
            Action::GoToStart => self.canvas.seek_to_start(),
            Action::GoToEnd => self.canvas.seek_to_end(),
            Action::SeekBack => self.canvas.seek_by(-SEEK_STEP),
            Action::SeekForward => self.canvas.seek_by(SEEK_STEP),
            Action::SeekBackFast => self.canvas.seek_by(-FAST_SEEK_STEP),
            Action::SeekForwardFast => self.canvas.seek_by(FAST_SEEK_STEP),
            Action::Import => return Some(HostRequest::PickImportFile),
            Action::SaveProject => return Some(HostRequest::PromptProjectName),
            Action::Export => {
                if self.loaded.is_none() {
                    self.errors
                        .report(&SonicForgeError::Operation("No audio file loaded".into()));
                    return None;
                }
                return Some(HostRequest::PickExportDir);
            }
            Action::Undo => {
                self.canvas.undo_selection();
            }
            Action::Redo => {
                self.canvas.redo_selection();
            }
            Action::Copy => self.copy_selection(),
            Action::Cut => {
                if self.stash_selection() {
                    self.canvas.clear_selection();
                }
            }
            Action::Paste => self.paste(),
            Action::DeleteSelection => self.canvas.clear_selection(),
            Action::SelectAll => self.canvas.select_all(),
            Action::DeselectAll => self.canvas.clear_selection(),
            Action::MarkIn => self.canvas.mark_in(),
            Action::MarkOut => self.canvas.mark_out(),
            Action::ZoomIn => {
                self.zoom.zoom_in();
                self.sync_zoom();
            }
            Action::ZoomOut => {
                self.zoom.zoom_out();
                self.sync_zoom();
            }
            Action::ZoomFit => {
                self.zoom.fit();
                self.sync_zoom();
            }
            Action::ToggleHelp => self.show_help = !self.show_help,
        }
        None
    }

    fn copy_selection(&mut self) {
        if self.stash_selection() {
            self.errors.info("Selection copied");
        }
    }

    fn stash_selection(&mut self) -> bool {
        match self.canvas.selection().filter(|s| !s.is_empty()) {
            Some(sel) => {
                self.clipboard = Some(sel);
                true
            }
            None => false,
        }
    }

    /// Place a selection of the clipboard's length at the playhead.
    fn paste(&mut self) {
        let Some(clip) = self.clipboard else {
            return;
        };
        let start = self.canvas.position();
        let end = (start + clip.duration()).min(self.canvas.duration());
        self.canvas.seek(start);
        self.canvas.mark_in();
        self.canvas.seek(end);
        self.canvas.mark_out();
        self.canvas.seek(start);
    }

    // ── File operations ────────────────────────────────────────

    /// Validate and open `path`. A rejected file changes nothing.
    pub fn import(&mut self, path: &Path) -> Result<&LoadedFile> {
        let candidate = AudioFileCandidate::from_path(path)?;
        let report = validate(&candidate, &self.config.validation)?;
        for warning in &report.warnings {
            self.errors.handle(warning.clone(), Severity::Warning, true);
        }

        let series = self.source.amplitudes(self.config.canvas.sample_count);
        self.canvas.load(series, self.config.canvas.default_duration);
        self.meters.reset();
        info!(file = %candidate.name, format = %report.format, size = candidate.size, "Audio imported");

        let loaded = self.loaded.insert(LoadedFile {
            path: path.to_path_buf(),
            name: candidate.name,
            size: candidate.size,
            warnings: report.warnings,
        });
        Ok(loaded)
    }

    /// Import and report failure instead of returning it.
    pub fn import_or_report(&mut self, path: &Path) -> bool {
        match self.import(path) {
            Ok(file) => {
                let msg = format!("Loaded {}", file.name);
                self.errors.info(msg);
                true
            }
            Err(e) => {
                self.errors.report(&e);
                false
            }
        }
    }

    /// Write the loaded file's bytes into `dir` under the export name.
    pub fn export(
        &self,
        dir: &Path,
        on_progress: impl Fn(ExportProgress),
        cancel: &ExportCancel,
    ) -> Result<PathBuf> {
        let loaded = self
            .loaded
            .as_ref()
            .ok_or_else(|| SonicForgeError::Operation("No audio file loaded".into()))?;
        ExportJob::new(&loaded.path, dir).run(on_progress, cancel)
    }

    /// Save the current session to the library and persist it.
    pub fn save_project(&mut self, name: &str) -> Result<ProjectData> {
        let summary = SessionSummary::capture(self.canvas.duration(), &self.tracks, &self.rack);
        let mut library = self.library.clone();
        let saved = library.save(name, summary, unix_now())?.clone();
        self.commit_library(library)?;
        self.current_project = Some(saved.name.clone());
        Ok(saved)
    }

    /// Open a saved project's metadata.
    pub fn load_project(&mut self, id: Uuid) -> Result<ProjectData> {
        let mut library = self.library.clone();
        let project = library.load(id, unix_now())?;
        self.commit_library(library)?;
        self.current_project = Some(project.name.clone());
        Ok(project)
    }

    pub fn delete_project(&mut self, id: Uuid) -> Result<ProjectData> {
        let mut library = self.library.clone();
        let removed = library.delete(id)?;
        self.commit_library(library)?;
        if self.current_project.as_deref() == Some(removed.name.as_str()) {
            self.current_project = None;
        }
        Ok(removed)
    }

    /// Write `library` to disk and adopt it. A failed write keeps the
    /// current library.
    fn commit_library(&mut self, library: ProjectLibrary) -> Result<()> {
        LibraryFile::new(&library).save_to_file(&self.library_path)?;
        self.library = library;
        Ok(())
    }
}

impl std::fmt::Debug for EditorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorState")
            .field("canvas", &self.canvas)
            .field("zoom", &self.zoom)
            .field("source", &self.source.name())
            .field("loaded", &self.loaded)
            .field("projects", &self.library.len())
            .finish()
    }
}
