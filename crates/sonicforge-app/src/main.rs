//! Sonic Forge - Audio Editor
//!
//! Entry point and main application loop.

use anyhow::{Context as _, Result};
use crossbeam_channel::{unbounded, Receiver};
use eframe::egui;
use sonicforge_core::{EditorConfig, SonicForgeError};
use sonicforge_media::{AudioFormat, ExportCancel, ExportJob, ExportProgress};
use sonicforge_ui::panels::{self, PanelState};
use sonicforge_ui::{CommandRegistry, EditorState, HostRequest, Theme, TimerDriver, ZoomControls};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const ZOOM_STORAGE_KEY: &str = "zoom_controls";

fn main() -> Result<()> {
    let config_path = EditorConfig::default_path();
    let (config, config_error) = match EditorConfig::load_or_default(&config_path) {
        Ok(config) => (config, None),
        Err(e) => (EditorConfig::default(), Some(e)),
    };

    // Initialize logging: RUST_LOG wins over the configured filter
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Sonic Forge starting...");
    if let Some(e) = &config_error {
        warn!(path = %config_path.display(), "Ignoring config file: {}", e);
    }

    // Playback timers run on this runtime
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("sonicforge-worker")
        .enable_time()
        .build()
        .context("failed to start async runtime")?;
    let handle = runtime.handle().clone();

    // Optional file to open on launch
    let audio_path = std::env::args().nth(1).map(PathBuf::from);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title("Sonic Forge"),
        renderer: eframe::Renderer::Wgpu,
        ..Default::default()
    };

    eframe::run_native(
        "Sonic Forge",
        options,
        Box::new(move |cc| {
            Ok(Box::new(SonicForgeApp::new(
                cc,
                config,
                config_error,
                TimerDriver::Tokio(handle),
                audio_path,
            )))
        }),
    )
    .map_err(|e| anyhow::anyhow!("eframe: {}", e))?;

    runtime.shutdown_timeout(Duration::from_millis(200));
    Ok(())
}

/// Messages from a background export.
enum ExportEvent {
    Progress(ExportProgress),
    Finished(sonicforge_core::Result<PathBuf>),
}

struct ExportTask {
    cancel: ExportCancel,
    events: Receiver<ExportEvent>,
    fraction: f64,
}

struct SonicForgeApp {
    editor: EditorState,
    registry: CommandRegistry,
    panels: PanelState,
    driver: TimerDriver,
    export: Option<ExportTask>,
}

impl SonicForgeApp {
    fn new(
        cc: &eframe::CreationContext<'_>,
        config: EditorConfig,
        config_error: Option<SonicForgeError>,
        driver: TimerDriver,
        audio_path: Option<PathBuf>,
    ) -> Self {
        Theme::apply(&cc.egui_ctx);

        let mut editor = EditorState::new(config, driver.clone());
        if let Some(e) = config_error {
            editor.errors.report(&e);
        }
        if let Some(zoom) = cc
            .storage
            .and_then(|s| eframe::get_value::<ZoomControls>(s, ZOOM_STORAGE_KEY))
        {
            editor.zoom = zoom;
            editor.sync_zoom();
        }
        if let Some(path) = audio_path {
            editor.import_or_report(&path);
        }

        Self {
            editor,
            registry: CommandRegistry::new(),
            panels: PanelState::default(),
            driver,
            export: None,
        }
    }

    fn handle_request(&mut self, request: HostRequest) {
        match request {
            HostRequest::PickImportFile => {
                let extensions: Vec<&str> = AudioFormat::ALL.iter().map(|f| f.extension()).collect();
                if let Some(path) = rfd::FileDialog::new()
                    .set_title("Import audio")
                    .add_filter("Audio", &extensions)
                    .pick_file()
                {
                    self.editor.import_or_report(&path);
                }
            }
            HostRequest::PickExportDir => {
                if let Some(dir) = rfd::FileDialog::new()
                    .set_title("Export to folder")
                    .pick_folder()
                {
                    self.start_export(&dir);
                }
            }
            HostRequest::PromptProjectName => {
                self.panels.save_prompt_open = true;
            }
        }
    }

    /// Copy the loaded file on a blocking worker.
    fn start_export(&mut self, dir: &Path) {
        if self.export.is_some() {
            self.editor
                .errors
                .report(&SonicForgeError::Operation("An export is already running".into()));
            return;
        }
        let Some(file) = self.editor.loaded_file() else {
            self.editor
                .errors
                .report(&SonicForgeError::Operation("No audio file loaded".into()));
            return;
        };
        let TimerDriver::Tokio(handle) = &self.driver else {
            let result = self.editor.export(dir, |_| {}, &ExportCancel::new());
            self.finish_export(result);
            return;
        };

        let job = ExportJob::new(&file.path, dir);
        let cancel = ExportCancel::new();
        let (tx, rx) = unbounded();
        let worker_cancel = cancel.clone();
        handle.spawn_blocking(move || {
            let progress_tx = tx.clone();
            let result = job.run(
                |p| {
                    let _ = progress_tx.send(ExportEvent::Progress(p));
                },
                &worker_cancel,
            );
            let _ = tx.send(ExportEvent::Finished(result));
        });
        info!(dir = %dir.display(), "Export started");
        self.export = Some(ExportTask {
            cancel,
            events: rx,
            fraction: 0.0,
        });
    }

    fn poll_export(&mut self) {
        let Some(task) = self.export.as_mut() else {
            return;
        };
        let mut finished = None;
        for event in task.events.try_iter() {
            match event {
                ExportEvent::Progress(p) => task.fraction = p.fraction(),
                ExportEvent::Finished(result) => finished = Some(result),
            }
        }
        if let Some(result) = finished {
            self.export = None;
            self.finish_export(result);
        }
    }

    fn finish_export(&mut self, result: sonicforge_core::Result<PathBuf>) {
        match result {
            Ok(path) => self.editor.errors.info(format!("Exported {}", path.display())),
            Err(e) => self.editor.errors.report(&e),
        }
    }
}

impl eframe::App for SonicForgeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.editor.frame_update();
        self.poll_export();

        let mut requests = panels::handle_shortcuts(ctx, &self.registry, &mut self.editor);

        egui::TopBottomPanel::top("transport_bar")
            .frame(Theme::panel_frame())
            .show(ctx, |ui| {
                requests.extend(panels::show_transport(ui, &mut self.editor));
                panels::show_zoom_toolbar(ui, &mut self.editor);
                if let Some(task) = &self.export {
                    ui.horizontal(|ui| {
                        ui.add(
                            egui::ProgressBar::new(task.fraction as f32)
                                .text("Exporting…")
                                .desired_width(200.0),
                        );
                        if ui.small_button("Cancel").clicked() {
                            task.cancel.cancel();
                        }
                    });
                }
            });

        egui::SidePanel::left("projects_panel")
            .resizable(true)
            .default_width(240.0)
            .frame(Theme::panel_frame())
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    panels::show_projects(ui, &mut self.editor);
                });
            });

        egui::SidePanel::right("effects_panel")
            .resizable(true)
            .default_width(300.0)
            .frame(Theme::panel_frame())
            .show(ctx, |ui| {
                let editor = &mut self.editor;
                panels::show_meters(ui, &mut editor.meters);
                ui.add_space(Theme::SPACE_SM);
                panels::show_effects(ui, &mut editor.rack, &mut editor.eq, &editor.errors);
            });

        egui::TopBottomPanel::bottom("tracks_panel")
            .resizable(true)
            .default_height(160.0)
            .frame(Theme::panel_frame())
            .show(ctx, |ui| {
                let editor = &mut self.editor;
                panels::show_tracks(ui, &mut editor.tracks, &editor.errors);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            let mode = self.editor.zoom.view_mode;
            if mode.shows_waveform() {
                let height = self.editor.config().canvas.height;
                panels::show_waveform(ui, &mut self.editor, height);
            }
            if mode.shows_spectrum() {
                ui.add_space(Theme::SPACE_SM);
                panels::show_spectrum(ui, &mut self.editor.spectrum);
            }
        });

        panels::show_save_prompt(ctx, &mut self.panels, &mut self.editor);
        let mut help_open = self.editor.show_help;
        panels::show_help(ctx, &self.registry, &mut help_open);
        self.editor.show_help = help_open;
        panels::show_toasts(ctx, &mut self.panels, &self.editor.errors);

        for request in requests {
            self.handle_request(request);
        }

        if self.editor.canvas.is_playing() || self.export.is_some() {
            ctx.request_repaint();
        } else {
            // Meters and spectrum keep decaying while idle
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, ZOOM_STORAGE_KEY, &self.editor.zoom);
    }

    fn on_exit(&mut self) {
        if let Some(task) = &self.export {
            task.cancel.cancel();
        }
        self.editor.canvas.stop();
        info!("Sonic Forge exiting");
    }
}
