//! Waveform canvas state machine.
//!
//! Owns the amplitude series, zoom, volume, playhead and selection. Pointer
//! input maps the full canvas width onto `[0, duration]`; the zoom window
//! only changes which amplitudes are drawn.

use std::ops::Range;
use std::time::Duration;

use sonicforge_audio::{AmplitudeSeries, AnalysisSource};
use sonicforge_core::{clamp_time, EditorConfig, TimeRange, ZoomBounds};
use tracing::{debug, info};

use crate::commands::Modifiers;
use crate::history::SelectionHistory;
use crate::playback::{PlaybackTimer, TimerDriver};
use crate::render::{render_waveform, DrawCommand, RenderOptions, WaveformScene};

/// Tolerance when comparing the playhead against the end of playback.
const END_EPSILON: f64 = 1e-9;

type SelectionCallback = Box<dyn FnMut(Option<TimeRange>) + Send>;

/// Where an active playback run started and where it stops.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PlayRun {
    origin: f64,
    end: f64,
}

pub struct WaveformCanvas {
    series: AmplitudeSeries,
    duration: f64,
    width: f32,
    height: f32,
    bounds: ZoomBounds,
    zoom: f64,
    /// Percentage (0-100)
    volume: u8,
    position: f64,
    selection: Option<TimeRange>,
    dragging: bool,
    driver: TimerDriver,
    tick_interval: Duration,
    tick_step: f64,
    timer: Option<PlaybackTimer>,
    run: Option<PlayRun>,
    timers_started: u64,
    history: SelectionHistory,
    on_selection_change: Option<SelectionCallback>,
    last_reported: Option<TimeRange>,
}

impl WaveformCanvas {
    /// Canvas over `series` spanning `duration` seconds, sized and timed
    /// from `config`.
    pub fn new(series: AmplitudeSeries, duration: f64, config: &EditorConfig) -> Self {
        Self {
            series,
            duration: sanitize_duration(duration),
            width: config.canvas.width,
            height: config.canvas.height,
            bounds: config.zoom,
            zoom: config.zoom.clamp(1.0),
            volume: 100,
            position: 0.0,
            selection: None,
            dragging: false,
            driver: TimerDriver::Manual,
            tick_interval: Duration::from_millis(config.playback.tick_interval_ms),
            tick_step: config.playback.tick_step,
            timer: None,
            run: None,
            timers_started: 0,
            history: SelectionHistory::new(),
            on_selection_change: None,
            last_reported: None,
        }
    }

    /// Canvas whose amplitudes come from `source`.
    pub fn from_source(source: &mut dyn AnalysisSource, config: &EditorConfig) -> Self {
        let series = source.amplitudes(config.canvas.sample_count);
        info!(
            source = source.name(),
            samples = series.len(),
            "Waveform canvas created"
        );
        Self::new(series, config.canvas.default_duration, config)
    }

    /// Use `driver` for future playback timers.
    pub fn with_driver(mut self, driver: TimerDriver) -> Self {
        self.driver = driver;
        self
    }

    pub fn set_driver(&mut self, driver: TimerDriver) {
        self.driver = driver;
    }

    /// Register the selection observer. It receives the normalized
    /// selection (or `None`) whenever that changes.
    pub fn set_on_selection_change(
        &mut self,
        callback: impl FnMut(Option<TimeRange>) + Send + 'static,
    ) {
        self.on_selection_change = Some(Box::new(callback));
    }

    /// Swap in new audio data. Stops playback and clears all edit state.
    pub fn load(&mut self, series: AmplitudeSeries, duration: f64) {
        self.stop();
        self.series = series;
        self.duration = sanitize_duration(duration);
        self.history.clear();
        info!(samples = self.series.len(), duration = self.duration, "Canvas loaded");
    }

    // ── Accessors ──────────────────────────────────────────────

    pub fn series(&self) -> &AmplitudeSeries {
        &self.series
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn zoom_bounds(&self) -> ZoomBounds {
        self.bounds
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    /// Selection with `start <= end`.
    pub fn selection(&self) -> Option<TimeRange> {
        self.selection.map(TimeRange::normalized)
    }

    /// Selection as dragged, possibly reversed.
    pub fn raw_selection(&self) -> Option<TimeRange> {
        self.selection
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn is_playing(&self) -> bool {
        self.timer.is_some()
    }

    /// Timers acquired over the canvas lifetime.
    pub fn timers_started(&self) -> u64 {
        self.timers_started
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// Index window of the series currently drawn.
    pub fn visible_range(&self) -> Range<usize> {
        self.series.centered_window(self.zoom)
    }

    pub fn can_undo_selection(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo_selection(&self) -> bool {
        self.history.can_redo()
    }

    // ── View ───────────────────────────────────────────────────

    /// Set the zoom factor, clamped to the configured bounds.
    pub fn set_zoom(&mut self, factor: f64) {
        self.zoom = self.bounds.clamp(factor);
        debug!(zoom = self.zoom, "Zoom changed");
    }

    pub fn set_volume(&mut self, volume: u8) {
        self.volume = volume.min(100);
    }

    /// Layout size used to map pointer coordinates.
    pub fn set_size(&mut self, width: f32, height: f32) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
    }

    /// Time under horizontal pixel `x`, clamped to `[0, duration]`.
    pub fn x_to_time(&self, x: f32) -> f64 {
        if !(self.width > 0.0) || !x.is_finite() {
            return 0.0;
        }
        clamp_time((x / self.width) as f64 * self.duration, self.duration)
    }

    // ── Pointer ────────────────────────────────────────────────

    /// Press at `x`.
    ///
    /// Alt seeks without touching the selection. Shift extends an existing
    /// selection. Otherwise a new selection starts and dragging begins.
    pub fn pointer_down(&mut self, x: f32, modifiers: Modifiers) {
        let time = self.x_to_time(x);
        if modifiers.alt {
            self.seek(time);
            return;
        }
        match self.selection {
            Some(sel) if modifiers.shift => {
                self.selection = Some(sel.extended_to(time));
                self.commit_selection();
            }
            _ => {
                self.selection = Some(TimeRange::point(time));
                self.dragging = true;
                self.notify_selection();
            }
        }
    }

    /// Move to `x`; only has an effect while dragging.
    pub fn pointer_move(&mut self, x: f32) {
        if !self.dragging {
            return;
        }
        let time = self.x_to_time(x);
        if let Some(sel) = self.selection.as_mut() {
            sel.end = time;
        }
        self.notify_selection();
    }

    /// Release; the selection persists.
    pub fn pointer_up(&mut self) {
        if !self.dragging {
            return;
        }
        self.dragging = false;
        self.commit_selection();
    }

    // ── Selection ──────────────────────────────────────────────

    pub fn select_all(&mut self) {
        self.dragging = false;
        self.selection = Some(TimeRange::new(0.0, self.duration));
        self.commit_selection();
    }

    pub fn clear_selection(&mut self) {
        self.dragging = false;
        self.selection = None;
        self.commit_selection();
    }

    /// Set the selection start at the playhead.
    pub fn mark_in(&mut self) {
        let end = self.selection().map_or(self.duration, |s| s.end);
        self.selection = Some(TimeRange::new(self.position, end.max(self.position)));
        self.commit_selection();
    }

    /// Set the selection end at the playhead.
    pub fn mark_out(&mut self) {
        let start = self.selection().map_or(0.0, |s| s.start);
        self.selection = Some(TimeRange::new(start.min(self.position), self.position));
        self.commit_selection();
    }

    pub fn undo_selection(&mut self) -> bool {
        match self.history.undo() {
            Some(prev) => {
                self.dragging = false;
                self.selection = prev;
                self.notify_selection();
                true
            }
            None => false,
        }
    }

    pub fn redo_selection(&mut self) -> bool {
        match self.history.redo() {
            Some(next) => {
                self.dragging = false;
                self.selection = next;
                self.notify_selection();
                true
            }
            None => false,
        }
    }

    // ── Transport ──────────────────────────────────────────────

    /// Move the playhead, clamped to `[0, duration]`.
    pub fn seek(&mut self, time: f64) {
        self.position = clamp_time(time, self.duration);
    }

    pub fn seek_by(&mut self, delta: f64) {
        self.seek(self.position + delta);
    }

    pub fn seek_to_start(&mut self) {
        self.seek(0.0);
    }

    pub fn seek_to_end(&mut self) {
        self.seek(self.duration);
    }

    /// Start playback. A no-op while already playing.
    ///
    /// With a non-empty selection playback runs over it. Otherwise it runs
    /// from the playhead (or from a zero-length selection) to the end.
    pub fn play(&mut self) {
        if self.timer.is_some() {
            return;
        }
        let run = match self.selection() {
            Some(sel) if !sel.is_empty() => PlayRun {
                origin: sel.start,
                end: sel.end,
            },
            Some(sel) => PlayRun {
                origin: sel.start,
                end: self.duration,
            },
            None => PlayRun {
                origin: self.position,
                end: self.duration,
            },
        };
        if run.origin >= run.end - END_EPSILON {
            debug!(origin = run.origin, "Nothing left to play");
            return;
        }
        self.position = run.origin;
        self.run = Some(run);
        self.timer = Some(PlaybackTimer::start(&self.driver, self.tick_interval));
        self.timers_started += 1;
        info!(from = run.origin, to = run.end, "Playback started");
    }

    /// Stop the timer, keeping position and selection.
    pub fn pause(&mut self) {
        if self.timer.take().is_some() {
            self.run = None;
            info!(position = self.position, "Playback paused");
        }
    }

    /// Stop the timer, rewind to 0 and clear the selection.
    pub fn stop(&mut self) {
        self.timer = None;
        self.run = None;
        self.position = 0.0;
        self.dragging = false;
        if self.selection.is_some() {
            self.selection = None;
            self.commit_selection();
        }
        debug!("Playback stopped");
    }

    pub fn toggle_play(&mut self) {
        if self.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Advance one tick. Reaching the end of the run stops playback and
    /// returns the playhead to where the run started.
    pub fn tick(&mut self) {
        let Some(run) = self.run else {
            return;
        };
        self.position = clamp_time(self.position + self.tick_step, self.duration);
        if self.position >= run.end - END_EPSILON {
            self.timer = None;
            self.run = None;
            self.position = run.origin;
            info!(position = self.position, "Playback reached end of range");
        }
    }

    /// Apply ticks delivered by the timer. Returns how many were applied.
    pub fn poll_timer(&mut self) -> usize {
        let pending = self.timer.as_ref().map_or(0, PlaybackTimer::drain);
        let mut applied = 0;
        for _ in 0..pending {
            if self.run.is_none() {
                break;
            }
            self.tick();
            applied += 1;
        }
        applied
    }

    // ── Rendering ──────────────────────────────────────────────

    /// Draw commands for the current state at `width` × `height`.
    pub fn render(&self, width: f32, height: f32, options: &RenderOptions) -> Vec<DrawCommand> {
        let scene = WaveformScene {
            visible: self.series.visible(self.zoom),
            duration: self.duration,
            position: self.position,
            selection: self.selection(),
            volume: self.volume,
        };
        render_waveform(&scene, width, height, options)
    }

    // ── Internals ──────────────────────────────────────────────

    fn commit_selection(&mut self) {
        self.history.record(self.selection());
        self.notify_selection();
    }

    fn notify_selection(&mut self) {
        let current = self.selection();
        if current == self.last_reported {
            return;
        }
        self.last_reported = current;
        if let Some(callback) = self.on_selection_change.as_mut() {
            callback(current);
        }
    }
}

impl std::fmt::Debug for WaveformCanvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WaveformCanvas")
            .field("samples", &self.series.len())
            .field("duration", &self.duration)
            .field("zoom", &self.zoom)
            .field("volume", &self.volume)
            .field("position", &self.position)
            .field("selection", &self.selection)
            .field("playing", &self.is_playing())
            .finish()
    }
}

fn sanitize_duration(duration: f64) -> f64 {
    if duration.is_finite() {
        duration.max(0.0)
    } else {
        0.0
    }
}
