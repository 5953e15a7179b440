//! Draw-command IR for the waveform, meters and spectrum.
//!
//! Every `render_*` function is a pure function of its inputs. The egui
//! painter in [`crate::painter`] is the only place that turns commands into
//! pixels, so layout can be asserted on without a GPU.

use sonicforge_audio::meters::{MeterState, CLIP_THRESHOLD};
use sonicforge_audio::spectrum::{SpectrumAnalyzer, FREQUENCY_LABELS, PEAK_THRESHOLD};
use sonicforge_core::{format_duration, TimeRange};

/// Semantic paint role. The painter maps roles to theme colors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fill {
    Background,
    /// Empty meter channel.
    Trough,
    WaveBar,
    Selection,
    Playhead,
    AxisTick,
    AxisText,
    MeterLevel,
    /// Peak-hold marker; `hot` above 0.8.
    PeakHold { hot: bool },
    Clip,
    ScaleText,
    ChannelLabel,
    Grid,
    /// Spectrum bar with a hue in degrees.
    SpectrumBar { hue: f32 },
    SpectrumPeak,
}

/// Horizontal text anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectF {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl RectF {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Rect {
        rect: RectF,
        fill: Fill,
    },
    Line {
        from: (f32, f32),
        to: (f32, f32),
        width: f32,
        color: Fill,
    },
    Text {
        pos: (f32, f32),
        text: String,
        size: f32,
        anchor: Anchor,
        color: Fill,
    },
}

// ── Waveform ───────────────────────────────────────────────────

/// Optional waveform decorations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    pub show_ticks: bool,
    /// Intervals on the time axis; `n` intervals give `n + 1` labels.
    pub tick_intervals: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_ticks: true,
            tick_intervals: 6,
        }
    }
}

/// Everything the waveform drawing depends on.
#[derive(Debug, Clone, Copy)]
pub struct WaveformScene<'a> {
    /// Amplitudes inside the zoom window.
    pub visible: &'a [f32],
    pub duration: f64,
    pub position: f64,
    /// Normalized selection.
    pub selection: Option<TimeRange>,
    /// Volume percentage (0-100).
    pub volume: u8,
}

const AXIS_FONT: f32 = 10.0;
const TICK_LEN: f32 = 6.0;

fn time_to_x(time: f64, duration: f64, width: f32) -> f32 {
    if duration <= 0.0 {
        return 0.0;
    }
    ((time / duration).clamp(0.0, 1.0) as f32) * width
}

/// Draw a waveform scene into a `width` × `height` box.
pub fn render_waveform(
    scene: &WaveformScene<'_>,
    width: f32,
    height: f32,
    options: &RenderOptions,
) -> Vec<DrawCommand> {
    let width = width.max(0.0);
    let height = height.max(0.0);
    let mut out = Vec::with_capacity(scene.visible.len() + 16);
    out.push(DrawCommand::Rect {
        rect: RectF::new(0.0, 0.0, width, height),
        fill: Fill::Background,
    });

    let center_y = height / 2.0;
    let gain = scene.volume.min(100) as f32 / 100.0;
    if !scene.visible.is_empty() {
        let bar_width = width / scene.visible.len() as f32;
        // Leave a 1px gap only when bars are wide enough to keep one.
        let drawn_width = if bar_width > 2.0 { bar_width - 1.0 } else { bar_width };
        for (i, amp) in scene.visible.iter().enumerate() {
            let bar_height = (amp.abs() * gain).min(1.0) * center_y;
            out.push(DrawCommand::Rect {
                rect: RectF::new(
                    i as f32 * bar_width,
                    center_y - bar_height,
                    drawn_width,
                    bar_height * 2.0,
                ),
                fill: Fill::WaveBar,
            });
        }
    }

    if let Some(sel) = scene.selection {
        let sel = sel.normalized();
        let x0 = time_to_x(sel.start, scene.duration, width);
        let x1 = time_to_x(sel.end, scene.duration, width);
        out.push(DrawCommand::Rect {
            rect: RectF::new(x0, 0.0, x1 - x0, height),
            fill: Fill::Selection,
        });
    }

    if options.show_ticks && options.tick_intervals > 0 && scene.duration > 0.0 {
        let n = options.tick_intervals;
        for k in 0..=n {
            let t = scene.duration * k as f64 / n as f64;
            let x = time_to_x(t, scene.duration, width);
            out.push(DrawCommand::Line {
                from: (x, height - TICK_LEN),
                to: (x, height),
                width: 1.0,
                color: Fill::AxisTick,
            });
            let anchor = match k {
                0 => Anchor::Left,
                k if k == n => Anchor::Right,
                _ => Anchor::Center,
            };
            out.push(DrawCommand::Text {
                pos: (x, height - TICK_LEN - 2.0),
                text: format_duration(t),
                size: AXIS_FONT,
                anchor,
                color: Fill::AxisText,
            });
        }
    }

    let x = time_to_x(scene.position, scene.duration, width);
    out.push(DrawCommand::Line {
        from: (x, 0.0),
        to: (x, height),
        width: 2.0,
        color: Fill::Playhead,
    });

    out
}

// ── Meters ─────────────────────────────────────────────────────

const METER_WIDTH: f32 = 20.0;
const METER_SPACING: f32 = 30.0;
const METER_TOP: f32 = 20.0;
const METER_LEFT: f32 = 10.0;
/// Scale labels from top to bottom of the meter.
pub const DB_MARKS: [&str; 7] = ["0", "-3", "-6", "-10", "-20", "-40", "-60"];

/// Draw a stereo meter pair.
pub fn render_meters(state: &MeterState, width: f32, height: f32) -> Vec<DrawCommand> {
    let meter_height = (height - 2.0 * METER_TOP).max(0.0);
    let mut out = vec![DrawCommand::Rect {
        rect: RectF::new(0.0, 0.0, width, height),
        fill: Fill::Background,
    }];

    let channels = [
        (METER_LEFT, state.levels.left, state.left_peak, "L"),
        (
            METER_LEFT + METER_SPACING,
            state.levels.right,
            state.right_peak,
            "R",
        ),
    ];

    for (x, level, peak, label) in channels {
        out.push(DrawCommand::Rect {
            rect: RectF::new(x, METER_TOP, METER_WIDTH, meter_height),
            fill: Fill::Trough,
        });

        let level_height = level.clamp(0.0, 1.0) * meter_height;
        out.push(DrawCommand::Rect {
            rect: RectF::new(
                x,
                METER_TOP + meter_height - level_height,
                METER_WIDTH,
                level_height,
            ),
            fill: Fill::MeterLevel,
        });

        if state.peak_hold && peak > 0.1 {
            let peak_y = METER_TOP + meter_height - peak.clamp(0.0, 1.0) * meter_height;
            out.push(DrawCommand::Rect {
                rect: RectF::new(x, peak_y - 2.0, METER_WIDTH, 3.0),
                fill: Fill::PeakHold { hot: peak > 0.8 },
            });
        }

        let step = meter_height / (DB_MARKS.len() - 1) as f32;
        for (i, mark) in DB_MARKS.iter().enumerate() {
            out.push(DrawCommand::Text {
                pos: (x + METER_WIDTH + 3.0, METER_TOP + step * i as f32 + 3.0),
                text: (*mark).to_string(),
                size: 8.0,
                anchor: Anchor::Left,
                color: Fill::ScaleText,
            });
        }

        out.push(DrawCommand::Text {
            pos: (x + 5.0, height - 5.0),
            text: label.to_string(),
            size: AXIS_FONT,
            anchor: Anchor::Left,
            color: Fill::ChannelLabel,
        });
    }

    if state.left_peak > CLIP_THRESHOLD {
        out.push(DrawCommand::Rect {
            rect: RectF::new(5.0, 5.0, 8.0, 8.0),
            fill: Fill::Clip,
        });
    }
    if state.right_peak > CLIP_THRESHOLD {
        out.push(DrawCommand::Rect {
            rect: RectF::new(width - 13.0, 5.0, 8.0, 8.0),
            fill: Fill::Clip,
        });
    }

    out
}

// ── Spectrum ───────────────────────────────────────────────────

const GRID_ROWS: usize = 8;

/// Hue for band `index` of `count`: green at the low end to purple.
pub fn band_hue(index: usize, count: usize) -> f32 {
    if count == 0 {
        return 142.0;
    }
    142.0 + (index as f32 / count as f32) * 128.0
}

/// Draw the spectrum analyzer bars.
pub fn render_spectrum(analyzer: &SpectrumAnalyzer, width: f32, height: f32) -> Vec<DrawCommand> {
    let bands = analyzer.bands();
    let mut out = vec![DrawCommand::Rect {
        rect: RectF::new(0.0, 0.0, width, height),
        fill: Fill::Background,
    }];

    for row in 1..GRID_ROWS {
        let y = height / GRID_ROWS as f32 * row as f32;
        out.push(DrawCommand::Line {
            from: (0.0, y),
            to: (width, y),
            width: 1.0,
            color: Fill::Grid,
        });
    }

    if !bands.is_empty() {
        let bar_width = width / bands.len() as f32;
        let drawn_width = (bar_width - 1.0).max(1.0);
        for (i, &amp) in bands.iter().enumerate() {
            let bar_height = amp as f32 / 255.0 * height;
            let x = i as f32 * bar_width;
            let y = height - bar_height;
            out.push(DrawCommand::Rect {
                rect: RectF::new(x, y, drawn_width, bar_height),
                fill: Fill::SpectrumBar {
                    hue: band_hue(i, bands.len()),
                },
            });
            if analyzer.show_peaks && amp > PEAK_THRESHOLD {
                out.push(DrawCommand::Rect {
                    rect: RectF::new(x, y - 3.0, drawn_width, 2.0),
                    fill: Fill::SpectrumPeak,
                });
            }
        }
    }

    let label_step = width / FREQUENCY_LABELS.len() as f32;
    for (i, label) in FREQUENCY_LABELS.iter().enumerate() {
        out.push(DrawCommand::Text {
            pos: (label_step * i as f32 + 10.0, height - 5.0),
            text: (*label).to_string(),
            size: AXIS_FONT,
            anchor: Anchor::Left,
            color: Fill::ScaleText,
        });
    }

    out
}
