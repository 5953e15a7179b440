//! Stereo level meters with peak hold.

use serde::{Deserialize, Serialize};

/// Peak-hold decay applied per update.
pub const PEAK_DECAY: f32 = 0.95;

/// Peaks above this level light the clip indicator.
pub const CLIP_THRESHOLD: f32 = 0.95;

/// Instantaneous left/right levels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StereoLevels {
    pub left: f32,
    pub right: f32,
}

impl StereoLevels {
    pub const SILENT: Self = Self {
        left: 0.0,
        right: 0.0,
    };
}

/// Meter state for one stereo bus.
#[derive(Debug, Clone, PartialEq)]
pub struct MeterState {
    pub levels: StereoLevels,
    pub left_peak: f32,
    pub right_peak: f32,
    pub peak_hold: bool,
}

impl Default for MeterState {
    fn default() -> Self {
        Self {
            levels: StereoLevels::SILENT,
            left_peak: 0.0,
            right_peak: 0.0,
            peak_hold: true,
        }
    }
}

impl MeterState {
    /// Feed a new reading.
    pub fn update(&mut self, levels: StereoLevels) {
        let left = levels.left.clamp(0.0, 1.0);
        let right = levels.right.clamp(0.0, 1.0);
        self.levels = StereoLevels { left, right };
        if self.peak_hold {
            self.left_peak = (self.left_peak * PEAK_DECAY).max(left);
            self.right_peak = (self.right_peak * PEAK_DECAY).max(right);
        } else {
            self.left_peak = left;
            self.right_peak = right;
        }
    }

    /// Drop everything back to silence.
    pub fn reset(&mut self) {
        self.levels = StereoLevels::SILENT;
        self.left_peak = 0.0;
        self.right_peak = 0.0;
    }

    pub fn toggle_peak_hold(&mut self) {
        self.peak_hold = !self.peak_hold;
    }

    pub fn is_clipping(&self) -> bool {
        self.left_peak > CLIP_THRESHOLD || self.right_peak > CLIP_THRESHOLD
    }
}

/// Format a linear level as decibels, `-∞` for silence.
pub fn format_db(level: f32) -> String {
    if level <= 0.0 {
        return "-∞".to_string();
    }
    format!("{:.1}dB", 20.0 * level.log10())
}
