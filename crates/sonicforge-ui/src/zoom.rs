//! Zoom toolbar state.
//!
//! The toolbar owns the zoom level as a percentage; the canvas receives
//! `level / 100` as its factor whenever the level changes.

use serde::{Deserialize, Serialize};

pub const MIN_LEVEL: u32 = 10;
pub const MAX_LEVEL: u32 = 800;
pub const DEFAULT_LEVEL: u32 = 100;
/// Zoom in/out button step.
pub const BUTTON_STEP: u32 = 25;
/// Slider granularity.
pub const SLIDER_STEP: u32 = 5;
pub const PRESETS: [u32; 4] = [25, 50, 100, 200];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ViewMode {
    #[default]
    Waveform,
    Spectral,
    Both,
}

impl ViewMode {
    pub const ALL: [ViewMode; 3] = [ViewMode::Waveform, ViewMode::Spectral, ViewMode::Both];

    pub fn label(self) -> &'static str {
        match self {
            ViewMode::Waveform => "Waveform",
            ViewMode::Spectral => "Spectral",
            ViewMode::Both => "Both",
        }
    }

    pub fn shows_waveform(self) -> bool {
        matches!(self, ViewMode::Waveform | ViewMode::Both)
    }

    pub fn shows_spectrum(self) -> bool {
        matches!(self, ViewMode::Spectral | ViewMode::Both)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoomControls {
    level: u32,
    pub view_mode: ViewMode,
}

impl Default for ZoomControls {
    fn default() -> Self {
        Self {
            level: DEFAULT_LEVEL,
            view_mode: ViewMode::default(),
        }
    }
}

impl ZoomControls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Level in percent.
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Canvas zoom factor for the current level.
    pub fn factor(&self) -> f64 {
        self.level as f64 / 100.0
    }

    pub fn zoom_in(&mut self) -> u32 {
        self.set_level(self.level.saturating_add(BUTTON_STEP))
    }

    pub fn zoom_out(&mut self) -> u32 {
        self.set_level(self.level.saturating_sub(BUTTON_STEP))
    }

    /// Set from the slider; snaps to the slider step, then clamps.
    pub fn set_level(&mut self, level: u32) -> u32 {
        let snapped = level.saturating_add(SLIDER_STEP / 2) / SLIDER_STEP * SLIDER_STEP;
        self.level = snapped.clamp(MIN_LEVEL, MAX_LEVEL);
        self.level
    }

    pub fn fit(&mut self) -> u32 {
        self.set_level(DEFAULT_LEVEL)
    }

    pub fn reset(&mut self) -> u32 {
        self.set_level(DEFAULT_LEVEL)
    }

    pub fn can_zoom_in(&self) -> bool {
        self.level < MAX_LEVEL
    }

    pub fn can_zoom_out(&self) -> bool {
        self.level > MIN_LEVEL
    }

    /// Human description of the current level.
    pub fn description(&self) -> &'static str {
        match self.level {
            l if l < 50 => "Wide view",
            l if l < 100 => "Normal view",
            l if l < 200 => "Detailed view",
            l if l < 400 => "Close-up view",
            _ => "Sample level",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_defaults() {
        let z = ZoomControls::new();
        assert_eq!(z.level(), 100);
        assert_eq!(z.factor(), 1.0);
        assert_eq!(z.view_mode, ViewMode::Waveform);
        assert_eq!(z.description(), "Detailed view");
    }

    #[test]
    fn test_step_and_clamp() {
        let mut z = ZoomControls::new();
        assert_eq!(z.zoom_in(), 125);
        for _ in 0..40 {
            z.zoom_in();
        }
        assert_eq!(z.level(), MAX_LEVEL);
        assert!(!z.can_zoom_in());
        for _ in 0..40 {
            z.zoom_out();
        }
        assert_eq!(z.level(), MIN_LEVEL);
        assert!(!z.can_zoom_out());
        assert_eq!(z.factor(), 0.1);
    }

    #[test]
    fn test_slider_snaps() {
        let mut z = ZoomControls::new();
        assert_eq!(z.set_level(123), 125);
        assert_eq!(z.set_level(121), 120);
        assert_eq!(z.set_level(1000), 800);
        assert_eq!(z.set_level(0), 10);
    }

    #[test]
    fn test_fit_and_reset() {
        let mut z = ZoomControls::new();
        z.set_level(400);
        assert_eq!(z.fit(), 100);
        z.set_level(25);
        assert_eq!(z.reset(), 100);
    }

    #[test]
    fn test_descriptions() {
        let mut z = ZoomControls::new();
        let cases = [
            (25, "Wide view"),
            (50, "Normal view"),
            (150, "Detailed view"),
            (200, "Close-up view"),
            (400, "Sample level"),
        ];
        for (level, text) in cases {
            z.set_level(level);
            assert_eq!(z.description(), text, "level {}", level);
        }
    }

    #[test]
    fn test_view_modes() {
        assert!(ViewMode::Both.shows_waveform() && ViewMode::Both.shows_spectrum());
        assert!(!ViewMode::Spectral.shows_waveform());
        assert!(!ViewMode::Waveform.shows_spectrum());
    }

    proptest! {
        #[test]
        fn level_always_in_range(level in 0u32..5000) {
            let mut z = ZoomControls::new();
            let applied = z.set_level(level);
            prop_assert!((MIN_LEVEL..=MAX_LEVEL).contains(&applied));
            prop_assert_eq!(applied % SLIDER_STEP, 0);
        }
    }
}
