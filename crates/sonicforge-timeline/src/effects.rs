//! Effect rack and six-band EQ.
//!
//! These are parameter models only; nothing here processes audio.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{TimelineError, TimelineResult};

/// Intensity every effect returns to on reset.
pub const RESET_INTENSITY: u8 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    Reverb,
    Compressor,
    Equalizer,
    Distortion,
}

impl EffectKind {
    pub const ALL: [Self; 4] = [
        Self::Reverb,
        Self::Compressor,
        Self::Equalizer,
        Self::Distortion,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Self::Reverb => "reverb",
            Self::Compressor => "compressor",
            Self::Equalizer => "eq",
            Self::Distortion => "distortion",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Reverb => "Reverb",
            Self::Compressor => "Compressor",
            Self::Equalizer => "Equalizer",
            Self::Distortion => "Distortion",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Reverb => "Add spatial depth and ambience",
            Self::Compressor => "Control dynamic range",
            Self::Equalizer => "Shape frequency response",
            Self::Distortion => "Add harmonic warmth",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.id() == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectSlot {
    pub kind: EffectKind,
    pub enabled: bool,
    /// Percentage (0-100)
    pub intensity: u8,
}

/// The fixed set of effects shown in the effects panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectRack {
    slots: Vec<EffectSlot>,
}

impl Default for EffectRack {
    fn default() -> Self {
        let slot = |kind, enabled, intensity| EffectSlot {
            kind,
            enabled,
            intensity,
        };
        Self {
            slots: vec![
                slot(EffectKind::Reverb, true, 45),
                slot(EffectKind::Compressor, true, 60),
                slot(EffectKind::Equalizer, false, 30),
                slot(EffectKind::Distortion, false, 25),
            ],
        }
    }
}

impl EffectRack {
    pub fn slots(&self) -> &[EffectSlot] {
        &self.slots
    }

    pub fn get(&self, kind: EffectKind) -> Option<&EffectSlot> {
        self.slots.iter().find(|s| s.kind == kind)
    }

    fn get_mut(&mut self, kind: EffectKind) -> TimelineResult<&mut EffectSlot> {
        self.slots
            .iter_mut()
            .find(|s| s.kind == kind)
            .ok_or_else(|| TimelineError::EffectNotFound(kind.id().to_string()))
    }

    /// Flip the enabled flag; returns the new state.
    pub fn toggle(&mut self, kind: EffectKind) -> TimelineResult<bool> {
        let slot = self.get_mut(kind)?;
        slot.enabled = !slot.enabled;
        debug!(effect = kind.id(), enabled = slot.enabled, "Effect toggled");
        Ok(slot.enabled)
    }

    /// Set intensity (clamped to 100). Disabled effects keep their value.
    pub fn set_intensity(&mut self, kind: EffectKind, intensity: u8) -> TimelineResult<()> {
        let slot = self.get_mut(kind)?;
        if !slot.enabled {
            return Err(TimelineError::EffectDisabled(kind.display_name().to_string()));
        }
        slot.intensity = intensity.min(100);
        Ok(())
    }

    /// Disable everything and return intensities to the midpoint.
    pub fn reset_all(&mut self) {
        for slot in &mut self.slots {
            slot.enabled = false;
            slot.intensity = RESET_INTENSITY;
        }
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.enabled).count()
    }

    /// Display names of enabled effects, in rack order.
    pub fn active_names(&self) -> Vec<String> {
        self.slots
            .iter()
            .filter(|s| s.enabled)
            .map(|s| s.kind.display_name().to_string())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EqBand {
    pub label: String,
    /// Gain in dB
    pub gain_db: i8,
}

/// Six fixed-frequency EQ bands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EqBands {
    bands: Vec<EqBand>,
}

impl EqBands {
    /// Gain limit in either direction.
    pub const MAX_GAIN_DB: i8 = 24;

    pub fn bands(&self) -> &[EqBand] {
        &self.bands
    }

    pub fn set_gain(&mut self, index: usize, gain_db: i8) -> bool {
        match self.bands.get_mut(index) {
            Some(band) => {
                band.gain_db = gain_db.clamp(-Self::MAX_GAIN_DB, Self::MAX_GAIN_DB);
                true
            }
            None => false,
        }
    }

    /// Zero every band.
    pub fn flatten(&mut self) {
        for band in &mut self.bands {
            band.gain_db = 0;
        }
    }

    pub fn is_flat(&self) -> bool {
        self.bands.iter().all(|b| b.gain_db == 0)
    }

    /// Bar height as a percentage of the lane: 50% at 0 dB, 2% per dB,
    /// never below the minimum visible bar.
    pub fn bar_percent(band: &EqBand) -> f32 {
        (50.0 + band.gain_db as f32 * 2.0).clamp(4.0, 100.0)
    }
}

impl Default for EqBands {
    fn default() -> Self {
        let band = |label: &str, gain_db| EqBand {
            label: label.to_string(),
            gain_db,
        };
        Self {
            bands: vec![
                band("60Hz", 0),
                band("170Hz", 12),
                band("350Hz", -8),
                band("1kHz", 5),
                band("3.5kHz", 15),
                band("10kHz", 8),
            ],
        }
    }
}
