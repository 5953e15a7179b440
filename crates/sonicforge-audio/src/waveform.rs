//! Waveform data for visualization.
//!
//! `AmplitudeSeries` is the fixed, immutable sequence the canvas draws.
//! `Waveform` reduces raw samples to min/max pairs and is how decoded
//! audio becomes an amplitude series.

use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::sync::Arc;

/// Ordered, fixed-length sequence of normalized amplitudes.
///
/// Cloning is cheap; the values are shared and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct AmplitudeSeries {
    values: Arc<[f32]>,
}

impl AmplitudeSeries {
    pub fn new(values: Vec<f32>) -> Self {
        Self {
            values: values.into(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<f32> {
        self.values.get(index).copied()
    }

    /// Centered index window of length `len / factor`, clamped to `[1, len]`.
    ///
    /// A factor below 1 cannot show more than the whole series, so the
    /// window saturates at the full range.
    pub fn centered_window(&self, factor: f64) -> Range<usize> {
        let total = self.len();
        if total == 0 {
            return 0..0;
        }
        let factor = if factor.is_finite() && factor > 0.0 {
            factor
        } else {
            1.0
        };
        let visible = ((total as f64 / factor).round() as usize).clamp(1, total);
        let start = (total - visible) / 2;
        start..start + visible
    }

    /// Values inside the centered window for `factor`.
    pub fn visible(&self, factor: f64) -> &[f32] {
        &self.values[self.centered_window(factor)]
    }

    /// Largest absolute amplitude.
    pub fn peak(&self) -> f32 {
        self.values.iter().fold(0.0f32, |acc, v| acc.max(v.abs()))
    }
}

impl Default for AmplitudeSeries {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/// A min/max pair representing the amplitude range at a pixel position.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct WaveformSample {
    pub min: f32,
    pub max: f32,
}

impl WaveformSample {
    /// The larger magnitude of the pair, keeping its sign.
    pub fn dominant(self) -> f32 {
        if self.max.abs() >= self.min.abs() {
            self.max
        } else {
            self.min
        }
    }
}

/// Min/max reduction of a mono sample buffer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Waveform {
    /// Samples per waveform pixel (the reduction ratio).
    pub samples_per_pixel: usize,
    /// Min/max pairs for display.
    pub data: Vec<WaveformSample>,
    /// Source sample rate.
    pub sample_rate: u32,
}

impl Waveform {
    /// Compute a waveform from raw audio samples.
    ///
    /// `samples`: mono audio data (f32).
    /// `samples_per_pixel`: how many source samples per output pixel.
    pub fn compute(samples: &[f32], samples_per_pixel: usize, sample_rate: u32) -> Self {
        if samples_per_pixel == 0 || samples.is_empty() {
            return Self {
                samples_per_pixel: samples_per_pixel.max(1),
                data: Vec::new(),
                sample_rate,
            };
        }

        let data = samples
            .chunks(samples_per_pixel)
            .map(|chunk| {
                chunk.iter().fold(
                    WaveformSample {
                        min: f32::MAX,
                        max: f32::MIN,
                    },
                    |acc, &s| WaveformSample {
                        min: acc.min.min(s),
                        max: acc.max.max(s),
                    },
                )
            })
            .collect();

        Self {
            samples_per_pixel,
            data,
            sample_rate,
        }
    }

    /// Reduce `samples` to exactly `len` points (zero-padded when short).
    pub fn to_series(samples: &[f32], len: usize, sample_rate: u32) -> AmplitudeSeries {
        if len == 0 {
            return AmplitudeSeries::default();
        }
        let per_pixel = samples.len().div_ceil(len).max(1);
        let wf = Self::compute(samples, per_pixel, sample_rate);
        let mut values: Vec<f32> = wf.data.iter().map(|s| s.dominant()).collect();
        values.resize(len, 0.0);
        AmplitudeSeries::new(values)
    }

    /// Duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        (self.data.len() * self.samples_per_pixel) as f64 / self.sample_rate as f64
    }
}
