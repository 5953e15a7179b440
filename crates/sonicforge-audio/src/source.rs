//! Analysis sources feeding the waveform, meters and spectrum.
//!
//! The UI never generates data itself. It asks an [`AnalysisSource`], which
//! is either synthetic (demo mode) or backed by decoded samples.

use crate::meters::StereoLevels;
use crate::waveform::{AmplitudeSeries, Waveform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;
use tracing::debug;

/// Provider of amplitude, level and spectrum data.
pub trait AnalysisSource: Send {
    /// Short name for logs and status display.
    fn name(&self) -> &'static str;

    /// Fixed-length amplitude series for the waveform canvas.
    fn amplitudes(&mut self, len: usize) -> AmplitudeSeries;

    /// Stereo levels in `[0, 1]` at `position` seconds.
    fn levels(&mut self, position: f64, playing: bool) -> StereoLevels;

    /// `bands` spectrum magnitudes in `0..=255` at `position` seconds.
    ///
    /// `sensitivity` is a percentage in `0..=100`.
    fn spectrum(&mut self, position: f64, bands: usize, sensitivity: f32, playing: bool)
        -> Vec<u8>;
}

/// Spectrum output is scaled down by this factor while idle.
pub const IDLE_SPECTRUM_MULTIPLIER: f32 = 0.1;

// ── Synthetic ──────────────────────────────────────────────────

/// Pseudo-random data for demo mode.
pub struct SyntheticSource {
    rng: StdRng,
}

impl SyntheticSource {
    /// Deterministic source for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Source seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Seeded when `seed` is given, entropy otherwise.
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }
}

impl AnalysisSource for SyntheticSource {
    fn name(&self) -> &'static str {
        "synthetic"
    }

    fn amplitudes(&mut self, len: usize) -> AmplitudeSeries {
        const FREQUENCY: f32 = 0.02;
        let values = (0..len)
            .map(|i| (i as f32 * FREQUENCY).sin() * 0.5 + self.rng.random::<f32>() * 0.3)
            .collect();
        debug!(len, "Generated synthetic amplitude series");
        AmplitudeSeries::new(values)
    }

    fn levels(&mut self, _position: f64, playing: bool) -> StereoLevels {
        if !playing {
            return StereoLevels::SILENT;
        }
        let base = 0.3 + self.rng.random::<f32>() * 0.4;
        let variation = self.rng.random::<f32>() * 0.2;
        StereoLevels {
            left: (base + variation).min(1.0),
            right: (base - variation).min(1.0),
        }
    }

    fn spectrum(
        &mut self,
        _position: f64,
        bands: usize,
        sensitivity: f32,
        playing: bool,
    ) -> Vec<u8> {
        let sensitivity = sensitivity.clamp(0.0, 100.0) / 100.0;
        let multiplier = if playing { 1.0 } else { IDLE_SPECTRUM_MULTIPLIER };
        (0..bands)
            .map(|i| {
                let base = self.rng.random::<f32>() * sensitivity;
                // More energy in the low end.
                let weight = 1.0 - (i as f32 / bands as f32) * 0.7;
                (base * weight * multiplier * 255.0).floor().clamp(0.0, 255.0) as u8
            })
            .collect()
    }
}

// ── Decoded ────────────────────────────────────────────────────

/// Analysis over real mono samples supplied by a decoder.
pub struct DecodedSource {
    samples: Vec<f32>,
    sample_rate: u32,
    planner: FftPlanner<f32>,
}

impl DecodedSource {
    /// Samples per level measurement window.
    pub const LEVEL_WINDOW: usize = 1024;

    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
            planner: FftPlanner::new(),
        }
    }

    /// Duration of the buffer in seconds.
    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Samples starting at `position`, at most `len` of them.
    fn window(&self, position: f64, len: usize) -> &[f32] {
        let start = (position.max(0.0) * self.sample_rate as f64) as usize;
        let start = start.min(self.samples.len());
        let end = (start + len).min(self.samples.len());
        &self.samples[start..end]
    }
}

impl AnalysisSource for DecodedSource {
    fn name(&self) -> &'static str {
        "decoded"
    }

    fn amplitudes(&mut self, len: usize) -> AmplitudeSeries {
        Waveform::to_series(&self.samples, len, self.sample_rate)
    }

    fn levels(&mut self, position: f64, playing: bool) -> StereoLevels {
        if !playing {
            return StereoLevels::SILENT;
        }
        let window = self.window(position, Self::LEVEL_WINDOW);
        if window.is_empty() {
            return StereoLevels::SILENT;
        }
        let sum: f64 = window.iter().map(|&s| (s as f64) * (s as f64)).sum();
        let rms = ((sum / window.len() as f64).sqrt() as f32).clamp(0.0, 1.0);
        // Mono input feeds both channels.
        StereoLevels {
            left: rms,
            right: rms,
        }
    }

    fn spectrum(
        &mut self,
        position: f64,
        bands: usize,
        sensitivity: f32,
        playing: bool,
    ) -> Vec<u8> {
        if bands == 0 {
            return Vec::new();
        }
        let fft_len = bands * 2;
        let mut buffer: Vec<Complex<f32>> = self
            .window(position, fft_len)
            .iter()
            .map(|&s| Complex::new(s, 0.0))
            .collect();
        buffer.resize(fft_len, Complex::new(0.0, 0.0));

        let fft = self.planner.plan_fft_forward(fft_len);
        fft.process(&mut buffer);

        let scale = (sensitivity.clamp(0.0, 100.0) / 100.0)
            * if playing { 1.0 } else { IDLE_SPECTRUM_MULTIPLIER };
        let norm = 2.0 / fft_len as f32;
        buffer[..bands]
            .iter()
            .map(|c| (c.norm() * norm * scale * 255.0).clamp(0.0, 255.0) as u8)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_is_deterministic_per_seed() {
        let a = SyntheticSource::seeded(42).amplitudes(500);
        let b = SyntheticSource::seeded(42).amplitudes(500);
        assert_eq!(a, b);
        assert_eq!(a.len(), 500);
    }

    #[test]
    fn test_synthetic_amplitude_range() {
        let series = SyntheticSource::seeded(1).amplitudes(2000);
        assert!(series.as_slice().iter().all(|&v| (-0.5..=0.8).contains(&v)));
    }

    #[test]
    fn test_synthetic_levels_silent_when_stopped() {
        let mut src = SyntheticSource::seeded(3);
        assert_eq!(src.levels(0.0, false), StereoLevels::SILENT);
        let playing = src.levels(0.0, true);
        assert!(playing.left >= 0.3 && playing.left <= 1.0);
        assert!(playing.right >= 0.1 && playing.right <= 0.7);
    }

    #[test]
    fn test_synthetic_spectrum_idle_is_quiet() {
        let mut src = SyntheticSource::seeded(9);
        let idle = src.spectrum(0.0, 64, 100.0, false);
        assert_eq!(idle.len(), 64);
        // 255 * 0.1 = 25.5 is the ceiling while idle.
        assert!(idle.iter().all(|&b| b <= 25));
    }

    #[test]
    fn test_decoded_levels_follow_rms() {
        let mut src = DecodedSource::new(vec![0.5; 48000], 48000);
        let levels = src.levels(0.25, true);
        assert!((levels.left - 0.5).abs() < 1e-4);
        assert_eq!(levels.left, levels.right);
        assert_eq!(src.levels(0.25, false), StereoLevels::SILENT);
        // Past the end of the buffer there is nothing to measure.
        assert_eq!(src.levels(5.0, true), StereoLevels::SILENT);
    }

    #[test]
    fn test_decoded_spectrum_finds_tone() {
        // Pure tone landing exactly on bin 8 of a 128-point transform.
        let sample_rate = 12800;
        let freq = 8.0 * sample_rate as f32 / 128.0;
        let samples: Vec<f32> = (0..sample_rate)
            .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / sample_rate as f32).sin())
            .collect();
        let mut src = DecodedSource::new(samples, sample_rate);
        let bands = src.spectrum(0.0, 64, 100.0, true);
        let loudest = bands
            .iter()
            .enumerate()
            .max_by_key(|&(_, &b)| b)
            .map(|(i, _)| i);
        assert_eq!(loudest, Some(8));
    }

    #[test]
    fn test_decoded_amplitudes_have_requested_length() {
        let mut src = DecodedSource::new(vec![0.1; 4410], 44100);
        assert_eq!(src.amplitudes(2000).len(), 2000);
        assert!((src.duration_seconds() - 0.1).abs() < 1e-9);
    }
}
