//! Spectrum analyzer state.

use crate::source::AnalysisSource;

/// Number of displayed bands.
pub const BAND_COUNT: usize = 64;

/// Bands above this magnitude get a peak marker.
pub const PEAK_THRESHOLD: u8 = 200;

/// Axis labels, evenly spaced.
pub const FREQUENCY_LABELS: [&str; 5] = ["60Hz", "250Hz", "1kHz", "4kHz", "16kHz"];

#[derive(Debug, Clone)]
pub struct SpectrumAnalyzer {
    sensitivity: f32,
    smoothing: f32,
    pub show_peaks: bool,
    bands: Vec<u8>,
}

impl Default for SpectrumAnalyzer {
    fn default() -> Self {
        Self {
            sensitivity: 75.0,
            smoothing: 85.0,
            show_peaks: true,
            bands: vec![0; BAND_COUNT],
        }
    }
}

impl SpectrumAnalyzer {
    pub fn sensitivity(&self) -> f32 {
        self.sensitivity
    }

    pub fn set_sensitivity(&mut self, value: f32) {
        self.sensitivity = value.clamp(0.0, 100.0);
    }

    pub fn smoothing(&self) -> f32 {
        self.smoothing
    }

    pub fn set_smoothing(&mut self, value: f32) {
        self.smoothing = value.clamp(0.0, 100.0);
    }

    /// Current band magnitudes.
    pub fn bands(&self) -> &[u8] {
        &self.bands
    }

    /// Pull a new frame from `source` and blend it with the previous one.
    ///
    /// Smoothing of 0 takes the new frame as-is; higher values weight the
    /// previous frame more heavily. Capped below 1 so the display still moves.
    pub fn advance(&mut self, source: &mut dyn AnalysisSource, position: f64, playing: bool) {
        let fresh = source.spectrum(position, BAND_COUNT, self.sensitivity, playing);
        let keep = (self.smoothing / 100.0).min(0.99);
        for (band, new) in self.bands.iter_mut().zip(fresh) {
            let blended = *band as f32 * keep + new as f32 * (1.0 - keep);
            *band = blended.round().clamp(0.0, 255.0) as u8;
        }
    }

    /// Indices of bands that currently show a peak marker.
    pub fn peak_bands(&self) -> Vec<usize> {
        if !self.show_peaks {
            return Vec::new();
        }
        self.bands
            .iter()
            .enumerate()
            .filter(|&(_, &b)| b > PEAK_THRESHOLD)
            .map(|(i, _)| i)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meters::StereoLevels;
    use crate::waveform::AmplitudeSeries;

    /// Source returning a constant spectrum.
    struct Flat(u8);

    impl AnalysisSource for Flat {
        fn name(&self) -> &'static str {
            "flat"
        }
        fn amplitudes(&mut self, len: usize) -> AmplitudeSeries {
            AmplitudeSeries::new(vec![0.0; len])
        }
        fn levels(&mut self, _: f64, _: bool) -> StereoLevels {
            StereoLevels::SILENT
        }
        fn spectrum(&mut self, _: f64, bands: usize, _: f32, _: bool) -> Vec<u8> {
            vec![self.0; bands]
        }
    }

    #[test]
    fn test_no_smoothing_takes_new_frame() {
        let mut analyzer = SpectrumAnalyzer::default();
        analyzer.set_smoothing(0.0);
        analyzer.advance(&mut Flat(210), 0.0, true);
        assert!(analyzer.bands().iter().all(|&b| b == 210));
        assert_eq!(analyzer.peak_bands().len(), BAND_COUNT);
    }

    #[test]
    fn test_smoothing_blends_frames() {
        let mut analyzer = SpectrumAnalyzer::default();
        analyzer.set_smoothing(50.0);
        analyzer.advance(&mut Flat(200), 0.0, true);
        assert_eq!(analyzer.bands()[0], 100);
        analyzer.advance(&mut Flat(200), 0.0, true);
        assert_eq!(analyzer.bands()[0], 150);
    }

    #[test]
    fn test_peaks_hidden_when_disabled() {
        let mut analyzer = SpectrumAnalyzer::default();
        analyzer.set_smoothing(0.0);
        analyzer.show_peaks = false;
        analyzer.advance(&mut Flat(250), 0.0, true);
        assert!(analyzer.peak_bands().is_empty());
    }

    #[test]
    fn test_settings_clamped() {
        let mut analyzer = SpectrumAnalyzer::default();
        analyzer.set_sensitivity(150.0);
        analyzer.set_smoothing(-4.0);
        assert_eq!(analyzer.sensitivity(), 100.0);
        assert_eq!(analyzer.smoothing(), 0.0);
    }
}
