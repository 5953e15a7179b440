//! Sonic Forge Audio - data behind the waveform, meters and spectrum
//!
//! Architecture:
//! - `AmplitudeSeries`: immutable amplitude sequence drawn by the canvas
//! - `Waveform`: min/max reduction of decoded samples
//! - `AnalysisSource`: synthetic or decoded provider of all displayed data
//! - `MeterState` / `SpectrumAnalyzer`: per-frame display state

pub mod meters;
pub mod source;
pub mod spectrum;
pub mod waveform;

pub use meters::{format_db, MeterState, StereoLevels};
pub use source::{AnalysisSource, DecodedSource, SyntheticSource};
pub use spectrum::SpectrumAnalyzer;
pub use waveform::{AmplitudeSeries, Waveform, WaveformSample};

use tracing::info;

/// Build the default source for an editor session.
///
/// With no decoded audio available the editor runs in demo mode.
pub fn demo_source(seed: Option<u64>) -> Box<dyn AnalysisSource> {
    info!(seeded = seed.is_some(), "Using synthetic analysis source");
    Box::new(SyntheticSource::new(seed))
}
