//! Sonic Forge Timeline - session data model
//!
//! - Tracks with mixer-strip settings
//! - Effect rack and six-band EQ
//! - Project library with versioned JSON persistence

pub mod effects;
pub mod error;
pub mod project;
pub mod serialization;
pub mod track;

pub use effects::{EffectKind, EffectRack, EffectSlot, EqBand, EqBands};
pub use error::{TimelineError, TimelineResult};
pub use project::{unix_now, ProjectData, ProjectLibrary, SessionSummary};
pub use serialization::{load_library_or, LibraryFile};
pub use track::{Track, TrackColor, TrackKind, TrackList};
