//! Error types for tracks, effects and projects.

use sonicforge_core::SonicForgeError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, PartialEq)]
pub enum TimelineError {
    #[error("Track not found: {0}")]
    TrackNotFound(Uuid),

    /// Locked tracks refuse parameter changes.
    #[error("Track '{0}' is locked")]
    TrackLocked(String),

    #[error("Effect not found: {0}")]
    EffectNotFound(String),

    #[error("Effect '{0}' is disabled")]
    EffectDisabled(String),

    #[error("Project not found: {0}")]
    ProjectNotFound(Uuid),

    #[error("Project name required")]
    EmptyProjectName,
}

impl From<TimelineError> for SonicForgeError {
    fn from(err: TimelineError) -> Self {
        match err {
            TimelineError::EmptyProjectName => SonicForgeError::Validation(err.to_string()),
            TimelineError::TrackNotFound(_)
            | TimelineError::EffectNotFound(_)
            | TimelineError::ProjectNotFound(_) => SonicForgeError::NotFound(err.to_string()),
            TimelineError::TrackLocked(_) | TimelineError::EffectDisabled(_) => {
                SonicForgeError::Operation(err.to_string())
            }
        }
    }
}

/// Result type alias for timeline operations.
pub type TimelineResult<T> = std::result::Result<T, TimelineError>;
