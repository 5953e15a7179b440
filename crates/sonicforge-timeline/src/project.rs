//! Saved-project metadata and the in-memory project library.
//!
//! A saved project is metadata only: no audio payload is stored.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info};
use uuid::Uuid;

use crate::effects::EffectRack;
use crate::error::{TimelineError, TimelineResult};
use crate::track::TrackList;

/// Metadata of one saved project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectData {
    /// Unique project ID
    pub id: Uuid,
    /// Project name
    pub name: String,
    /// Creation time (unix seconds)
    pub created: u64,
    /// Last modification time (unix seconds)
    pub modified: u64,
    /// Length of the session in seconds
    pub duration: f64,
    /// Number of tracks
    pub tracks: u32,
    /// Names of effects in use
    pub effects: Vec<String>,
}

/// What gets recorded about the current session when saving.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub duration: f64,
    pub tracks: u32,
    pub effects: Vec<String>,
}

impl SessionSummary {
    /// Summarize the live track list and effect rack.
    pub fn capture(duration: f64, tracks: &TrackList, rack: &EffectRack) -> Self {
        Self {
            duration,
            tracks: tracks.len() as u32,
            effects: rack.active_names(),
        }
    }
}

impl Default for SessionSummary {
    fn default() -> Self {
        Self {
            duration: 180.0,
            tracks: 5,
            effects: vec!["Reverb".to_string(), "EQ".to_string()],
        }
    }
}

/// Current time in unix seconds; zero if the clock is before the epoch.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Saved projects, kept in insertion order and listed newest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectLibrary {
    projects: Vec<ProjectData>,
}

impl ProjectLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Library seeded with three sample projects.
    pub fn with_demo_projects(now: u64) -> Self {
        const DAY: u64 = 86_400;
        let demo = |name: &str, age_days: u64, edited_days: u64, duration, tracks, effects: &[&str]| {
            ProjectData {
                id: Uuid::new_v4(),
                name: name.to_string(),
                created: now.saturating_sub(age_days * DAY),
                modified: now.saturating_sub(edited_days * DAY),
                duration,
                tracks,
                effects: effects.iter().map(|e| e.to_string()).collect(),
            }
        };
        Self {
            projects: vec![
                demo("Electronic Mix v2", 7, 1, 245.0, 8, &["Reverb", "Compressor", "EQ"]),
                demo("Podcast Episode 12", 14, 3, 3600.0, 3, &["Noise Gate", "EQ"]),
                demo("Guitar Recording", 30, 7, 180.0, 4, &["Distortion", "Delay", "EQ"]),
            ],
        }
    }

    pub fn from_projects(projects: Vec<ProjectData>) -> Self {
        Self { projects }
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Save the session under `name`. Blank names are rejected.
    pub fn save(
        &mut self,
        name: &str,
        summary: SessionSummary,
        now: u64,
    ) -> TimelineResult<&ProjectData> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TimelineError::EmptyProjectName);
        }
        let project = ProjectData {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created: now,
            modified: now,
            duration: summary.duration,
            tracks: summary.tracks,
            effects: summary.effects,
        };
        info!(id = %project.id, name = %project.name, "Project saved");
        self.projects.push(project);
        let idx = self.projects.len() - 1;
        Ok(&self.projects[idx])
    }

    pub fn get(&self, id: Uuid) -> Option<&ProjectData> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// Open a project, bumping its modification time.
    pub fn load(&mut self, id: Uuid, now: u64) -> TimelineResult<ProjectData> {
        let project = self
            .projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(TimelineError::ProjectNotFound(id))?;
        project.modified = now;
        debug!(id = %id, name = %project.name, "Project loaded");
        Ok(project.clone())
    }

    pub fn delete(&mut self, id: Uuid) -> TimelineResult<ProjectData> {
        let idx = self
            .projects
            .iter()
            .position(|p| p.id == id)
            .ok_or(TimelineError::ProjectNotFound(id))?;
        let removed = self.projects.remove(idx);
        info!(id = %id, name = %removed.name, "Project deleted");
        Ok(removed)
    }

    /// Projects ordered by modification time, newest first.
    pub fn list(&self) -> Vec<&ProjectData> {
        let mut sorted: Vec<&ProjectData> = self.projects.iter().collect();
        sorted.sort_by(|a, b| b.modified.cmp(&a.modified));
        sorted
    }

    pub fn projects(&self) -> &[ProjectData] {
        &self.projects
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: u64 = 1_700_000_000;

    #[test]
    fn test_blank_name_rejected() {
        let mut lib = ProjectLibrary::new();
        assert_eq!(
            lib.save("   ", SessionSummary::default(), NOW).unwrap_err(),
            TimelineError::EmptyProjectName
        );
        assert!(lib.is_empty());
    }

    #[test]
    fn test_save_trims_and_records_summary() {
        let mut lib = ProjectLibrary::new();
        let saved = lib.save("  Demo  ", SessionSummary::default(), NOW).unwrap();
        assert_eq!(saved.name, "Demo");
        assert_eq!(saved.tracks, 5);
        assert_eq!(saved.effects, ["Reverb", "EQ"]);
        assert_eq!(saved.created, NOW);
    }

    #[test]
    fn test_list_newest_first() {
        let lib = ProjectLibrary::with_demo_projects(NOW);
        let names: Vec<&str> = lib.list().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            ["Electronic Mix v2", "Podcast Episode 12", "Guitar Recording"]
        );
    }

    #[test]
    fn test_load_bumps_modified() {
        let mut lib = ProjectLibrary::with_demo_projects(NOW);
        let oldest = lib.list()[2].id;
        let loaded = lib.load(oldest, NOW + 10).unwrap();
        assert_eq!(loaded.name, "Guitar Recording");
        assert_eq!(lib.list()[0].id, oldest);
    }

    #[test]
    fn test_delete_unknown() {
        let mut lib = ProjectLibrary::with_demo_projects(NOW);
        let missing = Uuid::new_v4();
        assert_eq!(
            lib.delete(missing).unwrap_err(),
            TimelineError::ProjectNotFound(missing)
        );
        let first = lib.projects()[0].id;
        lib.delete(first).unwrap();
        assert_eq!(lib.len(), 2);
        assert!(lib.get(first).is_none());
    }

    #[test]
    fn test_capture_session() {
        let summary = SessionSummary::capture(90.0, &TrackList::starter(), &EffectRack::default());
        assert_eq!(summary.tracks, 3);
        assert_eq!(summary.effects, ["Reverb", "Compressor"]);
    }
}
