//! Track types for the multi-track timeline.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{TimelineError, TimelineResult};

/// Kind of track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackKind {
    Audio,
    Vocal,
    Instrument,
}

/// RGB display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackColor(pub u8, pub u8, pub u8);

/// A timeline track and its mixer-strip settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    /// Unique track ID
    pub id: Uuid,
    /// Track name
    pub name: String,
    /// Track kind
    pub kind: TrackKind,
    /// Volume percentage (0-100)
    volume: u8,
    /// Is track muted
    pub muted: bool,
    /// Is track soloed
    pub solo: bool,
    /// Is track locked (prevent edits)
    pub locked: bool,
    /// Is the lane shown
    pub visible: bool,
    pub color: TrackColor,
}

impl Track {
    /// Create a new track at the given volume.
    pub fn new(name: impl Into<String>, kind: TrackKind, volume: u8, color: TrackColor) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
            volume: volume.min(100),
            muted: false,
            solo: false,
            locked: false,
            visible: true,
            color,
        }
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    /// Set the volume, clamped to 100. Fails on a locked track.
    pub fn set_volume(&mut self, volume: u8) -> TimelineResult<()> {
        if self.locked {
            return Err(TimelineError::TrackLocked(self.name.clone()));
        }
        self.volume = volume.min(100);
        Ok(())
    }
}

/// Ordered collection of tracks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackList {
    tracks: Vec<Track>,
}

impl TrackList {
    pub fn new() -> Self {
        Self { tracks: Vec::new() }
    }

    /// The three starter tracks of a new session.
    pub fn starter() -> Self {
        let mut background = Track::new(
            "Background",
            TrackKind::Instrument,
            45,
            TrackColor(245, 150, 90),
        );
        background.muted = true;
        Self {
            tracks: vec![
                Track::new("Main Audio", TrackKind::Audio, 80, TrackColor(74, 222, 128)),
                Track::new("Vocals", TrackKind::Vocal, 65, TrackColor(196, 160, 250)),
                background,
            ],
        }
    }

    pub fn push(&mut self, track: Track) -> Uuid {
        let id = track.id;
        self.tracks.push(track);
        id
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    pub fn get(&self, id: Uuid) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }

    fn get_mut(&mut self, id: Uuid) -> TimelineResult<&mut Track> {
        self.tracks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(TimelineError::TrackNotFound(id))
    }

    pub fn toggle_mute(&mut self, id: Uuid) -> TimelineResult<bool> {
        let track = self.get_mut(id)?;
        track.muted = !track.muted;
        Ok(track.muted)
    }

    pub fn toggle_solo(&mut self, id: Uuid) -> TimelineResult<bool> {
        let track = self.get_mut(id)?;
        track.solo = !track.solo;
        Ok(track.solo)
    }

    pub fn toggle_lock(&mut self, id: Uuid) -> TimelineResult<bool> {
        let track = self.get_mut(id)?;
        track.locked = !track.locked;
        Ok(track.locked)
    }

    pub fn toggle_visible(&mut self, id: Uuid) -> TimelineResult<bool> {
        let track = self.get_mut(id)?;
        track.visible = !track.visible;
        Ok(track.visible)
    }

    pub fn set_volume(&mut self, id: Uuid, volume: u8) -> TimelineResult<()> {
        self.get_mut(id)?.set_volume(volume)
    }

    /// Whether a track would be heard: any solo silences every non-solo
    /// track, and mute always wins.
    pub fn is_audible(&self, id: Uuid) -> bool {
        let any_solo = self.tracks.iter().any(|t| t.solo);
        self.get(id)
            .is_some_and(|t| !t.muted && (!any_solo || t.solo))
    }

    /// Tracks that are not muted (the "active" badge count).
    pub fn active_count(&self) -> usize {
        self.tracks.iter().filter(|t| !t.muted).count()
    }
}

impl Default for TrackList {
    fn default() -> Self {
        Self::starter()
    }
}
