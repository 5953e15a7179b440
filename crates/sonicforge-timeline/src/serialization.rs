//! Project library persistence with versioning and migration.
//!
//! Uses JSON with a schema version field for forward-compatible persistence.

use serde::{Deserialize, Serialize};
use sonicforge_core::{Result, SonicForgeError};
use std::path::Path;
use tracing::{debug, info};

use crate::project::{ProjectData, ProjectLibrary};

/// Current schema version.
pub const CURRENT_VERSION: u32 = 1;

/// Versioned library file wrapper.
#[derive(Debug, Serialize, Deserialize)]
pub struct LibraryFile {
    /// Schema version for migration.
    pub version: u32,
    pub projects: Vec<ProjectData>,
    /// Application version that wrote this file.
    pub app_version: String,
}

impl LibraryFile {
    pub fn new(library: &ProjectLibrary) -> Self {
        Self {
            version: CURRENT_VERSION,
            projects: library.projects().to_vec(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn into_library(self) -> ProjectLibrary {
        ProjectLibrary::from_projects(self.projects)
    }

    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self).map_err(|e| {
            SonicForgeError::Serialization(format!("Failed to serialize library: {}", e))
        })
    }

    /// Deserialize from JSON bytes, applying migrations if needed.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let raw: serde_json::Value = serde_json::from_slice(data)
            .map_err(|e| SonicForgeError::Serialization(format!("Invalid JSON: {}", e)))?;

        // A bare array predates the wrapper and counts as version 0.
        let version = raw.get("version").and_then(|v| v.as_u64()).unwrap_or(0);

        if version > u64::from(CURRENT_VERSION) {
            return Err(SonicForgeError::Serialization(format!(
                "Library file version {} is newer than supported version {}",
                version, CURRENT_VERSION
            )));
        }

        let migrated = migrate(raw, version as u32)?;
        serde_json::from_value(migrated)
            .map_err(|e| SonicForgeError::Serialization(format!("Failed to parse library: {}", e)))
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        info!(path = %path.display(), projects = self.projects.len(), "Library saved");
        Ok(())
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_json(&data)
    }
}

/// Load the library at `path`, or `fallback()` if no file exists yet.
pub fn load_library_or(path: &Path, fallback: impl FnOnce() -> ProjectLibrary) -> Result<ProjectLibrary> {
    if !path.exists() {
        debug!(path = %path.display(), "No library file, using fallback");
        return Ok(fallback());
    }
    Ok(LibraryFile::load_from_file(path)?.into_library())
}

/// Apply sequential migrations from `from_version` to CURRENT_VERSION.
fn migrate(mut data: serde_json::Value, from_version: u32) -> Result<serde_json::Value> {
    let mut version = from_version;

    while version < CURRENT_VERSION {
        match version {
            0 => {
                // v0 → v1: bare project array becomes the wrapper's list
                if data.is_array() {
                    data = serde_json::json!({
                        "version": 1,
                        "projects": data,
                        "app_version": "0.1.0",
                    });
                } else {
                    return Err(SonicForgeError::Serialization(
                        "Unversioned library must be a project array".to_string(),
                    ));
                }
                version = 1;
            }
            _ => {
                return Err(SonicForgeError::Serialization(format!(
                    "No migration path from version {}",
                    version
                )));
            }
        }
    }

    Ok(data)
}
