//! YAML-file-backed host services.
//!
//! [`FileHost`] stands in for a chat client's presence and settings stores when
//! GameZen runs as a standalone process. The file looks like:
//!
//! ```yaml
//! status: online
//! activities:
//!   - name: Chess
//!   - name: Spotify
//! ```
//!
//! Whatever updates the activity list (a launcher hook, a script, a test) edits
//! `activities`; the reconciler reads it every tick and rewrites `status`.

use crate::models::{Activity, ActivitySnapshot, StatusValue};
use crate::services::host::{HostError, PresenceSource, StatusSink};
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::fs;
use std::sync::{Mutex, PoisonError};

/// On-disk layout of the host file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostDocument {
    pub status: StatusValue,
    pub activities: ActivitySnapshot,
}

pub struct FileHost {
    path: Utf8PathBuf,
    // Serializes read-modify-write cycles from this process
    write_lock: Mutex<()>,
}

impl FileHost {
    pub fn new<P: AsRef<Utf8Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Read the host file. A missing or empty file reads as the default document.
    pub fn load(&self) -> Result<HostDocument> {
        if !self.path.exists() {
            return Ok(HostDocument::default());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read host file: {}", self.path))?;

        if contents.trim().is_empty() {
            return Ok(HostDocument::default());
        }

        serde_yaml_ng::from_str(&contents)
            .with_context(|| format!("Failed to parse host file: {}", self.path))
    }

    pub fn save(&self, document: &HostDocument) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create host directory: {}", parent))?;
            }
        }

        let yaml = serde_yaml_ng::to_string(document).context("Failed to serialize host file")?;
        fs::write(&self.path, yaml)
            .with_context(|| format!("Failed to write host file: {}", self.path))?;

        tracing::debug!("Saved host file {}", self.path);
        Ok(())
    }

    /// Replace the activity list, keeping the current status
    pub fn set_activities(&self, activities: Vec<Activity>) -> Result<()> {
        self.modify(|document| document.activities = activities)
    }

    fn modify<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut HostDocument),
    {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut document = self.load()?;
        f(&mut document);
        self.save(&document)
    }
}

impl PresenceSource for FileHost {
    fn current_activities(&self) -> Result<ActivitySnapshot, HostError> {
        self.load()
            .map(|document| document.activities)
            .map_err(|e| HostError::PresenceRead(format!("{:#}", e)))
    }
}

impl StatusSink for FileHost {
    fn read_status(&self) -> Result<StatusValue, HostError> {
        self.load()
            .map(|document| document.status)
            .map_err(|e| HostError::StatusRead(format!("{:#}", e)))
    }

    fn write_status(&self, status: StatusValue) -> Result<(), HostError> {
        self.modify(|document| document.status = status)
            .map_err(|e| HostError::StatusWrite(format!("{:#}", e)))
    }
}
