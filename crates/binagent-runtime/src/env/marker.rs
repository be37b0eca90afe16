//! `.binagent_complete`: written inside the venv once setup finishes.
//!
//! Existence checks never consult the marker; it only records what the venv
//! was built from so `start` and `check` can report a stale manifest.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;

pub const MARKER_FILE: &str = ".binagent_complete";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupMarker {
    pub created_at: DateTime<Utc>,
    pub python: String,
    pub manifest_sha256: String,
}

/// Whether the manifest still matches the one recorded at setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ManifestState {
    Current,
    Drifted,
    /// No marker, unreadable marker, or no manifest.
    Unknown,
}

pub fn manifest_digest(manifest: &Path) -> std::io::Result<String> {
    let content = std::fs::read(manifest)?;
    Ok(hex::encode(Sha256::digest(&content)))
}

pub fn write_marker(env_dir: &Path, python: &Path, manifest: &Path) -> Result<SetupMarker> {
    let marker = SetupMarker {
        created_at: Utc::now(),
        python: python.to_string_lossy().into_owned(),
        manifest_sha256: manifest_digest(manifest)
            .with_context(|| format!("Failed to hash {}", manifest.display()))?,
    };
    let path = env_dir.join(MARKER_FILE);
    std::fs::write(&path, serde_json::to_string_pretty(&marker)?)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(marker)
}

pub fn read_marker(env_dir: &Path) -> Option<SetupMarker> {
    let content = std::fs::read_to_string(env_dir.join(MARKER_FILE)).ok()?;
    serde_json::from_str(&content).ok()
}

pub fn manifest_state(env_dir: &Path, manifest: &Path) -> ManifestState {
    let (Some(marker), Ok(digest)) = (read_marker(env_dir), manifest_digest(manifest)) else {
        return ManifestState::Unknown;
    };
    if marker.manifest_sha256 == digest {
        ManifestState::Current
    } else {
        ManifestState::Drifted
    }
}
