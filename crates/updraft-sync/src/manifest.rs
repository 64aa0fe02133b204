//! Device manifest loading
//!
//! The manifest maps each device name to the repositories its kernel and
//! system catalogs are built from. An empty repository string means the
//! mode is not synced for that device.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// Per-device repository configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceRepos {
    /// "owner/repo" for kernel releases, empty to skip
    #[serde(default)]
    pub kernel_repo: String,
    /// "owner/repo" for system releases, empty to skip
    #[serde(default)]
    pub system_repo: String,
}

/// Device name to repositories, ordered so runs process devices
/// deterministically
pub type Manifest = BTreeMap<String, DeviceRepos>;

/// Load the manifest from a JSON file
pub fn load_manifest(path: &Path) -> Result<Manifest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest {}", path.display()))?;
    let manifest: Manifest = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse manifest {}", path.display()))?;
    info!(path = %path.display(), devices = manifest.len(), "Loaded device manifest");
    Ok(manifest)
}

/// Split an "owner/repo" slug
///
/// Rejects slugs with a missing owner or repo so a typo in one manifest
/// entry skips that entry instead of producing a nonsense URL.
pub fn split_repo_slug(slug: &str) -> Option<(&str, &str)> {
    let (owner, repo) = slug.split_once('/')?;
    if owner.is_empty() || repo.is_empty() || repo.contains('/') {
        return None;
    }
    Some((owner, repo))
}
