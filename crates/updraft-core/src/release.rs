//! Wire types for the upstream release API
//!
//! These mirror the subset of the release listing and asset listing
//! responses the catalog pipeline actually reads. Anything else in the
//! payload is ignored during deserialization.

use serde::Deserialize;

/// One release in a repository's releases listing
///
/// Assets are not inlined here; they are fetched separately through
/// `assets_url`.
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    /// Release name, used as the catalog `version` field (may be null
    /// upstream for untitled releases)
    #[serde(default)]
    pub name: Option<String>,
    /// Free-text release notes (may be null upstream)
    #[serde(default)]
    pub body: Option<String>,
    /// Endpoint returning this release's asset list
    pub assets_url: String,
}

impl Release {
    /// Release name with upstream nulls flattened to an empty string
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    /// Release notes with upstream nulls flattened to an empty string
    pub fn description(&self) -> &str {
        self.body.as_deref().unwrap_or_default()
    }
}

/// One downloadable file attached to a release
#[derive(Debug, Clone, Deserialize)]
pub struct Asset {
    /// Raw filename as published upstream
    pub name: String,
    /// Asset identifier, unique within a repository
    pub id: u64,
    /// File size in bytes
    pub size: u64,
    /// Last-modified timestamp, fixed pattern `YYYY-MM-DDTHH:MM:SSZ`
    pub updated_at: String,
    /// Direct download URL
    pub browser_download_url: String,
}
