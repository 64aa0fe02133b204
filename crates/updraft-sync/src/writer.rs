//! Catalog persistence
//!
//! Catalogs are serialized pretty-printed (2-space indent, non-ASCII
//! preserved) and written atomically: the JSON goes to a temporary file
//! in the target directory which is then renamed over the final path, so
//! a reader never sees a truncated catalog. Each write fully replaces
//! any previous file.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;
use updraft_core::{CatalogEntry, Mode};

/// Target path for one (device, mode) catalog
pub fn catalog_path(output_dir: &Path, device: &str, mode: Mode) -> PathBuf {
    output_dir.join(device).join(format!("{}.json", mode.as_str()))
}

/// Write the catalog, replacing any previous file
pub fn write_catalog(
    output_dir: &Path,
    device: &str,
    mode: Mode,
    entries: &[CatalogEntry],
) -> Result<PathBuf> {
    let dir = output_dir.join(device);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    let json = serde_json::to_string_pretty(entries).context("Failed to serialize catalog")?;

    let path = dir.join(format!("{}.json", mode.as_str()));
    let tmp = dir.join(format!(".{}.json.tmp", mode.as_str()));
    std::fs::write(&tmp, json.as_bytes())
        .with_context(|| format!("Failed to write {}", tmp.display()))?;
    std::fs::rename(&tmp, &path)
        .with_context(|| format!("Failed to replace {}", path.display()))?;

    info!(path = %path.display(), entries = entries.len(), "Catalog written");
    Ok(path)
}
