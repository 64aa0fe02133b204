//! Catalog entry construction from upstream assets
//!
//! This module holds the normalization rules shared by every catalog:
//! - Filenames are uppercased with a trailing `.zip` removed
//! - Timestamps follow the fixed upstream pattern `YYYY-MM-DDTHH:MM:SSZ`
//! - The mode decides filtering, tagging, and whether the release
//!   description is carried along

use chrono::NaiveDateTime;
use serde::Serialize;
use thiserror::Error;

use crate::mode::Mode;
use crate::release::Asset;

/// Fixed timestamp pattern used by the upstream API
const UPDATED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

#[derive(Error, Debug)]
pub enum RecordError {
    #[error("bad updated_at timestamp {value:?}: {source}")]
    BadTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// One normalized catalog entry
///
/// Fields are declared in lexicographic order so serialized output is
/// key-sorted without a post-processing step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogEntry {
    /// Asset last-modified time as Unix epoch seconds
    pub datetime: f64,
    /// Release notes, kernel mode only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    /// Normalized asset filename
    pub filename: String,
    /// Upstream asset identifier
    pub id: u64,
    /// File size in bytes
    pub size: u64,
    /// Classification tag, see [`Mode::classify`]
    pub tag: String,
    /// Direct download URL
    pub url: String,
    /// Release name the asset was published under
    pub version: String,
}

/// Uppercase an asset name and strip one trailing `.zip`
pub fn normalize_filename(name: &str) -> String {
    let upper = name.to_uppercase();
    match upper.strip_suffix(".ZIP") {
        Some(stem) => stem.to_string(),
        None => upper,
    }
}

/// Parse the fixed upstream timestamp pattern into Unix epoch seconds
///
/// Any deviation from the pattern (fractional seconds, offsets, missing
/// `Z`) is an error; the upstream API emits exactly this shape.
pub fn parse_updated_at(value: &str) -> Result<f64, RecordError> {
    let parsed = NaiveDateTime::parse_from_str(value, UPDATED_AT_FORMAT).map_err(|source| {
        RecordError::BadTimestamp {
            value: value.to_string(),
            source,
        }
    })?;
    Ok(parsed.and_utc().timestamp() as f64)
}

/// Build the catalog entry for one asset
///
/// Returns `Ok(None)` when the mode's device filter rejects the asset.
/// A malformed timestamp fails only this asset; the caller decides how
/// to proceed with the rest of the release.
pub fn build_record(
    asset: &Asset,
    release_name: &str,
    mode: Mode,
    device: &str,
    release_desc: &str,
) -> Result<Option<CatalogEntry>, RecordError> {
    let filename = normalize_filename(&asset.name);
    if !mode.accepts(device, &filename) {
        return Ok(None);
    }

    let datetime = parse_updated_at(&asset.updated_at)?;
    let desc = mode
        .wants_description()
        .then(|| release_desc.to_string());

    Ok(Some(CatalogEntry {
        datetime,
        desc,
        id: asset.id,
        size: asset.size,
        tag: mode.classify(&filename).to_string(),
        url: asset.browser_download_url.clone(),
        version: release_name.to_string(),
        filename,
    }))
}
