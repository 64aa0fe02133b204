//! Updraft Core - upstream release types and catalog record construction
//!
//! This crate provides the foundational types for the Updraft system:
//! - Wire types for the upstream release API (releases and their assets)
//! - Catalog modes (kernel/system) with per-mode filter and tag rules
//! - Normalized catalog entry construction from raw assets

pub mod mode;
pub mod record;
pub mod release;

pub use mode::{Mode, ModeParseError};
pub use record::{build_record, normalize_filename, parse_updated_at, CatalogEntry, RecordError};
pub use release::{Asset, Release};
