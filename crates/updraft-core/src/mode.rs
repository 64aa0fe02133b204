//! Catalog modes and their per-mode filter and tag rules
//!
//! Kernel and system catalogs differ in how assets are filtered and
//! classified. Each rule lives on the `Mode` enum so adding another
//! artifact category means adding a variant, not another branch in the
//! record builder.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Token marking a kernel build that bundles the KernelSU manager
const KERNELSU_TOKEN: &str = "KERNELSU";

/// Artifact category being cataloged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Kernel,
    System,
}

#[derive(Error, Debug)]
#[error("unknown mode: {0} (expected \"kernel\" or \"system\")")]
pub struct ModeParseError(String);

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Kernel => "kernel",
            Mode::System => "system",
        }
    }

    /// Whether an asset with this normalized filename belongs in the
    /// catalog for `device`
    ///
    /// Kernel builds are published per device and matched by name.
    /// System images carry no device filter.
    pub fn accepts(&self, device: &str, normalized_name: &str) -> bool {
        match self {
            Mode::Kernel => normalized_name
                .to_lowercase()
                .contains(&device.to_lowercase()),
            Mode::System => true,
        }
    }

    /// Classification tag for a normalized asset filename
    pub fn classify(&self, normalized_name: &str) -> &'static str {
        match self {
            Mode::Kernel => {
                if normalized_name.contains(KERNELSU_TOKEN) {
                    "KernelSU"
                } else {
                    "Original"
                }
            }
            // Placeholder until system cataloging is fleshed out upstream
            Mode::System => "Tong",
        }
    }

    /// Whether catalog entries for this mode carry the release description
    pub fn wants_description(&self) -> bool {
        matches!(self, Mode::Kernel)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "kernel" => Ok(Mode::Kernel),
            "system" => Ok(Mode::System),
            other => Err(ModeParseError(other.to_string())),
        }
    }
}
