/// Archiver configuration
///
/// All knobs live in one struct so runs are reproducible and tests can use
/// tiny synthetic grids. The defaults mirror the reference deployment; a
/// JSON config file may override any subset of fields.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::archive::grid::GridBounds;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ArchiveConfig {
    /// Rectangular tile range to archive
    pub grid: GridBounds,
    /// Tile server URL with `{x}` and `{y}` placeholders
    pub tile_url_template: String,
    /// Archives older than this many days are deleted at the start of a run
    pub retention_days: u32,
    /// Per-request timeout
    pub timeout_secs: u64,
    /// Pause between tile requests, applied after every attempt
    pub delay_ms: u64,
    /// Human-readable cadence for the status report. Informational only -
    /// actual scheduling is the invoker's job (cron, CI, ...).
    pub schedule: String,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        ArchiveConfig {
            grid: GridBounds {
                x_min: 1067,
                x_max: 1072,
                y_min: 672,
                y_max: 674,
            },
            tile_url_template: "https://backend.wplace.live/files/s0/tiles/{x}/{y}.png"
                .to_string(),
            retention_days: 30,
            timeout_secs: 30,
            delay_ms: 500,
            schedule: "2x daily (8:00 and 20:00 UTC)".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config file: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ArchiveConfig {
    /// Load a config file, filling unspecified fields from the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}
