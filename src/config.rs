//! Guide configuration.
//!
//! All tunables of the guide core live here. Values deserialize from TOML
//! with per-field defaults, so a config file only needs to name the fields
//! it overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Error raised when a configuration file cannot be loaded.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Tunables for the guide core.
///
/// The defaults reproduce the behavior of a typical TV guide: a display day
/// running from 05:00 to 06:00 the next day, two-minute minimum cell
/// durations, and a 15-minute tolerance before unaccounted time becomes a
/// visible gap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuideConfig {
    /// Pixel width of one hour in the grid. The rendering layer usually
    /// overrides this with a measured value.
    #[serde(default = "default_width_per_hour_px")]
    pub width_per_hour_px: i32,
    /// Local hour at which the display day starts.
    #[serde(default = "default_day_starts_at_hour")]
    pub day_starts_at_hour: u32,
    /// Local hour on the following day at which the display day ends.
    #[serde(default = "default_day_ends_next_day_at_hour")]
    pub day_ends_next_day_at_hour: u32,
    /// Minimum duration of a reconciled entry. Shorter entries are extended
    /// so that every cell stays focusable.
    #[serde(default = "default_entry_min_duration_ms")]
    pub entry_min_duration_ms: i64,
    /// Unaccounted time between two entries below this threshold is treated
    /// as scheduling noise and absorbed by the earlier entry; above it, an
    /// explicit gap entry is inserted.
    #[serde(default = "default_max_unaccounted_time_before_gap_ms")]
    pub max_unaccounted_time_before_gap_ms: i64,
    /// Time width of the margin near the viewport's trailing edge that is
    /// excluded from focus, so a nearly invisible sliver never takes focus.
    #[serde(default = "default_focus_side_margin_ms")]
    pub focus_side_margin_ms: i64,
    /// Key-hold durations after which focus movement accelerates.
    #[serde(default = "default_fast_focus_thresholds_ms")]
    pub fast_focus_thresholds_ms: [i64; 2],
    /// Synthetic focus advances scheduled per repeat once the matching
    /// threshold has been passed.
    #[serde(default = "default_max_skipped_rows")]
    pub max_skipped_rows: [usize; 2],
    /// Refresh interval of the "now" indicator.
    #[serde(default = "default_time_indicator_update_interval_ms")]
    pub time_indicator_update_interval_ms: i64,
}

fn default_width_per_hour_px() -> i32 {
    250
}

fn default_day_starts_at_hour() -> u32 {
    5
}

fn default_day_ends_next_day_at_hour() -> u32 {
    6
}

fn default_entry_min_duration_ms() -> i64 {
    2 * 60 * 1000
}

fn default_max_unaccounted_time_before_gap_ms() -> i64 {
    15 * 60 * 1000
}

fn default_focus_side_margin_ms() -> i64 {
    15 * 60 * 1000
}

fn default_fast_focus_thresholds_ms() -> [i64; 2] {
    [2000, 5000]
}

fn default_max_skipped_rows() -> [usize; 2] {
    [1, 4]
}

fn default_time_indicator_update_interval_ms() -> i64 {
    5000
}

impl Default for GuideConfig {
    fn default() -> Self {
        GuideConfig {
            width_per_hour_px: default_width_per_hour_px(),
            day_starts_at_hour: default_day_starts_at_hour(),
            day_ends_next_day_at_hour: default_day_ends_next_day_at_hour(),
            entry_min_duration_ms: default_entry_min_duration_ms(),
            max_unaccounted_time_before_gap_ms: default_max_unaccounted_time_before_gap_ms(),
            focus_side_margin_ms: default_focus_side_margin_ms(),
            fast_focus_thresholds_ms: default_fast_focus_thresholds_ms(),
            max_skipped_rows: default_max_skipped_rows(),
            time_indicator_update_interval_ms: default_time_indicator_update_interval_ms(),
        }
    }
}

impl GuideConfig {
    /// Load guide configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(GuideConfig)` if successful
    /// * `Err(ConfigError)` if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Ok(toml::from_str(&content)?)
    }

    /// Parse guide configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}
