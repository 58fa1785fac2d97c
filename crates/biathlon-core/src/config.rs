//! Race configuration loading and validation.
//!
//! The race parameters live in a small JSON (or YAML) document with
//! camel-cased keys:
//!
//! ```json
//! {
//!     "laps": 2,
//!     "lapLen": 3651,
//!     "penaltyLen": 50,
//!     "firingLines": 1,
//!     "start": "09:30:00",
//!     "startDelta": "00:00:30"
//! }
//! ```
//!
//! Loading happens in three steps: deserialize into [`RaceSettings`], apply
//! `BIATHLON_*` environment overrides, then validate into the typed
//! [`RaceConfig`] that the state machine consumes.

use std::path::Path;

use chrono::{NaiveTime, TimeDelta};
use serde::Deserialize;
use tracing::warn;

use biathlon_types::{parse_duration, parse_time_of_day};

/// Environment variable overriding the lap count.
pub const ENV_LAPS: &str = "BIATHLON_LAPS";
/// Environment variable overriding the main lap length.
pub const ENV_LAP_LEN: &str = "BIATHLON_LAP_LEN";
/// Environment variable overriding the penalty loop length.
pub const ENV_PENALTY_LEN: &str = "BIATHLON_PENALTY_LEN";
/// Environment variable overriding the firing line count.
pub const ENV_FIRING_LINES: &str = "BIATHLON_FIRING_LINES";
/// Environment variable overriding the scheduled start.
pub const ENV_START: &str = "BIATHLON_START";
/// Environment variable overriding the start tolerance.
pub const ENV_START_DELTA: &str = "BIATHLON_START_DELTA";

/// Largest accepted lap count. Every competitor preallocates one slot per lap.
pub const MAX_LAPS: u32 = 1_000;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse JSON content.
    #[error("failed to parse config JSON: {source}")]
    Json {
        /// The underlying JSON parse error.
        #[from]
        source: serde_json::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The values parsed but do not describe a usable race.
    #[error("invalid race configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Race parameters as written in the configuration file.
///
/// Times are kept as strings here so that overrides can be applied before
/// anything is parsed. Call [`RaceSettings::validate`] to obtain a
/// [`RaceConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceSettings {
    /// Number of main laps.
    #[serde(default = "default_laps")]
    pub laps: u32,

    /// Length of one main lap in metres.
    #[serde(default = "default_lap_len")]
    pub lap_len: u32,

    /// Length of one penalty loop in metres.
    #[serde(default = "default_penalty_len")]
    pub penalty_len: u32,

    /// Number of firing lines per lap.
    #[serde(default = "default_firing_lines")]
    pub firing_lines: u32,

    /// Planned start of the race, `HH:MM:SS[.fff]`.
    #[serde(default = "default_start")]
    pub start: String,

    /// Allowed delay between scheduled and actual start, `HH:MM:SS[.fff]`.
    #[serde(default = "default_start_delta")]
    pub start_delta: String,
}

impl Default for RaceSettings {
    fn default() -> Self {
        Self {
            laps: default_laps(),
            lap_len: default_lap_len(),
            penalty_len: default_penalty_len(),
            firing_lines: default_firing_lines(),
            start: default_start(),
            start_delta: default_start_delta(),
        }
    }
}

impl RaceSettings {
    /// Parse settings from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] if the string is not valid JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse settings from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Read settings from a file. `.yaml` and `.yml` files are parsed as
    /// YAML; everything else is parsed as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or a parse
    /// error if its content is malformed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
        if is_yaml {
            Self::from_yaml(&contents)
        } else {
            Self::from_json(&contents)
        }
    }

    /// Override fields from `BIATHLON_*` environment variables.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Override fields from an arbitrary key lookup.
    ///
    /// Numeric values that do not parse are ignored with a warning.
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        override_number(&lookup, ENV_LAPS, &mut self.laps);
        override_number(&lookup, ENV_LAP_LEN, &mut self.lap_len);
        override_number(&lookup, ENV_PENALTY_LEN, &mut self.penalty_len);
        override_number(&lookup, ENV_FIRING_LINES, &mut self.firing_lines);
        if let Some(val) = lookup(ENV_START) {
            self.start = val;
        }
        if let Some(val) = lookup(ENV_START_DELTA) {
            self.start_delta = val;
        }
    }

    /// Check the settings and convert them into a [`RaceConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `laps` is outside
    /// `1..=`[`MAX_LAPS`] or either time field does not parse.
    pub fn validate(&self) -> Result<RaceConfig, ConfigError> {
        if self.laps == 0 {
            return Err(ConfigError::Invalid {
                reason: "laps must be at least 1".to_owned(),
            });
        }
        if self.laps > MAX_LAPS {
            return Err(ConfigError::Invalid {
                reason: format!("laps must be at most {MAX_LAPS}, got {}", self.laps),
            });
        }
        let start = parse_time_of_day(&self.start).map_err(|err| ConfigError::Invalid {
            reason: format!("start: {err}"),
        })?;
        let start_delta = parse_duration(&self.start_delta).map_err(|err| ConfigError::Invalid {
            reason: format!("startDelta: {err}"),
        })?;
        Ok(RaceConfig {
            laps: self.laps,
            lap_len: self.lap_len,
            penalty_len: self.penalty_len,
            firing_lines: self.firing_lines,
            start,
            start_delta,
        })
    }
}

fn override_number(lookup: &impl Fn(&str) -> Option<String>, key: &str, field: &mut u32) {
    let Some(raw) = lookup(key) else {
        return;
    };
    match raw.trim().parse::<u32>() {
        Ok(value) => *field = value,
        Err(err) => warn!(variable = key, value = %raw, error = %err, "ignoring invalid override"),
    }
}

/// Validated race parameters shared by every competitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaceConfig {
    /// Number of main laps (at least 1).
    pub laps: u32,
    /// Length of one main lap in metres.
    pub lap_len: u32,
    /// Length of one penalty loop in metres.
    pub penalty_len: u32,
    /// Number of firing lines per lap.
    pub firing_lines: u32,
    /// Planned start of the race.
    pub start: NaiveTime,
    /// Allowed delay between scheduled and actual start.
    pub start_delta: TimeDelta,
}

impl RaceConfig {
    /// Load, override, and validate a configuration file.
    ///
    /// # Errors
    ///
    /// Returns any [`ConfigError`] raised while reading, parsing, or
    /// validating.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut settings = RaceSettings::from_file(path)?;
        settings.apply_env_overrides();
        settings.validate()
    }

    /// Number of lap slots each competitor carries.
    pub fn lap_slots(&self) -> usize {
        usize::try_from(self.laps).unwrap_or(usize::MAX)
    }
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            laps: default_laps(),
            lap_len: default_lap_len(),
            penalty_len: default_penalty_len(),
            firing_lines: default_firing_lines(),
            start: NaiveTime::from_hms_opt(9, 30, 0).unwrap_or_default(),
            start_delta: TimeDelta::seconds(30),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

const fn default_laps() -> u32 {
    2
}

const fn default_lap_len() -> u32 {
    3_651
}

const fn default_penalty_len() -> u32 {
    50
}

const fn default_firing_lines() -> u32 {
    1
}

fn default_start() -> String {
    "09:30:00.000".to_owned()
}

fn default_start_delta() -> String {
    "00:00:30".to_owned()
}
