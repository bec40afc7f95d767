// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Logging configuration: threshold level and channel colors.
//!
//! JSON5 file format (comments and trailing commas allowed), e.g.:
//!
//! ```json5
//! {
//!   threshold: "warn",  // trace|debug|info|warn|error|crit
//!   timestamps: true,
//! }
//! ```

use crate::color::Color;
use crate::severity::Severity;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default color for the low-severity channel (bright white)
pub const DEFAULT_LOW_COLOR: Color = Color::FG_WHITE.union(Color::FG_BRIGHT);

/// Default color for the high-severity channel (bright white on red)
pub const DEFAULT_HIGH_COLOR: Color =
    Color::BG_RED.union(Color::FG_WHITE).union(Color::FG_BRIGHT);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {0}: {1}")]
    IoError(PathBuf, String),
    #[error("failed to parse config: {0}")]
    ParseError(String),
}

/// Startup configuration for the logging registry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Minimum severity that produces output
    #[serde(default = "default_threshold")]
    pub threshold: Severity,

    /// Prepend `HH:MM:SS.mmm [thread-id] ` to each line
    #[serde(default = "default_timestamps")]
    pub timestamps: bool,

    /// Custom color for the low-severity channel (raw bitmask)
    #[serde(default = "default_low_color")]
    pub low_color: Color,

    /// Custom color for the high-severity channel (raw bitmask)
    #[serde(default = "default_high_color")]
    pub high_color: Color,
}

fn default_threshold() -> Severity {
    Severity::Info
}

fn default_timestamps() -> bool {
    true
}

fn default_low_color() -> Color {
    DEFAULT_LOW_COLOR
}

fn default_high_color() -> Color {
    DEFAULT_HIGH_COLOR
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            timestamps: default_timestamps(),
            low_color: default_low_color(),
            high_color: default_high_color(),
        }
    }
}

impl LogConfig {
    /// Load configuration from a JSON5 file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(path.to_path_buf(), e.to_string()))?;
        Self::parse(&content)
    }

    /// Parse configuration from a JSON5 string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        json5::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LogConfig::default();
        assert_eq!(config.threshold, Severity::Info);
        assert!(config.timestamps);
        assert_eq!(config.low_color, Color::FG_WHITE | Color::FG_BRIGHT);
        assert_eq!(
            config.high_color,
            Color::BG_RED | Color::FG_WHITE | Color::FG_BRIGHT
        );
    }

    #[test]
    fn test_parse_full_config() {
        let json5 = r#"{
            // verbose run
            threshold: "debug",
            timestamps: false,
        }"#;
        let config = LogConfig::parse(json5).unwrap();
        assert_eq!(config.threshold, Severity::Debug);
        assert!(!config.timestamps);
        // unspecified fields keep defaults
        assert_eq!(config.low_color, DEFAULT_LOW_COLOR);
    }

    #[test]
    fn test_parse_empty_uses_defaults() {
        let config = LogConfig::parse("{}").unwrap();
        assert_eq!(config, LogConfig::default());
    }

    #[test]
    fn test_parse_rejects_bad_level() {
        assert!(LogConfig::parse(r#"{ threshold: "loud" }"#).is_err());
    }

    #[test]
    fn test_load_from_missing_file() {
        let err = LogConfig::load_from_file(Path::new("/no/such/config.json5")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_, _)));
    }
}
