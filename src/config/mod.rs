//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::calculate::DEFAULT_ROLLING_WINDOW_DAYS;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Fixed set of players to report on.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RosterConfig {
    /// Names in display order. Empty means every name found in the input.
    #[serde(default)]
    pub players: Vec<String>,
}

/// Time-series settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineConfig {
    #[serde(default = "default_rolling_window")]
    pub rolling_window_days: usize,
}

fn default_rolling_window() -> usize {
    DEFAULT_ROLLING_WINDOW_DAYS
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            rolling_window_days: default_rolling_window(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_input")]
    pub input: PathBuf,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub roster: RosterConfig,

    #[serde(default)]
    pub timeline: TimelineConfig,
}

fn default_input() -> PathBuf {
    PathBuf::from("./data/games.csv")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./site")
}

fn default_title() -> String {
    "Badminton Stats".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            input: default_input(),
            output_dir: default_output_dir(),
            title: default_title(),
            log_level: default_log_level(),
            roster: RosterConfig::default(),
            timeline: TimelineConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeline.rolling_window_days == 0 {
            return Err(ConfigError::ValidationError(
                "Rolling window must be at least 1 day".to_string(),
            ));
        }

        if self.title.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "Title must not be empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for name in &self.roster.players {
            let name = name.trim();
            if name.is_empty() {
                return Err(ConfigError::ValidationError(
                    "Roster contains an empty player name".to_string(),
                ));
            }
            if !seen.insert(name) {
                return Err(ConfigError::ValidationError(format!(
                    "Roster lists '{}' more than once",
                    name
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.input, PathBuf::from("./data/games.csv"));
        assert_eq!(config.output_dir, PathBuf::from("./site"));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.timeline.rolling_window_days, 7);
        assert!(config.roster.players.is_empty());
    }

    #[test]
    fn test_config_validation_ok() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation_zero_window() {
        let mut config = AppConfig::default();
        config.timeline.rolling_window_days = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_duplicate_player() {
        let mut config = AppConfig::default();
        config.roster.players = vec!["Tim Eller".to_string(), " Tim Eller".to_string()];

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_blank_title() {
        let mut config = AppConfig::default();
        config.title = "  ".to_string();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            title = "Tuesday Club"

            [roster]
            players = ["Emma Snyder", "Sean Grate"]
            "#,
        )
        .unwrap();

        assert_eq!(config.title, "Tuesday Club");
        assert_eq!(config.roster.players.len(), 2);
        assert_eq!(config.timeline.rolling_window_days, 7);
        assert_eq!(config.output_dir, PathBuf::from("./site"));
    }

    #[test]
    fn test_load_or_default() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = AppConfig::load_or_default(&tmp.path().join("absent.toml")).unwrap();
        assert_eq!(missing.title, "Badminton Stats");

        let path = tmp.path().join("shuttle-stats.toml");
        std::fs::write(&path, "[timeline]\nrolling_window_days = 0\n").unwrap();
        assert!(matches!(
            AppConfig::load_or_default(&path),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();

        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.input, parsed.input);
        assert_eq!(config.timeline.rolling_window_days, parsed.timeline.rolling_window_days);
    }
}
