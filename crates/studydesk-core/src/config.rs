//! Configuration for studydesk-core
//!
//! Centralized settings for the store backend, dashboard windows, quiz
//! choices and logging.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudyConfig {
    /// Which document store backs the mirror caches
    pub store: StoreConfig,
    /// Dashboard windows and list sizes
    pub dashboard: DashboardConfig,
    /// Quiz settings
    pub quiz: QuizConfig,
    /// Logging settings
    pub logging: LoggingConfig,
}

/// Available store backends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    Sqlite,
}

/// Store backend configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Database file for the sqlite backend; defaults to the data dir
    pub path: Option<PathBuf>,
}

impl StoreConfig {
    /// Database path for the sqlite backend.
    pub fn sqlite_path(&self) -> Option<PathBuf> {
        self.path.clone().or_else(|| {
            dirs::data_dir().map(|d| d.join("studydesk").join("studydesk.db"))
        })
    }
}

/// Upper bound for the dashboard windows, in days.
pub const MAX_WINDOW_DAYS: i64 = 3650;

/// Dashboard configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Upcoming events window in days (inclusive)
    pub upcoming_window_days: i64,
    /// Recent notes window in days
    pub recent_notes_days: i64,
    /// Events and notes each contribute at most this many activities
    pub activity_sources: usize,
    /// Maximum number of recent activities
    pub activity_limit: usize,
    /// Number of next events shown on the calendar
    pub next_events: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            upcoming_window_days: 7,
            recent_notes_days: 7,
            activity_sources: 2,
            activity_limit: 3,
            next_events: 2,
        }
    }
}

/// Quiz configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizConfig {
    /// Question counts a test may be started with
    pub question_counts: Vec<usize>,
    pub default_question_count: usize,
    /// Number of results in the "recent results" list
    pub recent_results: usize,
    /// Number of results in the "best results" list
    pub best_results: usize,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            question_counts: vec![5, 10, 15, 20],
            default_question_count: 5,
            recent_results: 5,
            best_results: 5,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, overridden by `RUST_LOG`
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

impl StudyConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json_str)
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Standard config location: `<config_dir>/studydesk/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("studydesk").join("config.toml"))
    }

    /// Load and validate a TOML file. A missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        let config = Self::from_toml(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from the standard location
    pub fn load_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, days) in [
            ("upcoming_window_days", self.dashboard.upcoming_window_days),
            ("recent_notes_days", self.dashboard.recent_notes_days),
        ] {
            if !(0..=MAX_WINDOW_DAYS).contains(&days) {
                return Err(ConfigError::OutOfRange(format!(
                    "{} must be between 0 and {}, got {}",
                    name, MAX_WINDOW_DAYS, days
                )));
            }
        }

        if self.quiz.question_counts.is_empty() || self.quiz.question_counts.contains(&0) {
            return Err(ConfigError::OutOfRange(
                "question_counts must be non-empty and positive".to_string(),
            ));
        }

        if !self
            .quiz
            .question_counts
            .contains(&self.quiz.default_question_count)
        {
            return Err(ConfigError::OutOfRange(format!(
                "default_question_count {} is not one of question_counts",
                self.quiz.default_question_count
            )));
        }

        if self.store.backend == StoreBackend::Sqlite && self.store.sqlite_path().is_none() {
            return Err(ConfigError::MissingField("store.path".to_string()));
        }

        Ok(())
    }
}

/// Configuration error
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// File could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),
    /// File could not be read
    #[error("IO error: {0}")]
    Io(String),
    /// Value is out of valid range
    #[error("Value out of range: {0}")]
    OutOfRange(String),
    /// Required field is missing
    #[error("Missing field: {0}")]
    MissingField(String),
    /// Backend is not compiled in
    #[error("Unsupported backend: {0}")]
    Unsupported(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StudyConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.dashboard.upcoming_window_days, 7);
        assert_eq!(config.store.backend, StoreBackend::Memory);
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = StudyConfig::default();
        config.store.backend = StoreBackend::Sqlite;
        config.store.path = Some(PathBuf::from("/tmp/study.db"));
        let text = config.to_toml().unwrap();
        let parsed = StudyConfig::from_toml(&text).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed = StudyConfig::from_toml(
            r#"
            [dashboard]
            upcoming_window_days = 14

            [logging]
            filter = "studydesk_core=debug"
            "#,
        )
        .unwrap();
        assert_eq!(parsed.dashboard.upcoming_window_days, 14);
        assert_eq!(parsed.dashboard.recent_notes_days, 7);
        assert_eq!(parsed.logging.filter, "studydesk_core=debug");
        assert_eq!(parsed.quiz, QuizConfig::default());
    }

    #[test]
    fn test_json_serialization() {
        let config = StudyConfig::default();
        let json = config.to_json().unwrap();
        let parsed = StudyConfig::from_json(&json).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_default_count_must_be_a_choice() {
        let mut config = StudyConfig::default();
        config.quiz.default_question_count = 7;
        assert!(matches!(config.validate(), Err(ConfigError::OutOfRange(_))));
    }

    #[test]
    fn test_negative_window_rejected() {
        let mut config = StudyConfig::default();
        config.dashboard.recent_notes_days = -1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = StudyConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, StudyConfig::default());
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[quiz]\nquestion_counts = [3, 6]\ndefault_question_count = 3\n")
            .unwrap();
        let config = StudyConfig::load(&path).unwrap();
        assert_eq!(config.quiz.question_counts, vec![3, 6]);
    }
}
