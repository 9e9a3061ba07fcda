//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::names::TypoFix;

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

/// Minimum-sample gates for the leaderboards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Thresholds {
    #[serde(default = "default_min_innings_for_bat_avg")]
    pub min_innings_for_bat_avg: u32,

    #[serde(default = "default_min_balls_for_sr")]
    pub min_balls_for_sr: u32,

    #[serde(default = "default_min_overs_for_econ")]
    pub min_overs_for_econ: u32,

    #[serde(default = "default_min_wickets_for_bowl_avg")]
    pub min_wickets_for_bowl_avg: u32,
}

fn default_min_innings_for_bat_avg() -> u32 {
    3
}

fn default_min_balls_for_sr() -> u32 {
    50
}

fn default_min_overs_for_econ() -> u32 {
    10
}

fn default_min_wickets_for_bowl_avg() -> u32 {
    5
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_innings_for_bat_avg: default_min_innings_for_bat_avg(),
            min_balls_for_sr: default_min_balls_for_sr(),
            min_overs_for_econ: default_min_overs_for_econ(),
            min_wickets_for_bowl_avg: default_min_wickets_for_bowl_avg(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Input stats file
    #[serde(default = "default_stats_csv")]
    pub stats_csv: PathBuf,

    /// Photo directory; photo analysis is skipped when unset
    #[serde(default)]
    pub images_dir: Option<PathBuf>,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Canonical roster, in tie-break order
    #[serde(default = "default_roster")]
    pub roster: Vec<String>,

    #[serde(default = "default_spotlight_players")]
    pub spotlight_players: Vec<String>,

    /// Fuzzy acceptance threshold (0-100)
    #[serde(default = "default_fuzzy_match_threshold")]
    pub fuzzy_match_threshold: u8,

    /// Partial-similarity threshold for names in photo text (0-100)
    #[serde(default = "default_photo_ocr_match_threshold")]
    pub photo_ocr_match_threshold: u8,

    #[serde(default)]
    pub thresholds: Thresholds,

    /// Literal substitutions applied after normalization, in order
    #[serde(default)]
    pub typo_fixes: Vec<TypoFix>,
}

fn default_stats_csv() -> PathBuf {
    PathBuf::from("stats.csv")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./outputs")
}

fn default_roster() -> Vec<String> {
    [
        "Dr. Vishnu Reddy",
        "Akhil Reddy Danda",
        "Nithesh Y",
        "Rajshekhar Reddy",
        "Faizan Mohammad",
        "Dinesh Reddy Kandari",
        "Shashvat Patel",
        "Karthik 01",
        "Harshith Sai",
        "Pushkar P",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_spotlight_players() -> Vec<String> {
    vec![
        "Dr. Vishnu Reddy".to_string(),
        "Akhil Reddy Danda".to_string(),
    ]
}

fn default_fuzzy_match_threshold() -> u8 {
    90
}

fn default_photo_ocr_match_threshold() -> u8 {
    70
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            stats_csv: default_stats_csv(),
            images_dir: None,
            output_dir: default_output_dir(),
            roster: default_roster(),
            spotlight_players: default_spotlight_players(),
            fuzzy_match_threshold: default_fuzzy_match_threshold(),
            photo_ocr_match_threshold: default_photo_ocr_match_threshold(),
            thresholds: Thresholds::default(),
            typo_fixes: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.roster.is_empty() {
            return Err(ConfigError::ValidationError(
                "Roster must contain at least one player".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for player in &self.roster {
            if player.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "Roster contains a blank name".to_string(),
                ));
            }
            if !seen.insert(player.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "Roster lists '{}' more than once",
                    player
                )));
            }
        }

        for player in &self.spotlight_players {
            if !seen.contains(player.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "Spotlight player '{}' is not on the roster",
                    player
                )));
            }
        }

        if self.fuzzy_match_threshold > 100 {
            return Err(ConfigError::ValidationError(
                "Fuzzy match threshold must be between 0 and 100".to_string(),
            ));
        }

        if self.photo_ocr_match_threshold > 100 {
            return Err(ConfigError::ValidationError(
                "Photo OCR match threshold must be between 0 and 100".to_string(),
            ));
        }

        if self.typo_fixes.iter().any(|fix| fix.wrong.is_empty()) {
            return Err(ConfigError::ValidationError(
                "Typo fixes must have a non-empty 'wrong' pattern".to_string(),
            ));
        }

        Ok(())
    }

    pub fn log_file(&self) -> PathBuf {
        self.output_dir.join("logs.txt")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.stats_csv, PathBuf::from("stats.csv"));
        assert_eq!(config.output_dir, PathBuf::from("./outputs"));
        assert_eq!(config.roster.len(), 10);
        assert_eq!(config.roster[1], "Akhil Reddy Danda");
        assert_eq!(config.fuzzy_match_threshold, 90);
        assert!(config.images_dir.is_none());
    }

    #[test]
    fn test_thresholds_default() {
        let t = Thresholds::default();

        assert_eq!(t.min_innings_for_bat_avg, 3);
        assert_eq!(t.min_balls_for_sr, 50);
        assert_eq!(t.min_overs_for_econ, 10);
        assert_eq!(t.min_wickets_for_bowl_avg, 5);
    }

    #[test]
    fn test_config_validation_ok() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_empty_roster() {
        let mut config = AppConfig::default();
        config.roster.clear();
        config.spotlight_players.clear();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_duplicate_roster() {
        let mut config = AppConfig::default();
        config.roster.push("Nithesh Y".to_string());

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_spotlight_not_on_roster() {
        let mut config = AppConfig::default();
        config.spotlight_players.push("Someone Else".to_string());

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_threshold() {
        let mut config = AppConfig::default();
        config.fuzzy_match_threshold = 101;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_empty_typo_pattern() {
        let mut config = AppConfig::default();
        config.typo_fixes.push(TypoFix::new("", "x"));

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_toml() {
        let toml_str = r#"
            stats_csv = "data/season.csv"
            output_dir = "out"
            roster = ["A One", "B Two"]
            spotlight_players = ["B Two"]
            fuzzy_match_threshold = 85

            [thresholds]
            min_innings_for_bat_avg = 2

            [[typo_fixes]]
            wrong = "Bee"
            correct = "B"
        "#;

        let config = AppConfig::from_toml(toml_str).unwrap();
        assert_eq!(config.stats_csv, PathBuf::from("data/season.csv"));
        assert_eq!(config.roster, vec!["A One", "B Two"]);
        assert_eq!(config.fuzzy_match_threshold, 85);
        assert_eq!(config.thresholds.min_innings_for_bat_avg, 2);
        assert_eq!(config.thresholds.min_balls_for_sr, 50);
        assert_eq!(config.typo_fixes, vec![TypoFix::new("Bee", "B")]);
        assert_eq!(config.photo_ocr_match_threshold, 70);
    }

    #[test]
    fn test_config_from_toml_rejects_invalid() {
        let toml_str = r#"
            roster = ["A One"]
            spotlight_players = ["Z"]
        "#;

        assert!(matches!(
            AppConfig::from_toml(toml_str),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();

        // Should be parseable
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.roster, parsed.roster);
        assert_eq!(config.thresholds, parsed.thresholds);
    }
}
