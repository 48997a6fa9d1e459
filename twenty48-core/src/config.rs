//! Game Configuration
//!
//! Tunables for a session, loadable from a JSON file. Every field has a
//! default, so `{}` is a valid config.

use std::path::{Path, PathBuf};

use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::game::board::Tile;
use crate::game::spawn::DEFAULT_FOUR_PERCENT;
use crate::{ANIMATION_STEP, CELL_SIZE, DEFAULT_WIN_VALUE};

/// Errors raised while loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File is not valid JSON for `GameConfig`
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Values parsed but are out of range
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Session configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Tile value that wins the game
    pub win_value: Tile,

    /// Chance (percent) that a spawned tile is a 4
    pub four_tile_percent: u8,

    /// Rendered cell size in pixels; scales the displacement map
    pub cell_size: i32,

    /// Pixels the renderer removes from each displacement per frame
    pub animation_step: i32,

    /// Fixed RNG seed; `None` lets the front end pick one
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            win_value: DEFAULT_WIN_VALUE,
            four_tile_percent: DEFAULT_FOUR_PERCENT,
            cell_size: CELL_SIZE,
            animation_step: ANIMATION_STEP,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.win_value < 4 || !self.win_value.is_power_of_two() {
            return Err(ConfigError::Invalid(format!(
                "win_value must be a power of two >= 4, got {}",
                self.win_value
            )));
        }
        if self.four_tile_percent > 100 {
            return Err(ConfigError::Invalid(format!(
                "four_tile_percent must be at most 100, got {}",
                self.four_tile_percent
            )));
        }
        if self.cell_size <= 0 {
            return Err(ConfigError::Invalid(format!(
                "cell_size must be positive, got {}",
                self.cell_size
            )));
        }
        if self.animation_step <= 0 {
            return Err(ConfigError::Invalid(format!(
                "animation_step must be positive, got {}",
                self.animation_step
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = GameConfig::default();
        assert_eq!(config.win_value, 2048);
        assert_eq!(config.four_tile_percent, 10);
        assert_eq!(config.cell_size, 100);
        assert_eq!(config.animation_step, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = GameConfig::from_json_str(r#"{ "win_value": 512, "seed": 9 }"#).unwrap();
        assert_eq!(config.win_value, 512);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.cell_size, 100);

        assert_eq!(GameConfig::from_json_str("{}").unwrap(), GameConfig::default());
    }

    #[test]
    fn test_rejects_bad_values() {
        for json in [
            r#"{ "win_value": 1000 }"#,
            r#"{ "win_value": 2 }"#,
            r#"{ "four_tile_percent": 101 }"#,
            r#"{ "cell_size": 0 }"#,
            r#"{ "animation_step": -1 }"#,
        ] {
            assert!(
                matches!(GameConfig::from_json_str(json), Err(ConfigError::Invalid(_))),
                "{json}"
            );
        }
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            GameConfig::from_json_str("{ win_value: "),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = GameConfig::load("/definitely/not/here/twenty48.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("twenty48.json"));
    }
}
