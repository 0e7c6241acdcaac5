//! Game configuration
//!
//! Read once at startup from an optional JSON block in the host page.

use serde::{Deserialize, Serialize};

use crate::consts::FIELD_HEIGHT;

/// Explicit configuration handed to the director
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Draw collider outlines over the sprites
    pub debug: bool,
    /// RNG seed; taken from the clock when absent
    pub seed: Option<u64>,
    /// World units spanned by the viewport height
    pub field_height: f64,
    /// Constraint solver iterations per physics step
    pub solver_iterations: usize,
    pub muted: bool,
    /// Playback volume (0.0 - 1.0)
    pub volume: f64,
    /// `log` level name
    pub log_level: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            debug: false,
            seed: None,
            field_height: FIELD_HEIGHT,
            solver_iterations: 2,
            muted: false,
            volume: 1.0,
            log_level: "info".to_string(),
        }
    }
}

impl GameConfig {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let mut config: Self = serde_json::from_str(json)?;
        config.volume = config.volume.clamp(0.0, 1.0);
        if !(config.field_height > 0.0) {
            log::warn!(
                "Invalid field_height {}, using {}",
                config.field_height,
                FIELD_HEIGHT
            );
            config.field_height = FIELD_HEIGHT;
        }
        Ok(config)
    }

    /// Parse `log_level`, falling back to info
    pub fn log_level(&self) -> log::Level {
        self.log_level.parse().unwrap_or(log::Level::Info)
    }

    /// Volume actually applied to players
    pub fn effective_volume(&self) -> f64 {
        if self.muted { 0.0 } else { self.volume }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GameConfig::default();
        assert!(!config.debug);
        assert_eq!(config.seed, None);
        assert_eq!(config.field_height, 20.0);
        assert_eq!(config.solver_iterations, 2);
        assert_eq!(config.log_level(), log::Level::Info);
        assert_eq!(config.effective_volume(), 1.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = GameConfig::from_json(r#"{"debug": true, "seed": 7}"#).unwrap();
        assert!(config.debug);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.solver_iterations, 2);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_out_of_range_values_are_corrected() {
        let config = GameConfig::from_json(r#"{"volume": 3.5, "field_height": -1}"#).unwrap();
        assert_eq!(config.volume, 1.0);
        assert_eq!(config.field_height, 20.0);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(GameConfig::from_json("{debug: yes").is_err());
        assert!(GameConfig::from_json(r#"{"seed": "abc"}"#).is_err());
    }

    #[test]
    fn test_log_level_parsing() {
        let mut config = GameConfig::default();
        config.log_level = "debug".into();
        assert_eq!(config.log_level(), log::Level::Debug);
        config.log_level = "TRACE".into();
        assert_eq!(config.log_level(), log::Level::Trace);
        config.log_level = "loud".into();
        assert_eq!(config.log_level(), log::Level::Info);
    }

    #[test]
    fn test_muted_silences() {
        let config = GameConfig {
            muted: true,
            volume: 0.7,
            ..Default::default()
        };
        assert_eq!(config.effective_volume(), 0.0);
    }
}
