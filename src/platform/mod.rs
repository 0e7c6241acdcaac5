//! Platform layer
//!
//! Browser implementations of the drawing and audio boundaries live in
//! [`web`]; everything else in the crate is platform-free.

#[cfg(target_arch = "wasm32")]
pub mod web;

use crate::settings::GameConfig;

/// Milliseconds since the Unix epoch
pub fn clock_seed() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now() as u64
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default()
    }
}

/// Configured seed, or the clock when none is set
pub fn resolve_seed(config: &GameConfig) -> u64 {
    config.seed.unwrap_or_else(clock_seed)
}

/// Parse an optional JSON config block, warning and falling back to
/// defaults when it is malformed
pub fn load_config(json: Option<&str>) -> GameConfig {
    match json.map(str::trim).filter(|s| !s.is_empty()) {
        None => GameConfig::default(),
        Some(json) => GameConfig::from_json(json).unwrap_or_else(|e| {
            log::warn!("Ignoring malformed config: {}", e);
            GameConfig::default()
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_seed_wins() {
        let config = GameConfig {
            seed: Some(17),
            ..Default::default()
        };
        assert_eq!(resolve_seed(&config), 17);
    }

    #[test]
    fn test_missing_or_blank_config_is_default() {
        assert_eq!(load_config(None), GameConfig::default());
        assert_eq!(load_config(Some("  \n ")), GameConfig::default());
    }

    #[test]
    fn test_malformed_config_falls_back() {
        assert_eq!(load_config(Some("{not json")), GameConfig::default());
        assert!(load_config(Some(r#"{"debug": true}"#)).debug);
    }
}
