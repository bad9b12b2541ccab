// Theme engine settings, usually embedded in the site configuration file
use serde::{Deserialize, Serialize};
use site_shared::models::{ThemeMode, TransitionConfig};

/// Key the theme mode is persisted under.
pub const THEME_STORAGE_KEY: &str = "theme-mode";
/// Mode used when nothing valid is persisted.
pub const DEFAULT_THEME_MODE: ThemeMode = ThemeMode::System;
/// Delay after the first application before transitions are unlocked.
pub const INITIAL_SETTLE_DELAY_MS: u64 = 100;
/// Added to the normal transition duration before the transitioning flag is cleared.
pub const TRANSITION_SAFETY_MARGIN_MS: u64 = 50;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ThemeSettings {
    pub storage_key: String,
    pub default_mode: ThemeMode,
    pub settle_delay_ms: u64,
    pub safety_margin_ms: u64,
    pub transitions: TransitionConfig,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        ThemeSettings {
            storage_key: THEME_STORAGE_KEY.to_string(),
            default_mode: DEFAULT_THEME_MODE,
            settle_delay_ms: INITIAL_SETTLE_DELAY_MS,
            safety_margin_ms: TRANSITION_SAFETY_MARGIN_MS,
            transitions: TransitionConfig::default(),
        }
    }
}

impl ThemeSettings {
    /// How long an animated transition keeps the transitioning flag set.
    pub fn transition_window_ms(&self) -> u64 {
        self.transitions.normal_ms + self.safety_margin_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let settings: ThemeSettings = serde_json::from_str(r#"{"default_mode":"dark"}"#).unwrap();
        assert_eq!(settings.default_mode, ThemeMode::Dark);
        assert_eq!(settings.storage_key, THEME_STORAGE_KEY);
        assert_eq!(settings.transition_window_ms(), 350);
    }
}
