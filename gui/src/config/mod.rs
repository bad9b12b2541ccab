// GUI configuration, mirrored from assets/config/default.json
pub mod theme;

use serde::Deserialize;
use site_engine::config::ThemeSettings;
use site_engine::recommendations::RecommendationOptions;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SiteConfig {
    pub version: String,
    pub site: SiteSettings,
    pub window: WindowSettings,
    #[serde(default)]
    pub theme: ThemeSettings,
    pub storage: StorageSettings,
    #[serde(default)]
    pub recommendations: RecommendationOptions,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SiteSettings {
    pub name: String,
    pub tagline: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct StorageSettings {
    /// Where the persisted theme mode lives.
    pub preferences_file: PathBuf,
    /// Append-only JSON lines, one per submitted inquiry.
    pub submissions_file: PathBuf,
}

impl SiteConfig {
    pub fn load_default() -> Result<Self, anyhow::Error> {
        let config_str = include_str!("../../assets/config/default.json");
        Self::from_json(config_str)
    }

    pub fn from_json(raw: &str) -> Result<Self, anyhow::Error> {
        let config: SiteConfig = serde_json::from_str(raw)?;
        if config.window.width == 0 || config.window.height == 0 {
            anyhow::bail!("window size must be non-zero");
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use site_shared::models::ThemeMode;

    #[test]
    fn embedded_default_config_loads() {
        let config = SiteConfig::load_default().unwrap();
        assert_eq!(config.theme.storage_key, "theme-mode");
        assert_eq!(config.theme.default_mode, ThemeMode::System);
        assert_eq!(config.recommendations.max_results, 2);
    }

    #[test]
    fn theme_and_recommendations_fall_back_to_defaults() {
        let raw = r#"{
            "version": "x",
            "site": {"name": "n", "tagline": "t"},
            "window": {"title": "w", "width": 800, "height": 600},
            "storage": {"preferences_file": "p.json", "submissions_file": "s.jsonl"}
        }"#;
        let config = SiteConfig::from_json(raw).unwrap();
        assert_eq!(config.theme, ThemeSettings::default());
        assert_eq!(config.recommendations, RecommendationOptions::default());
    }

    #[test]
    fn zero_sized_window_is_rejected() {
        let raw = r#"{
            "version": "x",
            "site": {"name": "n", "tagline": "t"},
            "window": {"title": "w", "width": 0, "height": 600},
            "storage": {"preferences_file": "p.json", "submissions_file": "s.jsonl"}
        }"#;
        assert!(SiteConfig::from_json(raw).is_err());
    }
}
