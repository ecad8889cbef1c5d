use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::carousel::CarouselConfig;
use crate::error::ConfigError;
use crate::language::Language;

const APP_DIR: &str = "profile-site";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SiteConfig {
    #[serde(default)]
    pub content: ContentConfig,
    #[serde(default)]
    pub language: LanguageConfig,
    #[serde(default)]
    pub carousels: CarouselSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Root the `content/` tree is served from.
    pub base_url: String,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageConfig {
    pub default_language: Language,
    pub preference_file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarouselSettings {
    pub side_stories: CarouselConfig,
    pub testimonials: CarouselConfig,
    pub profile_images: CarouselConfig,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/".to_string(),
            user_agent: "ProfileSite/0.1".to_string(),
        }
    }
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            default_language: Language::ENGLISH,
            preference_file: "preferences.json".to_string(),
        }
    }
}

impl Default for CarouselSettings {
    fn default() -> Self {
        Self {
            side_stories: CarouselConfig::side_stories(),
            testimonials: CarouselConfig::testimonials(),
            profile_images: CarouselConfig::profile_images(),
        }
    }
}

impl SiteConfig {
    /// `~/.config/profile-site` on Linux.
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(dir.join(APP_DIR))
    }

    pub fn config_file_path() -> Result<PathBuf, ConfigError> {
        let dir = Self::config_dir()?;
        std::fs::create_dir_all(&dir)?;
        Ok(dir.join("config.json"))
    }

    pub fn preference_path(&self) -> Result<PathBuf, ConfigError> {
        Ok(Self::config_dir()?.join(&self.language.preference_file))
    }

    /// Loads the user config, or writes and returns the defaults.
    pub fn load() -> Self {
        match Self::config_file_path().and_then(|path| Self::load_from(&path)) {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "could not load configuration, using defaults");
                let config = Self::default();
                if let Err(save_err) = config.save() {
                    warn!(error = %save_err, "could not save default configuration");
                }
                config
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&raw)?;
        info!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carousel::EdgeMode;

    #[test]
    fn partial_file_keeps_defaults() {
        let raw = r#"{ "content": { "base_url": "https://example.org/", "user_agent": "t" } }"#;
        let config: SiteConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.content.base_url, "https://example.org/");
        assert_eq!(config.language.default_language, Language::ENGLISH);
        assert_eq!(config.carousels.side_stories.auto_play_interval_ms, 5000);
        assert_eq!(config.carousels.testimonials.edge_mode, EdgeMode::Wrap);
    }

    #[test]
    fn save_then_load_round_trips_edits() {
        let mut path = std::env::temp_dir();
        path.push(format!("profile_site_cfg_{}.json", std::process::id()));

        let mut config = SiteConfig::default();
        config.language.default_language = Language::TELUGU;
        config.carousels.side_stories.window = 3;
        config.save_to(&path).unwrap();

        let loaded = SiteConfig::load_from(&path).unwrap();
        assert_eq!(loaded.language.default_language, Language::TELUGU);
        assert_eq!(loaded.carousels.side_stories.window, 3);
        let _ = std::fs::remove_file(&path);
    }
}
