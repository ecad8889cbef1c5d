use reqwest::Client;
use tracing::warn;
use url::Url;

use crate::config::SiteConfig;
use crate::content::ContentStore;
use crate::error::ContentError;
use crate::language::{LanguageController, PreferenceStore};
use crate::signals::Signals;

/// Everything the page shares, built once at start-up and passed around.
#[derive(Debug)]
pub struct SiteContext {
    pub config: SiteConfig,
    pub content: ContentStore,
    pub language: LanguageController,
    pub signals: Signals,
}

impl SiteContext {
    pub async fn new(
        config: SiteConfig,
        client: Client,
        preferences: PreferenceStore,
    ) -> Result<Self, ContentError> {
        let base = Url::parse(&config.content.base_url)?;
        let default_language = config.language.default_language.clone();
        let signals = Signals::default();
        let content = ContentStore::new(client, base, default_language.clone());
        let language = LanguageController::new(
            preferences,
            default_language,
            signals.language_changed.clone(),
        )
        .await;
        Ok(Self {
            config,
            content,
            language,
            signals,
        })
    }

    /// Uses the preference file next to the config, or memory if there is
    /// no config directory.
    pub async fn from_config(config: SiteConfig, client: Client) -> Result<Self, ContentError> {
        let preferences = match config.preference_path() {
            Ok(path) => PreferenceStore::load_from(path).await,
            Err(err) => {
                warn!(%err, "no preference location, language choice will not persist");
                PreferenceStore::in_memory()
            }
        };
        Self::new(config, client, preferences).await
    }
}
