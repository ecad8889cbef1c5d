use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, watch, RwLock};
use tracing::{debug, info, warn};

use crate::error::PreferenceError;
use crate::signals::Signal;

pub const PREFERENCE_KEY: &str = "preferred-language";

/// Opaque language tag such as `en` or `te`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Language(Cow<'static, str>);

impl Language {
    pub const ENGLISH: Language = Language(Cow::Borrowed("en"));
    pub const TELUGU: Language = Language(Cow::Borrowed("te"));

    pub fn new(tag: impl Into<String>) -> Self {
        Self(Cow::Owned(tag.into()))
    }

    pub fn tag(&self) -> &str {
        &self.0
    }

    /// Value for the document `lang` attribute.
    pub fn html_lang(&self) -> String {
        format!("{}-IN", self.0)
    }

    /// The other language of the site's two-way toggle.
    pub fn toggled(&self) -> Language {
        if *self == Language::ENGLISH {
            Language::TELUGU
        } else {
            Language::ENGLISH
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::ENGLISH
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PreferenceData {
    values: HashMap<String, String>,
}

/// Small key/value store standing in for browser local storage.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    inner: Arc<RwLock<PreferenceData>>,
    path: Option<PathBuf>,
}

impl PreferenceStore {
    pub fn in_memory() -> Self {
        Self {
            inner: Arc::new(RwLock::new(PreferenceData::default())),
            path: None,
        }
    }

    /// Opens the store at `path`; a missing or corrupted file falls back to
    /// the `.tmp` sibling left by an interrupted write, then to empty.
    pub async fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let data = match read_preferences(&path).await {
            Some(data) => data,
            None => read_preferences(&path.with_extension("json.tmp"))
                .await
                .unwrap_or_default(),
        };
        Self {
            inner: Arc::new(RwLock::new(data)),
            path: Some(path),
        }
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        self.inner.read().await.values.get(key).cloned()
    }

    pub async fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        let mut inner = self.inner.write().await;
        inner.values.insert(key.to_owned(), value.to_owned());
        drop(inner);
        self.persist().await
    }

    async fn persist(&self) -> Result<(), PreferenceError> {
        let Some(path) = &self.path else {
            debug!("preference store is in-memory only; skipping persist");
            return Ok(());
        };
        let bytes = {
            let inner = self.inner.read().await;
            serde_json::to_vec_pretty(&*inner)?
        };
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }
}

async fn read_preferences(path: &Path) -> Option<PreferenceData> {
    let bytes = tokio::fs::read(path).await.ok()?;
    match serde_json::from_slice(&bytes) {
        Ok(data) => Some(data),
        Err(e) => {
            warn!(error = %e, path = %path.display(), "failed to parse preferences");
            None
        }
    }
}

/// Current language, its persistence, and the change broadcast.
#[derive(Debug)]
pub struct LanguageController {
    current: watch::Sender<Language>,
    default_language: Language,
    store: PreferenceStore,
    changed: Signal<Language>,
}

impl LanguageController {
    /// Starts from the persisted preference, else `default_language`.
    pub async fn new(
        store: PreferenceStore,
        default_language: Language,
        changed: Signal<Language>,
    ) -> Self {
        let initial = store
            .get(PREFERENCE_KEY)
            .await
            .map(Language::new)
            .unwrap_or_else(|| default_language.clone());
        debug!(language = %initial, "initial language resolved");
        let (current, _) = watch::channel(initial);
        Self {
            current,
            default_language,
            store,
            changed,
        }
    }

    pub fn get(&self) -> Language {
        self.current.borrow().clone()
    }

    pub fn default_language(&self) -> &Language {
        &self.default_language
    }

    /// Persists, updates and notifies every subscriber. Subscribers run on
    /// their own; this returns as soon as the notification is queued.
    pub async fn set(&self, language: Language) {
        if let Err(err) = self.store.set(PREFERENCE_KEY, language.tag()).await {
            warn!(%err, "failed to persist language preference");
        }
        self.current.send_replace(language.clone());
        let reached = self.changed.emit(language.clone());
        info!(language = %language, subscribers = reached, "language changed");
    }

    pub async fn toggle(&self) -> Language {
        let next = self.get().toggled();
        self.set(next.clone()).await;
        next
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Language> {
        self.changed.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_between_site_languages() {
        assert_eq!(Language::ENGLISH.toggled(), Language::TELUGU);
        assert_eq!(Language::TELUGU.toggled(), Language::ENGLISH);
        assert_eq!(Language::new("hi").toggled(), Language::ENGLISH);
    }

    #[test]
    fn html_lang_uses_india_region() {
        assert_eq!(Language::TELUGU.html_lang(), "te-IN");
        assert_eq!(Language::ENGLISH.html_lang(), "en-IN");
    }

    #[test]
    fn owned_and_borrowed_tags_compare_equal() {
        assert_eq!(Language::new("te"), Language::TELUGU);
    }

    #[tokio::test]
    async fn set_updates_current_and_notifies() {
        let signal = Signal::new("language-changed");
        let controller =
            LanguageController::new(PreferenceStore::in_memory(), Language::ENGLISH, signal)
                .await;
        let mut rx = controller.subscribe();

        assert_eq!(controller.get(), Language::ENGLISH);
        controller.set(Language::TELUGU).await;

        assert_eq!(controller.get(), Language::TELUGU);
        assert_eq!(rx.try_recv().unwrap(), Language::TELUGU);
    }
}
