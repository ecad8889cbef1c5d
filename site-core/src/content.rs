use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use futures_util::future::join_all;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::ContentError;
use crate::language::Language;
use crate::news::{parse_news, NewsStory};
use crate::stories::{parse_side_stories, Story};

const NEWS_DOCUMENT: &str = "content/news-content/modal-news.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Section {
    Main,
    Initiatives,
    Events,
    Campaigns,
    Gallery,
    Testimonials,
    Contact,
    SideStories,
}

impl Section {
    /// Sections fetched together for a full page update.
    pub const PAGE: [Section; 7] = [
        Section::Main,
        Section::Initiatives,
        Section::Events,
        Section::Campaigns,
        Section::Gallery,
        Section::Testimonials,
        Section::Contact,
    ];

    pub fn file_stem(&self) -> &'static str {
        match self {
            Section::Main => "main",
            Section::Initiatives => "initiatives",
            Section::Events => "events",
            Section::Campaigns => "campaigns",
            Section::Gallery => "gallery",
            Section::Testimonials => "testimonials",
            Section::Contact => "contact",
            Section::SideStories => "side-stories",
        }
    }
}

/// Every page section for one language; a failed section is `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageContent {
    pub sections: BTreeMap<Section, Option<Arc<Value>>>,
}

impl PageContent {
    pub fn get(&self, section: Section) -> Option<&Value> {
        self.sections
            .get(&section)
            .and_then(|doc| doc.as_deref())
    }

    pub fn loaded(&self) -> usize {
        self.sections.values().filter(|doc| doc.is_some()).count()
    }

    /// `(section_category, section_title)` header of a section document.
    pub fn header(&self, section: Section) -> Option<(&str, &str)> {
        let doc = self.get(section)?;
        let category = doc.get("section_category")?.as_str()?;
        let title = doc.get("section_title")?.as_str()?;
        Some((category, title))
    }
}

type CacheKey = (Section, Language);

/// Fetches `content/{lang}/{section}.json` documents and keeps them for the
/// session. Entries are never invalidated.
#[derive(Debug, Clone)]
pub struct ContentStore {
    client: Client,
    base: Url,
    default_language: Language,
    cache: Arc<RwLock<HashMap<CacheKey, Arc<Value>>>>,
}

impl ContentStore {
    pub fn new(client: Client, mut base: Url, default_language: Language) -> Self {
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Self {
            client,
            base,
            default_language,
            cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn default_language(&self) -> &Language {
        &self.default_language
    }

    pub fn document_url(&self, section: Section, language: &Language) -> Result<Url, ContentError> {
        let relative = format!("content/{}/{}.json", language.tag(), section.file_stem());
        Ok(self.base.join(&relative)?)
    }

    /// Cached document, else fetched; a non-default language that fails is
    /// retried once in the default language.
    pub async fn load(&self, section: Section, language: &Language) -> Result<Arc<Value>, ContentError> {
        match self.load_exact(section, language).await {
            Ok(doc) => Ok(doc),
            Err(err) if *language != self.default_language && err.is_recoverable_by_fallback() => {
                warn!(
                    section = section.file_stem(),
                    language = %language,
                    fallback = %self.default_language,
                    error = %err,
                    "content unavailable, falling back"
                );
                self.load_exact(section, &self.default_language).await
            }
            Err(err) => {
                warn!(section = section.file_stem(), language = %language, error = %err, "content unavailable");
                Err(err)
            }
        }
    }

    async fn load_exact(&self, section: Section, language: &Language) -> Result<Arc<Value>, ContentError> {
        let key = (section, language.clone());
        if let Some(doc) = self.cache.read().await.get(&key) {
            debug!(section = section.file_stem(), language = %language, "content cache hit");
            return Ok(doc.clone());
        }

        let url = self.document_url(section, language)?;
        let doc = Arc::new(self.fetch_json(url).await?);
        // concurrent loads of one key may both land here; last write wins
        self.cache.write().await.insert(key, doc.clone());
        Ok(doc)
    }

    async fn fetch_json(&self, url: Url) -> Result<Value, ContentError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ContentError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Loads every page section concurrently. One section failing does not
    /// affect the others.
    pub async fn load_all(&self, language: &Language) -> PageContent {
        let results = join_all(Section::PAGE.iter().map(|section| self.load(*section, language))).await;
        let sections: BTreeMap<_, _> = Section::PAGE
            .iter()
            .zip(results)
            .map(|(section, result)| (*section, result.ok()))
            .collect();
        let content = PageContent { sections };
        info!(
            language = %language,
            loaded = content.loaded(),
            total = Section::PAGE.len(),
            "page content loaded"
        );
        content
    }

    pub async fn load_side_stories(&self, language: &Language) -> Result<Vec<Story>, ContentError> {
        let doc = self.load(Section::SideStories, language).await?;
        parse_side_stories(&doc, language)
    }

    /// The language-independent news document; fetched fresh each call.
    pub async fn load_news(&self) -> Result<Vec<NewsStory>, ContentError> {
        let url = self.base.join(NEWS_DOCUMENT)?;
        let doc = self.fetch_json(url).await.map_err(|err| {
            warn!(error = %err, "failed to load news data");
            err
        })?;
        parse_news(doc)
    }

    pub async fn cached_documents(&self) -> usize {
        self.cache.read().await.len()
    }
}
