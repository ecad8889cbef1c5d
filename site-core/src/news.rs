use std::cmp::Reverse;
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::dates::{format_long, parse_timestamp};
use crate::error::ContentError;
use crate::language::Language;
use crate::stories::id_as_string;

pub const PUBLISHED: &str = "published";
const TRANSLATE_MARKER: &str = "[translate:";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsStory {
    #[serde(default, deserialize_with = "id_as_string")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, rename = "title_telugu")]
    pub title_telugu: Option<String>,
    #[serde(default)]
    pub summary: String,
    #[serde(default, rename = "summary_telugu")]
    pub summary_telugu: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default, rename = "content_telugu")]
    pub content_telugu: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub publish_date: String,
    #[serde(default)]
    pub featured_image_url: Option<String>,
}

impl NewsStory {
    pub fn is_published(&self) -> bool {
        self.status == PUBLISHED
    }

    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.publish_date)
    }

    pub fn title_for(&self, language: &Language) -> String {
        localized(&self.title, self.title_telugu.as_deref(), language)
    }

    pub fn summary_for(&self, language: &Language) -> String {
        localized(&self.summary, self.summary_telugu.as_deref(), language)
    }

    pub fn content_for(&self, language: &Language) -> String {
        localized(&self.content, self.content_telugu.as_deref(), language)
    }

    /// "Published: <date>" caption, or `None` when the date is unreadable.
    pub fn published_caption(&self, language: &Language) -> Option<String> {
        self.published_at()
            .map(|ts| format!("Published: {}", format_long(ts.date_naive(), language)))
    }
}

fn localized(base: &str, telugu: Option<&str>, language: &Language) -> String {
    match telugu {
        Some(variant) if *language == Language::TELUGU && !variant.is_empty() => {
            strip_translation_marker(variant)
        }
        _ => base.to_string(),
    }
}

/// Reads the news document entry by entry; a malformed entry is skipped
/// and the rest are kept. Only a non-array document is an error.
pub fn parse_news(document: Value) -> Result<Vec<NewsStory>, ContentError> {
    let entries = Vec::<Value>::deserialize(document)?;
    let total = entries.len();
    let stories: Vec<NewsStory> = entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match NewsStory::deserialize(entry) {
            Ok(story) => Some(story),
            Err(err) => {
                warn!(index, error = %err, "skipping malformed news entry");
                None
            }
        })
        .collect();
    if stories.len() < total {
        warn!(kept = stories.len(), total, "news document had malformed entries");
    }
    Ok(stories)
}

/// Removes the first `[translate:` and then the first `]` anywhere in the
/// remaining text.
pub fn strip_translation_marker(text: &str) -> String {
    text.replacen(TRANSLATE_MARKER, "", 1).replacen(']', "", 1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsCategory {
    Exclusive,
    Regular,
    Side,
    Magazine,
    Editorial,
}

impl NewsCategory {
    pub const ALL: [NewsCategory; 5] = [
        NewsCategory::Exclusive,
        NewsCategory::Regular,
        NewsCategory::Side,
        NewsCategory::Magazine,
        NewsCategory::Editorial,
    ];

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "exclusive_story" => Some(NewsCategory::Exclusive),
            "regular_story" => Some(NewsCategory::Regular),
            "side_story" => Some(NewsCategory::Side),
            "magazine_story" => Some(NewsCategory::Magazine),
            "editorial_story" => Some(NewsCategory::Editorial),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            NewsCategory::Exclusive => "exclusive",
            NewsCategory::Regular => "regular",
            NewsCategory::Side => "side",
            NewsCategory::Magazine => "magazine",
            NewsCategory::Editorial => "editorial",
        }
    }
}

/// Published stories bucketed by category, newest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewsCategoryMap {
    buckets: HashMap<NewsCategory, Vec<NewsStory>>,
}

impl NewsCategoryMap {
    pub fn categorize(stories: &[NewsStory]) -> Self {
        let mut buckets: HashMap<NewsCategory, Vec<NewsStory>> = NewsCategory::ALL
            .iter()
            .map(|category| (*category, Vec::new()))
            .collect();

        for story in stories.iter().filter(|story| story.is_published()) {
            if let Some(category) = NewsCategory::from_tag(&story.category) {
                buckets.entry(category).or_default().push(story.clone());
            }
        }

        // sort_by_cached_key is stable; undated stories go last
        for bucket in buckets.values_mut() {
            bucket.sort_by_cached_key(|story| match story.published_at() {
                Some(ts) => (false, Reverse(ts)),
                None => (true, Reverse(DateTime::<Utc>::MIN_UTC)),
            });
        }

        Self { buckets }
    }

    pub fn get(&self, category: NewsCategory) -> &[NewsStory] {
        self.buckets
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The first `limit` stories of `category`, or all of them.
    pub fn top_of(&self, category: NewsCategory, limit: Option<usize>) -> &[NewsStory] {
        let bucket = self.get(category);
        match limit {
            Some(limit) => &bucket[..limit.min(bucket.len())],
            None => bucket,
        }
    }

    pub fn latest_exclusive(&self) -> Option<&NewsStory> {
        self.get(NewsCategory::Exclusive).first()
    }

    pub fn side_stories(&self, limit: usize) -> &[NewsStory] {
        self.top_of(NewsCategory::Side, Some(limit))
    }

    pub fn regular_stories(&self, limit: usize) -> &[NewsStory] {
        self.top_of(NewsCategory::Regular, Some(limit))
    }

    pub fn total(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }
}

/// The loaded news document together with its categorisation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewsDesk {
    stories: Vec<NewsStory>,
    categories: NewsCategoryMap,
}

impl NewsDesk {
    pub fn from_stories(stories: Vec<NewsStory>) -> Self {
        let categories = NewsCategoryMap::categorize(&stories);
        Self {
            stories,
            categories,
        }
    }

    pub fn stories(&self) -> &[NewsStory] {
        &self.stories
    }

    pub fn categories(&self) -> &NewsCategoryMap {
        &self.categories
    }

    pub fn story_by_id(&self, id: &str) -> Option<&NewsStory> {
        self.stories.iter().find(|story| story.id == id)
    }

    /// Titles of the three newest regular stories for the ticker.
    pub fn ticker_text(&self, language: &Language) -> Option<String> {
        let latest = self.categories.regular_stories(3);
        if latest.is_empty() {
            return None;
        }
        Some(
            latest
                .iter()
                .map(|story| story.title_for(language))
                .collect::<Vec<_>>()
                .join(" • "),
        )
    }
}
