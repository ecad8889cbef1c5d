use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::ContentError;
use crate::language::Language;

/// Text authored either once or per language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocalizedText {
    Plain(String),
    PerLanguage(BTreeMap<String, String>),
}

impl Default for LocalizedText {
    fn default() -> Self {
        LocalizedText::Plain(String::new())
    }
}

impl LocalizedText {
    /// Picks `language`, then English, then whatever variant exists.
    pub fn resolve(&self, language: &Language) -> String {
        match self {
            LocalizedText::Plain(text) => text.clone(),
            LocalizedText::PerLanguage(variants) => variants
                .get(language.tag())
                .or_else(|| variants.get(Language::ENGLISH.tag()))
                .or_else(|| variants.values().next())
                .cloned()
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct RawSideStory {
    #[serde(default, deserialize_with = "id_as_string")]
    id: String,
    #[serde(default)]
    headline: LocalizedText,
    #[serde(default)]
    summary: LocalizedText,
    #[serde(default)]
    category: LocalizedText,
    #[serde(default)]
    date: String,
    #[serde(default)]
    featured: bool,
}

#[derive(Debug, Deserialize)]
struct SideStoriesDocument {
    side_stories: Option<Vec<RawSideStory>>,
    stories: Option<Vec<RawSideStory>>,
}

/// Accepts numeric or string ids.
pub(crate) fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// A side story resolved for one language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    pub id: String,
    pub headline: String,
    pub summary: String,
    pub category: String,
    pub date: String,
    pub featured: bool,
}

impl Story {
    /// Placeholder shown when no side story could be loaded.
    pub fn system_notice() -> Self {
        Self {
            id: "fallback-1".to_string(),
            headline: "System News".to_string(),
            summary: "Unable to load news content. Please check your connection and try again."
                .to_string(),
            category: "System".to_string(),
            date: Utc::now().date_naive().to_string(),
            featured: false,
        }
    }

    pub fn is_system_notice(&self) -> bool {
        self.id == "fallback-1"
    }
}

/// Reads `side_stories` (or `stories`) and resolves each entry for
/// `language`, featured stories first.
pub fn parse_side_stories(document: &Value, language: &Language) -> Result<Vec<Story>, ContentError> {
    let parsed = SideStoriesDocument::deserialize(document)?;
    let raw = parsed.side_stories.or(parsed.stories).unwrap_or_default();
    if raw.is_empty() {
        return Err(ContentError::EmptyData {
            what: "side stories".to_string(),
        });
    }

    let mut stories: Vec<Story> = raw
        .into_iter()
        .map(|story| Story {
            id: story.id,
            headline: story.headline.resolve(language),
            summary: story.summary.resolve(language),
            category: story.category.resolve(language),
            date: story.date,
            featured: story.featured,
        })
        .collect();
    featured_first(&mut stories);
    Ok(stories)
}

/// Stable: non-featured stories keep their relative order.
pub fn featured_first(stories: &mut [Story]) {
    stories.sort_by_key(|story| !story.featured);
}

/// Never leaves the caller with nothing to show.
pub fn stories_or_notice(result: Result<Vec<Story>, ContentError>) -> Vec<Story> {
    match result {
        Ok(stories) if !stories.is_empty() => stories,
        Ok(_) => vec![Story::system_notice()],
        Err(err) => {
            warn!(error = %err, "side stories unavailable, showing system notice");
            vec![Story::system_notice()]
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn story(id: &str, featured: bool) -> Story {
        Story {
            id: id.into(),
            headline: id.into(),
            summary: String::new(),
            category: String::new(),
            date: String::new(),
            featured,
        }
    }

    #[test]
    fn featured_first_is_stable() {
        let mut stories = vec![story("A", false), story("B", true), story("C", false)];
        featured_first(&mut stories);
        let ids: Vec<_> = stories.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["B", "A", "C"]);
    }

    #[test]
    fn resolves_per_language_fields_with_english_fallback() {
        let doc = json!({
            "side_stories": [
                {
                    "id": 1,
                    "headline": { "en": "Roads", "te": "రోడ్లు" },
                    "summary": { "en": "New roads" },
                    "category": "Infrastructure",
                    "date": "2024-10-01"
                }
            ]
        });
        let stories = parse_side_stories(&doc, &Language::TELUGU).unwrap();
        assert_eq!(stories[0].id, "1");
        assert_eq!(stories[0].headline, "రోడ్లు");
        assert_eq!(stories[0].summary, "New roads");
        assert_eq!(stories[0].category, "Infrastructure");
        assert!(!stories[0].featured);
    }

    #[test]
    fn accepts_stories_key() {
        let doc = json!({ "stories": [ { "id": "x", "headline": "H", "summary": "S" } ] });
        let stories = parse_side_stories(&doc, &Language::ENGLISH).unwrap();
        assert_eq!(stories.len(), 1);
    }

    #[test]
    fn empty_array_is_a_failure() {
        let doc = json!({ "side_stories": [] });
        let err = parse_side_stories(&doc, &Language::ENGLISH).unwrap_err();
        assert!(matches!(err, ContentError::EmptyData { .. }));
    }

    #[test]
    fn failure_becomes_single_notice() {
        let stories = stories_or_notice(Err(ContentError::EmptyData {
            what: "side stories".into(),
        }));
        assert_eq!(stories.len(), 1);
        assert!(stories[0].is_system_notice());
    }
}
