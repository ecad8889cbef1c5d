use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

pub const ALL: &str = "all";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryItem {
    #[serde(default)]
    pub id: String,
    pub category: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl GalleryItem {
    /// Items listed under `items` in the gallery section document.
    pub fn from_section(doc: &Value) -> Vec<GalleryItem> {
        doc.get("items")
            .and_then(|items| Vec::<GalleryItem>::deserialize(items).ok())
            .unwrap_or_default()
    }
}

/// A leader portrait shown in the profile overview carousel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileImage {
    pub url: String,
    #[serde(default, alias = "alt")]
    pub caption: String,
}

impl ProfileImage {
    /// Portraits under `about.images` of the main document. An entry is
    /// either a bare url or an object with `url` and `caption`.
    pub fn from_main(doc: &Value) -> Vec<ProfileImage> {
        let Some(images) = doc.pointer("/about/images").and_then(Value::as_array) else {
            return Vec::new();
        };
        images
            .iter()
            .filter_map(|entry| match entry {
                Value::String(url) => Some(ProfileImage {
                    url: url.clone(),
                    caption: String::new(),
                }),
                other => ProfileImage::deserialize(other).ok(),
            })
            .filter(|image| !image.url.is_empty())
            .collect()
    }
}

/// Category filter for the gallery; exactly one filter is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryFilter {
    active: String,
}

impl Default for GalleryFilter {
    fn default() -> Self {
        Self {
            active: ALL.to_string(),
        }
    }
}

impl GalleryFilter {
    pub fn active(&self) -> &str {
        &self.active
    }

    pub fn select(&mut self, filter: &str) {
        debug!(filter, "gallery filter selected");
        self.active = filter.to_string();
    }

    pub fn shows(&self, item: &GalleryItem) -> bool {
        self.active == ALL || item.category == self.active
    }

    pub fn visible<'a>(&self, items: &'a [GalleryItem]) -> Vec<&'a GalleryItem> {
        items.iter().filter(|item| self.shows(item)).collect()
    }

    /// `all` followed by each category in first-seen order.
    pub fn buttons(items: &[GalleryItem]) -> Vec<String> {
        let mut buttons = vec![ALL.to_string()];
        for item in items {
            if !buttons.contains(&item.category) {
                buttons.push(item.category.clone());
            }
        }
        buttons
    }
}
