use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub title: String,
}

/// One quote card of the testimonials carousel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Testimonial {
    pub text: String,
    #[serde(default)]
    pub author: Author,
}

impl Testimonial {
    /// Cards listed under `testimonials` in the testimonials section.
    pub fn from_section(doc: &Value) -> Vec<Testimonial> {
        let Some(list) = doc.get("testimonials") else {
            return Vec::new();
        };
        match Vec::<Testimonial>::deserialize(list) {
            Ok(cards) => cards,
            Err(err) => {
                warn!(error = %err, "testimonials section is malformed");
                Vec::new()
            }
        }
    }

    /// Quoted text as shown on the card.
    pub fn quoted(&self) -> String {
        format!("\"{}\"", self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_cards_with_authors() {
        let doc = json!({
            "section_title": "Voices",
            "testimonials": [
                { "text": "Kept every promise", "author": { "name": "Lakshmi", "title": "Farmer" } },
                { "text": "Built our school" }
            ]
        });
        let cards = Testimonial::from_section(&doc);
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].author.name, "Lakshmi");
        assert_eq!(cards[1].author, Author::default());
        assert_eq!(cards[1].quoted(), "\"Built our school\"");
    }

    #[test]
    fn missing_or_malformed_list_is_empty() {
        assert!(Testimonial::from_section(&json!({})).is_empty());
        assert!(Testimonial::from_section(&json!({ "testimonials": 3 })).is_empty());
    }
}
