use tokio::sync::broadcast;
use tracing::trace;

use crate::language::Language;
use crate::news::NewsStory;
use crate::stories::Story;

const SIGNAL_CAPACITY: usize = 32;

/// Typed broadcast point. Emitting never waits for subscribers.
pub struct Signal<T> {
    name: &'static str,
    tx: broadcast::Sender<T>,
}

impl<T: Clone> Signal<T> {
    pub fn new(name: &'static str) -> Self {
        let (tx, _) = broadcast::channel(SIGNAL_CAPACITY);
        Self { name, tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<T> {
        self.tx.subscribe()
    }

    /// Returns how many subscribers were reached.
    pub fn emit(&self, payload: T) -> usize {
        match self.tx.send(payload) {
            Ok(reached) => reached,
            Err(_) => {
                trace!(signal = self.name, "no subscribers");
                0
            }
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            tx: self.tx.clone(),
        }
    }
}

impl<T> std::fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("name", &self.name)
            .field("subscribers", &self.tx.receiver_count())
            .finish()
    }
}

/// An item picked out of a carousel, with its position.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection<T> {
    pub item: T,
    pub index: usize,
}

pub type StoryClicked = Selection<Story>;

#[derive(Debug, Clone)]
pub struct Signals {
    pub language_changed: Signal<Language>,
    pub story_clicked: Signal<StoryClicked>,
    pub stories_ready: Signal<Vec<Story>>,
    pub news_data_ready: Signal<Vec<NewsStory>>,
}

impl Default for Signals {
    fn default() -> Self {
        Self {
            language_changed: Signal::new("language-changed"),
            story_clicked: Signal::new("story-clicked"),
            stories_ready: Signal::new("stories-ready"),
            news_data_ready: Signal::new("news-data-ready"),
        }
    }
}
