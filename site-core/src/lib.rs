pub mod autoplay;
pub mod carousel;
pub mod config;
pub mod content;
pub mod context;
pub mod dates;
pub mod error;
pub mod forms;
pub mod gallery;
pub mod language;
pub mod news;
pub mod page;
pub mod routing;
pub mod signals;
pub mod stories;
pub mod testimonials;

pub use autoplay::CarouselDriver;
pub use carousel::{Carousel, CarouselConfig, CarouselState, CarouselView, EdgeMode, NavKey, SwipeDirection};
pub use config::SiteConfig;
pub use content::{ContentStore, PageContent, Section};
pub use context::SiteContext;
pub use error::{ConfigError, ContentError, PreferenceError, TaskError};
pub use forms::{validate_field, validate_form, FieldError, FieldKind, FieldProblem, FieldSpec};
pub use gallery::{GalleryFilter, GalleryItem, ProfileImage};
pub use language::{Language, LanguageController, PreferenceStore};
pub use news::{NewsCategory, NewsCategoryMap, NewsDesk, NewsStory};
pub use page::{refresh_page, spawn_page_refresher, PageEvent, PageSnapshot, RefresherHandle};
pub use routing::{ProfileRouter, Route};
pub use signals::{Selection, Signal, Signals, StoryClicked};
pub use stories::{stories_or_notice, LocalizedText, Story};
pub use testimonials::Testimonial;
