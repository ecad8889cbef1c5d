use std::ops::Range;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Floor for a configured auto-play interval; zero would stall the timer.
pub const MIN_AUTO_PLAY_INTERVAL_MS: u64 = 100;

/// What manual navigation does at either end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeMode {
    #[default]
    Clamp,
    Wrap,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwipeConfig {
    pub min_horizontal: f32,
    pub max_vertical: f32,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            min_horizontal: 50.0,
            max_vertical: 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarouselConfig {
    pub auto_play_interval_ms: u64,
    /// How many items are shown at once.
    pub window: usize,
    /// Fraction of the carousel that must be on screen for auto-play.
    pub visibility_threshold: f32,
    pub edge_mode: EdgeMode,
    pub swipe: SwipeConfig,
}

impl CarouselConfig {
    pub fn side_stories() -> Self {
        Self {
            auto_play_interval_ms: 5000,
            window: 4,
            visibility_threshold: 0.1,
            edge_mode: EdgeMode::Clamp,
            swipe: SwipeConfig::default(),
        }
    }

    pub fn testimonials() -> Self {
        Self {
            auto_play_interval_ms: 8000,
            window: 1,
            visibility_threshold: 0.1,
            edge_mode: EdgeMode::Wrap,
            swipe: SwipeConfig::default(),
        }
    }

    pub fn profile_images() -> Self {
        Self {
            auto_play_interval_ms: 4000,
            window: 1,
            visibility_threshold: 0.5,
            edge_mode: EdgeMode::Wrap,
            swipe: SwipeConfig::default(),
        }
    }

    /// Auto-play period, never shorter than [`MIN_AUTO_PLAY_INTERVAL_MS`].
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.auto_play_interval_ms.max(MIN_AUTO_PLAY_INTERVAL_MS))
    }
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self::side_stories()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarouselState {
    Empty,
    Ready(usize),
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    Next,
    Prev,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    ArrowLeft,
    ArrowRight,
    Other,
}

/// Decides whether a touch from `start` to `end` is a horizontal swipe.
/// Moving leftwards (start.x > end.x) means next.
pub fn recognise_swipe(start: (f32, f32), end: (f32, f32), config: &SwipeConfig) -> Option<SwipeDirection> {
    let dx = start.0 - end.0;
    let dy = (start.1 - end.1).abs();
    if dx.abs() > config.min_horizontal && dy < config.max_vertical {
        Some(if dx > 0.0 {
            SwipeDirection::Next
        } else {
            SwipeDirection::Prev
        })
    } else {
        None
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct TouchTrack {
    start: (f32, f32),
    last: (f32, f32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Slide<T> {
    pub index: usize,
    pub item: T,
    pub current: bool,
}

/// Pure projection of a carousel's state, ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct CarouselView<T> {
    pub state: CarouselState,
    pub slides: Vec<Slide<T>>,
    pub window: Range<usize>,
    pub dots: Vec<bool>,
    pub prev_enabled: bool,
    pub next_enabled: bool,
    pub revision: u64,
}

impl<T> CarouselView<T> {
    pub fn is_error(&self) -> bool {
        self.state == CarouselState::Error
    }

    pub fn current(&self) -> Option<usize> {
        match self.state {
            CarouselState::Ready(idx) => Some(idx),
            _ => None,
        }
    }
}

/// Carousel state machine. The only source of truth for the current index;
/// every mutator returns whether the state changed (and so needs a redraw).
#[derive(Debug, Clone)]
pub struct Carousel<T> {
    items: Vec<T>,
    state: CarouselState,
    config: CarouselConfig,
    visible: bool,
    paused: bool,
    hovering: bool,
    destroyed: bool,
    touch: Option<TouchTrack>,
    revision: u64,
}

impl<T: Clone> Carousel<T> {
    pub fn new(config: CarouselConfig) -> Self {
        Self {
            items: Vec::new(),
            state: CarouselState::Empty,
            config,
            visible: false,
            paused: false,
            hovering: false,
            destroyed: false,
            touch: None,
            revision: 0,
        }
    }

    pub fn config(&self) -> &CarouselConfig {
        &self.config
    }

    pub fn state(&self) -> CarouselState {
        self.state
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn current_index(&self) -> Option<usize> {
        match self.state {
            CarouselState::Ready(idx) => Some(idx),
            _ => None,
        }
    }

    pub fn current_item(&self) -> Option<&T> {
        self.current_index().and_then(|idx| self.items.get(idx))
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Replaces the items wholesale. No items means the error display.
    pub fn load(&mut self, items: Vec<T>) -> bool {
        if self.destroyed {
            return false;
        }
        self.items = items;
        self.state = if self.items.is_empty() {
            CarouselState::Error
        } else {
            CarouselState::Ready(0)
        };
        debug!(items = self.items.len(), state = ?self.state, "carousel loaded");
        self.bump()
    }

    pub fn fail(&mut self) -> bool {
        if self.destroyed {
            return false;
        }
        self.items.clear();
        self.state = CarouselState::Error;
        self.bump()
    }

    /// Manual navigation forward; pauses auto-play.
    pub fn next(&mut self) -> bool {
        self.pause();
        self.step(SwipeDirection::Next)
    }

    /// Manual navigation backward; pauses auto-play.
    pub fn prev(&mut self) -> bool {
        self.pause();
        self.step(SwipeDirection::Prev)
    }

    /// Jumps to `index`; the current index or an out-of-range one is a no-op.
    pub fn go_to(&mut self, index: usize) -> bool {
        self.pause();
        match self.state {
            CarouselState::Ready(idx) if !self.destroyed && index < self.items.len() && index != idx => {
                self.state = CarouselState::Ready(index);
                self.bump()
            }
            _ => false,
        }
    }

    pub fn key(&mut self, key: NavKey) -> bool {
        match key {
            NavKey::ArrowLeft => self.prev(),
            NavKey::ArrowRight => self.next(),
            NavKey::Other => false,
        }
    }

    /// Timer tick: always wraps from the last item to the first.
    pub fn auto_advance(&mut self) -> bool {
        if self.destroyed {
            return false;
        }
        match self.state {
            CarouselState::Ready(idx) if self.items.len() > 1 => {
                self.state = CarouselState::Ready((idx + 1) % self.items.len());
                self.bump()
            }
            _ => false,
        }
    }

    fn step(&mut self, direction: SwipeDirection) -> bool {
        if self.destroyed {
            return false;
        }
        let CarouselState::Ready(idx) = self.state else {
            return false;
        };
        let last = self.items.len() - 1;
        let target = match (direction, self.config.edge_mode) {
            (SwipeDirection::Next, EdgeMode::Clamp) => (idx + 1).min(last),
            (SwipeDirection::Prev, EdgeMode::Clamp) => idx.saturating_sub(1),
            (SwipeDirection::Next, EdgeMode::Wrap) => (idx + 1) % self.items.len(),
            (SwipeDirection::Prev, EdgeMode::Wrap) => (idx + self.items.len() - 1) % self.items.len(),
        };
        if target == idx {
            return false;
        }
        self.state = CarouselState::Ready(target);
        self.bump()
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    pub fn pointer_enter(&mut self) {
        self.hovering = true;
        self.pause();
    }

    pub fn pointer_leave(&mut self) {
        self.hovering = false;
        self.paused = false;
    }

    pub fn touch_start(&mut self, x: f32, y: f32) {
        self.pause();
        self.touch = Some(TouchTrack {
            start: (x, y),
            last: (x, y),
        });
    }

    pub fn touch_move(&mut self, x: f32, y: f32) {
        if let Some(track) = self.touch.as_mut() {
            track.last = (x, y);
        }
    }

    /// Ends the gesture and navigates if it was a swipe. Auto-play becomes
    /// eligible again unless the pointer is still over the carousel.
    pub fn touch_end(&mut self) -> Option<SwipeDirection> {
        let track = self.touch.take()?;
        if !self.hovering {
            self.paused = false;
        }
        let direction = recognise_swipe(track.start, track.last, &self.config.swipe)?;
        self.step(direction);
        Some(direction)
    }

    /// Records how much of the carousel is on screen. Coming back into view
    /// clears a user pause.
    pub fn set_visibility(&mut self, ratio: f32) {
        if self.destroyed {
            return;
        }
        let visible = ratio >= self.config.visibility_threshold;
        if visible && !self.visible {
            self.paused = false;
        }
        self.visible = visible;
    }

    pub fn should_auto_play(&self) -> bool {
        !self.destroyed
            && self.visible
            && !self.paused
            && self.items.len() > 1
            && matches!(self.state, CarouselState::Ready(_))
    }

    /// Stops everything for good. Safe to call repeatedly.
    pub fn destroy(&mut self) {
        self.destroyed = true;
        self.visible = false;
        self.touch = None;
    }

    pub fn view(&self) -> CarouselView<T> {
        let n = self.items.len();
        match self.state {
            CarouselState::Ready(idx) => {
                let window = self.window_range(idx);
                let (prev_enabled, next_enabled) = match self.config.edge_mode {
                    EdgeMode::Clamp => (idx != 0, idx != n - 1),
                    EdgeMode::Wrap => (n > 1, n > 1),
                };
                let slides = window
                    .clone()
                    .map(|index| Slide {
                        index,
                        item: self.items[index].clone(),
                        current: index == idx,
                    })
                    .collect();
                CarouselView {
                    state: self.state,
                    slides,
                    window,
                    dots: (0..n).map(|i| i == idx).collect(),
                    prev_enabled,
                    next_enabled,
                    revision: self.revision,
                }
            }
            CarouselState::Empty | CarouselState::Error => CarouselView {
                state: self.state,
                slides: Vec::new(),
                window: 0..0,
                dots: Vec::new(),
                prev_enabled: false,
                next_enabled: false,
                revision: self.revision,
            },
        }
    }

    fn window_range(&self, idx: usize) -> Range<usize> {
        let n = self.items.len();
        let size = self.config.window.max(1);
        let start = idx.min(n.saturating_sub(size));
        start..(start + size).min(n)
    }

    fn bump(&mut self) -> bool {
        self.revision += 1;
        true
    }
}
