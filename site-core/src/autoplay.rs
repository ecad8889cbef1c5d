use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::carousel::{Carousel, CarouselConfig, CarouselView, NavKey, SwipeDirection};
use crate::error::ContentError;
use crate::signals::{Selection, Signal};

/// Owns a carousel and its auto-play timer. All input goes through here so
/// the timer is started and cancelled in step with the state machine.
pub struct CarouselDriver<T> {
    carousel: Arc<Mutex<Carousel<T>>>,
    views: Arc<watch::Sender<CarouselView<T>>>,
    clicks: Signal<Selection<T>>,
    timer: Option<JoinHandle<()>>,
}

impl<T> CarouselDriver<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(config: CarouselConfig, clicks: Signal<Selection<T>>) -> Self {
        let carousel = Carousel::new(config);
        let (views, _) = watch::channel(carousel.view());
        Self {
            carousel: Arc::new(Mutex::new(carousel)),
            views: Arc::new(views),
            clicks,
            timer: None,
        }
    }

    /// Latest view; `changed()` fires on every redraw.
    pub fn subscribe(&self) -> watch::Receiver<CarouselView<T>> {
        self.views.subscribe()
    }

    pub fn view(&self) -> CarouselView<T> {
        self.views.borrow().clone()
    }

    pub fn is_auto_playing(&self) -> bool {
        self.timer.as_ref().is_some_and(|timer| !timer.is_finished())
    }

    pub async fn load(&mut self, items: Vec<T>) {
        self.apply(|c| c.load(items)).await;
    }

    /// Ok with items → first item; anything else → error display.
    pub async fn load_result(&mut self, result: Result<Vec<T>, ContentError>) {
        match result {
            Ok(items) => self.load(items).await,
            Err(err) => {
                warn!(error = %err, "carousel content failed to load");
                self.apply(|c| c.fail()).await;
            }
        }
    }

    /// Reload after a language switch: pause, replace items, restart at 0.
    pub async fn refresh(&mut self, items: Vec<T>) {
        self.stop_timer();
        self.load(items).await;
    }

    pub async fn next(&mut self) -> bool {
        self.apply(|c| c.next()).await
    }

    pub async fn prev(&mut self) -> bool {
        self.apply(|c| c.prev()).await
    }

    pub async fn go_to(&mut self, index: usize) -> bool {
        self.apply(|c| c.go_to(index)).await
    }

    pub async fn key(&mut self, key: NavKey) -> bool {
        self.apply(|c| c.key(key)).await
    }

    pub async fn pointer_enter(&mut self) {
        self.apply(|c| {
            c.pointer_enter();
            false
        })
        .await;
    }

    pub async fn pointer_leave(&mut self) {
        self.apply(|c| {
            c.pointer_leave();
            false
        })
        .await;
    }

    pub async fn touch_start(&mut self, x: f32, y: f32) {
        self.apply(|c| {
            c.touch_start(x, y);
            false
        })
        .await;
    }

    pub async fn touch_move(&mut self, x: f32, y: f32) {
        let mut carousel = self.carousel.lock().await;
        carousel.touch_move(x, y);
    }

    pub async fn touch_end(&mut self) -> Option<SwipeDirection> {
        let mut direction = None;
        self.apply(|c| {
            let before = c.revision();
            direction = c.touch_end();
            c.revision() != before
        })
        .await;
        direction
    }

    pub async fn set_visibility(&mut self, ratio: f32) {
        self.apply(|c| {
            c.set_visibility(ratio);
            false
        })
        .await;
    }

    /// Publishes the clicked item on the selection signal.
    pub async fn click(&mut self, index: usize) -> bool {
        let carousel = self.carousel.lock().await;
        match carousel.items().get(index) {
            Some(item) if carousel.current_index().is_some() => {
                self.clicks.emit(Selection {
                    item: item.clone(),
                    index,
                });
                true
            }
            _ => false,
        }
    }

    /// Cancels the timer before touching state. Idempotent.
    pub async fn destroy(&mut self) {
        self.stop_timer();
        let mut carousel = self.carousel.lock().await;
        if !carousel.is_destroyed() {
            carousel.destroy();
            info!("carousel destroyed");
        }
    }

    async fn apply<F>(&mut self, op: F) -> bool
    where
        F: FnOnce(&mut Carousel<T>) -> bool,
    {
        let (changed, should_play) = {
            let mut carousel = self.carousel.lock().await;
            let changed = op(&mut *carousel);
            if changed {
                self.views.send_replace(carousel.view());
            }
            (changed, carousel.should_auto_play())
        };
        if should_play {
            self.ensure_timer().await;
        } else {
            self.stop_timer();
        }
        changed
    }

    async fn ensure_timer(&mut self) {
        if self.is_auto_playing() {
            return;
        }
        let period = self.carousel.lock().await.config().interval();
        debug!(period_ms = period.as_millis() as u64, "auto-play started");
        self.timer = Some(spawn_auto_play(self.carousel.clone(), self.views.clone(), period));
    }

    fn stop_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
            debug!("auto-play stopped");
        }
    }
}

impl<T> Drop for CarouselDriver<T> {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

fn spawn_auto_play<T>(
    carousel: Arc<Mutex<Carousel<T>>>,
    views: Arc<watch::Sender<CarouselView<T>>>,
    period: std::time::Duration,
) -> JoinHandle<()>
where
    T: Clone + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            let mut carousel = carousel.lock().await;
            // state may have changed while the tick was pending
            if !carousel.should_auto_play() {
                debug!("auto-play no longer allowed; timer exiting");
                break;
            }
            if carousel.auto_advance() {
                views.send_replace(carousel.view());
            }
        }
    })
}
