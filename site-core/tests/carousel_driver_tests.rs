use std::time::Duration;

use site_core::carousel::CarouselConfig;
use site_core::{CarouselDriver, ContentError, NavKey, Signal, SwipeDirection};

fn driver() -> CarouselDriver<&'static str> {
    CarouselDriver::new(CarouselConfig::side_stories(), Signal::new("clicked"))
}

async fn visible_driver(items: Vec<&'static str>) -> CarouselDriver<&'static str> {
    let mut driver = driver();
    driver.load(items).await;
    driver.set_visibility(1.0).await;
    driver
}

#[tokio::test(start_paused = true)]
async fn auto_play_waits_for_visibility() {
    let mut driver = driver();
    driver.load(vec!["a", "b", "c"]).await;
    assert!(!driver.is_auto_playing());

    tokio::time::sleep(Duration::from_secs(12)).await;
    assert_eq!(driver.view().current(), Some(0));

    driver.set_visibility(0.05).await;
    assert!(!driver.is_auto_playing());
    driver.set_visibility(0.2).await;
    assert!(driver.is_auto_playing());

    tokio::time::sleep(Duration::from_millis(5_100)).await;
    assert_eq!(driver.view().current(), Some(1));
}

#[tokio::test(start_paused = true)]
async fn auto_advance_wraps_to_first() {
    let driver = visible_driver(vec!["a", "b", "c"]).await;
    tokio::time::sleep(Duration::from_millis(10_100)).await;
    assert_eq!(driver.view().current(), Some(2));
    assert!(!driver.view().next_enabled);

    tokio::time::sleep(Duration::from_millis(5_000)).await;
    assert_eq!(driver.view().current(), Some(0));
}

#[tokio::test(start_paused = true)]
async fn manual_navigation_pauses_until_pointer_leaves() {
    let mut driver = visible_driver(vec!["a", "b", "c", "d"]).await;
    assert!(driver.next().await);
    assert!(!driver.is_auto_playing());

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(driver.view().current(), Some(1));

    driver.pointer_enter().await;
    driver.pointer_leave().await;
    assert!(driver.is_auto_playing());
    tokio::time::sleep(Duration::from_millis(5_100)).await;
    assert_eq!(driver.view().current(), Some(2));
}

#[tokio::test(start_paused = true)]
async fn visibility_reentry_resumes_after_pause() {
    let mut driver = visible_driver(vec!["a", "b", "c"]).await;
    driver.key(NavKey::ArrowRight).await;
    assert!(!driver.is_auto_playing());

    driver.set_visibility(0.0).await;
    driver.set_visibility(1.0).await;
    assert!(driver.is_auto_playing());
}

#[tokio::test(start_paused = true)]
async fn manual_next_at_end_does_not_wrap() {
    let mut driver = visible_driver(vec!["a", "b"]).await;
    assert!(driver.next().await);
    assert!(!driver.next().await);
    assert_eq!(driver.view().current(), Some(1));
    assert!(driver.prev().await);
    assert_eq!(driver.view().current(), Some(0));
    assert!(!driver.prev().await);
}

#[tokio::test]
async fn go_to_current_does_not_redraw() {
    let mut driver = driver();
    driver.load(vec!["a", "b", "c"]).await;
    driver.go_to(1).await;

    let mut views = driver.subscribe();
    views.borrow_and_update();
    assert!(!driver.go_to(1).await);
    assert!(!views.has_changed().unwrap());

    assert!(driver.go_to(2).await);
    assert!(views.has_changed().unwrap());
    assert_eq!(views.borrow_and_update().current(), Some(2));
}

#[tokio::test(start_paused = true)]
async fn destroyed_carousel_never_changes_again() {
    let mut driver = visible_driver(vec!["a", "b", "c"]).await;
    let mut views = driver.subscribe();
    views.borrow_and_update();

    driver.destroy().await;
    driver.destroy().await;
    let revision = driver.view().revision;

    tokio::time::sleep(Duration::from_secs(20)).await;
    assert!(!views.has_changed().unwrap());
    assert_eq!(driver.view().revision, revision);

    assert!(!driver.next().await);
    driver.set_visibility(1.0).await;
    assert!(!driver.is_auto_playing());
}

#[tokio::test(start_paused = true)]
async fn swipe_navigates_and_resumes_auto_play() {
    let mut driver = visible_driver(vec!["a", "b", "c"]).await;

    driver.touch_start(300.0, 100.0).await;
    assert!(!driver.is_auto_playing());
    driver.touch_move(240.0, 120.0).await;
    assert_eq!(driver.touch_end().await, Some(SwipeDirection::Next));
    assert_eq!(driver.view().current(), Some(1));
    assert!(driver.is_auto_playing());

    driver.touch_start(300.0, 100.0).await;
    driver.touch_move(270.0, 100.0).await;
    assert_eq!(driver.touch_end().await, None);
    assert_eq!(driver.view().current(), Some(1));
}

#[tokio::test]
async fn failed_load_shows_error_state() {
    let mut driver = driver();
    driver
        .load_result(Err(ContentError::EmptyData {
            what: "side stories".into(),
        }))
        .await;
    let view = driver.view();
    assert!(view.is_error());
    assert!(view.slides.is_empty());
    assert!(!view.prev_enabled && !view.next_enabled);

    driver.load_result(Ok(vec!["x"])).await;
    assert_eq!(driver.view().current(), Some(0));
}

#[tokio::test]
async fn click_publishes_selection() {
    let clicks = Signal::new("clicked");
    let mut rx = clicks.subscribe();
    let mut driver = CarouselDriver::new(CarouselConfig::side_stories(), clicks);
    driver.load(vec!["a", "b"]).await;

    assert!(driver.click(1).await);
    assert!(!driver.click(7).await);
    let selection = rx.recv().await.unwrap();
    assert_eq!(selection.item, "b");
    assert_eq!(selection.index, 1);
}

#[tokio::test(start_paused = true)]
async fn refresh_restarts_from_first_item() {
    let mut driver = visible_driver(vec!["a", "b", "c"]).await;
    driver.go_to(2).await;
    driver.refresh(vec!["x", "y"]).await;
    let view = driver.view();
    assert_eq!(view.current(), Some(0));
    assert_eq!(view.dots, [true, false]);
}

#[tokio::test(start_paused = true)]
async fn zero_interval_from_config_still_auto_plays() {
    let config = CarouselConfig {
        auto_play_interval_ms: 0,
        ..CarouselConfig::side_stories()
    };
    let mut driver = CarouselDriver::new(config, Signal::new("clicked"));
    driver.load(vec!["a", "b", "c"]).await;
    driver.set_visibility(1.0).await;
    assert!(driver.is_auto_playing());

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert!(driver.is_auto_playing());
    assert_eq!(driver.view().current(), Some(1));
}

#[tokio::test(start_paused = true)]
async fn wrap_carousel_buttons_stay_enabled() {
    let mut driver = CarouselDriver::new(CarouselConfig::testimonials(), Signal::new("clicked"));
    driver.load(vec!["a", "b", "c"]).await;
    let view = driver.view();
    assert!(view.prev_enabled && view.next_enabled);
    assert!(driver.prev().await);
    assert_eq!(driver.view().current(), Some(2));
    assert!(driver.view().next_enabled);
}
