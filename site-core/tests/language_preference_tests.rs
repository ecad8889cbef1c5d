use site_core::language::PREFERENCE_KEY;
use site_core::{Language, LanguageController, PreferenceStore, Signal};

fn temp_dir(tag: &str) -> std::path::PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!(
        "profile_site_{}_{}",
        tag,
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    dir
}

#[tokio::test]
async fn preference_survives_reload() {
    let dir = temp_dir("pref");
    let path = dir.join("preferences.json");

    let store = PreferenceStore::load_from(&path).await;
    let controller = LanguageController::new(store, Language::ENGLISH, Signal::new("lang")).await;
    assert_eq!(controller.get(), Language::ENGLISH);
    controller.set(Language::TELUGU).await;

    let reopened = PreferenceStore::load_from(&path).await;
    assert_eq!(reopened.get(PREFERENCE_KEY).await.as_deref(), Some("te"));
    let controller = LanguageController::new(reopened, Language::ENGLISH, Signal::new("lang")).await;
    assert_eq!(controller.get(), Language::TELUGU);

    let _ = tokio::fs::remove_dir_all(&dir).await;
}

#[tokio::test]
async fn corrupted_preferences_use_tmp_then_default() {
    let dir = temp_dir("pref_corrupt");
    tokio::fs::create_dir_all(&dir).await.unwrap();
    let path = dir.join("preferences.json");
    tokio::fs::write(&path, b"{ broken").await.unwrap();

    let store = PreferenceStore::load_from(&path).await;
    assert!(store.get(PREFERENCE_KEY).await.is_none());

    tokio::fs::write(
        dir.join("preferences.json.tmp"),
        br#"{ "values": { "preferred-language": "te" } }"#,
    )
    .await
    .unwrap();
    let store = PreferenceStore::load_from(&path).await;
    let controller = LanguageController::new(store, Language::ENGLISH, Signal::new("lang")).await;
    assert_eq!(controller.get(), Language::TELUGU);

    let _ = tokio::fs::remove_dir_all(&dir).await;
}

#[tokio::test]
async fn every_subscriber_hears_each_change() {
    let signal = Signal::new("lang");
    let controller =
        LanguageController::new(PreferenceStore::in_memory(), Language::ENGLISH, signal.clone()).await;
    let mut first = signal.subscribe();
    let mut second = controller.subscribe();

    assert_eq!(controller.toggle().await, Language::TELUGU);
    assert_eq!(controller.toggle().await, Language::ENGLISH);

    for rx in [&mut first, &mut second] {
        assert_eq!(rx.recv().await.unwrap(), Language::TELUGU);
        assert_eq!(rx.recv().await.unwrap(), Language::ENGLISH);
    }
}
