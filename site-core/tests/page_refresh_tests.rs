use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde_json::json;
use site_core::{
    refresh_page, spawn_page_refresher, Language, PageEvent, PreferenceStore, Section, SiteConfig, SiteContext,
};
use tokio::sync::mpsc;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_english_site(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path_regex(r"^/content/en/[a-z]+\.json$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "section_title": "English section",
            "section_category": "Updates"
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/content/en/side-stories.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "side_stories": [
                { "id": 1, "headline": "Road works", "summary": "s", "date": "2024-10-01" },
                { "id": 2, "headline": "Health camp", "summary": "s", "featured": true }
            ]
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/content/news-content/modal-news.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": "n1", "title": "Older", "summary": "s", "content": "c",
                "category": "regular_story", "status": "published",
                "publishDate": "2024-09-01T00:00:00Z"
            },
            {
                "id": "n2", "title": "Newer", "summary": "s", "content": "c",
                "category": "regular_story", "status": "published",
                "publishDate": "2024-10-01T00:00:00Z"
            },
            {
                "id": "n3", "title": "Draft", "summary": "s", "content": "c",
                "category": "regular_story", "status": "draft"
            }
        ])))
        .mount(server)
        .await;
}

async fn context_for(server: &MockServer) -> SiteContext {
    let mut config = SiteConfig::default();
    config.content.base_url = server.uri();
    SiteContext::new(config, Client::new(), PreferenceStore::in_memory())
        .await
        .unwrap()
}

#[tokio::test]
async fn telugu_refresh_falls_back_to_english_documents() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/content/te/.*$"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    mount_english_site(&server).await;

    let ctx = context_for(&server).await;
    let mut ready = ctx.signals.stories_ready.subscribe();
    let mut news_ready = ctx.signals.news_data_ready.subscribe();

    let snapshot = refresh_page(&ctx, &Language::TELUGU).await;

    assert_eq!(snapshot.language, Language::TELUGU);
    assert_eq!(snapshot.content.loaded(), Section::PAGE.len());
    assert_eq!(
        snapshot.content.header(Section::Events),
        Some(("Updates", "English section"))
    );
    let ids: Vec<_> = snapshot.side_stories.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, ["2", "1"]);

    let desk = snapshot.news.expect("news desk");
    assert_eq!(desk.stories().len(), 3);
    assert_eq!(desk.ticker_text(&Language::ENGLISH).as_deref(), Some("Newer • Older"));

    assert_eq!(ready.recv().await.unwrap().len(), 2);
    assert_eq!(news_ready.recv().await.unwrap().len(), 3);
}

#[tokio::test]
async fn missing_side_stories_become_the_system_notice() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/content/en/side-stories.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "side_stories": [] })))
        .mount(&server)
        .await;

    let ctx = context_for(&server).await;
    let snapshot = refresh_page(&ctx, &Language::ENGLISH).await;

    assert_eq!(snapshot.side_stories.len(), 1);
    assert!(snapshot.side_stories[0].is_system_notice());
    assert_eq!(snapshot.content.loaded(), 0);
    assert!(snapshot.news.is_none());
}

#[tokio::test]
async fn language_change_triggers_a_refresh() {
    let server = MockServer::start().await;
    mount_english_site(&server).await;

    let ctx = Arc::new(context_for(&server).await);
    let (tx, mut rx) = mpsc::channel(4);
    let handle = spawn_page_refresher(ctx.clone(), tx);

    ctx.language.set(Language::TELUGU).await;

    let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("refresh in time")
        .expect("event");
    let PageEvent::Refreshed(snapshot) = event;
    assert_eq!(snapshot.language, Language::TELUGU);
    assert_eq!(snapshot.side_stories.len(), 2);

    handle.stop().await.unwrap();
}
