use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::content::PageContent;
use crate::context::SiteContext;
use crate::error::TaskError;
use crate::language::Language;
use crate::news::NewsDesk;
use crate::stories::{stories_or_notice, Story};

/// Everything the renderer needs for one language. Replaced wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSnapshot {
    pub language: Language,
    pub content: PageContent,
    pub side_stories: Vec<Story>,
    /// `None` when the news document could not be loaded.
    pub news: Option<NewsDesk>,
}

#[derive(Debug, Clone)]
pub enum PageEvent {
    Refreshed(Box<PageSnapshot>),
}

/// Loads sections, side stories and news for `language` concurrently and
/// announces the results on the context's signals. Never fails.
pub async fn refresh_page(ctx: &SiteContext, language: &Language) -> PageSnapshot {
    let (content, side_stories, news) = tokio::join!(
        ctx.content.load_all(language),
        ctx.content.load_side_stories(language),
        ctx.content.load_news(),
    );

    let side_stories = stories_or_notice(side_stories);
    ctx.signals.stories_ready.emit(side_stories.clone());

    let news = match news {
        Ok(stories) => {
            let desk = NewsDesk::from_stories(stories);
            ctx.signals.news_data_ready.emit(desk.stories().to_vec());
            Some(desk)
        }
        Err(err) => {
            warn!(error = %err, "news unavailable for this refresh");
            None
        }
    };

    info!(
        language = %language,
        sections = content.loaded(),
        side_stories = side_stories.len(),
        news = news.as_ref().map_or(0, |desk| desk.stories().len()),
        "page refreshed"
    );

    PageSnapshot {
        language: language.clone(),
        content,
        side_stories,
        news,
    }
}

pub struct RefresherHandle {
    cancel_tx: broadcast::Sender<()>,
    join: JoinHandle<()>,
}

impl RefresherHandle {
    pub async fn stop(self) -> Result<(), TaskError> {
        let _ = self.cancel_tx.send(());
        self.join.await.map_err(TaskError::from)
    }
}

/// Rebuilds the page on every language change and forwards the snapshot.
pub fn spawn_page_refresher(ctx: Arc<SiteContext>, update_tx: mpsc::Sender<PageEvent>) -> RefresherHandle {
    let (cancel_tx, mut cancel_rx) = broadcast::channel(1);
    let mut changes = ctx.signals.language_changed.subscribe();

    let join = tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = cancel_rx.recv() => {
                    info!("page refresher shutdown requested");
                    break;
                }
                change = changes.recv() => {
                    let language = match change {
                        Ok(language) => language,
                        Err(RecvError::Lagged(skipped)) => {
                            warn!(skipped, "missed language changes, using current");
                            ctx.language.get()
                        }
                        Err(RecvError::Closed) => break,
                    };
                    let snapshot = refresh_page(&ctx, &language).await;
                    if update_tx.send(PageEvent::Refreshed(Box::new(snapshot))).await.is_err() {
                        warn!("page event receiver dropped");
                        break;
                    }
                }
            }
        }
    });

    RefresherHandle { cancel_tx, join }
}
