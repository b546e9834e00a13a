use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};

use crate::db::Repository;
use crate::error::UpdateError;
use crate::models::Podcast;

use super::FeedFetcher;

/// Refreshes a single podcast from its feed.
#[async_trait]
pub trait PodcastUpdater: Send + Sync {
    async fn update_podcast(&self, url: &str) -> Result<Podcast, UpdateError>;
}

/// Downloads the feed and stores the result, creating the podcast on first
/// sight of its URL.
pub struct FeedUpdater {
    fetcher: FeedFetcher,
    repository: Arc<Repository>,
}

impl FeedUpdater {
    pub fn new(fetcher: FeedFetcher, repository: Arc<Repository>) -> Self {
        Self {
            fetcher,
            repository,
        }
    }
}

#[async_trait]
impl PodcastUpdater for FeedUpdater {
    async fn update_podcast(&self, url: &str) -> Result<Podcast, UpdateError> {
        let parsed = self.fetcher.fetch(url).await?;
        let episodes = parsed.episodes.len();
        let podcast = self.repository.save_parsed_feed(url, parsed).await?;
        tracing::debug!(url, podcast = %podcast.id, episodes, "updated podcast");
        Ok(podcast)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateSummary {
    pub updated: usize,
    pub failed: usize,
}

/// Updates every URL, at most `concurrency` at a time. Failures are logged
/// and counted; they never stop the remaining updates.
pub async fn update_podcasts(
    updater: &dyn PodcastUpdater,
    urls: &[String],
    concurrency: usize,
) -> UpdateSummary {
    tracing::info!("Updating {} podcasts", urls.len());

    let summary = stream::iter(urls)
        .map(|url| async move { (url, updater.update_podcast(url).await) })
        .buffer_unordered(concurrency.max(1))
        .fold(UpdateSummary::default(), |mut summary, (url, result)| async move {
            match result {
                Ok(_) => summary.updated += 1,
                Err(e) => {
                    tracing::warn!("Failed to update {}: {}", url, e);
                    summary.failed += 1;
                }
            }
            summary
        })
        .await;

    tracing::info!(
        updated = summary.updated,
        failed = summary.failed,
        "podcast update finished"
    );
    summary
}
