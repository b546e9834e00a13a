use crate::db::Repository;
use crate::error::{Result, UpdateError};
use crate::feed::PodcastUpdater;
use crate::models::{normalize_url, Podcast};

/// Outcome of checking a submitted feed URL.
#[derive(Debug, Clone, Default)]
pub struct MissingPodcast {
    pub url: Option<String>,
    pub podcast: Option<Podcast>,
    pub can_add: bool,
    pub error: Option<String>,
}

/// Decides whether a podcast may be submitted for `raw_url`.
///
/// Podcasts that already carry a canonical link are known and cannot be
/// added again. Unknown or unlinked podcasts are refreshed exactly once; a
/// feed without episodes blocks the submission and reports why.
pub async fn check_missing(
    repository: &Repository,
    updater: &dyn PodcastUpdater,
    raw_url: Option<&str>,
) -> Result<MissingPodcast> {
    let Some(url) = normalize_url(raw_url) else {
        return Ok(MissingPodcast::default());
    };

    let podcast = repository.find_podcast_by_url(&url).await?;
    if let Some(known) = podcast.as_ref().filter(|p| p.has_link()) {
        tracing::debug!(url = %url, podcast = %known.id, "podcast already known");
        return Ok(MissingPodcast {
            url: Some(url),
            podcast,
            can_add: false,
            error: None,
        });
    }

    match updater.update_podcast(&url).await {
        Ok(refreshed) => Ok(MissingPodcast {
            url: Some(url),
            podcast: Some(refreshed),
            can_add: true,
            error: None,
        }),
        Err(e @ UpdateError::NoEpisodes(_)) => {
            tracing::info!(url = %url, "rejecting submission: {}", e);
            Ok(MissingPodcast {
                url: Some(url),
                podcast,
                can_add: false,
                error: Some(e.to_string()),
            })
        }
        Err(e) => {
            tracing::warn!(url = %url, "refresh failed, submission still allowed: {}", e);
            Ok(MissingPodcast {
                url: Some(url),
                podcast,
                can_add: true,
                error: None,
            })
        }
    }
}
