use std::time::Duration;

use feed_rs::model::Entry;
use feed_rs::parser;
use reqwest::Client;

use crate::config::Config;
use crate::error::{Result, UpdateError};
use crate::models::{NewEpisode, ParsedFeed};

pub struct FeedFetcher {
    client: Client,
}

impl FeedFetcher {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self { client })
    }

    /// Downloads and parses the feed at `url`.
    pub async fn fetch(&self, url: &str) -> std::result::Result<ParsedFeed, UpdateError> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(UpdateError::Http(response.status()));
        }

        let bytes = response.bytes().await?;
        parse_feed(url, &bytes)
    }
}

/// Extracts podcast metadata and episodes from raw RSS/Atom bytes. A feed
/// without entries is rejected with [`UpdateError::NoEpisodes`].
pub fn parse_feed(url: &str, bytes: &[u8]) -> std::result::Result<ParsedFeed, UpdateError> {
    let feed = parser::parse(bytes)?;

    if feed.entries.is_empty() {
        return Err(UpdateError::NoEpisodes(url.to_string()));
    }

    let link = feed
        .links
        .iter()
        .find(|l| l.rel.as_deref() != Some("self"))
        .map(|l| l.href.clone());

    let episodes = feed.entries.into_iter().map(episode_from_entry).collect();

    Ok(ParsedFeed {
        title: feed.title.map(|t| t.content),
        description: feed.description.map(|d| d.content),
        link,
        language: feed.language,
        episodes,
    })
}

fn episode_from_entry(entry: Entry) -> NewEpisode {
    // Prefer the enclosure over the episode's web page
    let media_url = entry
        .media
        .iter()
        .flat_map(|m| m.content.iter())
        .find_map(|c| c.url.as_ref().map(|u| u.to_string()));

    let url = media_url.or_else(|| entry.links.first().map(|l| l.href.clone()));

    NewEpisode {
        guid: entry.id,
        title: entry
            .title
            .map(|t| t.content)
            .unwrap_or_else(|| "Untitled".to_string()),
        url,
        released: entry.published.or(entry.updated),
    }
}
