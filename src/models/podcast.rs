use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Podcast {
    pub id: String,
    pub created: DateTime<Utc>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub language: Option<String>,
    /// Website of the podcast. Only set once a feed has been fetched
    /// successfully, so an empty link marks a placeholder entry.
    pub link: Option<String>,
    pub last_update: Option<DateTime<Utc>>,
    pub subscribers: i64,
}

impl Podcast {
    pub fn has_link(&self) -> bool {
        self.link.as_deref().is_some_and(|l| !l.trim().is_empty())
    }

    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("Untitled Podcast")
    }
}

/// A podcast record created directly, without fetching its feed.
#[derive(Debug, Clone, Default)]
pub struct NewPodcast {
    pub url: Option<String>,
    pub title: Option<String>,
    pub language: Option<String>,
    pub link: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Episode {
    pub id: i64,
    pub podcast_id: String,
    pub guid: String,
    pub title: String,
    pub url: Option<String>,
    pub released: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewEpisode {
    pub guid: String,
    pub title: String,
    pub url: Option<String>,
    pub released: Option<DateTime<Utc>>,
}

/// Podcast metadata extracted from a downloaded feed.
#[derive(Debug, Clone)]
pub struct ParsedFeed {
    pub title: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub language: Option<String>,
    pub episodes: Vec<NewEpisode>,
}
