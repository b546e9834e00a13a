use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};
use tokio_rusqlite::Connection;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{
    normalize_url, Episode, NewPodcast, NewSubscription, ParsedFeed, Podcast, Subscription,
};

use super::schema::SCHEMA;

const PODCAST_COLUMNS: &str =
    "p.id, p.created, p.title, p.description, p.language, p.link, p.last_update, p.subscribers";

pub struct Repository {
    conn: Connection,
}

impl Repository {
    pub async fn new(db_path: &str) -> Result<Self> {
        if let Some(parent) = std::path::Path::new(db_path).parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let conn = Connection::open(db_path).await?;

        conn.call(|conn| {
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await?;

        Ok(Self { conn })
    }

    // Podcast operations

    pub async fn insert_podcast(&self, mut podcast: NewPodcast) -> Result<Podcast> {
        podcast.url = podcast.url.as_deref().map(stored_url).transpose()?;
        let podcast = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                let id = Uuid::new_v4().to_string();
                tx.execute(
                    "INSERT INTO podcasts (id, title, language, link, created) VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![
                        id,
                        podcast.title,
                        podcast.language,
                        podcast.link,
                        Utc::now().to_rfc3339()
                    ],
                )?;
                if let Some(url) = &podcast.url {
                    tx.execute(
                        "INSERT INTO podcast_urls (podcast_id, url) VALUES (?1, ?2)",
                        params![id, url],
                    )?;
                }
                let podcast = select_podcast(&tx, &id)?;
                tx.commit()?;
                Ok(podcast)
            })
            .await?;
        Ok(podcast)
    }

    pub async fn get_podcast(&self, id: &str) -> Result<Option<Podcast>> {
        let id = id.to_string();
        let podcast = self
            .conn
            .call(move |conn| {
                let podcast = select_podcast(conn, &id).optional()?;
                Ok(podcast)
            })
            .await?;
        Ok(podcast)
    }

    /// Looks a podcast up by any of its feed URLs. URLs that are not valid
    /// feed URLs match nothing.
    pub async fn find_podcast_by_url(&self, url: &str) -> Result<Option<Podcast>> {
        let Some(url) = normalize_url(Some(url)) else {
            return Ok(None);
        };
        let podcast = self
            .conn
            .call(move |conn| {
                let sql = format!(
                    "SELECT {PODCAST_COLUMNS} FROM podcasts p
                     JOIN podcast_urls u ON u.podcast_id = p.id
                     WHERE u.url = ?1"
                );
                let podcast = conn
                    .query_row(&sql, params![url], podcast_from_row)
                    .optional()?;
                Ok(podcast)
            })
            .await?;
        Ok(podcast)
    }

    /// Distinct language codes as stored, without empty values.
    pub async fn podcast_languages(&self) -> Result<Vec<String>> {
        let languages = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT DISTINCT language FROM podcasts WHERE language IS NOT NULL AND language != '' ORDER BY language",
                )?;
                let languages = stmt
                    .query_map([], |row| row.get(0))?
                    .collect::<std::result::Result<Vec<String>, _>>()?;
                Ok(languages)
            })
            .await?;
        Ok(languages)
    }

    /// Podcasts ranked by subscriber count, optionally restricted to a
    /// two-letter language prefix.
    pub async fn toplist(&self, language: Option<&str>, limit: usize) -> Result<Vec<Podcast>> {
        let language = language.map(|l| l.to_ascii_lowercase());
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let podcasts = self
            .conn
            .call(move |conn| {
                let sql = format!(
                    "SELECT {PODCAST_COLUMNS} FROM podcasts p
                     WHERE ?1 IS NULL OR substr(lower(p.language), 1, 2) = ?1
                     ORDER BY p.subscribers DESC, p.title COLLATE NOCASE
                     LIMIT ?2"
                );
                let mut stmt = conn.prepare(&sql)?;
                let podcasts = stmt
                    .query_map(params![language, limit], podcast_from_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(podcasts)
            })
            .await?;
        Ok(podcasts)
    }

    /// Stores the result of a feed download under `url`, creating the podcast
    /// when the URL is not known yet.
    pub async fn save_parsed_feed(&self, url: &str, feed: ParsedFeed) -> Result<Podcast> {
        let url = stored_url(url)?;
        let podcast = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction()?;

                let existing: Option<String> = tx
                    .query_row(
                        "SELECT podcast_id FROM podcast_urls WHERE url = ?1",
                        params![url],
                        |row| row.get(0),
                    )
                    .optional()?;

                let podcast_id = match existing {
                    Some(id) => id,
                    None => {
                        let id = Uuid::new_v4().to_string();
                        tx.execute(
                            "INSERT INTO podcasts (id, created) VALUES (?1, ?2)",
                            params![id, Utc::now().to_rfc3339()],
                        )?;
                        tx.execute(
                            "INSERT INTO podcast_urls (podcast_id, url) VALUES (?1, ?2)",
                            params![id, url],
                        )?;
                        id
                    }
                };

                tx.execute(
                    r#"UPDATE podcasts SET
                           title = COALESCE(?2, title),
                           description = COALESCE(?3, description),
                           language = COALESCE(?4, language),
                           link = COALESCE(?5, link),
                           last_update = ?6
                       WHERE id = ?1"#,
                    params![
                        podcast_id,
                        feed.title,
                        feed.description,
                        feed.language,
                        feed.link,
                        Utc::now().to_rfc3339(),
                    ],
                )?;

                for episode in &feed.episodes {
                    tx.execute(
                        r#"INSERT INTO episodes (podcast_id, guid, title, url, released)
                           VALUES (?1, ?2, ?3, ?4, ?5)
                           ON CONFLICT(podcast_id, guid) DO UPDATE SET
                               title = excluded.title,
                               url = excluded.url,
                               released = excluded.released"#,
                        params![
                            podcast_id,
                            episode.guid,
                            episode.title,
                            episode.url,
                            episode.released.map(|dt| dt.to_rfc3339()),
                        ],
                    )?;
                }

                let podcast = select_podcast(&tx, &podcast_id)?;
                tx.commit()?;
                Ok(podcast)
            })
            .await?;
        Ok(podcast)
    }

    pub async fn get_episodes(&self, podcast_id: &str) -> Result<Vec<Episode>> {
        let podcast_id = podcast_id.to_string();
        let episodes = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    r#"SELECT id, podcast_id, guid, title, url, released FROM episodes
                       WHERE podcast_id = ?1
                       ORDER BY released DESC NULLS LAST, id DESC"#,
                )?;
                let episodes = stmt
                    .query_map(params![podcast_id], episode_from_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(episodes)
            })
            .await?;
        Ok(episodes)
    }

    // Subscription operations

    pub async fn insert_subscription(&self, subscription: NewSubscription) -> Result<i64> {
        let id = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                tx.execute(
                    "INSERT INTO subscriptions (user_id, podcast_id, ref_url) VALUES (?1, ?2, ?3)",
                    params![
                        subscription.user_id,
                        subscription.podcast_id,
                        subscription.ref_url
                    ],
                )?;
                let id = tx.last_insert_rowid();
                tx.execute(
                    r#"UPDATE podcasts SET subscribers =
                           (SELECT COUNT(*) FROM subscriptions WHERE podcast_id = ?1)
                       WHERE id = ?1"#,
                    params![subscription.podcast_id],
                )?;
                tx.commit()?;
                Ok(id)
            })
            .await?;
        Ok(id)
    }

    pub async fn get_subscriptions(&self, user_id: i64) -> Result<Vec<Subscription>> {
        let subscriptions = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, user_id, podcast_id, ref_url, created FROM subscriptions WHERE user_id = ?1 ORDER BY id",
                )?;
                let subscriptions = stmt
                    .query_map(params![user_id], subscription_from_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(subscriptions)
            })
            .await?;
        Ok(subscriptions)
    }

    /// Reference URLs of every subscription whose podcast has no canonical
    /// link, one entry per subscription.
    pub async fn unlinked_subscription_urls(&self) -> Result<Vec<String>> {
        let urls = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare(
                    r#"SELECT s.ref_url FROM subscriptions s
                       JOIN podcasts p ON s.podcast_id = p.id
                       WHERE p.link IS NULL OR p.link = ''
                       ORDER BY s.id"#,
                )?;
                let urls = stmt
                    .query_map([], |row| row.get(0))?
                    .collect::<std::result::Result<Vec<String>, _>>()?;
                Ok(urls)
            })
            .await?;
        Ok(urls)
    }

    // Migration bookkeeping

    pub async fn is_migration_applied(&self, name: &str) -> Result<bool> {
        let name = name.to_string();
        let applied = self
            .conn
            .call(move |conn| {
                let count: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM applied_migrations WHERE name = ?1",
                    params![name],
                    |row| row.get(0),
                )?;
                Ok(count > 0)
            })
            .await?;
        Ok(applied)
    }

    pub async fn record_migration(&self, name: &str) -> Result<()> {
        let name = name.to_string();
        self.conn
            .call(move |conn| {
                conn.execute(
                    "INSERT OR IGNORE INTO applied_migrations (name) VALUES (?1)",
                    params![name],
                )?;
                Ok(())
            })
            .await?;
        Ok(())
    }
}

/// Podcast URLs are stored in normalised form so lookups and inserts agree.
fn stored_url(url: &str) -> Result<String> {
    normalize_url(Some(url)).ok_or_else(|| AppError::InvalidUrl(url.to_string()))
}

fn select_podcast(conn: &rusqlite::Connection, id: &str) -> rusqlite::Result<Podcast> {
    let sql = format!("SELECT {PODCAST_COLUMNS} FROM podcasts p WHERE p.id = ?1");
    conn.query_row(&sql, params![id], podcast_from_row)
}

fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    // SQLite datetime('now') format
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    None
}

fn podcast_from_row(row: &Row) -> rusqlite::Result<Podcast> {
    Ok(Podcast {
        id: row.get(0)?,
        created: row
            .get::<_, String>(1)
            .ok()
            .and_then(|s| parse_datetime(&s))
            .unwrap_or_else(Utc::now),
        title: row.get(2)?,
        description: row.get(3)?,
        language: row.get(4)?,
        link: row.get(5)?,
        last_update: row
            .get::<_, Option<String>>(6)?
            .and_then(|s| parse_datetime(&s)),
        subscribers: row.get(7)?,
    })
}

fn episode_from_row(row: &Row) -> rusqlite::Result<Episode> {
    Ok(Episode {
        id: row.get(0)?,
        podcast_id: row.get(1)?,
        guid: row.get(2)?,
        title: row.get(3)?,
        url: row.get(4)?,
        released: row
            .get::<_, Option<String>>(5)?
            .and_then(|s| parse_datetime(&s)),
    })
}

fn subscription_from_row(row: &Row) -> rusqlite::Result<Subscription> {
    Ok(Subscription {
        id: row.get(0)?,
        user_id: row.get(1)?,
        podcast_id: row.get(2)?,
        ref_url: row.get(3)?,
        created: row
            .get::<_, String>(4)
            .ok()
            .and_then(|s| parse_datetime(&s))
            .unwrap_or_else(Utc::now),
    })
}
