pub const SCHEMA: &str = r#"
PRAGMA foreign_keys = ON;

-- podcasts table
CREATE TABLE IF NOT EXISTS podcasts (
    id TEXT PRIMARY KEY,
    title TEXT,
    description TEXT,
    language TEXT,
    link TEXT,
    last_update TEXT,
    subscribers INTEGER NOT NULL DEFAULT 0,
    created TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_podcasts_language ON podcasts(language);
CREATE INDEX IF NOT EXISTS idx_podcasts_subscribers ON podcasts(subscribers DESC);

-- podcast_urls table (a feed can be known under several addresses)
CREATE TABLE IF NOT EXISTS podcast_urls (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    podcast_id TEXT NOT NULL REFERENCES podcasts(id) ON DELETE CASCADE,
    url TEXT NOT NULL UNIQUE,
    created TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_podcast_urls_podcast_id ON podcast_urls(podcast_id);

-- episodes table
CREATE TABLE IF NOT EXISTS episodes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    podcast_id TEXT NOT NULL REFERENCES podcasts(id) ON DELETE CASCADE,
    guid TEXT NOT NULL,
    title TEXT NOT NULL,
    url TEXT,
    released TEXT,
    UNIQUE(podcast_id, guid)
);

CREATE INDEX IF NOT EXISTS idx_episodes_released ON episodes(released DESC);

-- subscriptions table
CREATE TABLE IF NOT EXISTS subscriptions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    podcast_id TEXT NOT NULL REFERENCES podcasts(id) ON DELETE CASCADE,
    ref_url TEXT NOT NULL,
    created TEXT NOT NULL DEFAULT (datetime('now')),
    UNIQUE(user_id, podcast_id)
);

CREATE INDEX IF NOT EXISTS idx_subscriptions_podcast_id ON subscriptions(podcast_id);

-- applied_migrations table (data migrations run once per database)
CREATE TABLE IF NOT EXISTS applied_migrations (
    name TEXT PRIMARY KEY,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;
