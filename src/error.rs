use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Connection(#[from] tokio_rusqlite::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Invalid feed URL: {0}")]
    InvalidUrl(String),
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Failures of a single podcast refresh.
#[derive(Error, Debug)]
pub enum UpdateError {
    #[error("No episodes found in the feed at {0}")]
    NoEpisodes(String),

    #[error("Failed to fetch feed: HTTP {0}")]
    Http(reqwest::StatusCode),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Could not parse feed: {0}")]
    Parse(#[from] feed_rs::parser::ParseFeedError),

    #[error("Storage error: {0}")]
    Storage(#[from] AppError),
}
