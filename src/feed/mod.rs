mod fetcher;
mod updater;

pub use fetcher::FeedFetcher;
pub use updater::{update_podcasts, FeedUpdater, PodcastUpdater, UpdateSummary};

#[cfg(test)]
pub mod fixtures;
