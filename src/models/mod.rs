mod feed_url;
mod podcast;
mod subscription;

pub use feed_url::normalize_url;
pub use podcast::{Episode, NewEpisode, NewPodcast, ParsedFeed, Podcast};
pub use subscription::{NewSubscription, Subscription};
