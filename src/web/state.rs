use std::sync::Arc;

use crate::config::Config;
use crate::db::Repository;
use crate::feed::PodcastUpdater;

#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<Repository>,
    pub updater: Arc<dyn PodcastUpdater>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(
        repository: Arc<Repository>,
        updater: Arc<dyn PodcastUpdater>,
        config: Config,
    ) -> Self {
        Self {
            repository,
            updater,
            config: Arc::new(config),
        }
    }
}
