use std::sync::Arc;

use crate::config::AppConfig;
use crate::scrape::LeaderboardSource;

#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn LeaderboardSource>,
    pub config: Arc<AppConfig>,
}
