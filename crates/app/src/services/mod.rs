mod leaderboard;

use std::sync::Arc;

use crate::app::AppConfig;

pub use leaderboard::{LeaderboardService, RunSummary};

type SharedConfig = Arc<AppConfig>;

/// Service registry for app-level operations.
#[derive(Clone)]
pub struct AppServices {
    pub leaderboard: LeaderboardService,
}

impl AppServices {
    pub fn new(config: &AppConfig) -> Self {
        let shared = Arc::new(config.clone());
        Self {
            leaderboard: LeaderboardService::new(shared),
        }
    }
}
