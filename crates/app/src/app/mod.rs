use std::path::PathBuf;

use leaderboard_core::UnitFilter;

use crate::error::Result;
use crate::services::{AppServices, RunSummary};
use crate::util::time::ShiftCalendar;

/// Validated settings for one leaderboard run.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub stats_dir: PathBuf,
    pub out_path: PathBuf,
    pub calendar: ShiftCalendar,
    pub filter: UnitFilter,
}

/// Application state shared by frontends.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub services: AppServices,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let services = AppServices::new(&config);
        Self { config, services }
    }

    pub fn refresh_data(&self) -> Result<RunSummary> {
        self.services.leaderboard.run()
    }
}
