pub mod app;
pub mod boards;
pub mod config;
pub mod error;
pub mod publish;
pub mod services;
pub mod util;

pub use app::{AppConfig, AppState};
pub use config::LeaderboardConfig;
pub use error::{AppError, Result};
pub use publish::write_snapshot_atomic;
pub use services::{AppServices, LeaderboardService, RunSummary};
pub use util::time::ShiftCalendar;
