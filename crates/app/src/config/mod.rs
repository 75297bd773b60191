use std::fs;
use std::path::{Path, PathBuf};

use leaderboard_core::{CrewLetter, UnitFilter};
use serde::{Deserialize, Serialize};

use crate::app::AppConfig;
use crate::error::{AppError, Result};
use crate::util::time::{
    DEFAULT_ANCHOR_DATE, DEFAULT_SHIFT_START_HOUR, ShiftCalendar, parse_anchor_date,
};

pub const DEFAULT_STATS_DIR: &str = ".";
pub const DEFAULT_OUT_PATH: &str = "docs/data.json";
pub const STATS_DIR_ENV: &str = "SHIFT_STATS_DIR";
pub const ANCHOR_DATE_ENV: &str = "SHIFT_ANCHOR_DATE";
pub const ANCHOR_LETTER_ENV: &str = "SHIFT_ANCHOR_LETTER";

/// File-level settings. Every field is optional in TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaderboardConfig {
    /// Directory holding `shift_stats_<date>.json` files.
    pub stats_dir: PathBuf,
    /// Output document path.
    pub out: PathBuf,
    /// Local hour at which a new shift day begins.
    pub shift_start_hour: u32,
    /// A day worked by `shift_anchor_letter`, as `YYYY-MM-DD`.
    pub shift_anchor_date: String,
    pub shift_anchor_letter: String,
    /// Units to include. Empty includes every unit.
    pub units: Vec<String>,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            stats_dir: PathBuf::from(DEFAULT_STATS_DIR),
            out: PathBuf::from(DEFAULT_OUT_PATH),
            shift_start_hour: DEFAULT_SHIFT_START_HOUR,
            shift_anchor_date: DEFAULT_ANCHOR_DATE.to_string(),
            shift_anchor_letter: CrewLetter::A.to_string(),
            units: Vec::new(),
        }
    }
}

impl LeaderboardConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|err| AppError::Config(format!("parse config: {}", err)))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|err| AppError::Config(format!("read config {}: {}", path.display(), err)))?;
        toml::from_str(&contents)
            .map_err(|err| AppError::Config(format!("parse config {}: {}", path.display(), err)))
    }

    /// Overlays environment settings using `lookup` (normally `std::env::var`).
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        if let Some(dir) = non_empty(STATS_DIR_ENV) {
            self.stats_dir = PathBuf::from(dir);
        }
        if let Some(date) = non_empty(ANCHOR_DATE_ENV) {
            self.shift_anchor_date = date;
        }
        if let Some(letter) = non_empty(ANCHOR_LETTER_ENV) {
            self.shift_anchor_letter = letter;
        }
    }

    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    pub fn calendar(&self) -> Result<ShiftCalendar> {
        let anchor_date = parse_anchor_date(&self.shift_anchor_date)?;
        let anchor_letter = CrewLetter::parse(&self.shift_anchor_letter).ok_or_else(|| {
            AppError::Config(format!(
                "shift anchor letter must be A, B or C, got {:?}",
                self.shift_anchor_letter
            ))
        })?;
        ShiftCalendar::new(self.shift_start_hour, anchor_date, anchor_letter)
    }

    pub fn unit_filter(&self) -> UnitFilter {
        UnitFilter::new(
            self.units
                .iter()
                .map(|unit| unit.trim())
                .filter(|unit| !unit.is_empty()),
        )
    }

    /// Validates the settings and produces the runtime configuration.
    pub fn resolve(&self) -> Result<AppConfig> {
        Ok(AppConfig {
            stats_dir: self.stats_dir.clone(),
            out_path: self.out.clone(),
            calendar: self.calendar()?,
            filter: self.unit_filter(),
        })
    }
}
