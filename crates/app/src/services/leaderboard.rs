use std::path::PathBuf;

use chrono::{DateTime, Local, NaiveDateTime, Utc};
use ingest::{IngestStats, StatsScan, leaderboard_from_records, read_stats_dir};
use leaderboard_core::LeaderboardDocument;
use serde::Serialize;
use tracing::{info, warn};

use crate::boards::{BoardContext, period_boards};
use crate::error::Result;
use crate::publish::write_snapshot_atomic;
use crate::services::SharedConfig;
use crate::util::time::timestamp;

/// Outcome of one read-reduce-write run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub out_path: PathBuf,
    pub total_records: usize,
    pub total_score: u64,
    pub no_data: bool,
    pub stats: IngestStats,
}

#[derive(Clone)]
pub struct LeaderboardService {
    config: SharedConfig,
}

impl LeaderboardService {
    pub(super) fn new(config: SharedConfig) -> Self {
        Self { config }
    }

    pub fn scan(&self) -> Result<StatsScan> {
        Ok(read_stats_dir(&self.config.stats_dir)?)
    }

    /// Reduces `scan` into the viewer document. `now` is local wall-clock
    /// time and selects the current shift day.
    pub fn build(
        &self,
        scan: &StatsScan,
        now: NaiveDateTime,
        generated_at: DateTime<Utc>,
    ) -> LeaderboardDocument {
        let generated_at = timestamp(generated_at);
        let snapshot = leaderboard_from_records(
            &scan.records,
            &self.config.filter,
            scan.stats.files_skipped,
            generated_at.clone(),
        );
        let ctx = BoardContext {
            records: &scan.records,
            filter: &self.config.filter,
            calendar: &self.config.calendar,
            today: self.config.calendar.shift_day(now),
            updated: &generated_at,
        };
        LeaderboardDocument {
            snapshot,
            periods: period_boards(&ctx),
        }
    }

    pub fn run(&self) -> Result<RunSummary> {
        self.run_at(Local::now().naive_local(), Utc::now())
    }

    pub fn run_at(&self, now: NaiveDateTime, generated_at: DateTime<Utc>) -> Result<RunSummary> {
        let scan = self.scan()?;
        if scan.stats.files_skipped > 0 {
            warn!(
                skipped = scan.stats.files_skipped,
                "some stats files were skipped"
            );
        }
        let document = self.build(&scan, now, generated_at);
        write_snapshot_atomic(&self.config.out_path, &document)?;

        info!(
            out = %self.config.out_path.display(),
            records = document.snapshot.total_records,
            skipped = document.snapshot.skipped_files,
            units = document.snapshot.ranking.len(),
            "leaderboard written"
        );
        Ok(RunSummary {
            out_path: self.config.out_path.clone(),
            total_records: document.snapshot.total_records,
            total_score: document.snapshot.total_score,
            no_data: document.snapshot.no_data,
            stats: scan.stats,
        })
    }
}
