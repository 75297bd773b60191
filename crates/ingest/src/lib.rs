mod parser;
mod pipeline;
mod totals;
mod types;

pub use parser::{parse_count, parse_stats_str, parse_stats_value};
pub use pipeline::{read_stats_dir, read_stats_file};
pub use totals::{leaderboard_from_records, rank_scores, shift_breakdown, unit_rows, unit_totals};
pub use types::{IngestError, IngestIssue, IngestStats, Result, StatsScan};
