use std::path::PathBuf;

use clap::Parser;

/// Aggregates shift_stats_<date>.json files into the leaderboard document.
#[derive(Debug, Default, Parser)]
#[command(name = "shift-leaderboard", version, about, long_about = None)]
pub struct CliArgs {
    /// TOML config file; its values sit below flags and environment.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory containing shift_stats_*.json files.
    #[arg(long, env = "SHIFT_STATS_DIR")]
    pub stats_dir: Option<PathBuf>,

    /// Output path for the leaderboard document.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error). RUST_LOG takes precedence.
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
