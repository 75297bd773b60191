mod args;
mod config;

use std::process::ExitCode;

use clap::Parser;
use leaderboard_app::AppState;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use args::CliArgs;

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = match config::resolve(&args) {
        Ok(config) => config,
        Err(err) => {
            error!("invalid configuration: {}", err);
            return ExitCode::from(2);
        }
    };
    debug!(
        stats_dir = %config.stats_dir.display(),
        out = %config.out_path.display(),
        shift_start_hour = config.calendar.start_hour,
        "resolved configuration"
    );

    let state = AppState::new(config);
    match state.refresh_data() {
        Ok(summary) => {
            if summary.no_data {
                info!("no shift stats found; wrote empty leaderboard");
            }
            for issue in &summary.stats.issues {
                debug!(file = %issue.file_path, "{}", issue.message);
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("failed to publish leaderboard: {}", err);
            ExitCode::FAILURE
        }
    }
}
