use leaderboard_app::{AppConfig, LeaderboardConfig, Result};

use crate::args::CliArgs;

/// Builds the run configuration. Precedence: flags, environment, config file,
/// defaults.
pub fn resolve(args: &CliArgs) -> Result<AppConfig> {
    let mut config = match args.config.as_deref() {
        Some(path) => LeaderboardConfig::load(path)?,
        None => LeaderboardConfig::default(),
    };
    config.apply_env();
    apply_args(&mut config, args);
    config.resolve()
}

fn apply_args(config: &mut LeaderboardConfig, args: &CliArgs) {
    if let Some(stats_dir) = &args.stats_dir {
        config.stats_dir = stats_dir.clone();
    }
    if let Some(out) = &args.out {
        config.out = out.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn flags_override_config_file() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("leaderboard.toml");
        fs::write(
            &path,
            "stats_dir = \"/from/file\"\nout = \"file/data.json\"\nunits = [\"E33\"]\n",
        )
        .expect("write config");

        let mut config = LeaderboardConfig::load(&path).expect("load");
        let args = CliArgs {
            out: Some(PathBuf::from("flag/data.json")),
            ..CliArgs::default()
        };
        apply_args(&mut config, &args);

        assert_eq!(config.stats_dir, PathBuf::from("/from/file"));
        assert_eq!(config.out, PathBuf::from("flag/data.json"));
        assert_eq!(config.units, vec!["E33".to_string()]);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let dir = tempdir().expect("temp dir");
        let args = CliArgs {
            config: Some(dir.path().join("absent.toml")),
            ..CliArgs::default()
        };
        assert!(resolve(&args).is_err());
    }
}
