use std::fs;
use std::io;
use std::path::Path;
use std::time::Instant;

use leaderboard_core::{ShiftRecord, date_from_stats_path, stats_date_segment};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::parser::parse_stats_str;
use crate::types::{IngestError, IngestIssue, IngestStats, Result, StatsScan};

fn is_stats_path(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(stats_date_segment)
        .is_some()
}

fn load_file(path: &Path, file_path: &str) -> Result<(ShiftRecord, u64)> {
    let date = date_from_stats_path(path).ok_or_else(|| IngestError::InvalidRecord {
        file_path: file_path.to_string(),
        message: "file name does not carry a valid shift_stats_<YYYY-MM-DD>.json date".to_string(),
    })?;
    let data = fs::read_to_string(path)?;
    let bytes_read = data.len() as u64;
    let record =
        parse_stats_str(&data, date, file_path).map_err(|message| IngestError::InvalidRecord {
            file_path: file_path.to_string(),
            message,
        })?;
    Ok((record, bytes_read))
}

/// Reads and parses a single stats file.
pub fn read_stats_file(path: &Path) -> Result<ShiftRecord> {
    let file_path = path.to_string_lossy().to_string();
    load_file(path, &file_path).map(|(record, _)| record)
}

/// Reads every `shift_stats_<date>.json` file directly under `stats_dir`,
/// following symlinks.
///
/// Unreadable or malformed files are skipped and reported in
/// [`IngestStats::issues`]. A missing directory yields an empty scan; only a
/// failure to list an existing directory is an error.
pub fn read_stats_dir(stats_dir: &Path) -> Result<StatsScan> {
    let scan_start = Instant::now();
    let mut stats = IngestStats::default();
    let mut records = Vec::new();
    if !stats_dir.is_dir() {
        info!(stats_dir = %stats_dir.display(), "stats dir not found; nothing to read");
        return Ok(StatsScan { records, stats });
    }

    for entry in WalkDir::new(stats_dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                if err.depth() == 0 {
                    return Err(io::Error::from(err).into());
                }
                if let Some(path) = err.path()
                    && !is_stats_path(path)
                {
                    debug!(file = %path.display(), error = %err, "ignoring unreadable entry");
                    continue;
                }
                let file_path = err
                    .path()
                    .map(|path| path.to_string_lossy().to_string())
                    .unwrap_or_else(|| "<unknown>".to_string());
                warn!(file = %file_path, error = %err, "failed to list stats entry");
                stats.files_scanned += 1;
                stats.files_skipped += 1;
                stats.issues.push(IngestIssue {
                    file_path,
                    message: err.to_string(),
                });
                continue;
            }
        };
        let path = entry.path();
        if !entry.file_type().is_file() || !is_stats_path(path) {
            continue;
        }
        stats.files_scanned += 1;
        let file_path = path.to_string_lossy().to_string();
        match load_file(path, &file_path) {
            Ok((record, bytes_read)) => {
                debug!(
                    file = %file_path,
                    date = %record.date,
                    units = record.calls.len(),
                    "read stats file"
                );
                stats.bytes_read = stats.bytes_read.saturating_add(bytes_read);
                stats.records_read += 1;
                records.push(record);
            }
            Err(err) => {
                warn!(file = %file_path, error = %err, "skipping stats file");
                stats.files_skipped += 1;
                stats.issues.push(IngestIssue {
                    file_path,
                    message: err.to_string(),
                });
            }
        }
    }

    records.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.source.cmp(&b.source)));
    debug!(
        elapsed_ms = scan_start.elapsed().as_millis() as u64,
        files = stats.files_scanned,
        bytes = stats.bytes_read,
        "stats scan finished"
    );
    Ok(StatsScan { records, stats })
}
