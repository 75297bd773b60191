use leaderboard_core::ShiftRecord;
use serde::Serialize;
use std::io;

/// Scan summary returned after reading a stats directory.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestStats {
    pub files_scanned: usize,
    pub files_skipped: usize,
    pub records_read: usize,
    pub bytes_read: u64,
    pub issues: Vec<IngestIssue>,
}

/// Non-fatal issues encountered while reading stats files.
#[derive(Debug, Clone, Serialize)]
pub struct IngestIssue {
    pub file_path: String,
    pub message: String,
}

/// Records read from a stats directory, ordered by date then path.
#[derive(Debug, Clone, Default)]
pub struct StatsScan {
    pub records: Vec<ShiftRecord>,
    pub stats: IngestStats,
}

/// Errors emitted by the stats reader.
#[derive(Debug)]
pub enum IngestError {
    Io(io::Error),
    InvalidRecord { file_path: String, message: String },
}

impl std::fmt::Display for IngestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io error: {}", err),
            Self::InvalidRecord { file_path, message } => {
                write!(f, "invalid stats file {}: {}", file_path, message)
            }
        }
    }
}

impl std::error::Error for IngestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::InvalidRecord { .. } => None,
        }
    }
}

impl From<io::Error> for IngestError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
