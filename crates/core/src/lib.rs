use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

pub const STATS_FILE_PREFIX: &str = "shift_stats_";
pub const STATS_FILE_SUFFIX: &str = ".json";
pub const STATS_DATE_FORMAT: &str = "%Y-%m-%d";

/// One parsed `shift_stats_<date>.json` file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftRecord {
    pub date: NaiveDate,
    pub source: String,
    /// Unit name to run count; this is the leaderboard score.
    pub calls: BTreeMap<String, u64>,
    pub dur_sec: BTreeMap<String, u64>,
    pub after_0000: BTreeMap<String, u64>,
    pub max_sec: BTreeMap<String, u64>,
}

impl ShiftRecord {
    pub fn total_calls(&self) -> u64 {
        self.calls
            .values()
            .fold(0u64, |acc, value| acc.saturating_add(*value))
    }

    /// Every unit mentioned by any of the record's maps.
    pub fn units(&self) -> BTreeSet<&str> {
        self.calls
            .keys()
            .chain(self.dur_sec.keys())
            .chain(self.after_0000.keys())
            .chain(self.max_sec.keys())
            .map(String::as_str)
            .collect()
    }
}

/// Per-unit aggregate over a window of shift days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitStats {
    pub calls: u64,
    pub dur_sec: u64,
    pub after_0000: u64,
    pub max_sec: u64,
}

impl UnitStats {
    pub fn avg_min(&self) -> f64 {
        if self.calls == 0 {
            return 0.0;
        }
        round_tenths(self.dur_sec as f64 / self.calls as f64 / 60.0)
    }

    pub fn max_min(&self) -> f64 {
        round_tenths(self.max_sec as f64 / 60.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankEntry {
    pub name: String,
    pub score: u64,
}

/// Ranked summary of every record folded into a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardSnapshot {
    pub generated_at: String,
    pub total_records: usize,
    pub total_score: u64,
    pub skipped_files: usize,
    /// Set when nothing was folded in; the viewer renders "no data".
    pub no_data: bool,
    pub ranking: Vec<RankEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Day,
    Week,
    Month,
    Year,
    #[serde(rename = "alltime")]
    AllTime,
}

impl Period {
    /// Window length in shift days, `None` for all-time.
    pub fn days(self) -> Option<i64> {
        match self {
            Self::Day => Some(1),
            Self::Week => Some(7),
            Self::Month => Some(30),
            Self::Year => Some(365),
            Self::AllTime => None,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
            Self::AllTime => "alltime",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Day => "Daily",
            Self::Week => "Weekly",
            Self::Month => "Monthly",
            Self::Year => "Yearly",
            Self::AllTime => "All-time",
        }
    }
}

/// Crew rotation label. Crews work consecutive shift days in A, B, C order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CrewLetter {
    A,
    B,
    C,
}

impl CrewLetter {
    pub const ALL: [CrewLetter; 3] = [CrewLetter::A, CrewLetter::B, CrewLetter::C];

    pub fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
            Self::C => 2,
        }
    }

    pub fn from_index(index: usize) -> Self {
        match index % 3 {
            0 => Self::A,
            1 => Self::B,
            _ => Self::C,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "A" => Some(Self::A),
            "B" => Some(Self::B),
            "C" => Some(Self::C),
            _ => None,
        }
    }

    /// Letter of the crew on `day`, given the crew working `anchor`.
    pub fn for_day(day: NaiveDate, anchor: NaiveDate, anchor_letter: CrewLetter) -> Self {
        let delta = day.signed_duration_since(anchor).num_days();
        let offset = delta.rem_euclid(3) as usize;
        Self::from_index(anchor_letter.index() + offset)
    }
}

impl fmt::Display for CrewLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
        };
        f.write_str(letter)
    }
}

/// Optional allow-list of unit names. Empty accepts everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitFilter {
    allow: BTreeSet<String>,
}

impl UnitFilter {
    pub fn new<I, S>(units: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allow: units.into_iter().map(Into::into).collect(),
        }
    }

    pub fn accepts(&self, unit: &str) -> bool {
        self.allow.is_empty() || self.allow.contains(unit)
    }
}

/// Row of a plain period board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitRow {
    pub unit: String,
    pub calls: u64,
    pub avg_min: f64,
    pub after_0000: u64,
    pub max_min: f64,
}

/// Row of a week/month board split by crew letter (A, B, C order).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftRow {
    pub unit: String,
    pub calls_abc: [u64; 3],
    pub calls_max_abc: [u64; 3],
    pub avg_min_abc: [f64; 3],
    pub max_min_abc: [f64; 3],
    pub after_abc: [u64; 3],
    pub after_max_abc: [u64; 3],
    pub total_calls: u64,
    pub total_after: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BoardRows {
    Units(Vec<UnitRow>),
    Shifts(Vec<ShiftRow>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodBoard {
    pub label: String,
    pub period: Period,
    pub text: String,
    pub rows: BoardRows,
    pub meta: BTreeMap<String, String>,
    pub updated: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodBoards {
    pub today: PeriodBoard,
    pub prior: PeriodBoard,
    pub week: PeriodBoard,
    pub month: PeriodBoard,
}

/// The document written for the static viewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardDocument {
    #[serde(flatten)]
    pub snapshot: LeaderboardSnapshot,
    pub periods: PeriodBoards,
}

/// Rounds to one decimal place, ties to even on the exact binary value, so
/// 0.25 becomes 0.2 and 21/60 becomes 0.3.
pub fn round_tenths(value: f64) -> f64 {
    format!("{value:.1}").parse().unwrap_or(value)
}

pub fn stats_file_name(date: NaiveDate) -> String {
    format!(
        "{STATS_FILE_PREFIX}{}{STATS_FILE_SUFFIX}",
        date.format(STATS_DATE_FORMAT)
    )
}

/// Returns the `YYYY-MM-DD` segment when `file_name` has the stats file shape.
/// The segment is only checked for shape, not calendar validity.
pub fn stats_date_segment(file_name: &str) -> Option<&str> {
    let segment = file_name
        .strip_prefix(STATS_FILE_PREFIX)?
        .strip_suffix(STATS_FILE_SUFFIX)?;
    let bytes = segment.as_bytes();
    if bytes.len() != 10 {
        return None;
    }
    let shaped = bytes.iter().enumerate().all(|(index, byte)| match index {
        4 | 7 => *byte == b'-',
        _ => byte.is_ascii_digit(),
    });
    shaped.then_some(segment)
}

pub fn date_from_stats_path(path: &Path) -> Option<NaiveDate> {
    let name = path.file_name()?.to_str()?;
    let segment = stats_date_segment(name)?;
    NaiveDate::parse_from_str(segment, STATS_DATE_FORMAT).ok()
}

/// Shift day that `now` falls in. Times before `start_hour` belong to the
/// previous day's shift.
pub fn shift_day(now: NaiveDateTime, start_hour: u32) -> NaiveDate {
    let date = now.date();
    if now.hour() >= start_hour {
        date
    } else {
        date - Duration::days(1)
    }
}
