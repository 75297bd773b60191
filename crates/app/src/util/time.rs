use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use leaderboard_core::{CrewLetter, Period, STATS_DATE_FORMAT, shift_day};

use crate::error::{AppError, Result};

pub const DEFAULT_SHIFT_START_HOUR: u32 = 7;
pub const DEFAULT_ANCHOR_DATE: &str = "2025-11-01";

/// Maps wall-clock time onto shift days and crew letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftCalendar {
    pub start_hour: u32,
    pub anchor_date: NaiveDate,
    pub anchor_letter: CrewLetter,
}

impl Default for ShiftCalendar {
    fn default() -> Self {
        Self {
            start_hour: DEFAULT_SHIFT_START_HOUR,
            anchor_date: NaiveDate::from_ymd_opt(2025, 11, 1).unwrap_or_default(),
            anchor_letter: CrewLetter::A,
        }
    }
}

impl ShiftCalendar {
    pub fn new(start_hour: u32, anchor_date: NaiveDate, anchor_letter: CrewLetter) -> Result<Self> {
        if start_hour >= 24 {
            return Err(AppError::Config(format!(
                "shift_start_hour must be below 24, got {}",
                start_hour
            )));
        }
        Ok(Self {
            start_hour,
            anchor_date,
            anchor_letter,
        })
    }

    pub fn shift_day(&self, now: NaiveDateTime) -> NaiveDate {
        shift_day(now, self.start_hour)
    }

    pub fn letter_for(&self, day: NaiveDate) -> CrewLetter {
        CrewLetter::for_day(day, self.anchor_date, self.anchor_letter)
    }

    /// `"A-Shift 11/01/25"`
    pub fn shift_label(&self, day: NaiveDate) -> String {
        format!("{}-Shift {}", self.letter_for(day), day.format("%m/%d/%y"))
    }
}

/// Inclusive window of shift days ending at `end`; `None` means unbounded.
pub fn period_window(period: Period, end: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    let days = period.days()?;
    Some((end - Duration::days(days - 1), end))
}

pub fn in_window(day: NaiveDate, window: Option<(NaiveDate, NaiveDate)>) -> bool {
    match window {
        Some((start, end)) => start <= day && day <= end,
        None => true,
    }
}

/// `"Oct 26 - Nov 01"`
pub fn format_range(start: NaiveDate, end: NaiveDate) -> String {
    format!("{} - {}", start.format("%b %d"), end.format("%b %d"))
}

pub fn format_long_date(day: NaiveDate) -> String {
    day.format("%d %b %Y").to_string()
}

pub fn parse_anchor_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), STATS_DATE_FORMAT).map_err(|err| {
        AppError::Config(format!("invalid shift anchor date {:?}: {}", value, err))
    })
}

pub fn timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}
