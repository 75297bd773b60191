use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use ingest::{shift_breakdown, unit_rows, unit_totals};
use leaderboard_core::{
    BoardRows, Period, PeriodBoard, PeriodBoards, ShiftRecord, UnitFilter, UnitRow,
};

use crate::util::time::{ShiftCalendar, format_long_date, format_range, in_window, period_window};

const NO_RUNS_LINE: &str = "No runs recorded.";

/// Inputs shared by every board of one run.
#[derive(Debug, Clone, Copy)]
pub struct BoardContext<'a> {
    pub records: &'a [ShiftRecord],
    pub filter: &'a UnitFilter,
    pub calendar: &'a ShiftCalendar,
    /// Shift day the run falls in.
    pub today: NaiveDate,
    pub updated: &'a str,
}

impl BoardContext<'_> {
    fn select(&self, window: Option<(NaiveDate, NaiveDate)>) -> Vec<&ShiftRecord> {
        self.records
            .iter()
            .filter(|record| in_window(record.date, window))
            .collect()
    }
}

fn board_header(label: &str, window: Option<(NaiveDate, NaiveDate)>, end: NaiveDate) -> String {
    match window {
        None => format!("{} runs through {}", label, format_long_date(end)),
        Some((start, end)) if start == end => format!("{} runs {}", label, format_long_date(end)),
        Some((start, end)) => format!(
            "{} runs {} - {}",
            label,
            format_long_date(start),
            format_long_date(end)
        ),
    }
}

fn board_text(header: String, rows: &[UnitRow]) -> String {
    let mut lines = vec![header];
    if rows.is_empty() {
        lines.push(NO_RUNS_LINE.to_string());
    }
    for row in rows {
        lines.push(format!(
            "{}: {}  |  avg {:.1} min  |  after 00:00: {}",
            row.unit, row.calls, row.avg_min, row.after_0000
        ));
    }
    lines.join("\n")
}

/// Board for a window ending at the current shift day. Week and month boards
/// carry rows split by crew letter.
pub fn period_board(ctx: &BoardContext<'_>, period: Period) -> PeriodBoard {
    let window = period_window(period, ctx.today);
    let selected = ctx.select(window);
    let totals = unit_totals(selected.iter().copied(), ctx.filter);
    let plain_rows = unit_rows(&totals);
    let text = board_text(board_header(period.label(), window, ctx.today), &plain_rows);

    let mut meta = BTreeMap::new();
    let rows = match period {
        Period::Week | Period::Month => {
            if let Some((start, end)) = window {
                meta.insert("range".to_string(), format_range(start, end));
            }
            BoardRows::Shifts(shift_breakdown(
                selected.iter().copied(),
                ctx.filter,
                |day| ctx.calendar.letter_for(day),
            ))
        }
        Period::Day => {
            meta.insert(
                "shift_date".to_string(),
                ctx.calendar.shift_label(ctx.today),
            );
            BoardRows::Units(plain_rows)
        }
        Period::Year | Period::AllTime => BoardRows::Units(plain_rows),
    };

    PeriodBoard {
        label: period.label().to_string(),
        period,
        text,
        rows,
        meta,
        updated: ctx.updated.to_string(),
    }
}

/// Daily board for the shift day before the current one.
pub fn prior_board(ctx: &BoardContext<'_>) -> PeriodBoard {
    let day = ctx.today - Duration::days(1);
    let window = Some((day, day));
    let selected = ctx.select(window);
    let totals = unit_totals(selected.iter().copied(), ctx.filter);
    let rows = unit_rows(&totals);
    let text = board_text(board_header(Period::Day.label(), window, day), &rows);

    let mut meta = BTreeMap::new();
    meta.insert("shift_date".to_string(), ctx.calendar.shift_label(day));
    PeriodBoard {
        label: Period::Day.label().to_string(),
        period: Period::Day,
        text,
        rows: BoardRows::Units(rows),
        meta,
        updated: ctx.updated.to_string(),
    }
}

pub fn period_boards(ctx: &BoardContext<'_>) -> PeriodBoards {
    PeriodBoards {
        today: period_board(ctx, Period::Day),
        prior: prior_board(ctx),
        week: period_board(ctx, Period::Week),
        month: period_board(ctx, Period::Month),
    }
}
