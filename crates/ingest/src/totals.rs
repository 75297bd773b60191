use std::collections::BTreeMap;

use chrono::NaiveDate;
use leaderboard_core::{
    CrewLetter, LeaderboardSnapshot, RankEntry, ShiftRecord, ShiftRow, UnitFilter, UnitRow,
    UnitStats, round_tenths,
};

/// Sums each unit's calls across `records` and ranks them by descending
/// score, ties broken by ascending name.
pub fn rank_scores<'a, I>(records: I, filter: &UnitFilter) -> Vec<RankEntry>
where
    I: IntoIterator<Item = &'a ShiftRecord>,
{
    let mut scores: BTreeMap<&str, u64> = BTreeMap::new();
    for record in records {
        for (unit, count) in &record.calls {
            if !filter.accepts(unit) {
                continue;
            }
            let score = scores.entry(unit.as_str()).or_default();
            *score = score.saturating_add(*count);
        }
    }

    let mut ranking = scores
        .into_iter()
        .map(|(name, score)| RankEntry {
            name: name.to_string(),
            score,
        })
        .collect::<Vec<_>>();
    ranking.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.name.cmp(&b.name)));
    ranking
}

pub fn leaderboard_from_records(
    records: &[ShiftRecord],
    filter: &UnitFilter,
    skipped_files: usize,
    generated_at: String,
) -> LeaderboardSnapshot {
    let ranking = rank_scores(records, filter);
    let total_score = ranking
        .iter()
        .fold(0u64, |acc, entry| acc.saturating_add(entry.score));
    LeaderboardSnapshot {
        generated_at,
        total_records: records.len(),
        total_score,
        skipped_files,
        no_data: records.is_empty(),
        ranking,
    }
}

/// Per-unit totals for every unit listed in a record's `calls`, including
/// zero counts. Calls, durations and after-midnight counts are summed, the
/// longest run is the maximum.
pub fn unit_totals<'a, I>(records: I, filter: &UnitFilter) -> BTreeMap<String, UnitStats>
where
    I: IntoIterator<Item = &'a ShiftRecord>,
{
    let mut totals: BTreeMap<String, UnitStats> = BTreeMap::new();
    for record in records {
        for unit in record.calls.keys() {
            if !filter.accepts(unit) {
                continue;
            }
            let entry = totals.entry(unit.to_string()).or_default();
            entry.calls = entry.calls.saturating_add(count(&record.calls, unit));
            entry.dur_sec = entry.dur_sec.saturating_add(count(&record.dur_sec, unit));
            entry.after_0000 = entry
                .after_0000
                .saturating_add(count(&record.after_0000, unit));
            entry.max_sec = entry.max_sec.max(count(&record.max_sec, unit));
        }
    }
    totals
}

/// Board rows, busiest first.
pub fn unit_rows(totals: &BTreeMap<String, UnitStats>) -> Vec<UnitRow> {
    let mut rows = totals
        .iter()
        .map(|(unit, stats)| UnitRow {
            unit: unit.clone(),
            calls: stats.calls,
            avg_min: stats.avg_min(),
            after_0000: stats.after_0000,
            max_min: stats.max_min(),
        })
        .collect::<Vec<_>>();
    rows.sort_by(|a, b| b.calls.cmp(&a.calls).then_with(|| a.unit.cmp(&b.unit)));
    rows
}

#[derive(Debug, Default)]
struct CrewTotals {
    sum_calls: [u64; 3],
    max_calls: [u64; 3],
    sum_dur: [u64; 3],
    max_dur: [u64; 3],
    sum_after: [u64; 3],
    max_after: [u64; 3],
}

impl CrewTotals {
    fn add(&mut self, letter: CrewLetter, stats: UnitStats) {
        let slot = letter.index();
        self.sum_calls[slot] = self.sum_calls[slot].saturating_add(stats.calls);
        self.max_calls[slot] = self.max_calls[slot].max(stats.calls);
        self.sum_dur[slot] = self.sum_dur[slot].saturating_add(stats.dur_sec);
        self.max_dur[slot] = self.max_dur[slot].max(stats.max_sec);
        self.sum_after[slot] = self.sum_after[slot].saturating_add(stats.after_0000);
        self.max_after[slot] = self.max_after[slot].max(stats.after_0000);
    }

    fn into_row(self, unit: String) -> ShiftRow {
        let avg_min_abc = std::array::from_fn(|slot| {
            let calls = self.sum_calls[slot];
            if calls == 0 {
                0.0
            } else {
                round_tenths(self.sum_dur[slot] as f64 / calls as f64 / 60.0)
            }
        });
        let max_min_abc = self.max_dur.map(|seconds| round_tenths(seconds as f64 / 60.0));
        ShiftRow {
            unit,
            total_calls: self.sum_calls.iter().sum(),
            total_after: self.sum_after.iter().sum(),
            calls_abc: self.sum_calls,
            calls_max_abc: self.max_calls,
            avg_min_abc,
            max_min_abc,
            after_abc: self.sum_after,
            after_max_abc: self.max_after,
        }
    }
}

/// Splits each unit's activity by the crew letter working each record's day.
pub fn shift_breakdown<'a, I, F>(records: I, filter: &UnitFilter, letter_of: F) -> Vec<ShiftRow>
where
    I: IntoIterator<Item = &'a ShiftRecord>,
    F: Fn(NaiveDate) -> CrewLetter,
{
    let mut crews: BTreeMap<String, CrewTotals> = BTreeMap::new();
    for record in records {
        let letter = letter_of(record.date);
        for unit in record.units() {
            if !filter.accepts(unit) {
                continue;
            }
            let stats = UnitStats {
                calls: count(&record.calls, unit),
                dur_sec: count(&record.dur_sec, unit),
                after_0000: count(&record.after_0000, unit),
                max_sec: count(&record.max_sec, unit),
            };
            crews.entry(unit.to_string()).or_default().add(letter, stats);
        }
    }

    let mut rows = crews
        .into_iter()
        .map(|(unit, totals)| totals.into_row(unit))
        .collect::<Vec<_>>();
    rows.sort_by(|a, b| {
        b.total_calls
            .cmp(&a.total_calls)
            .then_with(|| a.unit.cmp(&b.unit))
    });
    rows
}

fn count(map: &BTreeMap<String, u64>, unit: &str) -> u64 {
    map.get(unit).copied().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, calls: &[(&str, u64)]) -> ShiftRecord {
        ShiftRecord {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").expect("date"),
            source: format!("shift_stats_{date}.json"),
            calls: calls
                .iter()
                .map(|(unit, count)| (unit.to_string(), *count))
                .collect(),
            ..ShiftRecord::default()
        }
    }

    fn entry(name: &str, score: u64) -> RankEntry {
        RankEntry {
            name: name.to_string(),
            score,
        }
    }

    #[test]
    fn rank_scores_sums_across_records() {
        let records = vec![
            record("2025-11-01", &[("A", 5), ("B", 3)]),
            record("2025-11-02", &[("A", 2), ("B", 3)]),
        ];
        let ranking = rank_scores(&records, &UnitFilter::default());
        assert_eq!(ranking, vec![entry("A", 7), entry("B", 6)]);
    }

    #[test]
    fn rank_scores_breaks_ties_by_name() {
        let records = vec![
            record("2025-11-01", &[("R33", 4), ("E33", 1)]),
            record("2025-11-02", &[("E33", 3), ("T33", 4)]),
        ];
        let ranking = rank_scores(&records, &UnitFilter::default());
        assert_eq!(
            ranking,
            vec![entry("E33", 4), entry("R33", 4), entry("T33", 4)]
        );
    }

    #[test]
    fn rank_scores_applies_filter() {
        let records = vec![record("2025-11-01", &[("GENERAL", 9), ("E33", 1)])];
        let ranking = rank_scores(&records, &UnitFilter::new(["E33"]));
        assert_eq!(ranking, vec![entry("E33", 1)]);
    }

    #[test]
    fn empty_input_marks_no_data() {
        let snapshot = leaderboard_from_records(
            &[],
            &UnitFilter::default(),
            2,
            "2025-11-01T00:00:00.000Z".to_string(),
        );
        assert!(snapshot.no_data);
        assert_eq!(snapshot.total_records, 0);
        assert_eq!(snapshot.total_score, 0);
        assert_eq!(snapshot.skipped_files, 2);
        assert!(snapshot.ranking.is_empty());
    }

    #[test]
    fn unit_totals_sums_and_keeps_max() {
        let mut first = record("2025-11-01", &[("E33", 2)]);
        first.dur_sec.insert("E33".to_string(), 600);
        first.max_sec.insert("E33".to_string(), 400);
        first.after_0000.insert("E33".to_string(), 1);
        let mut second = record("2025-11-02", &[("E33", 1)]);
        second.dur_sec.insert("E33".to_string(), 300);
        second.max_sec.insert("E33".to_string(), 300);
        let totals = unit_totals([&first, &second], &UnitFilter::default());
        let stats = totals.get("E33").expect("E33");
        assert_eq!(stats.calls, 3);
        assert_eq!(stats.dur_sec, 900);
        assert_eq!(stats.max_sec, 400);
        assert_eq!(stats.after_0000, 1);

        let rows = unit_rows(&totals);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].avg_min, 5.0);
        assert_eq!(rows[0].max_min, 6.7);
    }

    #[test]
    fn unit_rows_list_every_unit_in_calls() {
        let mut day = record("2025-11-01", &[("E33", 1), ("T33", 0)]);
        day.dur_sec.insert("R33".to_string(), 60);
        let totals = unit_totals([&day], &UnitFilter::default());
        assert!(!totals.contains_key("R33"));
        let rows = unit_rows(&totals);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].unit, "E33");
        assert_eq!(rows[1].unit, "T33");
        assert_eq!(rows[1].calls, 0);
        assert_eq!(rows[1].avg_min, 0.0);
    }

    #[test]
    fn shift_breakdown_splits_by_letter() {
        let mut a_day = record("2025-11-01", &[("E33", 2), ("R33", 1)]);
        a_day.dur_sec.insert("E33".to_string(), 240);
        a_day.max_sec.insert("E33".to_string(), 180);
        let b_day = record("2025-11-02", &[("E33", 3)]);
        let next_a_day = record("2025-11-04", &[("E33", 4)]);
        let anchor = NaiveDate::from_ymd_opt(2025, 11, 1).expect("anchor");
        let rows = shift_breakdown(
            [&a_day, &b_day, &next_a_day],
            &UnitFilter::default(),
            |day| CrewLetter::for_day(day, anchor, CrewLetter::A),
        );

        assert_eq!(rows.len(), 2);
        let e33 = &rows[0];
        assert_eq!(e33.unit, "E33");
        assert_eq!(e33.calls_abc, [6, 3, 0]);
        assert_eq!(e33.calls_max_abc, [4, 3, 0]);
        assert_eq!(e33.avg_min_abc, [0.7, 0.0, 0.0]);
        assert_eq!(e33.max_min_abc, [3.0, 0.0, 0.0]);
        assert_eq!(e33.total_calls, 9);
        assert_eq!(rows[1].unit, "R33");
        assert_eq!(rows[1].calls_abc, [1, 0, 0]);
    }
}
