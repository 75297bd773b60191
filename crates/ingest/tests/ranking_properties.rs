use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use ingest::{leaderboard_from_records, rank_scores};
use leaderboard_core::{ShiftRecord, UnitFilter};
use proptest::collection::{btree_map, vec};
use proptest::prelude::*;

fn records_from(days: Vec<BTreeMap<String, u64>>) -> Vec<ShiftRecord> {
    let start = NaiveDate::from_ymd_opt(2025, 1, 1).expect("start date");
    days.into_iter()
        .enumerate()
        .map(|(offset, calls)| {
            let date = start + Duration::days(offset as i64);
            ShiftRecord {
                date,
                source: format!("shift_stats_{date}.json"),
                calls,
                ..ShiftRecord::default()
            }
        })
        .collect()
}

fn days_strategy() -> impl Strategy<Value = Vec<BTreeMap<String, u64>>> {
    vec(btree_map("[A-F][0-9]?", 0u64..500, 0..6), 0..10)
}

proptest! {
    #[test]
    fn total_score_equals_sum_of_inputs(days in days_strategy()) {
        let expected: u64 = days.iter().flat_map(|calls| calls.values()).sum();
        let records = records_from(days);
        let snapshot = leaderboard_from_records(
            &records,
            &UnitFilter::default(),
            0,
            "2025-01-01T00:00:00.000Z".to_string(),
        );
        prop_assert_eq!(snapshot.total_score, expected);
        prop_assert_eq!(snapshot.ranking.iter().map(|entry| entry.score).sum::<u64>(), expected);
        prop_assert_eq!(snapshot.total_records, records.len());
        prop_assert_eq!(snapshot.no_data, records.is_empty());
    }

    #[test]
    fn ranking_is_sorted_by_score_then_name(days in days_strategy()) {
        let records = records_from(days);
        let ranking = rank_scores(&records, &UnitFilter::default());
        for pair in ranking.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            prop_assert!(a.score > b.score || (a.score == b.score && a.name < b.name));
        }
    }

    #[test]
    fn ranking_ignores_record_order(days in days_strategy()) {
        let records = records_from(days);
        let forward = rank_scores(&records, &UnitFilter::default());
        let backward = rank_scores(records.iter().rev(), &UnitFilter::default());
        prop_assert_eq!(&forward, &backward);
        prop_assert_eq!(forward, rank_scores(&records, &UnitFilter::default()));
    }
}
