use std::collections::BTreeMap;

use chrono::NaiveDate;
use leaderboard_core::ShiftRecord;
use serde_json::{Map, Value};

const CALLS_FIELD: &str = "calls";
const DUR_FIELD: &str = "dur_sec";
const AFTER_MIDNIGHT_FIELD: &str = "after_0000";
const MAX_FIELD: &str = "max_sec";
const SECTION_FIELDS: [&str; 4] = [CALLS_FIELD, DUR_FIELD, AFTER_MIDNIGHT_FIELD, MAX_FIELD];

/// Accepts non-negative integers, including floats with no fractional part.
pub fn parse_count(value: &Value) -> Option<u64> {
    if let Some(count) = value.as_u64() {
        return Some(count);
    }
    let float = value.as_f64()?;
    if float >= 0.0 && float.fract() == 0.0 && float <= u64::MAX as f64 {
        Some(float as u64)
    } else {
        None
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn count_entry(field: &str, unit: &str, value: &Value) -> Result<u64, String> {
    parse_count(value).ok_or_else(|| {
        format!(
            "{}{}: expected a non-negative integer, got {}",
            field, unit, value
        )
    })
}

fn parse_section(obj: &Map<String, Value>, field: &str) -> Result<BTreeMap<String, u64>, String> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(BTreeMap::new()),
        Some(Value::Object(section)) => section
            .iter()
            .map(|(unit, value)| {
                count_entry(&format!("{field}."), unit, value).map(|count| (unit.clone(), count))
            })
            .collect(),
        Some(other) => Err(format!("{}: expected an object, got {}", field, kind_of(other))),
    }
}

fn is_sectioned(obj: &Map<String, Value>) -> bool {
    SECTION_FIELDS
        .iter()
        .any(|field| matches!(obj.get(*field), Some(Value::Object(_))))
}

/// Parses a stats document. Two shapes are accepted: the bot's sectioned
/// format (`calls`, `dur_sec`, `after_0000`, `max_sec`) where `calls` is
/// required, and a flat object of unit name to count where non-numeric
/// values are metadata.
pub fn parse_stats_value(value: &Value, date: NaiveDate, source: &str) -> Result<ShiftRecord, String> {
    let Some(obj) = value.as_object() else {
        return Err(format!("expected a JSON object, got {}", kind_of(value)));
    };

    let mut record = ShiftRecord {
        date,
        source: source.to_string(),
        ..ShiftRecord::default()
    };

    if is_sectioned(obj) {
        if !matches!(obj.get(CALLS_FIELD), Some(Value::Object(_))) {
            return Err(format!("missing required field {}", CALLS_FIELD));
        }
        record.calls = parse_section(obj, CALLS_FIELD)?;
        record.dur_sec = parse_section(obj, DUR_FIELD)?;
        record.after_0000 = parse_section(obj, AFTER_MIDNIGHT_FIELD)?;
        record.max_sec = parse_section(obj, MAX_FIELD)?;
        return Ok(record);
    }

    for (unit, value) in obj {
        if value.is_number() {
            let count = count_entry("", unit, value)?;
            record.calls.insert(unit.clone(), count);
        }
    }
    Ok(record)
}

pub fn parse_stats_str(data: &str, date: NaiveDate, source: &str) -> Result<ShiftRecord, String> {
    let value: Value = serde_json::from_str(data).map_err(|err| format!("invalid json: {}", err))?;
    parse_stats_value(&value, date, source)
}
