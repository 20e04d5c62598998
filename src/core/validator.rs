//! Sanitizes untrusted records (persisted state, imported files) into valid entries.
//!
//! This is the only gate between raw JSON and the in-memory ledger, so nothing in
//! here may fail: malformed input degrades to defaults or is skipped.

use std::fmt;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::domain::{
    entry::{format_entry_date, format_timestamp},
    Entry,
};

/// Outcome of sanitizing one element of the raw input.
#[derive(Debug, Clone, PartialEq)]
pub enum Validated {
    Valid(Entry),
    Skipped { index: usize, reason: SkipReason },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The element was not a JSON object; carries the JSON type found instead.
    NotARecord(&'static str),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotARecord(kind) => write!(f, "expected a record, found {kind}"),
        }
    }
}

/// Result of validating a whole list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    pub entries: Vec<Entry>,
    pub skipped: Vec<(usize, SkipReason)>,
    /// Number of elements in the input, or zero when the input was not a list.
    pub total: usize,
}

/// Validates `raw` as a list of entries. Non-list input yields an empty report.
pub fn validate(raw: &Value, now: DateTime<Utc>) -> ValidationReport {
    let Value::Array(items) = raw else {
        warn!(found = json_kind(raw), "entries are not a list, resetting to empty");
        return ValidationReport::default();
    };

    let mut report = ValidationReport {
        total: items.len(),
        ..ValidationReport::default()
    };
    for (index, item) in items.iter().enumerate() {
        match validate_record(index, item, now) {
            Validated::Valid(entry) => report.entries.push(entry),
            Validated::Skipped { index, reason } => {
                warn!(index, %reason, "invalid entry skipped");
                report.skipped.push((index, reason));
            }
        }
    }
    debug!(
        "Validated {} entries out of {}",
        report.entries.len(),
        report.total
    );
    report
}

/// Sanitizes the element at `index`. Missing fields are defaulted relative to `now`.
pub fn validate_record(index: usize, raw: &Value, now: DateTime<Utc>) -> Validated {
    let Value::Object(record) = raw else {
        return Validated::Skipped {
            index,
            reason: SkipReason::NotARecord(json_kind(raw)),
        };
    };

    Validated::Valid(Entry {
        date: coerce_text(record, "date").unwrap_or_else(|| format_entry_date(now)),
        revenue: coerce_amount(record.get("revenue")),
        commission: coerce_amount(record.get("commission")),
        expenses: coerce_amount(record.get("expenses")),
        // Stored profit is trusted; it is never re-derived from commission and expenses.
        profit: coerce_amount(record.get("profit")),
        timestamp: coerce_text(record, "timestamp").unwrap_or_else(|| format_timestamp(now)),
        id: coerce_id(record.get("id"))
            .unwrap_or_else(|| now.timestamp_millis().saturating_add(index as i64)),
    })
}

fn coerce_text(record: &Map<String, Value>, field: &str) -> Option<String> {
    match record.get(field) {
        Some(Value::String(text)) if !text.is_empty() => Some(text.clone()),
        _ => None,
    }
}

/// Lenient numeric coercion: numbers pass through, strings use their leading numeric
/// prefix, and everything else (or any non-finite result) becomes zero.
fn coerce_amount(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => parse_float_prefix(text),
        _ => None,
    };
    parsed.filter(|amount| amount.is_finite()).unwrap_or(0.0)
}

fn coerce_id(value: Option<&Value>) -> Option<i64> {
    let id = match value {
        Some(Value::Number(number)) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|raw| raw.is_finite())
                .map(|raw| raw.trunc() as i64)
        }),
        Some(Value::String(text)) => text.trim().parse::<i64>().ok(),
        _ => None,
    };
    // Zero is treated like a missing id.
    id.filter(|id| *id != 0)
}

/// Parses the longest prefix of `raw` (after leading whitespace) that forms a decimal
/// number, e.g. `"12.5kg"` -> `12.5`. Returns `None` when no digits lead the string.
pub(crate) fn parse_float_prefix(raw: &str) -> Option<f64> {
    let text = raw.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let mut frac_end = end + 1;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - (end + 1);
        end = frac_end;
    }
    if digits == 0 {
        return None;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
        }
    }

    text[..end].parse::<f64>().ok()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 20, 9, 15, 0).unwrap()
    }

    #[test]
    fn non_list_input_yields_empty_report() {
        for raw in [json!(null), json!({"entries": []}), json!("text"), json!(42)] {
            let report = validate(&raw, now());
            assert!(report.entries.is_empty(), "input {raw} should be rejected");
            assert_eq!(report.total, 0);
        }
    }

    #[test]
    fn non_record_elements_are_skipped_with_reason() {
        let raw = json!([1, "two", null, [3], {"revenue": 5}]);
        let report = validate(&raw, now());
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.total, 5);
        assert_eq!(
            report.skipped,
            vec![
                (0, SkipReason::NotARecord("number")),
                (1, SkipReason::NotARecord("string")),
                (2, SkipReason::NotARecord("null")),
                (3, SkipReason::NotARecord("array")),
            ]
        );
    }

    #[test]
    fn missing_fields_are_defaulted() {
        let report = validate(&json!([{}, {}]), now());
        let first = &report.entries[0];
        assert_eq!(first.date, "2024-05-20");
        assert_eq!(first.timestamp, "2024-05-20T09:15:00.000Z");
        assert_eq!(first.revenue, 0.0);
        assert_eq!(first.profit, 0.0);
        assert_eq!(first.id, now().timestamp_millis());
        assert_eq!(report.entries[1].id, now().timestamp_millis() + 1);
    }

    #[test]
    fn amounts_are_coerced_leniently() {
        let raw = json!([{
            "revenue": "1200.50",
            "commission": " 75abc",
            "expenses": true,
            "profit": {"nested": 1},
            "id": "17"
        }]);
        let entry = &validate(&raw, now()).entries[0];
        assert_eq!(entry.revenue, 1200.5);
        assert_eq!(entry.commission, 75.0);
        assert_eq!(entry.expenses, 0.0);
        assert_eq!(entry.profit, 0.0);
        assert_eq!(entry.id, 17);
    }

    #[test]
    fn stored_profit_is_trusted_even_when_inconsistent() {
        let raw = json!([{"commission": 500, "expenses": 2000, "profit": 999, "id": 1}]);
        let entry = &validate(&raw, now()).entries[0];
        assert_eq!(entry.profit, 999.0);
    }

    #[test]
    fn zero_or_wrongly_typed_ids_fall_back_to_time_based_ids() {
        let raw = json!([{"id": 0}, {"id": "abc"}, {"id": 12.9}]);
        let report = validate(&raw, now());
        let base = now().timestamp_millis();
        assert_eq!(report.entries[0].id, base);
        assert_eq!(report.entries[1].id, base + 1);
        assert_eq!(report.entries[2].id, 12);
    }

    #[test]
    fn wrongly_typed_text_fields_are_defaulted() {
        let raw = json!([{"date": 20240101, "timestamp": ""}]);
        let entry = &validate(&raw, now()).entries[0];
        assert_eq!(entry.date, "2024-05-20");
        assert_eq!(entry.timestamp, "2024-05-20T09:15:00.000Z");
    }

    #[test]
    fn float_prefix_parser_matches_lenient_semantics() {
        assert_eq!(parse_float_prefix("42"), Some(42.0));
        assert_eq!(parse_float_prefix("  -3.5e2xyz"), Some(-350.0));
        assert_eq!(parse_float_prefix(".5"), Some(0.5));
        assert_eq!(parse_float_prefix("7e"), Some(7.0));
        assert_eq!(parse_float_prefix("abc"), None);
        assert_eq!(parse_float_prefix("-."), None);
        assert_eq!(parse_float_prefix(""), None);
    }
}
