//! Domain model for a single recorded business day transaction.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Date format used for the `date` field of persisted entries.
pub const ENTRY_DATE_FORMAT: &str = "%Y-%m-%d";

/// One transaction record as persisted under the primary store key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub date: String,
    pub revenue: f64,
    pub commission: f64,
    pub expenses: f64,
    pub profit: f64,
    pub timestamp: String,
    pub id: i64,
}

impl Entry {
    /// Builds a fresh entry from user supplied fields, deriving profit, id and timestamp.
    pub fn from_draft(draft: &EntryDraft, now: DateTime<Utc>) -> Self {
        Self {
            date: draft.date.trim().to_string(),
            revenue: draft.revenue,
            commission: draft.commission,
            expenses: draft.expenses,
            profit: draft.commission - draft.expenses,
            timestamp: format_timestamp(now),
            id: now.timestamp_millis(),
        }
    }
}

/// User supplied fields for a new entry, before profit and identity are derived.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryDraft {
    pub date: String,
    pub revenue: f64,
    pub commission: f64,
    pub expenses: f64,
}

impl EntryDraft {
    pub fn new(date: impl Into<String>, revenue: f64, commission: f64, expenses: f64) -> Self {
        Self {
            date: date.into(),
            revenue,
            commission,
            expenses,
        }
    }

    /// Returns the first problem that prevents this draft from becoming an entry.
    pub fn problem(&self) -> Option<String> {
        if self.date.trim().is_empty() {
            return Some("date is required".into());
        }
        let amounts = [
            ("revenue", self.revenue),
            ("commission", self.commission),
            ("expenses", self.expenses),
        ];
        amounts.iter().find_map(|(label, value)| {
            if !value.is_finite() {
                Some(format!("{label} must be a number"))
            } else if *value < 0.0 {
                Some(format!("{label} must not be negative"))
            } else {
                None
            }
        })
    }
}

/// Formats an instant the way entry timestamps are persisted.
pub fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Formats the UTC calendar day of `instant` as an entry date.
pub fn format_entry_date(instant: DateTime<Utc>) -> String {
    instant.date_naive().format(ENTRY_DATE_FORMAT).to_string()
}
