use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{entry::format_timestamp, Entry, Ledger};

pub const SNAPSHOT_VERSION: &str = "1.0";

/// Point-in-time copy of the ledger plus metadata. Never mutated after capture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupSnapshot {
    pub entries: Vec<Entry>,
    pub timestamp: String,
    pub version: String,
    pub total_entries: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_date: Option<String>,
}

impl BackupSnapshot {
    pub fn capture(ledger: &Ledger, now: DateTime<Utc>) -> Self {
        Self {
            entries: ledger.entries.clone(),
            timestamp: format_timestamp(now),
            version: SNAPSHOT_VERSION.to_string(),
            total_entries: ledger.len(),
            company: None,
            export_date: None,
        }
    }

    /// Adds the descriptive fields carried by user-facing export files.
    pub fn with_export_metadata(
        mut self,
        company: impl Into<String>,
        export_date: impl Into<String>,
    ) -> Self {
        self.company = Some(company.into());
        self.export_date = Some(export_date.into());
        self
    }
}
