//! Snapshots, file exports and backup imports.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::core::validator;
use crate::currency::{file_date, format_display_date, format_display_time, format_export_date};
use crate::domain::{BackupSnapshot, Entry, Ledger};
use crate::errors::{LedgerError, Result};
use crate::storage::json_backend::{canonical_name, write_atomic};
use crate::storage::TieredStorage;

/// Default period between automatic snapshots.
pub const DEFAULT_BACKUP_INTERVAL_SECS: i64 = 300;

pub const CSV_HEADER: [&str; 6] = [
    "Date",
    "Time",
    "Revenue (₹)",
    "Commission (₹)",
    "Expenses (₹)",
    "Profit (₹)",
];

/// Cooperative timer for periodic snapshots. Polled, never blocks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackupSchedule {
    interval: Duration,
    next_due: DateTime<Utc>,
}

impl BackupSchedule {
    pub fn new(interval: Duration, now: DateTime<Utc>) -> Self {
        Self {
            interval,
            next_due: now
                .checked_add_signed(interval)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn next_due(&self) -> DateTime<Utc> {
        self.next_due
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        now >= self.next_due
    }

    /// Moves the deadline past `now`; ticks missed while idle collapse into one.
    pub fn advance(&mut self, now: DateTime<Utc>) {
        if self.interval <= Duration::zero() {
            self.next_due = now;
            return;
        }
        while self.next_due <= now {
            match self.next_due.checked_add_signed(self.interval) {
                Some(next) => self.next_due = next,
                None => {
                    self.next_due = DateTime::<Utc>::MAX_UTC;
                    break;
                }
            }
        }
    }
}

/// Entries recovered from a backup file, waiting for a replace/merge decision.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportCandidate {
    pub entries: Vec<Entry>,
    /// Elements dropped by the validator.
    pub skipped: usize,
    /// Elements present in the file.
    pub total: usize,
}

impl ImportCandidate {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub struct BackupManager {
    company: String,
    schedule: BackupSchedule,
    last_backup: Option<DateTime<Utc>>,
}

impl BackupManager {
    pub fn new(company: impl Into<String>, interval: Duration, now: DateTime<Utc>) -> Self {
        Self {
            company: company.into(),
            schedule: BackupSchedule::new(interval, now),
            last_backup: None,
        }
    }

    pub fn company(&self) -> &str {
        &self.company
    }

    pub fn schedule(&self) -> &BackupSchedule {
        &self.schedule
    }

    /// Time of the last snapshot that reached every tier.
    pub fn last_backup(&self) -> Option<DateTime<Utc>> {
        self.last_backup
    }

    /// Writes a snapshot of `ledger` to both backup keys. Failures are logged, never returned.
    pub fn create_snapshot(
        &mut self,
        storage: &mut TieredStorage,
        ledger: &Ledger,
        now: DateTime<Utc>,
    ) -> BackupSnapshot {
        let snapshot = BackupSnapshot::capture(ledger, now);
        match storage.write_snapshot(&snapshot) {
            Ok(attempts) => {
                if attempts.iter().all(|attempt| attempt.succeeded()) {
                    self.last_backup = Some(now);
                    info!(entries = snapshot.total_entries, "backup created");
                } else {
                    warn!(
                        failed = attempts.iter().filter(|a| !a.succeeded()).count(),
                        "backup only partially written"
                    );
                }
            }
            Err(err) => error!(%err, "error creating backup"),
        }
        snapshot
    }

    /// Snapshots `ledger` when the periodic deadline has passed.
    pub fn run_if_due(
        &mut self,
        storage: &mut TieredStorage,
        ledger: &Ledger,
        now: DateTime<Utc>,
    ) -> Option<BackupSnapshot> {
        if !self.schedule.is_due(now) {
            return None;
        }
        self.schedule.advance(now);
        debug!(next_due = %self.schedule.next_due(), "periodic backup due");
        Some(self.create_snapshot(storage, ledger, now))
    }

    /// File name for a JSON export taken at `now`.
    pub fn json_file_name(&self, now: DateTime<Utc>) -> String {
        format!(
            "{}_backup_{}.json",
            canonical_name(&self.company),
            file_date(now)
        )
    }

    pub fn csv_file_name(&self, now: DateTime<Utc>) -> String {
        format!(
            "{}_profit_{}.csv",
            canonical_name(&self.company),
            file_date(now)
        )
    }

    /// Writes a pretty-printed snapshot with export metadata into `dir`.
    pub fn export_json(&self, ledger: &Ledger, dir: &Path, now: DateTime<Utc>) -> Result<PathBuf> {
        if ledger.is_empty() {
            return Err(LedgerError::NothingToExport);
        }
        let snapshot = BackupSnapshot::capture(ledger, now)
            .with_export_metadata(self.company.clone(), format_export_date(now));
        let body = serde_json::to_string_pretty(&snapshot)?;
        let path = dir.join(self.json_file_name(now));
        write_atomic(&path, &body)?;
        info!(path = %path.display(), entries = ledger.len(), "backup exported");
        Ok(path)
    }

    /// Writes the ledger as CSV into `dir`.
    pub fn export_csv(&self, ledger: &Ledger, dir: &Path, now: DateTime<Utc>) -> Result<PathBuf> {
        if ledger.is_empty() {
            return Err(LedgerError::NothingToExport);
        }
        let body = render_csv(ledger)?;
        let path = dir.join(self.csv_file_name(now));
        write_atomic(&path, &body)?;
        info!(path = %path.display(), entries = ledger.len(), "csv exported");
        Ok(path)
    }
}

/// Renders one header row plus one row per entry. Values are written verbatim, unquoted.
pub fn render_csv(ledger: &Ledger) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;
    for entry in ledger.iter() {
        writer.write_record([
            format_display_date(&entry.date),
            format_display_time(&entry.timestamp),
            format!("{:.2}", entry.revenue),
            format!("{:.2}", entry.commission),
            format!("{:.2}", entry.expenses),
            format!("{:.2}", entry.profit),
        ])?;
    }
    let buffer = writer
        .into_inner()
        .map_err(|err| LedgerError::Io(err.into_error()))?;
    String::from_utf8(buffer)
        .map_err(|err| LedgerError::Io(io::Error::new(io::ErrorKind::InvalidData, err)))
}

/// Parses the contents of a backup file into validated entries.
pub fn import_from_file(contents: &str, now: DateTime<Utc>) -> Result<ImportCandidate> {
    let document: Value = serde_json::from_str(contents)?;
    let raw_entries = document
        .get("entries")
        .filter(|entries| entries.is_array())
        .ok_or(LedgerError::InvalidFormat)?;
    let report = validator::validate(raw_entries, now);
    if report.entries.is_empty() {
        return Err(LedgerError::NoValidEntries);
    }
    debug!(
        valid = report.entries.len(),
        total = report.total,
        "backup file parsed"
    );
    Ok(ImportCandidate {
        skipped: report.skipped.len(),
        total: report.total,
        entries: report.entries,
    })
}

pub fn import_from_path(path: &Path, now: DateTime<Utc>) -> Result<ImportCandidate> {
    let contents = fs::read_to_string(path)?;
    import_from_file(&contents, now)
}
