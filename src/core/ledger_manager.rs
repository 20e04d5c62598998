use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone, Utc};
use tracing::{error, info, warn};

use crate::core::backup::{self, BackupManager, ImportCandidate, DEFAULT_BACKUP_INTERVAL_SECS};
use crate::core::notice::{Notice, NoticeBoard, DEFAULT_NOTICE_SECONDS};
use crate::core::services::{EntryService, ImportMode, SummaryService};
use crate::core::time::Clock;
use crate::domain::entry::format_timestamp;
use crate::domain::{Aggregates, BackupSnapshot, Entry, EntryDraft, Ledger};
use crate::errors::{LedgerError, Result};
use crate::storage::{LoadReport, SaveReport, TieredStorage};

pub const DEFAULT_COMPANY: &str = "Ashok Kumar and Sons";

/// Tunables the controller needs from configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ManagerSettings {
    pub company: String,
    pub backup_interval: Duration,
    pub notice_duration: Duration,
}

impl Default for ManagerSettings {
    fn default() -> Self {
        Self {
            company: DEFAULT_COMPANY.into(),
            backup_interval: Duration::seconds(DEFAULT_BACKUP_INTERVAL_SECS),
            notice_duration: Duration::seconds(DEFAULT_NOTICE_SECONDS),
        }
    }
}

/// Summary of the most recent load, kept for the status screen.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadMetadata {
    pub source: Option<String>,
    pub loaded: usize,
    pub skipped: usize,
    pub restored_from_fallback: bool,
}

/// Owns the in-memory ledger and coordinates persistence, backups and notices.
pub struct LedgerManager {
    ledger: Ledger,
    aggregates: Aggregates,
    storage: TieredStorage,
    backups: BackupManager,
    notices: NoticeBoard,
    clock: Box<dyn Clock>,
    last_load: Option<LoadMetadata>,
}

impl LedgerManager {
    pub fn new(storage: TieredStorage, settings: ManagerSettings, clock: Box<dyn Clock>) -> Self {
        let now = clock.now();
        Self {
            ledger: Ledger::new(),
            aggregates: Aggregates::default(),
            storage,
            backups: BackupManager::new(settings.company, settings.backup_interval, now),
            notices: NoticeBoard::new(settings.notice_duration),
            clock,
            last_load: None,
        }
    }

    /// Builds a manager and immediately loads whatever the tiers hold.
    pub fn open(storage: TieredStorage, settings: ManagerSettings, clock: Box<dyn Clock>) -> Self {
        let mut manager = Self::new(storage, settings, clock);
        manager.load();
        manager
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn aggregates(&self) -> Aggregates {
        self.aggregates
    }

    pub fn storage(&self) -> &TieredStorage {
        &self.storage
    }

    pub fn company(&self) -> &str {
        self.backups.company()
    }

    pub fn last_backup(&self) -> Option<DateTime<Utc>> {
        self.backups.last_backup()
    }

    pub fn next_backup_due(&self) -> DateTime<Utc> {
        self.backups.schedule().next_due()
    }

    pub fn last_load(&self) -> Option<&LoadMetadata> {
        self.last_load.as_ref()
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn visible_notice(&self) -> Option<&Notice> {
        self.notices.visible(self.clock.now())
    }

    /// Drains notices posted since the previous call.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.take_pending()
    }

    /// Replaces the in-memory ledger with the best source in storage, then re-syncs backups.
    pub fn load(&mut self) -> LoadReport {
        let now = self.clock.now();
        let report = self.storage.load(now);
        self.ledger = report.ledger.clone();
        self.recompute();

        if report.restored_from_fallback() {
            self.notices.success("Data restored from backup!", now);
        } else if report.source.is_none() && report.found_corruption() {
            self.notices.error("Error loading data, starting fresh", now);
        }
        self.last_load = Some(LoadMetadata {
            source: report.source.map(|source| source.to_string()),
            loaded: report.ledger.len(),
            skipped: report.validation.skipped.len(),
            restored_from_fallback: report.restored_from_fallback(),
        });

        self.backups
            .create_snapshot(&mut self.storage, &self.ledger, now);
        report
    }

    /// Writes the ledger to storage and, when the durable write succeeded, snapshots it.
    pub fn save(&mut self) -> Result<SaveReport> {
        let now = self.clock.now();
        match self.storage.save(&self.ledger) {
            Ok(report) if report.emergency => {
                self.notices
                    .error("Error saving data! Trying alternative storage...", now);
                Ok(report)
            }
            Ok(report) => {
                self.backups
                    .create_snapshot(&mut self.storage, &self.ledger, now);
                Ok(report)
            }
            Err(err) => {
                error!(%err, "ledger could not be persisted to any tier");
                self.notices.error("Critical error: Data may not be saved!", now);
                Err(err)
            }
        }
    }

    pub fn add(&mut self, draft: &EntryDraft) -> Result<Entry> {
        let now = self.clock.now();
        let entry = match EntryService::add(&mut self.ledger, draft, now) {
            Ok(entry) => entry,
            Err(err) => {
                self.notices
                    .error("Please fill all fields with valid values!", now);
                return Err(err);
            }
        };
        info!(id = entry.id, profit = entry.profit, "entry added");
        self.commit("Entry saved successfully!");
        Ok(entry)
    }

    /// Removes the entry at `index` once the user has confirmed. Unconfirmed calls do nothing.
    pub fn delete_at(&mut self, index: usize, confirmed: bool) -> Result<Option<Entry>> {
        if !confirmed {
            return Ok(None);
        }
        let removed = EntryService::remove(&mut self.ledger, index)?;
        info!(id = removed.id, index, "entry deleted");
        self.commit("Entry deleted successfully!");
        Ok(Some(removed))
    }

    /// Empties the ledger once confirmed, returning how many entries were dropped.
    pub fn clear(&mut self, confirmed: bool) -> Option<usize> {
        if !confirmed {
            return None;
        }
        let removed = self.ledger.len();
        self.ledger.clear();
        info!(removed, "ledger cleared");
        self.commit("All entries cleared!");
        Some(removed)
    }

    /// Parses a backup file without applying it.
    pub fn import_file(&mut self, path: &Path) -> Result<ImportCandidate> {
        let now = self.clock.now();
        backup::import_from_path(path, now).map_err(|err| {
            let message = match err {
                LedgerError::InvalidFormat => "Invalid backup file format!",
                LedgerError::NoValidEntries => "No valid entries found in backup file!",
                _ => "Error reading backup file!",
            };
            warn!(path = %path.display(), %err, "backup import rejected");
            self.notices.error(message, now);
            err
        })
    }

    /// Applies a parsed backup. Returns the number of entries added.
    pub fn import_resolved(&mut self, candidate: ImportCandidate, mode: ImportMode) -> usize {
        let added = EntryService::import(&mut self.ledger, candidate.entries, mode);
        let message = match mode {
            ImportMode::Replace => format!("Imported {added} entries (replaced existing data)"),
            ImportMode::Merge => format!("Imported {added} new entries (merged with existing data)"),
        };
        info!(?mode, added, "backup imported");
        self.commit(message);
        added
    }

    pub fn export_json(&mut self, dir: &Path) -> Result<PathBuf> {
        let now = self.clock.now();
        let result = self.backups.export_json(&self.ledger, dir, now);
        self.report_export(
            &result,
            "Backup exported successfully!",
            "No data to backup!",
            "Error exporting backup!",
        );
        result
    }

    pub fn export_csv(&mut self, dir: &Path) -> Result<PathBuf> {
        let now = self.clock.now();
        let result = self.backups.export_csv(&self.ledger, dir, now);
        self.report_export(
            &result,
            "Data exported to CSV successfully!",
            "No data to export!",
            "Error exporting CSV file!",
        );
        result
    }

    /// Takes a snapshot right away, outside the periodic schedule.
    pub fn backup_now(&mut self) -> BackupSnapshot {
        let now = self.clock.now();
        self.backups
            .create_snapshot(&mut self.storage, &self.ledger, now)
    }

    /// Runs the periodic backup when it is due. Call on every shell event.
    pub fn tick(&mut self) -> Option<BackupSnapshot> {
        let now = self.clock.now();
        self.backups.run_if_due(&mut self.storage, &self.ledger, now)
    }

    /// Final snapshot before the process exits.
    pub fn shutdown(&mut self) -> BackupSnapshot {
        info!(entries = self.ledger.len(), "shutting down, writing final backup");
        self.backup_now()
    }

    /// Prepends three fixed demonstration entries and persists them.
    pub fn add_sample_entries(&mut self) -> usize {
        let base_id = self.clock.now().timestamp_millis();
        let samples = [
            ((2023, 12, 15), (10, 30), 10_000.0, 500.0, 2_000.0),
            ((2023, 12, 15), (14, 45), 8_000.0, 400.0, 1_500.0),
            ((2023, 12, 16), (9, 15), 12_000.0, 600.0, 3_000.0),
        ];
        let mut added = 0;
        for (offset, ((y, m, d), (hour, minute), revenue, commission, expenses)) in
            samples.into_iter().enumerate()
        {
            let Some(day) = NaiveDate::from_ymd_opt(y, m, d) else {
                continue;
            };
            let Some(recorded) = local_instant(day, hour, minute) else {
                continue;
            };
            self.ledger.prepend(Entry {
                date: day.format(crate::domain::entry::ENTRY_DATE_FORMAT).to_string(),
                revenue,
                commission,
                expenses,
                profit: commission - expenses,
                timestamp: format_timestamp(recorded),
                id: base_id + offset as i64 + 1,
            });
            added += 1;
        }
        self.commit(format!("{added} test entries added successfully!"));
        added
    }

    fn recompute(&mut self) {
        self.aggregates = SummaryService::aggregates(&self.ledger);
    }

    /// Recomputes totals, announces the mutation, then persists. A failed save posts its own
    /// notice after the success message so the warning is what stays visible.
    fn commit(&mut self, message: impl Into<String>) {
        self.recompute();
        let now = self.clock.now();
        self.notices.success(message, now);
        if let Err(err) = self.save() {
            warn!(%err, "mutation kept in memory only");
        }
    }

    fn report_export(
        &mut self,
        result: &Result<PathBuf>,
        success: &str,
        empty: &str,
        failure: &str,
    ) {
        let now = self.clock.now();
        match result {
            Ok(_) => {
                let message = format!("{success} ({} entries)", self.ledger.len());
                self.notices.success(message, now);
            }
            Err(LedgerError::NothingToExport) => self.notices.error(empty, now),
            Err(err) => {
                error!(%err, "export failed");
                self.notices.error(failure, now);
            }
        }
    }
}

/// Interprets a wall-clock time on `day` in the local zone.
fn local_instant(day: NaiveDate, hour: u32, minute: u32) -> Option<DateTime<Utc>> {
    let naive = day.and_hms_opt(hour, minute, 0)?;
    let instant = Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&naive));
    Some(instant)
}
