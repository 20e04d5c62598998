//! Redundant persistence across a durable and a session tier.
//!
//! Reads walk [`LoadSource::PRIORITY`] until one source yields an entry list; writes go
//! to the durable tier first and fall back to the session tier's emergency key. Every
//! read and write attempt is recorded in the returned report.

use std::fmt;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{error, info, warn};

use super::{
    Durability, KeyValueStore, BACKUP_KEY, EMERGENCY_KEY, ENTRIES_KEY, SESSION_BACKUP_KEY,
    SESSION_CURRENT_KEY,
};
use crate::core::validator::{self, ValidationReport};
use crate::domain::{BackupSnapshot, Ledger};
use crate::errors::{LedgerError, Result};

/// A location a ledger can be recovered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadSource {
    Primary,
    Backup,
    SessionCurrent,
    SessionSnapshot,
    Emergency,
}

impl LoadSource {
    /// Order in which sources are consulted on load.
    pub const PRIORITY: [LoadSource; 5] = [
        LoadSource::Primary,
        LoadSource::Backup,
        LoadSource::SessionCurrent,
        LoadSource::SessionSnapshot,
        LoadSource::Emergency,
    ];

    pub fn durability(self) -> Durability {
        match self {
            LoadSource::Primary | LoadSource::Backup => Durability::Durable,
            LoadSource::SessionCurrent | LoadSource::SessionSnapshot | LoadSource::Emergency => {
                Durability::Session
            }
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            LoadSource::Primary => ENTRIES_KEY,
            LoadSource::Backup => BACKUP_KEY,
            LoadSource::SessionCurrent => SESSION_CURRENT_KEY,
            LoadSource::SessionSnapshot => SESSION_BACKUP_KEY,
            LoadSource::Emergency => EMERGENCY_KEY,
        }
    }

    /// Snapshot sources wrap the entry list in a `BackupSnapshot` document.
    fn holds_snapshot(self) -> bool {
        matches!(self, LoadSource::Backup | LoadSource::SessionSnapshot)
    }
}

impl fmt::Display for LoadSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.key(), self.durability())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WriteOutcome {
    Written,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct WriteAttempt {
    pub tier: Durability,
    pub key: &'static str,
    pub outcome: WriteOutcome,
}

impl WriteAttempt {
    pub fn succeeded(&self) -> bool {
        self.outcome == WriteOutcome::Written
    }
}

/// Record of every write performed by [`TieredStorage::save`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SaveReport {
    pub attempts: Vec<WriteAttempt>,
    /// Set when the durable write failed and the emergency session copy was used.
    pub emergency: bool,
}

impl SaveReport {
    pub fn failures(&self) -> impl Iterator<Item = &WriteAttempt> {
        self.attempts.iter().filter(|attempt| !attempt.succeeded())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TierOutcome {
    Missing,
    Unreadable(String),
    Loaded,
}

/// Metadata describing the outcome of a load.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadReport {
    pub ledger: Ledger,
    /// The source the ledger came from, `None` when every source was empty.
    pub source: Option<LoadSource>,
    pub attempts: Vec<(LoadSource, TierOutcome)>,
    pub validation: ValidationReport,
}

impl LoadReport {
    pub fn restored_from_fallback(&self) -> bool {
        matches!(self.source, Some(source) if source != LoadSource::Primary)
    }

    pub fn found_corruption(&self) -> bool {
        self.attempts
            .iter()
            .any(|(_, outcome)| matches!(outcome, TierOutcome::Unreadable(_)))
    }
}

/// Persistence facade over the two tiers.
pub struct TieredStorage {
    durable: Box<dyn KeyValueStore>,
    session: Box<dyn KeyValueStore>,
}

impl TieredStorage {
    pub fn new(durable: Box<dyn KeyValueStore>, session: Box<dyn KeyValueStore>) -> Self {
        for (role, store) in [
            (Durability::Durable, durable.as_ref()),
            (Durability::Session, session.as_ref()),
        ] {
            if store.durability() != role {
                warn!(
                    tier = store.name(),
                    declared = %store.durability(),
                    %role,
                    "tier used outside its declared durability"
                );
            }
        }
        Self { durable, session }
    }

    pub fn tier(&self, durability: Durability) -> &dyn KeyValueStore {
        match durability {
            Durability::Durable => self.durable.as_ref(),
            Durability::Session => self.session.as_ref(),
        }
    }

    fn tier_mut(&mut self, durability: Durability) -> &mut dyn KeyValueStore {
        match durability {
            Durability::Durable => self.durable.as_mut(),
            Durability::Session => self.session.as_mut(),
        }
    }

    fn attempt(&mut self, tier: Durability, key: &'static str, payload: &str) -> WriteAttempt {
        let store = self.tier_mut(tier);
        let outcome = match store.set(key, payload) {
            Ok(()) => WriteOutcome::Written,
            Err(err) => {
                error!(store = store.name(), %tier, key, %err, "storage write failed");
                WriteOutcome::Failed(err.to_string())
            }
        };
        WriteAttempt { tier, key, outcome }
    }

    /// Writes the entry list to the durable tier and mirrors it to the session tier.
    ///
    /// When the durable write fails the list goes to the emergency session key instead;
    /// only when that also fails is an error returned.
    pub fn save(&mut self, ledger: &Ledger) -> Result<SaveReport> {
        let payload = serde_json::to_string(ledger)?;
        let mut report = SaveReport::default();

        let primary = self.attempt(Durability::Durable, ENTRIES_KEY, &payload);
        if primary.succeeded() {
            report.attempts.push(primary);
            let mirror = self.attempt(Durability::Session, SESSION_CURRENT_KEY, &payload);
            report.attempts.push(mirror);
            // Durable copy is current again; drop any stale emergency copy.
            if let Err(err) = self.session.remove(EMERGENCY_KEY) {
                warn!(%err, "stale emergency copy could not be removed");
            }
            info!(entries = ledger.len(), "entries saved");
            return Ok(report);
        }

        report.attempts.push(primary);
        report.emergency = true;
        let emergency = self.attempt(Durability::Session, EMERGENCY_KEY, &payload);
        let saved = emergency.succeeded();
        let failure = match &emergency.outcome {
            WriteOutcome::Failed(message) => message.clone(),
            WriteOutcome::Written => String::new(),
        };
        report.attempts.push(emergency);
        if saved {
            warn!(entries = ledger.len(), "emergency copy written to session tier");
            Ok(report)
        } else {
            Err(LedgerError::StorageUnavailable(failure))
        }
    }

    /// Writes `snapshot` to both backup keys, returning one attempt per tier.
    pub fn write_snapshot(&mut self, snapshot: &BackupSnapshot) -> Result<Vec<WriteAttempt>> {
        let payload = serde_json::to_string(snapshot)?;
        Ok(vec![
            self.attempt(Durability::Durable, BACKUP_KEY, &payload),
            self.attempt(Durability::Session, SESSION_BACKUP_KEY, &payload),
        ])
    }

    /// Reconstructs the ledger from the first source that yields an entry list.
    /// Everything returned has passed through the validator.
    pub fn load(&self, now: DateTime<Utc>) -> LoadReport {
        let mut attempts = Vec::new();
        for source in LoadSource::PRIORITY {
            match self.read_source(source) {
                Ok(None) => attempts.push((source, TierOutcome::Missing)),
                Err(reason) => {
                    warn!(%source, %reason, "stored entries unreadable, trying next source");
                    attempts.push((source, TierOutcome::Unreadable(reason)));
                }
                Ok(Some(raw)) => {
                    attempts.push((source, TierOutcome::Loaded));
                    let validation = validator::validate(&raw, now);
                    info!(%source, entries = validation.entries.len(), "entries loaded");
                    return LoadReport {
                        ledger: Ledger::from_entries(validation.entries.clone()),
                        source: Some(source),
                        attempts,
                        validation,
                    };
                }
            }
        }
        info!("no saved entries found, starting fresh");
        LoadReport {
            ledger: Ledger::new(),
            source: None,
            attempts,
            validation: ValidationReport::default(),
        }
    }

    fn read_source(&self, source: LoadSource) -> std::result::Result<Option<Value>, String> {
        let raw = self
            .tier(source.durability())
            .get(source.key())
            .map_err(|err| err.to_string())?;
        let Some(raw) = raw else {
            return Ok(None);
        };
        let document: Value = serde_json::from_str(&raw).map_err(|err| err.to_string())?;
        let entries = if source.holds_snapshot() {
            document
                .get("entries")
                .cloned()
                .ok_or_else(|| "snapshot has no `entries` field".to_string())?
        } else {
            document
        };
        if entries.is_array() {
            Ok(Some(entries))
        } else {
            Err("stored entries are not a list".to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Entry;
    use crate::storage::SessionStore;
    use chrono::TimeZone;

    /// Tier that refuses every write.
    struct BrokenStore(Durability);

    impl KeyValueStore for BrokenStore {
        fn name(&self) -> &str {
            "broken"
        }

        fn durability(&self) -> Durability {
            self.0
        }

        fn get(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }

        fn set(&mut self, key: &str, _value: &str) -> Result<()> {
            Err(LedgerError::StorageWrite {
                tier: "broken".into(),
                key: key.into(),
                message: "disk full".into(),
            })
        }

        fn remove(&mut self, _key: &str) -> Result<()> {
            Ok(())
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 2, 12, 0, 0).unwrap()
    }

    fn memory_tiers() -> TieredStorage {
        TieredStorage::new(Box::new(SessionStore::new()), Box::new(SessionStore::new()))
    }

    fn sample_ledger() -> Ledger {
        Ledger::from_entries(vec![Entry {
            date: "2024-02-01".into(),
            revenue: 100.0,
            commission: 10.0,
            expenses: 4.0,
            profit: 6.0,
            timestamp: "2024-02-01T09:00:00.000Z".into(),
            id: 42,
        }])
    }

    #[test]
    fn save_writes_primary_and_session_mirror() {
        let mut storage = memory_tiers();
        let report = storage.save(&sample_ledger()).unwrap();
        assert!(!report.emergency);
        let keys: Vec<_> = report.attempts.iter().map(|a| (a.tier, a.key)).collect();
        assert_eq!(
            keys,
            vec![
                (Durability::Durable, ENTRIES_KEY),
                (Durability::Session, SESSION_CURRENT_KEY)
            ]
        );
        assert!(storage
            .tier(Durability::Session)
            .get(SESSION_CURRENT_KEY)
            .unwrap()
            .is_some());
    }

    #[test]
    fn primary_failure_uses_emergency_key() {
        let mut storage = TieredStorage::new(
            Box::new(BrokenStore(Durability::Durable)),
            Box::new(SessionStore::new()),
        );
        let report = storage.save(&sample_ledger()).unwrap();
        assert!(report.emergency);
        assert_eq!(report.failures().count(), 1);
        assert!(storage
            .tier(Durability::Session)
            .get(EMERGENCY_KEY)
            .unwrap()
            .is_some());
    }

    #[test]
    fn successful_save_discards_stale_emergency_copy() {
        let mut storage = memory_tiers();
        storage
            .tier_mut(Durability::Session)
            .set(EMERGENCY_KEY, "[]")
            .unwrap();
        storage.save(&sample_ledger()).unwrap();
        assert!(storage
            .tier(Durability::Session)
            .get(EMERGENCY_KEY)
            .unwrap()
            .is_none());
    }

    #[test]
    fn total_failure_is_surfaced() {
        let mut storage = TieredStorage::new(
            Box::new(BrokenStore(Durability::Durable)),
            Box::new(BrokenStore(Durability::Session)),
        );
        let err = storage.save(&sample_ledger()).unwrap_err();
        assert!(matches!(err, LedgerError::StorageUnavailable(_)));
    }

    #[test]
    fn load_prefers_primary() {
        let mut storage = memory_tiers();
        storage.save(&sample_ledger()).unwrap();
        let report = storage.load(now());
        assert_eq!(report.source, Some(LoadSource::Primary));
        assert_eq!(report.ledger, sample_ledger());
    }

    #[test]
    fn corrupt_primary_falls_back_to_backup_snapshot() {
        let mut storage = memory_tiers();
        let snapshot = BackupSnapshot::capture(&sample_ledger(), now());
        storage.write_snapshot(&snapshot).unwrap();
        storage
            .tier_mut(Durability::Durable)
            .set(ENTRIES_KEY, "{not json")
            .unwrap();

        let report = storage.load(now());
        assert_eq!(report.source, Some(LoadSource::Backup));
        assert!(report.restored_from_fallback());
        assert!(report.found_corruption());
        assert_eq!(report.ledger, sample_ledger());
    }

    #[test]
    fn snapshot_without_entries_is_skipped() {
        let mut storage = memory_tiers();
        storage
            .tier_mut(Durability::Durable)
            .set(BACKUP_KEY, r#"{"version":"1.0"}"#)
            .unwrap();
        let report = storage.load(now());
        assert!(report.source.is_none());
        assert!(report.ledger.is_empty());
        assert!(report.found_corruption());
    }

    #[test]
    fn empty_stores_yield_empty_ledger() {
        let report = memory_tiers().load(now());
        assert!(report.ledger.is_empty());
        assert!(report.source.is_none());
        assert_eq!(report.attempts.len(), LoadSource::PRIORITY.len());
    }
}
