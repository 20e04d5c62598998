pub mod json_backend;
pub mod session;
pub mod tiered;

use std::fmt;

use crate::errors::Result;

/// Durable key holding the JSON entry list.
pub const ENTRIES_KEY: &str = "profitEntries";
/// Durable key holding the latest backup snapshot.
pub const BACKUP_KEY: &str = "profitEntries_backup";
/// Session key holding the latest backup snapshot.
pub const SESSION_BACKUP_KEY: &str = "profitEntries_session";
/// Session key mirroring the entry list after each successful save.
pub const SESSION_CURRENT_KEY: &str = "profitEntries_current";
/// Session key written only when the durable write failed.
pub const EMERGENCY_KEY: &str = "profitEntries_emergency";

/// Whether a tier survives a process restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Durability {
    Durable,
    Session,
}

impl fmt::Display for Durability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Durability::Durable => "durable",
            Durability::Session => "session",
        };
        f.write_str(label)
    }
}

/// Abstraction over string key-value persistence tiers.
pub trait KeyValueStore {
    /// Human-readable tier name used in logs and write reports.
    fn name(&self) -> &str;
    fn durability(&self) -> Durability;
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

pub use json_backend::JsonFileStore;
pub use session::SessionStore;
pub use tiered::{LoadReport, LoadSource, SaveReport, TieredStorage, WriteAttempt, WriteOutcome};
