//! Pure data types: entries, the ledger, and backup snapshots. No I/O.

pub mod entry;
pub mod ledger;
pub mod snapshot;

pub use entry::{Entry, EntryDraft};
pub use ledger::{Aggregates, Ledger};
pub use snapshot::{BackupSnapshot, SNAPSHOT_VERSION};
