//! Ledger controller plus the validation, backup and notice machinery it drives.

pub mod backup;
pub mod ledger_manager;
pub mod notice;
pub mod services;
pub mod time;
pub mod utils;
pub mod validator;

pub use backup::{BackupManager, BackupSchedule, ImportCandidate};
pub use ledger_manager::{LedgerManager, LoadMetadata, ManagerSettings};
pub use notice::{Notice, NoticeBoard, NoticeLevel};
pub use time::{Clock, SystemClock};
