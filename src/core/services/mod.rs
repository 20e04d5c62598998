pub mod entry_service;
pub mod summary_service;

pub use entry_service::{EntryService, ImportMode};
pub use summary_service::SummaryService;
