use thiserror::Error;

/// Error type that captures ledger persistence, import, and mutation failures.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Storage write to `{key}` ({tier}) failed: {message}")]
    StorageWrite {
        tier: String,
        key: String,
        message: String,
    },
    #[error("Critical error: data may not be saved ({0})")]
    StorageUnavailable(String),
    #[error("Invalid backup file format")]
    InvalidFormat,
    #[error("No valid entries found in backup file")]
    NoValidEntries,
    #[error("Entry index {index} is out of range (ledger holds {len} entries)")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("No data to export")]
    NothingToExport,
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
