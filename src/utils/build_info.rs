use std::fmt;

/// Build details embedded by `build.rs`, shown by the `version` command.
#[derive(Debug, Clone, Copy)]
pub struct BuildMetadata {
    pub version: &'static str,
    pub git_hash: &'static str,
    pub git_status: &'static str,
    pub timestamp: &'static str,
    pub target: &'static str,
    pub profile: &'static str,
    pub rustc: &'static str,
}

pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn current() -> BuildMetadata {
    BuildMetadata {
        version: CLI_VERSION,
        git_hash: option_env!("PROFIT_LEDGER_BUILD_HASH").unwrap_or("unknown"),
        git_status: option_env!("PROFIT_LEDGER_BUILD_STATUS").unwrap_or("unknown"),
        timestamp: option_env!("PROFIT_LEDGER_BUILD_TIMESTAMP").unwrap_or("unknown"),
        target: option_env!("PROFIT_LEDGER_BUILD_TARGET").unwrap_or("unknown"),
        profile: option_env!("PROFIT_LEDGER_BUILD_PROFILE").unwrap_or("unknown"),
        rustc: option_env!("PROFIT_LEDGER_BUILD_RUSTC").unwrap_or("unknown"),
    }
}

impl BuildMetadata {
    /// `(label, value)` rows in display order.
    pub fn rows(&self) -> [(&'static str, &'static str); 6] {
        [
            ("Commit", self.git_hash),
            ("Tree", self.git_status),
            ("Built", self.timestamp),
            ("Target", self.target),
            ("Profile", self.profile),
            ("Rustc", self.rustc),
        ]
    }
}

impl fmt::Display for BuildMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "profit_ledger {} ({} {}, {})",
            self.version, self.git_hash, self.git_status, self.target
        )
    }
}
