use dirs::home_dir;
use std::{
    env, fs,
    path::{Path, PathBuf},
};

const DEFAULT_DIR_NAME: &str = ".profit_ledger";
const HOME_ENV: &str = "PROFIT_LEDGER_HOME";
const STORE_DIR: &str = "store";
const CONFIG_DIR: &str = "config";
const CONFIG_FILE: &str = "config.json";
const EXPORT_DIR: &str = "exports";

/// Resolves every on-disk location relative to one base directory.
pub struct PathResolver;

impl PathResolver {
    /// Application data directory, `~/.profit_ledger` unless `PROFIT_LEDGER_HOME` is set.
    pub fn base_dir() -> PathBuf {
        if let Some(custom) = env::var_os(HOME_ENV) {
            return PathBuf::from(custom);
        }
        home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_DIR_NAME)
    }

    /// Directory holding one JSON file per durable key.
    pub fn store_dir_in(base: &Path) -> PathBuf {
        base.join(STORE_DIR)
    }

    pub fn config_dir_in(base: &Path) -> PathBuf {
        base.join(CONFIG_DIR)
    }

    pub fn config_file_in(base: &Path) -> PathBuf {
        Self::config_dir_in(base).join(CONFIG_FILE)
    }

    /// Export target when none is configured: the documents dir, else `<base>/exports`.
    pub fn default_export_dir(base: &Path) -> PathBuf {
        if env::var_os(HOME_ENV).is_some() {
            return base.join(EXPORT_DIR);
        }
        dirs::document_dir().unwrap_or_else(|| base.join(EXPORT_DIR))
    }
}

pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    fs::create_dir_all(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_rooted_at_base() {
        let base = Path::new("/tmp/ledger-home");
        assert_eq!(
            PathResolver::store_dir_in(base),
            PathBuf::from("/tmp/ledger-home/store")
        );
        assert_eq!(
            PathResolver::config_file_in(base),
            PathBuf::from("/tmp/ledger-home/config/config.json")
        );
    }
}
