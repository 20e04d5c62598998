use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

use crate::core::{
    backup::DEFAULT_BACKUP_INTERVAL_SECS,
    ledger_manager::{ManagerSettings, DEFAULT_COMPANY},
    notice::DEFAULT_NOTICE_SECONDS,
    utils::{ensure_dir, PathResolver},
};
use crate::storage::json_backend::write_atomic;

/// Upper bound for both interval settings: one year.
pub const MAX_INTERVAL_SECS: i64 = 86_400 * 365;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config value `{field}`: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub company_name: String,
    pub currency_symbol: String,
    pub backup_interval_secs: i64,
    pub notice_duration_secs: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            company_name: DEFAULT_COMPANY.into(),
            currency_symbol: crate::currency::RUPEE.into(),
            backup_interval_secs: DEFAULT_BACKUP_INTERVAL_SECS,
            notice_duration_secs: DEFAULT_NOTICE_SECONDS,
            export_dir: None,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.company_name.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "company_name",
                message: "must not be empty".into(),
            });
        }
        if !(1..=MAX_INTERVAL_SECS).contains(&self.backup_interval_secs) {
            return Err(ConfigError::Invalid {
                field: "backup_interval_secs",
                message: format!(
                    "must be between 1 and {MAX_INTERVAL_SECS}, got {}",
                    self.backup_interval_secs
                ),
            });
        }
        if !(0..=MAX_INTERVAL_SECS).contains(&self.notice_duration_secs) {
            return Err(ConfigError::Invalid {
                field: "notice_duration_secs",
                message: format!(
                    "must be between 0 and {MAX_INTERVAL_SECS}, got {}",
                    self.notice_duration_secs
                ),
            });
        }
        if self.currency_symbol.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "currency_symbol",
                message: "must not be empty".into(),
            });
        }
        Ok(())
    }

    pub fn settings(&self) -> Result<ManagerSettings, ConfigError> {
        self.validate()?;
        Ok(ManagerSettings {
            company: self.company_name.clone(),
            backup_interval: seconds("backup_interval_secs", self.backup_interval_secs)?,
            notice_duration: seconds("notice_duration_secs", self.notice_duration_secs)?,
        })
    }
}

fn seconds(field: &'static str, value: i64) -> Result<Duration, ConfigError> {
    Duration::try_seconds(value).ok_or_else(|| ConfigError::Invalid {
        field,
        message: format!("{value} seconds is out of range"),
    })
}

/// Loads and saves `<base>/config/config.json`.
pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_base_dir(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        ensure_dir(&base)?;
        ensure_dir(&PathResolver::config_dir_in(&base))?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
            base,
        })
    }

    /// Reads the config file, falling back to defaults when it does not exist yet.
    pub fn load(&self) -> Result<Config, ConfigError> {
        let config = if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            serde_json::from_str(&data)?
        } else {
            Config::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        config.validate()?;
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json).map_err(|err| match err {
            crate::errors::LedgerError::Io(io) => ConfigError::Io(io),
            other => ConfigError::Io(std::io::Error::other(other.to_string())),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    pub fn store_dir(&self) -> PathBuf {
        PathResolver::store_dir_in(&self.base)
    }

    pub fn export_dir(&self, config: &Config) -> PathBuf {
        config
            .export_dir
            .clone()
            .unwrap_or_else(|| PathResolver::default_export_dir(&self.base))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn manager() -> (ConfigManager, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).expect("manager");
        (manager, temp)
    }

    #[test]
    fn missing_file_yields_defaults() {
        let (manager, _guard) = manager();
        let config = manager.load().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.backup_interval_secs, 300);
        assert_eq!(
            config.settings().unwrap().notice_duration,
            Duration::seconds(3)
        );
    }

    #[test]
    fn save_and_load_round_trip() {
        let (manager, _guard) = manager();
        let config = Config {
            company_name: "Kumar Traders".into(),
            export_dir: Some(PathBuf::from("/tmp/exports")),
            ..Config::default()
        };
        manager.save(&config).unwrap();
        assert_eq!(manager.load().unwrap(), config);
        assert_eq!(manager.export_dir(&config), PathBuf::from("/tmp/exports"));
    }

    #[test]
    fn partial_file_fills_missing_fields() {
        let (manager, _guard) = manager();
        fs::write(manager.path(), r#"{"company_name": "Kumar Traders"}"#).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config.company_name, "Kumar Traders");
        assert_eq!(config.notice_duration_secs, 3);
    }

    #[test]
    fn rejects_non_positive_interval() {
        let (manager, _guard) = manager();
        let config = Config {
            backup_interval_secs: 0,
            ..Config::default()
        };
        assert!(matches!(
            manager.save(&config),
            Err(ConfigError::Invalid {
                field: "backup_interval_secs",
                ..
            })
        ));
    }

    #[test]
    fn oversized_intervals_are_rejected_on_load() {
        let (manager, _guard) = manager();
        for (body, field) in [
            (r#"{"backup_interval_secs": 9223372036854775807}"#, "backup_interval_secs"),
            (r#"{"backup_interval_secs": 9000000000000}"#, "backup_interval_secs"),
            (r#"{"notice_duration_secs": 9000000000000}"#, "notice_duration_secs"),
        ] {
            fs::write(manager.path(), body).unwrap();
            match manager.load() {
                Err(ConfigError::Invalid { field: found, .. }) => assert_eq!(found, field),
                other => panic!("{body} should be rejected, got {other:?}"),
            }
        }
    }

    #[test]
    fn settings_refuse_out_of_range_values() {
        let config = Config {
            backup_interval_secs: i64::MAX,
            ..Config::default()
        };
        assert!(matches!(
            config.settings(),
            Err(ConfigError::Invalid {
                field: "backup_interval_secs",
                ..
            })
        ));
        let longest = Config {
            backup_interval_secs: MAX_INTERVAL_SECS,
            ..Config::default()
        };
        assert_eq!(
            longest.settings().unwrap().backup_interval,
            Duration::days(365)
        );
    }
}
