#![allow(dead_code)]

use std::{path::PathBuf, rc::Rc};

use chrono::{DateTime, TimeZone, Utc};
use profit_ledger::{
    config::ConfigManager,
    core::{ledger_manager::LedgerManager, time::ManualClock},
    domain::Entry,
    storage::{JsonFileStore, SessionStore, TieredStorage},
};
use tempfile::TempDir;

/// One isolated data directory. Each `open` simulates a fresh process over it.
pub struct TestEnv {
    pub temp: TempDir,
    pub clock: Rc<ManualClock>,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            temp: TempDir::new().expect("create temp dir"),
            clock: Rc::new(ManualClock::new(start())),
        }
    }

    pub fn base(&self) -> PathBuf {
        self.temp.path().to_path_buf()
    }

    pub fn config_manager(&self) -> ConfigManager {
        ConfigManager::with_base_dir(self.base()).expect("create config manager for temp dir")
    }

    pub fn store_dir(&self) -> PathBuf {
        self.config_manager().store_dir()
    }

    /// Opens a manager over the durable files with an empty session tier.
    pub fn open(&self) -> LedgerManager {
        let config_manager = self.config_manager();
        let config = config_manager.load().expect("load config");
        let durable = JsonFileStore::new(config_manager.store_dir()).expect("json store");
        let storage = TieredStorage::new(Box::new(durable), Box::new(SessionStore::new()));
        let settings = config.settings().expect("config settings");
        LedgerManager::open(storage, settings, Box::new(Rc::clone(&self.clock)))
    }
}

pub fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 10, 6, 0, 0).unwrap()
}

pub fn entry(id: i64, commission: f64, expenses: f64) -> Entry {
    Entry {
        date: "2023-12-15".into(),
        revenue: 1_000.0,
        commission,
        expenses,
        profit: commission - expenses,
        timestamp: "2023-12-15T10:30:00.000Z".into(),
        id,
    }
}

pub fn ids(manager: &LedgerManager) -> Vec<i64> {
    manager.ledger().iter().map(|entry| entry.id).collect()
}

pub fn messages(manager: &mut LedgerManager) -> Vec<String> {
    manager
        .take_notices()
        .into_iter()
        .map(|notice| notice.message)
        .collect()
}
