#![doc(test(attr(deny(warnings))))]

//! Profit Ledger records daily revenue, commission and expenses, keeps them in
//! redundant local storage tiers, and exports backups and CSV reports.

pub mod cli;
pub mod config;
pub mod core;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Profit Ledger tracing initialized.");
    });
}
