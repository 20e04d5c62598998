//! Interactive and scripted shell over the ledger controller.

pub mod commands;
pub mod core;
pub mod help;
pub mod io;
pub mod output;
pub mod registry;
mod shell;
pub mod shell_context;
pub mod ui;

pub use shell::run_cli;
