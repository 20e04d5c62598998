//! Core CLI dispatch, error types, and shell context helpers.

use std::{io, path::PathBuf};

use dialoguer::theme::ColorfulTheme;
use rustyline::error::ReadlineError;
use strsim::levenshtein;
use thiserror::Error;

use crate::{
    config::{ConfigError, ConfigManager},
    core::{ledger_manager::LedgerManager, time::SystemClock},
    currency::format_currency,
    errors::LedgerError,
    storage::{JsonFileStore, SessionStore, TieredStorage},
};

use super::commands;
use super::io as cli_io;
use super::output;
use super::registry::{CommandEntry, CommandRegistry};
pub use super::shell_context::{CliMode, ShellContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

/// Errors that end the shell.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Readline(#[from] ReadlineError),
    #[error(transparent)]
    Command(#[from] CommandError),
}

/// Errors raised by a single command; reported and then the shell continues.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_config_manager(mode, ConfigManager::new()?)
    }

    pub fn with_config_manager(
        mode: CliMode,
        config_manager: ConfigManager,
    ) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let config = config_manager.load()?;
        let durable = JsonFileStore::new(config_manager.store_dir())?;
        let storage = TieredStorage::new(Box::new(durable), Box::new(SessionStore::new()));
        let manager = LedgerManager::open(storage, config.settings()?, Box::new(SystemClock));

        let mut app = ShellContext {
            mode,
            registry,
            manager,
            theme: ColorfulTheme::default(),
            config_manager,
            config,
            last_command: None,
            running: true,
        };
        app.flush_notices();
        Ok(app)
    }

    pub(crate) fn prompt(&self) -> String {
        format!("profit ({} entries)> ", self.manager.ledger().len())
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    /// Renders an amount with the configured currency symbol.
    pub(crate) fn money(&self, amount: f64) -> String {
        format_currency(amount, &self.config.currency_symbol)
    }

    /// Export target: the configured directory or the platform default.
    pub(crate) fn export_dir(&self) -> PathBuf {
        self.config_manager.export_dir(&self.config)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        self.manager.tick();
        let outcome = match self.registry.handler(command) {
            Some(handler) => match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            },
            None => {
                self.suggest_command(raw);
                Ok(LoopControl::Continue)
            }
        };
        self.flush_notices();
        outcome
    }

    #[cfg(test)]
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match crate::cli::shell::parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                self.print_warning(&err.to_string());
                return Ok(LoopControl::Continue);
            }
        };
        if tokens.is_empty() {
            return Ok(LoopControl::Continue);
        }
        let command = tokens[0].to_lowercase();
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();
        self.dispatch(&command, &tokens[0], &args)
    }

    /// Prints notices the controller posted since the last flush.
    pub(crate) fn flush_notices(&mut self) {
        for notice in self.manager.take_notices() {
            output::notice(&notice);
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let mut suggestions: Vec<_> = self
            .registry
            .names()
            .map(|key| (levenshtein(key, input), key))
            .collect();
        suggestions.sort_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = suggestions.first() {
            if *distance <= 3 {
                cli_io::print_info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    /// Asks before a destructive action. Script mode only proceeds with `--yes`.
    pub(crate) fn confirm(&self, prompt: &str, args: &[&str]) -> Result<bool, CommandError> {
        if args.iter().any(|arg| matches!(*arg, "--yes" | "-y")) {
            return Ok(true);
        }
        match self.mode {
            CliMode::Interactive => cli_io::confirm_action(&self.theme, prompt, false),
            CliMode::Script => {
                cli_io::print_warning(format!("{prompt} Pass --yes to confirm."));
                Ok(false)
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(cli_io::confirm_action(&self.theme, "Exit shell?", true)?)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                self.print_error(&message);
                cli_io::print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            other => {
                self.print_error(&other.to_string());
                Ok(())
            }
        }
    }

    /// Writes the final snapshot before the process exits.
    pub(crate) fn shutdown(&mut self) {
        self.manager.shutdown();
        self.flush_notices();
    }

    pub(crate) fn print_error(&self, message: &str) {
        cli_io::print_error(message);
    }

    pub(crate) fn print_warning(&self, message: &str) {
        cli_io::print_warning(message);
    }
}
