//! Ledger mutations that do not touch storage.

use chrono::{DateTime, Utc};

use crate::domain::{Entry, EntryDraft, Ledger};
use crate::errors::{LedgerError, Result};

/// How an imported candidate ledger is reconciled with the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportMode {
    Replace,
    Merge,
}

/// Provides validated add/remove/import helpers for ledger entries.
pub struct EntryService;

impl EntryService {
    /// Builds an entry from `draft` and prepends it, returning a copy of the stored entry.
    pub fn add(ledger: &mut Ledger, draft: &EntryDraft, now: DateTime<Utc>) -> Result<Entry> {
        if let Some(problem) = draft.problem() {
            return Err(LedgerError::InvalidInput(problem));
        }
        let entry = Entry::from_draft(draft, now);
        ledger.prepend(entry.clone());
        Ok(entry)
    }

    /// Removes the entry at `index`. Out of range indices leave the ledger untouched.
    pub fn remove(ledger: &mut Ledger, index: usize) -> Result<Entry> {
        let len = ledger.len();
        ledger
            .remove(index)
            .ok_or(LedgerError::IndexOutOfRange { index, len })
    }

    /// Applies an already validated candidate. Returns how many entries were added.
    pub fn import(ledger: &mut Ledger, candidate: Vec<Entry>, mode: ImportMode) -> usize {
        match mode {
            ImportMode::Replace => {
                let added = candidate.len();
                ledger.entries = candidate;
                added
            }
            ImportMode::Merge => Self::merge(ledger, candidate),
        }
    }

    /// Prepends candidate entries whose id is not already present, keeping the
    /// candidate order ahead of the existing entries.
    pub fn merge(ledger: &mut Ledger, candidate: Vec<Entry>) -> usize {
        let existing = ledger.ids();
        let fresh: Vec<Entry> = candidate
            .into_iter()
            .filter(|entry| !existing.contains(&entry.id))
            .collect();
        let added = fresh.len();
        ledger.entries.splice(0..0, fresh);
        added
    }
}
