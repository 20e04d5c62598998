//! The ordered, newest-first collection of entries plus its derived totals.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::entry::Entry;

/// Ordered sequence of entries. New entries are prepended, so index 0 is the newest insert.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    pub entries: Vec<Entry>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<Entry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    /// Inserts `entry` at the front of the ledger.
    pub fn prepend(&mut self, entry: Entry) {
        self.entries.insert(0, entry);
    }

    pub fn remove(&mut self, index: usize) -> Option<Entry> {
        if index < self.entries.len() {
            Some(self.entries.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn ids(&self) -> HashSet<i64> {
        self.entries.iter().map(|entry| entry.id).collect()
    }
}

/// Totals over the full ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Aggregates {
    pub total_revenue: f64,
    pub total_commission: f64,
    pub total_expenses: f64,
    /// `total_commission - total_expenses`, not the sum of stored profits.
    pub net_profit: f64,
}
