use std::collections::HashMap;

use super::{Durability, KeyValueStore};
use crate::errors::Result;

/// In-process tier. Contents vanish when the owning process exits.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    values: HashMap<String, String>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for SessionStore {
    fn name(&self) -> &str {
        "session"
    }

    fn durability(&self) -> Durability {
        Durability::Session
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_values_in_memory() {
        let mut store = SessionStore::new();
        store.set("profitEntries_current", "[]").unwrap();
        assert_eq!(
            store.get("profitEntries_current").unwrap().as_deref(),
            Some("[]")
        );
        store.remove("profitEntries_current").unwrap();
        assert!(store.get("profitEntries_current").unwrap().is_none());
    }
}
