//! Map-backed session store.

use std::collections::BTreeMap;

use crate::domain::ports::{SessionStore, SessionStoreError};

/// Session values held in memory; lost when dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorySessionStore {
    entries: BTreeMap<String, String>,
}

impl MemorySessionStore {
    /// Stored keys, sorted.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionStoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SessionStoreError> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), SessionStoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn set_replaces_and_remove_forgets() {
        let mut store = MemorySessionStore::default();
        store.set("theme", "light").expect("set");
        store.set("theme", "dark").expect("replace");
        assert_eq!(store.get("theme").expect("get").as_deref(), Some("dark"));
        store.remove("theme").expect("remove");
        store.remove("theme").expect("absent keys are ignored");
        assert_eq!(store.keys().count(), 0);
    }
}
