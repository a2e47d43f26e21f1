//! In-memory key-value storage.
//!
//! Thread-safe `KeyValueStore` kept entirely in memory. Used in tests and
//! for throwaway sessions where nothing should touch the disk.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{GoalmetError, Result};
use crate::storage::KeyValueStore;

/// In-memory key-value store.
///
/// Items are lost when the store is dropped.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    items: RwLock<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
        }
    }
}

fn poisoned(err: impl std::fmt::Display) -> GoalmetError {
    GoalmetError::adapter(format!("memory store lock poisoned: {}", err))
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let items = self.items.read().map_err(poisoned)?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut items = self.items.write().map_err(poisoned)?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::traits::tests::test_key_value_store_crud;

    #[test]
    fn test_memory_store_crud() {
        let store = MemoryKeyValueStore::new();
        test_key_value_store_crud(&store);
    }

    #[test]
    fn test_new_store_has_no_items() {
        let store = MemoryKeyValueStore::default();
        assert!(store.get_item("goals").unwrap().is_none());
    }

    #[test]
    fn test_set_item_replaces_existing() {
        let store = MemoryKeyValueStore::new();
        store.set_item("goals", "[]").unwrap();
        store.set_item("goals", "[1]").unwrap();

        assert_eq!(store.get_item("goals").unwrap().as_deref(), Some("[1]"));
    }

    #[test]
    fn test_thread_safety() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(MemoryKeyValueStore::new());
        let handles: Vec<_> = (0..10)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    let key = format!("k{}", i);
                    store.set_item(&key, "v").unwrap();
                    store.get_item(&key).unwrap();
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        for i in 0..10 {
            let key = format!("k{}", i);
            assert_eq!(store.get_item(&key).unwrap().as_deref(), Some("v"));
        }
    }
}
