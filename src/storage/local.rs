//! Local-storage adapter.
//!
//! Presents a synchronous `KeyValueStore` through the asynchronous
//! `StorageAdapter` interface. Values are kept as JSON text. Items that are
//! missing, empty, or not valid JSON all read as absent.
//!
//! Store calls may block on the filesystem, so they run on Tokio's blocking
//! pool. Writes take an async mutex first so they reach the store in the
//! order they were issued.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::error::{GoalmetError, Result};
use crate::storage::{KeyValueStore, StorageAdapter};

/// Storage adapter for the development build.
#[derive(Debug)]
pub struct LocalStorageAdapter<S: KeyValueStore> {
    store: Arc<S>,
    write_lock: Mutex<()>,
}

impl<S: KeyValueStore + 'static> LocalStorageAdapter<S> {
    /// Wrap a key-value store.
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
            write_lock: Mutex::new(()),
        }
    }

    /// Run a store call on the blocking pool.
    async fn blocking<T, F>(&self, call: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&S) -> Result<T> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || call(&*store))
            .await
            .map_err(|err| GoalmetError::adapter(format!("local storage task failed: {}", err)))?
    }
}

#[async_trait]
impl<S: KeyValueStore + 'static> StorageAdapter for LocalStorageAdapter<S> {
    fn name(&self) -> &'static str {
        "local-storage"
    }

    async fn read(&self, key: &str) -> Result<Option<Value>> {
        let owned_key = key.to_string();
        let raw = match self.blocking(move |store| store.get_item(&owned_key)).await? {
            Some(raw) if !raw.is_empty() => raw,
            _ => return Ok(None),
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                tracing::warn!(key, error = %err, "discarding unparseable local storage item");
                Ok(None)
            }
        }
    }

    async fn write(&self, key: &str, value: &Value) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        let owned_key = key.to_string();

        let _guard = self.write_lock.lock().await;
        self.blocking(move |store| store.set_item(&owned_key, &raw))
            .await
    }
}
