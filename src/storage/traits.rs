//! Storage traits for Goalmet.
//!
//! `StorageAdapter` is the asynchronous key-value capability the persistence
//! bridge depends on. `KeyValueStore` is the synchronous string store that
//! backs the local-storage adapter.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// Asynchronous key-value storage for JSON values.
///
/// One implementation exists per host environment. Callers never need to
/// know which one they are talking to.
#[async_trait]
pub trait StorageAdapter: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Read the value stored under `key`.
    ///
    /// Returns `Ok(None)` if nothing is stored there.
    async fn read(&self, key: &str) -> Result<Option<Value>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn write(&self, key: &str, value: &Value) -> Result<()>;
}

#[async_trait]
impl<T: StorageAdapter + ?Sized> StorageAdapter for Arc<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    async fn read(&self, key: &str) -> Result<Option<Value>> {
        (**self).read(key).await
    }

    async fn write(&self, key: &str, value: &Value) -> Result<()> {
        (**self).write(key, value).await
    }
}

/// Synchronous string key-value store, shaped like web local storage.
pub trait KeyValueStore: Send + Sync {
    /// Retrieve the text stored under `key`.
    ///
    /// Returns `Ok(None)` if the key doesn't exist.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
}

/// Blanket implementation of KeyValueStore for Arc-wrapped stores, so tests
/// can keep a handle on the store an adapter writes to.
impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        (**self).set_item(key, value)
    }
}
