//! Storage backends for Goalmet.
//!
//! The persistence bridge only sees the `StorageAdapter` capability. Which
//! adapter backs it is decided here, from the configured build target.

pub mod extension;
pub mod file;
pub mod local;
pub mod memory;
pub mod traits;

use std::sync::Arc;

pub use extension::ExtensionStorageAdapter;
pub use file::FileKeyValueStore;
pub use local::LocalStorageAdapter;
pub use memory::MemoryKeyValueStore;
pub use traits::{KeyValueStore, StorageAdapter};

use crate::config::{StorageConfig, Target};
use crate::error::{GoalmetError, Result};

/// File name of the extension storage area inside the data directory.
pub const EXTENSION_AREA_FILE: &str = "extension-storage.json";

/// Directory name of the local storage items inside the data directory.
pub const LOCAL_STORAGE_DIR: &str = "local-storage";

/// Create the storage adapter for the configured target.
pub fn create_adapter(config: &StorageConfig) -> Result<Arc<dyn StorageAdapter>> {
    let dir = config.data_dir().ok_or_else(|| {
        GoalmetError::config("Could not determine data directory (no home directory)")
    })?;

    let adapter: Arc<dyn StorageAdapter> = match config.target {
        Target::Development => {
            let store = FileKeyValueStore::with_dir(dir.join(LOCAL_STORAGE_DIR))?;
            Arc::new(LocalStorageAdapter::new(store))
        }
        Target::Production => Arc::new(ExtensionStorageAdapter::new(
            dir.join(EXTENSION_AREA_FILE),
        )),
    };

    tracing::debug!(adapter = adapter.name(), dir = %dir.display(), "storage adapter selected");
    Ok(adapter)
}
