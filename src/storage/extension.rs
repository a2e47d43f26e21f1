//! Extension-storage adapter.
//!
//! Models the packaged extension's storage area: one JSON object, kept in a
//! single file, mapping keys to values. All I/O goes through `tokio::fs`.
//! Writes are read-modify-write of the whole area, serialized through an
//! async mutex and committed with temp file + rename.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::fs;
use tokio::sync::Mutex;

use crate::error::{GoalmetError, Result};
use crate::storage::StorageAdapter;

/// Storage adapter for the packaged-extension build.
#[derive(Debug)]
pub struct ExtensionStorageAdapter {
    /// Path to the storage area file.
    path: PathBuf,
    /// Serializes read-modify-write cycles.
    write_lock: Mutex<()>,
}

impl ExtensionStorageAdapter {
    /// Create an adapter backed by the storage area at `path`.
    ///
    /// The file and its parent directory are created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path to the storage area file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Load the whole storage area. A missing file is an empty area.
    async fn load_area(&self) -> Result<Map<String, Value>> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(GoalmetError::io(&self.path, e)),
        };

        match serde_json::from_str::<Value>(&content)? {
            Value::Object(area) => Ok(area),
            _ => Err(GoalmetError::adapter(format!(
                "storage area {} is not a JSON object",
                self.path.display()
            ))),
        }
    }

    async fn store_area(&self, area: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| GoalmetError::io(parent, e))?;
            }
        }

        let json = serde_json::to_vec(area)?;
        let temp_path = self.temp_path();
        fs::write(&temp_path, json)
            .await
            .map_err(|e| GoalmetError::io(&temp_path, e))?;
        fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| GoalmetError::io(&self.path, e))
    }
}

#[async_trait]
impl StorageAdapter for ExtensionStorageAdapter {
    fn name(&self) -> &'static str {
        "extension-storage"
    }

    async fn read(&self, key: &str) -> Result<Option<Value>> {
        let mut area = self.load_area().await?;
        Ok(area.remove(key))
    }

    async fn write(&self, key: &str, value: &Value) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let mut area = self.load_area().await?;
        area.insert(key.to_string(), value.clone());
        self.store_area(&area).await
    }
}
