//! File-based key-value storage for Goalmet.
//!
//! Each key is stored as its own file, `<dir>/<encoded key>.json`, holding
//! the raw text that was set. Atomic writes are achieved via temp file +
//! rename. Every call does blocking filesystem I/O.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::error::{GoalmetError, Result};
use crate::storage::KeyValueStore;

/// File-based key-value store.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    /// Directory where item files are stored.
    dir: PathBuf,
}

impl FileKeyValueStore {
    /// Create a store rooted at `dir`, creating the directory if needed.
    pub fn with_dir(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();

        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|e| GoalmetError::io(&dir, e))?;
        }

        Ok(Self { dir })
    }

    /// Get the path for an item file.
    fn item_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", file_stem(key)))
    }

    /// Get the path for a temp file used during atomic writes.
    fn temp_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!(".{}.json.tmp", file_stem(key)))
    }
}

/// Map a key to a file name inside the store directory.
///
/// ASCII letters, digits and `-` are kept. Every other byte, `_` included,
/// becomes `_` plus two hex digits, so distinct keys get distinct files.
fn file_stem(key: &str) -> String {
    let mut stem = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            stem.push(char::from(byte));
        } else {
            stem.push_str(&format!("_{:02x}", byte));
        }
    }
    stem
}

impl KeyValueStore for FileKeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = self.item_path(key);

        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(GoalmetError::io(&path, e)),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let final_path = self.item_path(key);
        let temp_path = self.temp_path(key);

        {
            let mut file =
                fs::File::create(&temp_path).map_err(|e| GoalmetError::io(&temp_path, e))?;
            file.write_all(value.as_bytes())
                .map_err(|e| GoalmetError::io(&temp_path, e))?;
            file.sync_all()
                .map_err(|e| GoalmetError::io(&temp_path, e))?;
        }

        // Rename temp file to final path (atomic on POSIX)
        fs::rename(&temp_path, &final_path).map_err(|e| GoalmetError::io(&final_path, e))
    }
}
