//! Error type for Goalmet and the fail-open helper around it.
//!
//! Persistence problems never reach the user as failures. The bridge and the
//! store log them and continue with an empty value, so the in-memory goal
//! list stays usable when storage is not.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong below the goal store.
#[derive(Error, Debug)]
pub enum GoalmetError {
    /// A file in the data directory could not be read or written.
    #[error("i/o failure on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A storage adapter is in a state it cannot work with.
    #[error("storage adapter failure: {message}")]
    Adapter { message: String },

    /// A value did not have the JSON shape expected of it.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A persisted snapshot uses ids so large that no new id fits after them.
    #[error("snapshot {kind} id {id} leaves no room for new ids")]
    IdSpaceExhausted { kind: &'static str, id: u64 },

    /// Config files or the data directory could not be resolved.
    #[error("config error: {message}")]
    Config { message: String },
}

pub type Result<T> = std::result::Result<T, GoalmetError>;

impl GoalmetError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn adapter(message: impl Into<String>) -> Self {
        Self::Adapter {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

/// Swallow an error after logging it.
pub trait FailOpen<T> {
    /// Return the value, or log a warning naming `context` and return the
    /// default.
    fn fail_open_default(self, context: &str) -> T
    where
        T: Default;
}

impl<T> FailOpen<T> for Result<T> {
    fn fail_open_default(self, context: &str) -> T
    where
        T: Default,
    {
        self.unwrap_or_else(|err| {
            tracing::warn!(error = %err, "{} failed, continuing with an empty value", context);
            T::default()
        })
    }
}

/// Process exit codes for the `goalmet` binary.
pub mod exit_codes {
    /// Command ran, whether or not the goal list changed.
    pub const SUCCESS: i32 = 0;

    /// Startup failure or panic.
    pub const CRASH: i32 = 3;
}
