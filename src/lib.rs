//! Goalmet - personal goal tracking
//!
//! Users create named goals, record timestamped notes against them, and
//! delete either. A pure goal store turns those intents into a new goal
//! list; a persistence bridge saves the full list after every change
//! through a pluggable storage adapter and restores it at startup.

pub mod app;
pub mod bridge;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod storage;

pub use app::App;
pub use bridge::PersistenceBridge;
pub use config::{Config, Target};
pub use crate::core::{EntryId, Goal, GoalId, GoalStore, Intent, Rpc, TrackingEntry};
pub use error::{GoalmetError, Result};
pub use storage::{
    create_adapter, ExtensionStorageAdapter, FileKeyValueStore, KeyValueStore,
    LocalStorageAdapter, MemoryKeyValueStore, StorageAdapter,
};

// CLI commands
pub use cli::{AddCommand, DeleteCommand, ListCommand, ShowCommand, TrackCommand, UntrackCommand};
