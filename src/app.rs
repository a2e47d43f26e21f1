//! Application wiring: goal store plus persistence bridge.
//!
//! `App` is what a presentation layer talks to. It rehydrates the store at
//! startup and forwards every save message the store emits to the bridge.

use std::sync::Arc;

use crate::bridge::PersistenceBridge;
use crate::core::{Goal, GoalStore, Intent};
use crate::storage::StorageAdapter;

/// A running goal tracker.
pub struct App {
    store: GoalStore,
    bridge: PersistenceBridge,
}

impl App {
    /// Start the app: read the persisted snapshot and initialize the store.
    ///
    /// Must be called from within a Tokio runtime.
    pub async fn start(adapter: Arc<dyn StorageAdapter>, key: impl Into<String>) -> Self {
        let bridge = PersistenceBridge::new(adapter, key);
        let flags = bridge.load_initial().await;
        let store = GoalStore::from_rpc(&flags);
        tracing::info!(goals = store.len(), key = bridge.key(), "goal tracker started");

        Self { store, bridge }
    }

    /// Apply a user intent.
    ///
    /// Returns whether the goal list changed. Every change has started its
    /// save by the time this returns.
    pub fn dispatch(&mut self, intent: Intent) -> bool {
        match self.store.update(intent) {
            Some(save) => {
                self.bridge.send(save);
                true
            }
            None => false,
        }
    }

    /// The goal store.
    pub fn store(&self) -> &GoalStore {
        &self.store
    }

    /// All goals in display order.
    pub fn goals(&self) -> &[Goal] {
        self.store.goals()
    }

    /// Give in-flight saves a bounded time to land, then stop.
    pub async fn shutdown(self) {
        tracing::debug!(pending = self.bridge.pending_saves(), "goal tracker stopping");
        self.bridge.shutdown().await;
    }
}
