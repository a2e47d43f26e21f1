//! Persistence bridge between the goal store and a storage adapter.
//!
//! At startup the bridge performs the single read of the persistence key and
//! turns it into an `initial-goals` message. Afterwards every `save-goals`
//! message from the store becomes one write, started as its own task. The
//! bridge never waits on a write before starting the next, so a write that
//! hangs or fails does not hold back later saves. Each save carries the
//! full list, and whichever lands last is what storage holds.
//!
//! Failures are logged and swallowed in both directions. The in-memory goal
//! list stays authoritative for the session.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinSet;

use crate::core::{encode_snapshot, Goal, Rpc};
use crate::error::{FailOpen, Result};
use crate::storage::StorageAdapter;

/// How long `shutdown` waits for in-flight saves.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Host side of the goal store protocol.
pub struct PersistenceBridge {
    adapter: Arc<dyn StorageAdapter>,
    key: String,
    in_flight: Mutex<JoinSet<()>>,
}

impl PersistenceBridge {
    pub fn new(adapter: Arc<dyn StorageAdapter>, key: impl Into<String>) -> Self {
        Self {
            adapter,
            key: key.into(),
            in_flight: Mutex::new(JoinSet::new()),
        }
    }

    /// The persistence key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the persisted snapshot for the startup message.
    ///
    /// Read failures are logged and reported as an absent snapshot.
    pub async fn load_initial(&self) -> Rpc {
        let payload = self
            .adapter
            .read(&self.key)
            .await
            .fail_open_default("reading persisted goals");

        tracing::debug!(
            key = %self.key,
            adapter = self.adapter.name(),
            found = payload.is_some(),
            "startup read finished"
        );
        Rpc::InitialGoals(payload)
    }

    /// Handle a message from the goal store.
    ///
    /// Only `save-goals` is acted on: its write is started in the background
    /// and this returns at once. Must be called from within a Tokio runtime.
    pub fn send(&self, rpc: Rpc) {
        let goals = match rpc {
            Rpc::SaveGoals(goals) => goals,
            other => {
                tracing::debug!(command = other.command(), "ignoring message from goal store");
                return;
            }
        };

        let adapter = Arc::clone(&self.adapter);
        let key = self.key.clone();
        let mut in_flight = self.reaped();
        in_flight.spawn(async move { save(adapter.as_ref(), &key, &goals).await });
    }

    /// Number of saves started and not finished yet.
    pub fn pending_saves(&self) -> usize {
        self.reaped().len()
    }

    /// Wait up to `SHUTDOWN_GRACE` for in-flight saves, then stop.
    pub async fn shutdown(self) {
        self.shutdown_within(SHUTDOWN_GRACE).await;
    }

    /// Wait up to `grace` for in-flight saves, then stop.
    ///
    /// Saves still running after `grace` are abandoned.
    pub async fn shutdown_within(self, grace: Duration) {
        let mut in_flight = self
            .in_flight
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);

        let drained = tokio::time::timeout(grace, async {
            while let Some(joined) = in_flight.join_next().await {
                if let Err(err) = joined {
                    tracing::warn!(error = %err, "save task ended abnormally");
                }
            }
        })
        .await;

        if drained.is_err() {
            tracing::warn!(
                key = %self.key,
                adapter = self.adapter.name(),
                abandoned = in_flight.len(),
                "saves still pending at shutdown"
            );
            in_flight.abort_all();
        }
    }

    /// The in-flight set with finished saves removed.
    fn reaped(&self) -> MutexGuard<'_, JoinSet<()>> {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        while in_flight.try_join_next().is_some() {}
        in_flight
    }
}

async fn save(adapter: &dyn StorageAdapter, key: &str, goals: &[Goal]) {
    match write_snapshot(adapter, key, goals).await {
        Ok(()) => tracing::debug!(key, count = goals.len(), "goals saved"),
        Err(err) => tracing::warn!(
            key,
            adapter = adapter.name(),
            error = %err,
            "failed to save goals"
        ),
    }
}

async fn write_snapshot(adapter: &dyn StorageAdapter, key: &str, goals: &[Goal]) -> Result<()> {
    let value = encode_snapshot(goals)?;
    adapter.write(key, &value).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GoalId;
    use crate::error::GoalmetError;
    use crate::storage::{LocalStorageAdapter, MemoryKeyValueStore};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Adapter whose every operation fails.
    struct BrokenAdapter;

    #[async_trait]
    impl StorageAdapter for BrokenAdapter {
        fn name(&self) -> &'static str {
            "broken"
        }

        async fn read(&self, _key: &str) -> Result<Option<Value>> {
            Err(GoalmetError::adapter("read failed"))
        }

        async fn write(&self, _key: &str, _value: &Value) -> Result<()> {
            Err(GoalmetError::adapter("write failed"))
        }
    }

    /// What the first write to a `RecordingAdapter` does.
    #[derive(Clone, Copy)]
    enum FirstWrite {
        Succeed,
        Fail,
        Hang,
    }

    /// Adapter that records successful writes.
    struct RecordingAdapter {
        first: FirstWrite,
        calls: AtomicUsize,
        writes: Mutex<Vec<(String, Value)>>,
    }

    impl RecordingAdapter {
        fn new(first: FirstWrite) -> Self {
            Self {
                first,
                calls: AtomicUsize::new(0),
                writes: Mutex::new(Vec::new()),
            }
        }

        fn writes(&self) -> Vec<(String, Value)> {
            self.writes.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl StorageAdapter for RecordingAdapter {
        fn name(&self) -> &'static str {
            "recording"
        }

        async fn read(&self, _key: &str) -> Result<Option<Value>> {
            Ok(None)
        }

        async fn write(&self, key: &str, value: &Value) -> Result<()> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                match self.first {
                    FirstWrite::Succeed => {}
                    FirstWrite::Fail => return Err(GoalmetError::adapter("disk full")),
                    FirstWrite::Hang => std::future::pending::<()>().await,
                }
            }
            self.writes
                .lock()
                .unwrap()
                .push((key.to_string(), value.clone()));
            Ok(())
        }
    }

    fn memory_adapter() -> Arc<LocalStorageAdapter<MemoryKeyValueStore>> {
        Arc::new(LocalStorageAdapter::new(MemoryKeyValueStore::new()))
    }

    fn goals_titled(titles: &[&str]) -> Vec<Goal> {
        titles
            .iter()
            .zip(1..)
            .map(|(title, id)| Goal::new(GoalId(id), *title))
            .collect()
    }

    #[tokio::test]
    async fn test_load_initial_missing_key() {
        let bridge = PersistenceBridge::new(memory_adapter(), "goals");
        assert_eq!(bridge.load_initial().await, Rpc::InitialGoals(None));
        bridge.shutdown().await;
    }

    #[tokio::test]
    async fn test_load_initial_returns_snapshot() {
        let adapter = memory_adapter();
        let snapshot = json!([{ "goal": "Test goal", "trackingEntries": [] }]);
        adapter.write("goals", &snapshot).await.unwrap();

        let bridge = PersistenceBridge::new(adapter, "goals");
        assert_eq!(bridge.load_initial().await, Rpc::InitialGoals(Some(snapshot)));
        bridge.shutdown().await;
    }

    #[tokio::test]
    async fn test_read_failure_degrades_to_absent() {
        let bridge = PersistenceBridge::new(Arc::new(BrokenAdapter), "goals");
        assert_eq!(bridge.load_initial().await, Rpc::InitialGoals(None));
        bridge.shutdown().await;
    }

    #[tokio::test]
    async fn test_save_writes_full_snapshot() {
        let adapter = memory_adapter();
        let bridge = PersistenceBridge::new(adapter.clone(), "goals");

        bridge.send(Rpc::SaveGoals(goals_titled(&["a", "b"])));
        bridge.shutdown().await;

        assert_eq!(
            adapter.read("goals").await.unwrap(),
            Some(json!([
                { "id": 1, "goal": "a", "trackingEntries": [] },
                { "id": 2, "goal": "b", "trackingEntries": [] }
            ]))
        );
    }

    #[tokio::test]
    async fn test_every_save_is_written() {
        let adapter = Arc::new(RecordingAdapter::new(FirstWrite::Succeed));
        let bridge = PersistenceBridge::new(adapter.clone(), "goals");

        bridge.send(Rpc::SaveGoals(goals_titled(&["a"])));
        bridge.send(Rpc::SaveGoals(goals_titled(&["a", "b"])));
        bridge.send(Rpc::SaveGoals(goals_titled(&["a", "b", "c"])));
        bridge.shutdown().await;

        assert_eq!(adapter.writes().len(), 3);
    }

    #[tokio::test]
    async fn test_last_save_wins() {
        let adapter = memory_adapter();
        let bridge = PersistenceBridge::new(adapter.clone(), "goals");

        let mut goals = Vec::new();
        for i in 1..=5 {
            goals.push(Goal::new(GoalId(i), format!("goal {}", i)));
            bridge.send(Rpc::SaveGoals(goals.clone()));
        }
        bridge.shutdown().await;

        let stored = adapter.read("goals").await.unwrap().unwrap();
        assert_eq!(stored, encode_snapshot(&goals).unwrap());
    }

    #[tokio::test]
    async fn test_writes_use_bridge_key() {
        let adapter = Arc::new(RecordingAdapter::new(FirstWrite::Succeed));
        let bridge = PersistenceBridge::new(adapter.clone(), "custom-key");
        assert_eq!(bridge.key(), "custom-key");

        bridge.send(Rpc::SaveGoals(Vec::new()));
        bridge.shutdown().await;

        assert_eq!(adapter.writes(), vec![("custom-key".to_string(), json!([]))]);
    }

    #[tokio::test]
    async fn test_non_save_messages_ignored() {
        let adapter = Arc::new(RecordingAdapter::new(FirstWrite::Succeed));
        let bridge = PersistenceBridge::new(adapter.clone(), "goals");

        bridge.send(Rpc::InitialGoals(Some(json!([]))));
        assert_eq!(bridge.pending_saves(), 0);
        bridge.shutdown().await;

        assert!(adapter.writes().is_empty());
    }

    #[tokio::test]
    async fn test_every_write_failing_is_swallowed() {
        let bridge = PersistenceBridge::new(Arc::new(BrokenAdapter), "goals");

        bridge.send(Rpc::SaveGoals(goals_titled(&["a"])));
        bridge.send(Rpc::SaveGoals(goals_titled(&["a"])));

        bridge.shutdown().await;
    }

    #[tokio::test]
    async fn test_save_after_failed_write_lands() {
        let adapter = Arc::new(RecordingAdapter::new(FirstWrite::Fail));
        let bridge = PersistenceBridge::new(adapter.clone(), "goals");

        bridge.send(Rpc::SaveGoals(goals_titled(&["a"])));
        bridge.send(Rpc::SaveGoals(goals_titled(&["a", "b"])));
        bridge.shutdown().await;

        let writes = adapter.writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].1, encode_snapshot(&goals_titled(&["a", "b"])).unwrap());
    }

    #[tokio::test]
    async fn test_save_after_hung_write_lands() {
        let adapter = Arc::new(RecordingAdapter::new(FirstWrite::Hang));
        let bridge = PersistenceBridge::new(adapter.clone(), "goals");

        bridge.send(Rpc::SaveGoals(goals_titled(&["a"])));
        tokio::time::sleep(Duration::from_millis(20)).await;
        bridge.send(Rpc::SaveGoals(goals_titled(&["a", "b"])));
        tokio::time::sleep(Duration::from_millis(20)).await;

        let writes = adapter.writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].1, encode_snapshot(&goals_titled(&["a", "b"])).unwrap());
        assert_eq!(bridge.pending_saves(), 1);

        let finished = tokio::time::timeout(
            Duration::from_secs(2),
            bridge.shutdown_within(Duration::from_millis(50)),
        )
        .await;
        assert!(finished.is_ok(), "shutdown waited on a hung write");
    }
}
