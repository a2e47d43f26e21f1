//! Messages exchanged between the goal store and its host.
//!
//! The host hands the store an `initial-goals` message at startup and the
//! store answers every successful mutation with a `save-goals` message that
//! carries the complete goal list. On the wire both are
//! `{ "command": "<name>", "payload": ... }`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::goal::Goal;

/// Host protocol message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", content = "payload", rename_all = "kebab-case")]
pub enum Rpc {
    /// Persisted snapshot read at startup, if there was one.
    InitialGoals(Option<Value>),
    /// Full goal list to persist.
    SaveGoals(Vec<Goal>),
}

impl Rpc {
    /// Wire name of the command.
    pub fn command(&self) -> &'static str {
        match self {
            Rpc::InitialGoals(_) => "initial-goals",
            Rpc::SaveGoals(_) => "save-goals",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::goal::GoalId;
    use serde_json::json;

    #[test]
    fn test_save_goals_wire_shape() {
        let rpc = Rpc::SaveGoals(vec![Goal::new(GoalId(1), "My first goal")]);
        let value = serde_json::to_value(&rpc).unwrap();

        assert_eq!(
            value,
            json!({
                "command": "save-goals",
                "payload": [{ "id": 1, "goal": "My first goal", "trackingEntries": [] }]
            })
        );
    }

    #[test]
    fn test_initial_goals_decodes() {
        let value = json!({
            "command": "initial-goals",
            "payload": [{ "goal": "Test goal", "trackingEntries": [] }]
        });

        let rpc: Rpc = serde_json::from_value(value).unwrap();
        match rpc {
            Rpc::InitialGoals(Some(payload)) => assert!(payload.is_array()),
            other => panic!("unexpected rpc: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_command_fails_to_decode() {
        let value = json!({ "command": "drop-everything", "payload": null });
        assert!(serde_json::from_value::<Rpc>(value).is_err());
    }

    #[test]
    fn test_command_names() {
        assert_eq!(Rpc::InitialGoals(None).command(), "initial-goals");
        assert_eq!(Rpc::SaveGoals(Vec::new()).command(), "save-goals");
    }
}
