//! Goal store state machine.
//!
//! The store is the only mutator of the goal list. Each intent either
//! applies completely and yields exactly one `save-goals` message carrying
//! the full list, or is rejected as a no-op and yields nothing.

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::goal::{decode_snapshot, EntryId, Goal, GoalId, TrackingEntry};
use super::rpc::Rpc;
use crate::error::FailOpen;

/// A user request to change the goal list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Create a goal. Blank titles are rejected.
    AddGoal { title: String },
    /// Delete a goal and all of its tracking entries.
    DeleteGoal { id: GoalId },
    /// Append a note to a goal.
    AddTrackingEntry { goal_id: GoalId, note: String },
    /// Remove one note from a goal.
    DeleteTrackingEntry { goal_id: GoalId, entry_id: EntryId },
}

/// In-memory goal list.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalStore {
    goals: Vec<Goal>,
    /// Next goal id to hand out. Only ever grows; `None` once every id
    /// has been used.
    next_goal_id: Option<GoalId>,
}

impl Default for GoalStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GoalStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            goals: Vec::new(),
            next_goal_id: Some(GoalId(1)),
        }
    }

    /// Create a store from an already decoded goal list.
    pub fn from_goals(goals: Vec<Goal>) -> Self {
        let next_goal_id = match goals.iter().map(|g| g.id.0).max() {
            Some(max) => max.checked_add(1).map(GoalId),
            None => Some(GoalId(1)),
        };
        Self {
            goals,
            next_goal_id,
        }
    }

    /// Create a store from a persisted snapshot.
    ///
    /// An absent payload gives an empty store. So does a malformed one,
    /// after logging why it was discarded.
    pub fn initialize(payload: Option<&Value>) -> Self {
        let goals = match payload {
            None | Some(Value::Null) => Vec::new(),
            Some(value) => decode_snapshot(value).fail_open_default("decoding persisted goals"),
        };
        tracing::debug!(count = goals.len(), "goal store initialized");
        Self::from_goals(goals)
    }

    /// Create a store from the host's startup message.
    pub fn from_rpc(rpc: &Rpc) -> Self {
        match rpc {
            Rpc::InitialGoals(payload) => Self::initialize(payload.as_ref()),
            other => {
                tracing::warn!(
                    command = other.command(),
                    "unexpected startup message, starting empty"
                );
                Self::new()
            }
        }
    }

    /// All goals in display order.
    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    /// Look up a goal by id.
    pub fn goal(&self, id: GoalId) -> Option<&Goal> {
        self.goals.iter().find(|g| g.id == id)
    }

    /// Number of goals.
    pub fn len(&self) -> usize {
        self.goals.len()
    }

    /// Whether the store holds no goals.
    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }

    /// The message that persists the current goal list.
    pub fn save_command(&self) -> Rpc {
        Rpc::SaveGoals(self.goals.clone())
    }

    /// Apply an intent, stamping new entries with the current time.
    pub fn update(&mut self, intent: Intent) -> Option<Rpc> {
        self.update_at(intent, Utc::now())
    }

    /// Apply an intent with an explicit clock.
    ///
    /// Returns the save message when the goal list changed, `None` when the
    /// intent was rejected.
    pub fn update_at(&mut self, intent: Intent, now: DateTime<Utc>) -> Option<Rpc> {
        let changed = match intent {
            Intent::AddGoal { title } => self.add_goal(title),
            Intent::DeleteGoal { id } => self.delete_goal(id),
            Intent::AddTrackingEntry { goal_id, note } => {
                self.add_tracking_entry(goal_id, note, now)
            }
            Intent::DeleteTrackingEntry { goal_id, entry_id } => {
                self.delete_tracking_entry(goal_id, entry_id)
            }
        };

        changed.then(|| self.save_command())
    }

    fn add_goal(&mut self, title: String) -> bool {
        if title.trim().is_empty() {
            tracing::debug!("rejected blank goal title");
            return false;
        }

        let Some(id) = self.next_goal_id else {
            tracing::warn!("no goal ids left, goal not added");
            return false;
        };
        self.next_goal_id = id.0.checked_add(1).map(GoalId);
        self.goals.push(Goal::new(id, title));
        tracing::debug!(goal_id = %id, "goal added");
        true
    }

    fn delete_goal(&mut self, id: GoalId) -> bool {
        let before = self.goals.len();
        self.goals.retain(|g| g.id != id);
        let removed = self.goals.len() != before;
        if removed {
            tracing::debug!(goal_id = %id, "goal deleted");
        }
        removed
    }

    fn add_tracking_entry(&mut self, goal_id: GoalId, note: String, now: DateTime<Utc>) -> bool {
        let Some(goal) = self.goals.iter_mut().find(|g| g.id == goal_id) else {
            tracing::debug!(goal_id = %goal_id, "tracking entry for unknown goal ignored");
            return false;
        };

        let Some(id) = goal.next_entry_id() else {
            tracing::warn!(goal_id = %goal_id, "no entry ids left on goal, note not added");
            return false;
        };
        goal.tracking_entries.push(TrackingEntry::new(id, note, now));
        tracing::debug!(goal_id = %goal_id, entry_id = %id, "tracking entry added");
        true
    }

    fn delete_tracking_entry(&mut self, goal_id: GoalId, entry_id: EntryId) -> bool {
        let Some(goal) = self.goals.iter_mut().find(|g| g.id == goal_id) else {
            return false;
        };

        let before = goal.tracking_entries.len();
        goal.tracking_entries.retain(|e| e.id != entry_id);
        let removed = goal.tracking_entries.len() != before;
        if removed {
            tracing::debug!(goal_id = %goal_id, entry_id = %entry_id, "tracking entry deleted");
        }
        removed
    }
}
