//! Goal and tracking entry types for Goalmet.
//!
//! These types are also the persisted wire format: a snapshot is a JSON array
//! of goal records, each shaped as
//! `{ "id": 1, "goal": "...", "trackingEntries": [{ "id": 1, "note": "...", "timestamp": "..." }] }`.
//! The `goal`, `trackingEntries` and `note` field names must stay stable so
//! previously written snapshots keep loading.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{GoalmetError, Result};

/// Identifier of a goal, unique within the store.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct GoalId(pub u64);

/// Identifier of a tracking entry, unique within its owning goal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EntryId(pub u64);

impl fmt::Display for GoalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user-named objective.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Goal {
    /// Unique goal identifier.
    pub id: GoalId,
    /// Title as entered by the user.
    #[serde(rename = "goal")]
    pub title: String,
    /// Notes recorded against this goal, oldest first.
    #[serde(rename = "trackingEntries")]
    pub tracking_entries: Vec<TrackingEntry>,
}

impl Goal {
    /// Create a goal with no tracking entries.
    pub fn new(id: GoalId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            tracking_entries: Vec::new(),
        }
    }

    /// Look up a tracking entry by id.
    pub fn entry(&self, id: EntryId) -> Option<&TrackingEntry> {
        self.tracking_entries.iter().find(|e| e.id == id)
    }

    /// The id the next tracking entry on this goal should get, or `None`
    /// once an entry already holds the largest possible id.
    pub fn next_entry_id(&self) -> Option<EntryId> {
        match self.tracking_entries.iter().map(|e| e.id.0).max() {
            Some(max) => max.checked_add(1).map(EntryId),
            None => Some(EntryId(1)),
        }
    }
}

/// A timestamped note recorded against a goal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrackingEntry {
    /// Identifier, unique within the owning goal.
    pub id: EntryId,
    /// Free text. May be empty.
    pub note: String,
    /// When the entry was recorded. Absent on entries written by older versions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl TrackingEntry {
    /// Create an entry recorded at `timestamp`.
    pub fn new(id: EntryId, note: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            note: note.into(),
            timestamp: Some(timestamp),
        }
    }
}

/// Goal record as found in storage. Ids are optional for older snapshots.
#[derive(Debug, Deserialize)]
struct GoalRecord {
    #[serde(default)]
    id: Option<u64>,
    goal: String,
    #[serde(default, rename = "trackingEntries")]
    tracking_entries: Vec<EntryRecord>,
}

#[derive(Debug, Deserialize)]
struct EntryRecord {
    #[serde(default)]
    id: Option<u64>,
    note: String,
    #[serde(default)]
    timestamp: Option<DateTime<Utc>>,
}

/// Decode a persisted snapshot into a goal list.
///
/// Record order is preserved. Missing or duplicate ids are replaced with
/// fresh ones so that goal ids are unique in the list and entry ids are
/// unique within each goal. A snapshot is rejected when its ids leave no
/// room for the next goal or entry id.
pub fn decode_snapshot(payload: &Value) -> Result<Vec<Goal>> {
    let records: Vec<GoalRecord> = serde_json::from_value(payload.clone())?;

    let goal_ids = dedupe_ids("goal", records.iter().map(|r| r.id))?;
    records
        .into_iter()
        .zip(goal_ids)
        .map(|(record, id)| {
            let entry_ids = dedupe_ids("entry", record.tracking_entries.iter().map(|e| e.id))?;
            let tracking_entries = record
                .tracking_entries
                .into_iter()
                .zip(entry_ids)
                .map(|(entry, id)| TrackingEntry {
                    id: EntryId(id),
                    note: entry.note,
                    timestamp: entry.timestamp,
                })
                .collect();
            Ok(Goal {
                id: GoalId(id),
                title: record.goal,
                tracking_entries,
            })
        })
        .collect()
}

/// Encode a goal list as a snapshot value.
pub fn encode_snapshot(goals: &[Goal]) -> Result<Value> {
    Ok(serde_json::to_value(goals)?)
}

/// Keep the first occurrence of every id and hand out fresh ids, above the
/// largest kept one, to missing and repeated ids.
///
/// Fails if any resulting id is `u64::MAX`, since nothing could follow it.
fn dedupe_ids(kind: &'static str, ids: impl Iterator<Item = Option<u64>>) -> Result<Vec<u64>> {
    let exhausted = move |id| GoalmetError::IdSpaceExhausted { kind, id };

    let mut seen = HashSet::new();
    let kept: Vec<Option<u64>> = ids
        .map(|id| id.filter(|id| seen.insert(*id)))
        .collect();

    let mut next = match seen.iter().max() {
        Some(&max) => max.checked_add(1).ok_or_else(|| exhausted(max))?,
        None => 1,
    };
    kept.into_iter()
        .map(|id| match id {
            Some(id) => Ok(id),
            None => {
                let fresh = next;
                next = fresh.checked_add(1).ok_or_else(|| exhausted(fresh))?;
                Ok(fresh)
            }
        })
        .collect()
}
