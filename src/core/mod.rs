//! Core types and logic for Goalmet.
//!
//! This module contains the goal and tracking entry types, the goal store
//! state machine and the messages it exchanges with its host.

pub mod goal;
pub mod rpc;
pub mod store;

pub use goal::{decode_snapshot, encode_snapshot, EntryId, Goal, GoalId, TrackingEntry};
pub use rpc::Rpc;
pub use store::{GoalStore, Intent};
