//! Untrack command for Goalmet.
//!
//! Deletes one tracking entry from a goal.

use crate::app::App;
use crate::cli::output::{GoalInfo, IntentOutput, OutputOptions};
use crate::core::{EntryId, GoalId, Intent};

/// The untrack command implementation.
pub struct UntrackCommand<'a> {
    app: &'a mut App,
}

impl<'a> UntrackCommand<'a> {
    /// Create a new untrack command.
    pub fn new(app: &'a mut App) -> Self {
        Self { app }
    }

    /// Delete entry `entry_id` from goal `goal_id`.
    pub fn run(&mut self, goal_id: GoalId, entry_id: EntryId) -> IntentOutput {
        if self.app.store().goal(goal_id).is_none() {
            return IntentOutput::failure(format!("goal {} not found", goal_id));
        }

        if !self
            .app
            .dispatch(Intent::DeleteTrackingEntry { goal_id, entry_id })
        {
            return IntentOutput::failure(format!(
                "goal {} has no entry {}",
                goal_id, entry_id
            ));
        }

        IntentOutput::success(self.app.store().goal(goal_id).map(GoalInfo::summary))
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &IntentOutput, options: &OutputOptions) -> String {
        let message = match &output.goal {
            Some(goal) => format!(
                "Deleted entry from goal #{} ({} left).",
                goal.id, goal.entry_count
            ),
            None => "Deleted entry.".to_string(),
        };
        output.render(options, &message)
    }
}
