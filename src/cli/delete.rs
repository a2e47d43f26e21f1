//! Delete command for Goalmet.
//!
//! Removes a goal together with all of its tracking entries.

use crate::app::App;
use crate::cli::output::{GoalInfo, IntentOutput, OutputOptions};
use crate::core::{GoalId, Intent};

/// The delete command implementation.
pub struct DeleteCommand<'a> {
    app: &'a mut App,
}

impl<'a> DeleteCommand<'a> {
    /// Create a new delete command.
    pub fn new(app: &'a mut App) -> Self {
        Self { app }
    }

    /// Delete the goal with the given id.
    pub fn run(&mut self, id: GoalId) -> IntentOutput {
        let removed = self.app.store().goal(id).map(GoalInfo::summary);

        if self.app.dispatch(Intent::DeleteGoal { id }) {
            IntentOutput::success(removed)
        } else {
            IntentOutput::failure(format!("goal {} not found", id))
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &IntentOutput, options: &OutputOptions) -> String {
        let message = match &output.goal {
            Some(goal) if goal.entry_count > 0 => format!(
                "Deleted goal #{} and its {} tracking entries.",
                goal.id, goal.entry_count
            ),
            Some(goal) => format!("Deleted goal #{}.", goal.id),
            None => "Deleted goal.".to_string(),
        };
        output.render(options, &message)
    }
}
