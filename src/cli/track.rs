//! Track command for Goalmet.
//!
//! Records a note against a goal. Notes may be empty.

use crate::app::App;
use crate::cli::output::{GoalInfo, IntentOutput, OutputOptions};
use crate::core::{GoalId, Intent};

/// The track command implementation.
pub struct TrackCommand<'a> {
    app: &'a mut App,
}

impl<'a> TrackCommand<'a> {
    /// Create a new track command.
    pub fn new(app: &'a mut App) -> Self {
        Self { app }
    }

    /// Append a note to the goal with the given id.
    pub fn run(&mut self, goal_id: GoalId, note: &str) -> IntentOutput {
        let tracked = self.app.dispatch(Intent::AddTrackingEntry {
            goal_id,
            note: note.to_string(),
        });
        if !tracked {
            return IntentOutput::failure(format!("goal {} not found", goal_id));
        }

        IntentOutput::success(self.app.store().goal(goal_id).map(GoalInfo::detailed))
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &IntentOutput, options: &OutputOptions) -> String {
        let message = match &output.goal {
            Some(goal) => {
                let entry_id = goal
                    .entries
                    .as_ref()
                    .and_then(|entries| entries.last())
                    .map(|e| e.id)
                    .unwrap_or_default();
                format!(
                    "Tracked entry #{} on goal #{} ({} total).",
                    entry_id, goal.id, goal.entry_count
                )
            }
            None => "Tracked.".to_string(),
        };
        output.render(options, &message)
    }
}
