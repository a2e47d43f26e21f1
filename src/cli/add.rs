//! Add command for Goalmet.
//!
//! Creates a goal from a title. A blank title leaves the goal list as it
//! was, which is all the command reports.

use crate::app::App;
use crate::cli::output::{truncate, GoalInfo, IntentOutput, OutputOptions};
use crate::core::Intent;

/// The add command implementation.
pub struct AddCommand<'a> {
    app: &'a mut App,
}

impl<'a> AddCommand<'a> {
    /// Create a new add command.
    pub fn new(app: &'a mut App) -> Self {
        Self { app }
    }

    /// Add a goal with the given title.
    pub fn run(&mut self, title: &str) -> IntentOutput {
        let added = self.app.dispatch(Intent::AddGoal {
            title: title.to_string(),
        });
        if !added {
            return IntentOutput::unchanged();
        }

        IntentOutput::success(self.app.goals().last().map(GoalInfo::summary))
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &IntentOutput, options: &OutputOptions) -> String {
        let message = match &output.goal {
            Some(goal) => format!("Added goal #{}: {}", goal.id, truncate(&goal.title, 80)),
            None if output.success => "Added goal.".to_string(),
            None => "No goal added.".to_string(),
        };
        output.render(options, &message)
    }
}
