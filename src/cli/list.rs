//! List and show commands for Goalmet.
//!
//! Read-only views of the goal list. Neither command emits a save.

use serde::{Deserialize, Serialize};

use crate::app::App;
use crate::cli::output::{to_json, truncate, GoalInfo, OutputOptions};
use crate::core::GoalId;

/// Output format for the list command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListOutput {
    /// Whether the list was produced.
    pub success: bool,
    /// Number of goals.
    pub count: usize,
    /// The goals, in display order.
    pub goals: Vec<GoalInfo>,
}

/// Output format for the show command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShowOutput {
    /// Whether the goal was found.
    pub success: bool,
    /// The goal with its entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal: Option<GoalInfo>,
    /// Error message if the goal was not found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The list command implementation.
pub struct ListCommand<'a> {
    app: &'a App,
}

impl<'a> ListCommand<'a> {
    /// Create a new list command.
    pub fn new(app: &'a App) -> Self {
        Self { app }
    }

    /// Summarize every goal.
    pub fn run(&self) -> ListOutput {
        let goals: Vec<GoalInfo> = self.app.goals().iter().map(GoalInfo::summary).collect();
        ListOutput {
            success: true,
            count: goals.len(),
            goals,
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &ListOutput, options: &OutputOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            return to_json(output);
        }

        if output.goals.is_empty() {
            return "Add your first goal with `goalmet add <title>`.\n".to_string();
        }

        let mut text = String::new();
        for goal in &output.goals {
            text.push_str(&format!(
                "#{:<4} {} ({} {})\n",
                goal.id,
                truncate(&goal.title, 60),
                goal.entry_count,
                if goal.entry_count == 1 { "entry" } else { "entries" }
            ));
        }
        text
    }
}

/// The show command implementation.
pub struct ShowCommand<'a> {
    app: &'a App,
}

impl<'a> ShowCommand<'a> {
    /// Create a new show command.
    pub fn new(app: &'a App) -> Self {
        Self { app }
    }

    /// Describe one goal with its tracking entries.
    pub fn run(&self, id: GoalId) -> ShowOutput {
        match self.app.store().goal(id) {
            Some(goal) => ShowOutput {
                success: true,
                goal: Some(GoalInfo::detailed(goal)),
                error: None,
            },
            None => ShowOutput {
                success: false,
                goal: None,
                error: Some(format!("goal {} not found", id)),
            },
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &ShowOutput, options: &OutputOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            return to_json(output);
        }

        let Some(goal) = &output.goal else {
            return format!(
                "Show failed: {}\n",
                output.error.as_deref().unwrap_or("unknown error")
            );
        };

        let mut text = format!("#{} {}\n", goal.id, goal.title);
        let entries = goal.entries.as_deref().unwrap_or_default();
        if entries.is_empty() {
            text.push_str("  No tracking entries yet.\n");
        }
        for entry in entries {
            let recorded = entry
                .recorded
                .as_deref()
                .and_then(|r| r.get(..10))
                .unwrap_or("----------");
            text.push_str(&format!("  [{}] {} {}\n", entry.id, recorded, entry.note));
        }
        text
    }
}
