//! CLI commands for Goalmet.
//!
//! The command line is the presentation layer: it renders the goal list
//! and turns arguments into intents.
//! - **Goal commands**: add, delete
//! - **Tracking commands**: track, untrack
//! - **Views**: list, show

pub mod output;

// Goal commands
pub mod add;
pub mod delete;

// Tracking commands
pub mod track;
pub mod untrack;

// Views
pub mod list;

pub use add::AddCommand;
pub use delete::DeleteCommand;
pub use list::{ListCommand, ShowCommand};
pub use output::{GoalInfo, IntentOutput, OutputOptions};
pub use track::TrackCommand;
pub use untrack::UntrackCommand;
