//! Output types shared by the CLI commands.

use serde::{Deserialize, Serialize};

use crate::core::{Goal, TrackingEntry};

/// Options common to every command.
#[derive(Debug, Clone, Default)]
pub struct OutputOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Goal summary for output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GoalInfo {
    /// Goal ID.
    pub id: u64,
    /// Goal title.
    pub title: String,
    /// Number of tracking entries.
    pub entry_count: usize,
    /// Tracking entries, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entries: Option<Vec<EntryInfo>>,
}

impl GoalInfo {
    /// Summarize a goal without its entries.
    pub fn summary(goal: &Goal) -> Self {
        Self {
            id: goal.id.0,
            title: goal.title.clone(),
            entry_count: goal.tracking_entries.len(),
            entries: None,
        }
    }

    /// Describe a goal including its entries.
    pub fn detailed(goal: &Goal) -> Self {
        Self {
            entries: Some(goal.tracking_entries.iter().map(EntryInfo::from).collect()),
            ..Self::summary(goal)
        }
    }
}

/// Tracking entry for output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntryInfo {
    /// Entry ID.
    pub id: u64,
    /// Note text.
    pub note: String,
    /// Recorded timestamp (RFC 3339), if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recorded: Option<String>,
}

impl From<&TrackingEntry> for EntryInfo {
    fn from(entry: &TrackingEntry) -> Self {
        Self {
            id: entry.id.0,
            note: entry.note.clone(),
            recorded: entry.timestamp.map(|t| t.to_rfc3339()),
        }
    }
}

/// Result of a command that applies an intent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentOutput {
    /// Whether the goal list changed.
    pub success: bool,
    /// The goal the intent applied to, as it is now.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal: Option<GoalInfo>,
    /// Why nothing changed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl IntentOutput {
    /// Create a successful output.
    pub fn success(goal: Option<GoalInfo>) -> Self {
        Self {
            success: true,
            goal,
            error: None,
        }
    }

    /// An intent the store turned down with nothing further to say.
    pub fn unchanged() -> Self {
        Self {
            success: false,
            goal: None,
            error: None,
        }
    }

    /// Create a failed output.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            goal: None,
            error: Some(error.into()),
        }
    }

    /// Render according to options. `message` is the human-readable line,
    /// used unless there is an error to report.
    pub fn render(&self, options: &OutputOptions, message: &str) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            return to_json(self);
        }

        match &self.error {
            Some(error) => format!("Nothing changed: {}\n", error),
            None => format!("{}\n", message),
        }
    }
}

/// Pretty JSON for command output.
pub fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

/// Truncate a string with ellipsis, counting characters rather than bytes.
pub fn truncate(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        s.to_string()
    } else {
        let truncate_at = max_len.saturating_sub(3);
        let truncated: String = s.chars().take(truncate_at).collect();
        format!("{}...", truncated)
    }
}
