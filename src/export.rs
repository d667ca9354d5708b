//! Export of tasks to CSV, a JSON backup, and a shareable text list.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Folder, Task, TaskStatus, timestamp};
use crate::error::{Result, TaskletError};
use crate::views::folder_name;

/// Column header of the CSV export
pub const CSV_HEADER: &str = "Title,Description,Due Date,Priority,Status,Folder,Created At";

/// en-US short date, e.g. `1/10/2025`
pub const DEFAULT_DATE_FORMAT: &str = "%-m/%-d/%Y";

const NO_FOLDER: &str = "No Folder";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = TaskletError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(TaskletError::InvalidInput(format!("unknown export format: {}", other))),
        }
    }
}

/// Which tasks go into an export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFilter {
    /// Only tasks in this folder; all tasks when None
    pub folder_id: Option<String>,
    pub include_completed: bool,
}

impl Default for ExportFilter {
    fn default() -> Self {
        Self {
            folder_id: None,
            include_completed: true,
        }
    }
}

impl ExportFilter {
    pub fn apply(&self, tasks: &[Task]) -> Vec<Task> {
        tasks
            .iter()
            .filter(|t| self.folder_id.as_deref().is_none_or(|id| t.in_folder(id)))
            .filter(|t| self.include_completed || t.is_pending())
            .cloned()
            .collect()
    }
}

/// Full backup document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Backup {
    #[serde(with = "timestamp")]
    pub export_date: DateTime<Utc>,
    pub tasks: Vec<Task>,
    pub folders: Vec<Folder>,
}

fn format_date<Tz: TimeZone>(ts: &DateTime<Utc>, tz: &Tz, date_format: &str) -> String
where
    Tz::Offset: fmt::Display,
{
    ts.with_timezone(tz).format(date_format).to_string()
}

fn csv_quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Render tasks as CSV.
///
/// Title and description are always quoted; folder names resolve against
/// `folders`; dates are calendar dates in `tz`. Rows are newline-separated with
/// no trailing newline, so an empty task list yields just the header.
pub fn export_csv<Tz: TimeZone>(tasks: &[Task], folders: &[Folder], date_format: &str, tz: &Tz) -> String
where
    Tz::Offset: fmt::Display,
{
    let mut lines = Vec::with_capacity(tasks.len() + 1);
    lines.push(CSV_HEADER.to_string());

    for task in tasks {
        let row = [
            csv_quote(&task.title),
            csv_quote(&task.description),
            format_date(&task.due_date, tz, date_format),
            task.priority.to_string(),
            task.status.to_string(),
            folder_name(folders, task.folder_id.as_deref())
                .unwrap_or(NO_FOLDER)
                .to_string(),
            format_date(&task.created_at, tz, date_format),
        ];
        lines.push(row.join(","));
    }

    lines.join("\n")
}

/// Render a pretty-printed JSON backup of both collections.
pub fn export_json(tasks: &[Task], folders: &[Folder], export_date: DateTime<Utc>) -> Result<String> {
    let backup = Backup {
        export_date,
        tasks: tasks.to_vec(),
        folders: folders.to_vec(),
    };
    Ok(serde_json::to_string_pretty(&backup)?)
}

/// Render a plain-text task list for sharing.
pub fn share_text<Tz: TimeZone>(tasks: &[Task], folders: &[Folder], date_format: &str, tz: &Tz) -> String
where
    Tz::Offset: fmt::Display,
{
    let mut text = String::from("📋 My Task List\n\n");

    let (pending, completed): (Vec<&Task>, Vec<&Task>) =
        tasks.iter().partition(|t| t.status == TaskStatus::Pending);

    if !pending.is_empty() {
        text.push_str("⏳ Pending Tasks:\n");
        for task in &pending {
            text.push_str(&format!("• {}", task.title));
            if let Some(name) = folder_name(folders, task.folder_id.as_deref()) {
                text.push_str(&format!(" ({})", name));
            }
            text.push_str(&format!(" - Due: {}\n", format_date(&task.due_date, tz, date_format)));
        }
        text.push('\n');
    }

    if !completed.is_empty() {
        text.push_str("✅ Completed Tasks:\n");
        for task in &completed {
            text.push_str(&format!("• {}", task.title));
            if let Some(name) = folder_name(folders, task.folder_id.as_deref()) {
                text.push_str(&format!(" ({})", name));
            }
            text.push('\n');
        }
    }

    text.push_str("\nCreated with Tasklet 📱");
    text
}

/// Default file name for an export made on `date`.
pub fn export_filename(format: ExportFormat, date: NaiveDate) -> String {
    format!("tasklet-export-{}.{}", date.format("%Y-%m-%d"), format.extension())
}
