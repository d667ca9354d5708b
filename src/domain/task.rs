//! Task record and related types

use crate::domain::timestamp;
use crate::error::{Result, TaskletError};
use crate::id::{generate_id, now};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A user-defined unit of work
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier, generated at creation
    pub id: String,

    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(with = "timestamp")]
    pub due_date: DateTime<Utc>,

    #[serde(default, with = "timestamp::option", skip_serializing_if = "Option::is_none")]
    pub reminder_time: Option<DateTime<Utc>>,

    /// Owning folder (None means unfiled)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,

    pub priority: Priority,

    pub status: TaskStatus,

    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// Completion state of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    Pending,
    Completed,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = TaskletError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(TaskletError::InvalidInput(format!("unknown priority: {}", other))),
        }
    }
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::Completed => "Completed",
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, TaskStatus::Completed)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = TaskletError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(TaskStatus::Pending),
            "completed" => Ok(TaskStatus::Completed),
            other => Err(TaskletError::InvalidInput(format!("unknown status: {}", other))),
        }
    }
}

/// Fields supplied by the caller when creating a task.
///
/// Everything except the generated `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub reminder_time: Option<DateTime<Utc>>,
    pub folder_id: Option<String>,
    pub priority: Priority,
    pub status: TaskStatus,
}

impl NewTask {
    /// A pending, medium-priority, unfiled task.
    pub fn new(title: impl Into<String>, due_date: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            due_date,
            reminder_time: None,
            folder_id: None,
            priority: Priority::Medium,
            status: TaskStatus::Pending,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn reminder(mut self, at: DateTime<Utc>) -> Self {
        self.reminder_time = Some(at);
        self
    }

    pub fn folder(mut self, folder_id: impl Into<String>) -> Self {
        self.folder_id = Some(folder_id.into());
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Boundary check for caller-supplied fields. The store does not call this.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(TaskletError::InvalidInput("task title must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Partial update applied by `TaskStore::update_task`.
///
/// `None` leaves a field untouched. The clearable fields use a nested option:
/// `Some(None)` clears, `Some(Some(v))` sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub reminder_time: Option<Option<DateTime<Utc>>>,
    pub folder_id: Option<Option<String>>,
    pub priority: Option<Priority>,
    pub status: Option<TaskStatus>,
}

impl TaskUpdate {
    /// An update that only changes the status.
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn validate(&self) -> Result<()> {
        if self.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(TaskletError::InvalidInput("task title must not be empty".to_string()));
        }
        Ok(())
    }
}

impl Task {
    /// Build a task from caller fields, generating its id and creation time.
    pub fn create(fields: NewTask) -> Self {
        Self {
            id: generate_id(),
            title: fields.title,
            description: fields.description,
            due_date: fields.due_date,
            reminder_time: fields.reminder_time,
            folder_id: fields.folder_id,
            priority: fields.priority,
            status: fields.status,
            created_at: now(),
        }
    }

    /// Overwrite the fields present in `update`. `id` and `created_at` never change.
    pub fn apply(&mut self, update: TaskUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(due_date) = update.due_date {
            self.due_date = due_date;
        }
        if let Some(reminder_time) = update.reminder_time {
            self.reminder_time = reminder_time;
        }
        if let Some(folder_id) = update.folder_id {
            self.folder_id = folder_id;
        }
        if let Some(priority) = update.priority {
            self.priority = priority;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == TaskStatus::Pending
    }

    pub fn in_folder(&self, folder_id: &str) -> bool {
        self.folder_id.as_deref() == Some(folder_id)
    }
}
