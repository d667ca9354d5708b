//! Folder record and the reserved Completed Tasks folder

use crate::domain::timestamp;
use crate::error::{Result, TaskletError};
use crate::id::{generate_id, now};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixed identity of the folder that collects completed tasks
pub const COMPLETED_FOLDER_ID: &str = "completed-tasks-folder";

pub const COMPLETED_FOLDER_NAME: &str = "Completed Tasks";

/// User folders created on first start, before the reserved folder
pub const DEFAULT_FOLDER_NAMES: [&str; 3] = ["Work/Project", "Study", "Other"];

/// A named grouping of tasks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: String,
    pub name: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Folder {
    /// Create a user folder with a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            created_at: now(),
        }
    }

    /// The reserved Completed Tasks folder.
    pub fn completed() -> Self {
        Self {
            id: COMPLETED_FOLDER_ID.to_string(),
            name: COMPLETED_FOLDER_NAME.to_string(),
            created_at: now(),
        }
    }

    pub fn is_reserved(&self) -> bool {
        self.id == COMPLETED_FOLDER_ID
    }
}

/// Boundary check for folder names. The store does not call this.
pub fn validate_folder_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(TaskletError::InvalidInput("folder name must not be empty".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_folder_is_not_reserved() {
        let folder = Folder::new("Work");
        assert_eq!(folder.name, "Work");
        assert!(!folder.id.is_empty());
        assert!(!folder.is_reserved());
    }

    #[test]
    fn test_completed_folder_identity() {
        let folder = Folder::completed();
        assert_eq!(folder.id, COMPLETED_FOLDER_ID);
        assert_eq!(folder.name, COMPLETED_FOLDER_NAME);
        assert!(folder.is_reserved());
    }

    #[test]
    fn test_validate_folder_name() {
        assert!(validate_folder_name("Errands").is_ok());
        assert!(validate_folder_name("").is_err());
        assert!(validate_folder_name(" \t").is_err());
    }

    #[test]
    fn test_folder_wire_format() {
        let json = serde_json::to_value(Folder::completed()).unwrap();
        assert_eq!(json["id"], "completed-tasks-folder");
        assert_eq!(json["name"], "Completed Tasks");
        assert!(json["createdAt"].as_str().unwrap().ends_with('Z'));
    }
}
