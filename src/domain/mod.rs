//! Domain types for Tasklet
//!
//! - Task: a unit of work with due date, priority and completion status
//! - Folder: a named grouping of tasks, including the reserved Completed Tasks folder
//! - NewTask / TaskUpdate: caller-supplied fields for create and partial update

pub mod folder;
pub mod task;
pub mod timestamp;

pub use folder::{COMPLETED_FOLDER_ID, COMPLETED_FOLDER_NAME, DEFAULT_FOLDER_NAMES, Folder, validate_folder_name};
pub use task::{NewTask, Priority, Task, TaskStatus, TaskUpdate};
