//! Persistence store for Tasklet.
//!
//! `TaskStore` keeps tasks and folders consistent with each other on top of
//! any `KeyValueStore` backend.
//!
//! # Example
//!
//! ```no_run
//! use tasklet::domain::{NewTask, TaskStatus, TaskUpdate};
//! use tasklet::storage::FileStorage;
//! use tasklet::store::TaskStore;
//!
//! # fn main() -> tasklet::Result<()> {
//! let store = TaskStore::new(FileStorage::open("/tmp/tasklet")?);
//! store.initialize_defaults()?;
//!
//! let task = store.add_task(NewTask::new("Write report", chrono::Utc::now()))?;
//! store.update_task(&task.id, TaskUpdate::status(TaskStatus::Completed))?;
//! # Ok(())
//! # }
//! ```

mod task_store;

pub use task_store::{FOLDERS_KEY, TASKS_KEY, TaskStore, rejected_key};
