//! Tasklet - a personal task and folder tracker
//!
//! Tasks and folders are stored as two JSON collections in a local key-value
//! store. Completing a task files it under a reserved "Completed Tasks"
//! folder; deleting a folder leaves its tasks unfiled.

pub mod domain;
pub mod error;
pub mod export;
pub mod id;
pub mod storage;
pub mod store;
pub mod views;

pub use error::{Result, TaskletError};
