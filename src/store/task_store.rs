//! TaskStore implementation over a key-value backend.
//!
//! Each collection is one JSON array stored under a fixed key. Every mutation
//! is a full read-modify-write of the collection(s) it touches:
//! - **tasklet_tasks**: all Task records
//! - **tasklet_folders**: all Folder records
//!
//! Entries that fail to load are skipped on read and moved to
//! `<key>_rejected` when the collection is next written.
//!
//! There is no locking. Two writers sharing a backend can overwrite each
//! other's changes.

use log::{debug, info, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::domain::{COMPLETED_FOLDER_ID, DEFAULT_FOLDER_NAMES, Folder, NewTask, Task, TaskStatus, TaskUpdate};
use crate::error::Result;
use crate::storage::KeyValueStore;

/// Storage key of the task collection
pub const TASKS_KEY: &str = "tasklet_tasks";

/// Storage key of the folder collection
pub const FOLDERS_KEY: &str = "tasklet_folders";

/// Key holding the entries of `key` that failed to load, e.g. `tasklet_tasks_rejected`.
pub fn rejected_key(key: &str) -> String {
    format!("{}_rejected", key)
}

/// Repository for tasks and folders.
#[derive(Debug)]
pub struct TaskStore<S: KeyValueStore> {
    storage: S,
}

impl<S: KeyValueStore> TaskStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// The injected backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_inner(self) -> S {
        self.storage
    }

    /// Split a stored blob into the records that deserialize and the raw
    /// values that do not. A blob that is not a JSON array is rejected whole.
    fn parse_collection<T: DeserializeOwned>(key: &str, raw: &str) -> (Vec<T>, Vec<serde_json::Value>) {
        let values: Vec<serde_json::Value> = match serde_json::from_str(raw) {
            Ok(values) => values,
            Err(e) => {
                warn!("Ignoring malformed {} collection: {}", key, e);
                return (Vec::new(), vec![serde_json::Value::String(raw.to_string())]);
            }
        };

        let mut records = Vec::with_capacity(values.len());
        let mut rejected = Vec::new();
        for (index, value) in values.into_iter().enumerate() {
            match serde_json::from_value::<T>(value.clone()) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!("Skipping malformed record #{} in {}: {}", index, key, e);
                    rejected.push(value);
                }
            }
        }
        (records, rejected)
    }

    fn stored_blob(&self, key: &str) -> Result<Option<String>> {
        Ok(self.storage.get(key)?.filter(|raw| !raw.trim().is_empty()))
    }

    /// Load a collection.
    ///
    /// Malformed data is logged and left out; the rest loads.
    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>> {
        Ok(match self.stored_blob(key)? {
            Some(raw) => Self::parse_collection(key, &raw).0,
            None => Vec::new(),
        })
    }

    /// Persist a whole collection.
    ///
    /// Whatever in the stored blob failed to load is appended to the
    /// collection's rejected key first, so overwriting never loses it.
    fn save<T: Serialize + DeserializeOwned>(&self, key: &str, records: &[T]) -> Result<()> {
        if let Some(raw) = self.stored_blob(key)? {
            let (_, rejected) = Self::parse_collection::<T>(key, &raw);
            if !rejected.is_empty() {
                self.quarantine(key, rejected)?;
            }
        }

        let json = serde_json::to_string(records)?;
        self.storage.set(key, &json)?;
        debug!("Saved {} records to {}", records.len(), key);
        Ok(())
    }

    fn quarantine(&self, key: &str, rejected: Vec<serde_json::Value>) -> Result<()> {
        let target = rejected_key(key);
        let mut kept: Vec<serde_json::Value> = match self.stored_blob(&target)? {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|_| vec![serde_json::Value::String(raw)]),
            None => Vec::new(),
        };
        let count = rejected.len();
        kept.extend(rejected);

        self.storage.set(&target, &serde_json::to_string(&kept)?)?;
        warn!("Moved {} malformed entries from {} to {}", count, key, target);
        Ok(())
    }

    /// Raw values set aside from a collection because they failed to load.
    pub fn rejected(&self, key: &str) -> Result<Vec<serde_json::Value>> {
        Ok(match self.stored_blob(&rejected_key(key))? {
            Some(raw) => serde_json::from_str(&raw)?,
            None => Vec::new(),
        })
    }

    //=== Tasks ===

    /// List every task, in insertion order.
    pub fn list_tasks(&self) -> Result<Vec<Task>> {
        self.load(TASKS_KEY)
    }

    /// Get a task by ID.
    pub fn get_task(&self, id: &str) -> Result<Option<Task>> {
        Ok(self.list_tasks()?.into_iter().find(|t| t.id == id))
    }

    /// Create a task with a fresh id and creation time, and persist it.
    pub fn add_task(&self, fields: NewTask) -> Result<Task> {
        let task = Task::create(fields);

        let mut tasks = self.list_tasks()?;
        tasks.push(task.clone());
        self.save(TASKS_KEY, &tasks)?;

        info!("Added task {} ({})", task.id, task.title);
        Ok(task)
    }

    /// Apply a partial update to a task.
    ///
    /// Unknown ids are a silent no-op (`Ok(None)`). Setting the status to
    /// Completed moves the task into the reserved folder, whatever folder the
    /// update names. Setting it to Pending while the task sits in the reserved
    /// folder leaves it unfiled; its earlier folder is not restored.
    pub fn update_task(&self, id: &str, update: TaskUpdate) -> Result<Option<Task>> {
        let mut tasks = self.list_tasks()?;
        let Some(task) = tasks.iter_mut().find(|t| t.id == id) else {
            debug!("update_task: no task with id {}", id);
            return Ok(None);
        };

        let was_completed_folder = task.in_folder(COMPLETED_FOLDER_ID);
        let new_status = update.status;
        task.apply(update);

        match new_status {
            Some(TaskStatus::Completed) => task.folder_id = Some(COMPLETED_FOLDER_ID.to_string()),
            Some(TaskStatus::Pending) if was_completed_folder => task.folder_id = None,
            _ => {}
        }

        let updated = task.clone();
        self.save(TASKS_KEY, &tasks)?;

        info!("Updated task {}", id);
        Ok(Some(updated))
    }

    /// Delete a task. Returns whether a record was removed.
    pub fn delete_task(&self, id: &str) -> Result<bool> {
        let mut tasks = self.list_tasks()?;
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        let removed = tasks.len() != before;

        self.save(TASKS_KEY, &tasks)?;

        if removed {
            info!("Deleted task {}", id);
        } else {
            debug!("delete_task: no task with id {}", id);
        }
        Ok(removed)
    }

    //=== Folders ===

    /// List every folder, in insertion order.
    pub fn list_folders(&self) -> Result<Vec<Folder>> {
        self.load(FOLDERS_KEY)
    }

    /// Get a folder by ID.
    pub fn get_folder(&self, id: &str) -> Result<Option<Folder>> {
        Ok(self.list_folders()?.into_iter().find(|f| f.id == id))
    }

    /// Create a folder with a fresh id and creation time, and persist it.
    pub fn add_folder(&self, name: impl Into<String>) -> Result<Folder> {
        let folder = Folder::new(name);

        let mut folders = self.list_folders()?;
        folders.push(folder.clone());
        self.save(FOLDERS_KEY, &folders)?;

        info!("Added folder {} ({})", folder.id, folder.name);
        Ok(folder)
    }

    /// Delete a folder and detach every task that referenced it.
    ///
    /// Tasks are kept, unfiled. The two collections are written one after the
    /// other, not atomically. The reserved folder is not protected here.
    pub fn delete_folder(&self, id: &str) -> Result<()> {
        let mut folders = self.list_folders()?;
        folders.retain(|f| f.id != id);
        self.save(FOLDERS_KEY, &folders)?;

        let mut tasks = self.list_tasks()?;
        let mut detached = 0;
        for task in tasks.iter_mut().filter(|t| t.in_folder(id)) {
            task.folder_id = None;
            detached += 1;
        }
        self.save(TASKS_KEY, &tasks)?;

        info!("Deleted folder {} ({} tasks detached)", id, detached);
        Ok(())
    }

    /// Bootstrap the folder collection. Safe to call on every start.
    ///
    /// With no folders, creates the starter set plus the reserved Completed
    /// Tasks folder. With folders but no reserved one, appends it.
    pub fn initialize_defaults(&self) -> Result<()> {
        if !self.storage.is_available() {
            return Ok(());
        }

        let mut folders = self.list_folders()?;

        if folders.is_empty() {
            folders = DEFAULT_FOLDER_NAMES.iter().map(|name| Folder::new(*name)).collect();
            folders.push(Folder::completed());
            self.save(FOLDERS_KEY, &folders)?;
            info!("Created {} default folders", folders.len());
        } else if !folders.iter().any(Folder::is_reserved) {
            folders.push(Folder::completed());
            self.save(FOLDERS_KEY, &folders)?;
            info!("Restored the reserved completed-tasks folder");
        }

        Ok(())
    }

    /// Remove both collections and anything set aside from them.
    pub fn clear_all(&self) -> Result<()> {
        for key in [TASKS_KEY, FOLDERS_KEY] {
            self.storage.remove(key)?;
            self.storage.remove(&rejected_key(key))?;
        }
        info!("Cleared all tasks and folders");
        Ok(())
    }
}
