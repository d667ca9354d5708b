//! Storage layer for Tasklet - pluggable key-value backends.
//!
//! The store persists each collection as one JSON blob under a fixed key.
//! Backends:
//! - **FileStorage**: one file per key in a data directory
//! - **MemoryStorage**: process-local map, for tests
//! - **UnavailableStorage**: no persistence; reads are empty, writes dropped

mod file;
mod memory;
mod traits;

use std::path::Path;

use log::warn;

pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use traits::{KeyValueStore, UnavailableStorage};

/// Open file storage at `path`, degrading to `UnavailableStorage` if the
/// directory cannot be created.
pub fn open_or_unavailable(path: impl AsRef<Path>) -> Box<dyn KeyValueStore> {
    let path = path.as_ref();
    match FileStorage::open(path) {
        Ok(storage) => Box::new(storage),
        Err(e) => {
            warn!("Storage unavailable at {}: {}", path.display(), e);
            Box::new(UnavailableStorage)
        }
    }
}
