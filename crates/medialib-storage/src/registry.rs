//! Disk registry
//!
//! Maps a file's `disk` identifier to a storage backend instance. Disks are
//! registered once at startup; lookups are lock-free afterwards.

use crate::traits::{Storage, StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::Arc;

/// Registry resolving disk identifiers to storage backends.
#[derive(Default)]
pub struct DiskRegistry {
    disks: HashMap<String, Arc<dyn Storage>>,
}

impl DiskRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            disks: HashMap::new(),
        }
    }

    /// Register a storage backend under a disk identifier.
    ///
    /// Re-registering a name replaces the previous backend.
    pub fn register(&mut self, name: impl Into<String>, storage: Arc<dyn Storage>) {
        self.disks.insert(name.into(), storage);
    }

    /// Resolve a disk identifier to its backend.
    pub fn get(&self, name: &str) -> StorageResult<Arc<dyn Storage>> {
        self.disks
            .get(name)
            .cloned()
            .ok_or_else(|| StorageError::UnknownDisk(name.to_string()))
    }

    /// Check if a disk is registered
    pub fn contains(&self, name: &str) -> bool {
        self.disks.contains_key(name)
    }
}
