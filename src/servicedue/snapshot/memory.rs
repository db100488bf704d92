use super::SnapshotStore;
use crate::error::{Result, ServiceDueError};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Shared in-memory byte store. Clones see the same contents, so one clone
/// can stand in for the publisher side and another for the reader side.
#[derive(Clone, Default)]
pub struct InMemorySnapshotStore {
    entries: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    fail_writes: bool,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose writes always fail.
    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>>> {
        self.entries
            .lock()
            .map_err(|_| ServiceDueError::Store("snapshot store lock poisoned".to_string()))
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn write(&mut self, key: &str, bytes: &[u8]) -> Result<()> {
        if self.fail_writes {
            return Err(ServiceDueError::Store("snapshot store is read-only".to_string()));
        }
        self.lock()?.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.lock()?.get(key).cloned())
    }
}
