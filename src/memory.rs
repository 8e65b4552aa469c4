use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::BackendError;
use crate::store::StorageBackend;

/// In-memory StorageBackend for testing and volatile fallback.
///
/// Clones share the same map, so a test can hand one clone to a
/// [`Store`](crate::Store) and inspect the raw persisted text through
/// another.
#[derive(Clone, Debug, Default)]
pub struct MemoryBackend {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), BackendError> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
