use std::collections::HashMap;
use std::sync::RwLock;

use super::{StateStore, StoreError};

/// In-memory store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryStateStore {
    inner: RwLock<HashMap<String, String>>,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for InMemoryStateStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let map = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(map.get(key).cloned())
    }

    fn put(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        map.insert(key.to_string(), value);
        Ok(())
    }
}
