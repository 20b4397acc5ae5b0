use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

mod file;
mod in_memory;

pub use file::FileStateStore;
pub use in_memory::InMemoryStateStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid store key: {0:?}")]
    InvalidKey(String),

    #[error("io error at {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to (de)serialize `{key}`")]
    Serde {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("store lock poisoned")]
    Poisoned,
}

/// Key/value store for durable documents, keyed by logical name
/// (e.g. `splitledger-participants`).
pub trait StateStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn put(&self, key: &str, value: String) -> Result<(), StoreError>;
}

impl<S> StateStore for Arc<S>
where
    S: StateStore + ?Sized,
{
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: String) -> Result<(), StoreError> {
        (**self).put(key, value)
    }
}
