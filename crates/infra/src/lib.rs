//! `splitledger-infra` — persistence adapters.
//!
//! Durable state is a handful of JSON documents in a key-value store keyed by
//! logical name. Balances and settlements are never persisted.

pub mod repository;
pub mod store;

pub use repository::{DEFAULT_KEY_PREFIX, GroupRepository};
pub use store::{FileStateStore, InMemoryStateStore, StateStore, StoreError};
