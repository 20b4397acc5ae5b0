//! Load/save a [`Group`] as separate documents in a [`StateStore`].

use serde::Serialize;
use serde::de::DeserializeOwned;

use splitledger_core::{GroupId, IdGenerator};
use splitledger_group::{Currency, Group, GroupSnapshot};
use splitledger_ledger::{Expense, Participant};

use crate::store::{StateStore, StoreError};

pub const DEFAULT_KEY_PREFIX: &str = "splitledger-";

const GROUP_KEY: &str = "group";
const PARTICIPANTS_KEY: &str = "participants";
const EXPENSES_KEY: &str = "expenses";
const CURRENCY_KEY: &str = "currency";

/// Persists participants, expenses and currency verbatim, each under its own
/// `{prefix}{name}` key.
#[derive(Debug, Clone)]
pub struct GroupRepository<S> {
    store: S,
    prefix: String,
}

impl<S: StateStore> GroupRepository<S> {
    pub fn new(store: S) -> Self {
        Self::with_prefix(store, DEFAULT_KEY_PREFIX)
    }

    pub fn with_prefix(store: S, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn key(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name)
    }

    fn read<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, StoreError> {
        let key = self.key(name);
        match self.store.get(&key)? {
            None => Ok(None),
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|source| StoreError::Serde { key, source }),
        }
    }

    fn write<T: Serialize>(&self, name: &str, value: &T) -> Result<(), StoreError> {
        let key = self.key(name);
        let raw = serde_json::to_string_pretty(value).map_err(|source| StoreError::Serde {
            key: key.clone(),
            source,
        })?;
        self.store.put(&key, raw)
    }

    /// Load the stored group. Missing documents load as empty collections and
    /// the default currency; a missing group id is freshly generated.
    pub fn load(&self, ids: &dyn IdGenerator) -> Result<Group, StoreError> {
        let id = match self.read::<GroupId>(GROUP_KEY)? {
            Some(id) => id,
            None => {
                let id = GroupId::generate(ids);
                tracing::info!(group_id = %id, "no stored group id; starting a new group");
                id
            }
        };

        let participants: Vec<Participant> = self.read(PARTICIPANTS_KEY)?.unwrap_or_default();
        let expenses: Vec<Expense> = self.read(EXPENSES_KEY)?.unwrap_or_default();
        let currency: Currency = self.read(CURRENCY_KEY)?.unwrap_or_default();

        tracing::debug!(
            group_id = %id,
            participants = participants.len(),
            expenses = expenses.len(),
            currency = %currency.code,
            "loaded group"
        );

        Ok(Group::from_snapshot(GroupSnapshot {
            id,
            participants,
            expenses,
            currency,
        }))
    }

    pub fn save(&self, group: &Group) -> Result<(), StoreError> {
        let snapshot = group.snapshot();

        self.write(GROUP_KEY, &snapshot.id)?;
        self.write(PARTICIPANTS_KEY, &snapshot.participants)?;
        self.write(EXPENSES_KEY, &snapshot.expenses)?;
        self.write(CURRENCY_KEY, &snapshot.currency)?;

        tracing::debug!(
            group_id = %snapshot.id,
            participants = snapshot.participants.len(),
            expenses = snapshot.expenses.len(),
            "saved group"
        );
        Ok(())
    }
}
