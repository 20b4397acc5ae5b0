//! Ledger aggregation: who paid what, who owes what.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use splitledger_core::ParticipantId;

use crate::expense::{Expense, Split};
use crate::participant::Participant;

/// Derived per-participant position. Positive `balance` means the participant
/// is owed money; negative means they owe money.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    pub participant_id: ParticipantId,
    pub total_paid: f64,
    pub total_owed: f64,
    pub balance: f64,
}

impl Balance {
    fn zero(participant_id: ParticipantId) -> Self {
        Self {
            participant_id,
            total_paid: 0.0,
            total_owed: 0.0,
            balance: 0.0,
        }
    }
}

/// Balances keyed by participant, in participant order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Balances {
    entries: Vec<Balance>,
}

impl Balances {
    pub fn get(&self, participant_id: ParticipantId) -> Option<&Balance> {
        self.entries
            .iter()
            .find(|b| b.participant_id == participant_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Balance> {
        self.entries.iter()
    }

    /// `(participant, net balance)` pairs in participant order; feed this to
    /// [`crate::plan`].
    pub fn net(&self) -> impl Iterator<Item = (ParticipantId, f64)> + '_ {
        self.entries.iter().map(|b| (b.participant_id, b.balance))
    }

    /// Sum of all net balances. Zero (up to float noise) whenever every
    /// expense's splits total 100%.
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|b| b.balance).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a Balances {
    type Item = &'a Balance;
    type IntoIter = core::slice::Iter<'a, Balance>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Fold expenses into per-participant totals.
///
/// Payers or split targets that do not resolve against `participants` are
/// skipped. No rounding is applied.
pub fn aggregate(participants: &[Participant], expenses: &[Expense]) -> Balances {
    let mut entries: Vec<Balance> = Vec::with_capacity(participants.len());
    let mut index: HashMap<ParticipantId, usize> = HashMap::with_capacity(participants.len());

    for p in participants {
        // first occurrence wins if an id is repeated
        if !index.contains_key(&p.id) {
            index.insert(p.id, entries.len());
            entries.push(Balance::zero(p.id));
        }
    }

    for expense in expenses {
        if let Some(&i) = index.get(&expense.paid_by) {
            entries[i].total_paid += expense.amount;
        }

        for split in &expense.splits {
            if let Some(&i) = index.get(&split.participant_id) {
                entries[i].total_owed += expense.amount * split.percentage / 100.0;
            }
        }
    }

    for b in &mut entries {
        b.balance = b.total_paid - b.total_owed;
    }

    Balances { entries }
}

/// Percentage each of `n` participants receives under an equal split.
///
/// `n` must be non-zero.
pub fn equal_split_percentage(n: usize) -> f64 {
    100.0 / n as f64
}

/// Equal splits across all `participants`, in order.
///
/// `participants` must be non-empty.
pub fn equal_splits(participants: &[Participant]) -> Vec<Split> {
    let percentage = equal_split_percentage(participants.len());
    participants
        .iter()
        .map(|p| Split::new(p.id, percentage))
        .collect()
}
