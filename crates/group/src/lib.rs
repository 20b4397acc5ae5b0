//! Expense-sharing group (participants, expenses, currency), command/event driven.
//!
//! Deterministic domain logic only (no IO, no storage). Balances and
//! settlements are never stored here; [`Group::summary`] recomputes them.

pub mod currency;
pub mod group;

pub use currency::Currency;
pub use group::{
    AddParticipant, CurrencySelected, DeleteExpense, ExpenseDeleted, ExpenseRecorded, Group,
    GroupCommand, GroupEvent, GroupSnapshot, GroupSummary, ParticipantAdded, ParticipantRemoved,
    ParticipantRenamed, RecordExpense, RemoveParticipant, RenameParticipant, SelectCurrency,
};
