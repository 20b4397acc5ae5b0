//! Shared-expense ledger (balances and settlement planning).
//!
//! Pure domain logic only: no IO, no persistence concerns. Both entry points,
//! [`aggregate`] and [`plan`], are pure functions of their arguments and are
//! meant to be re-invoked whenever participants or expenses change.

pub mod balance;
pub mod expense;
pub mod participant;
pub mod settlement;

pub use balance::{Balance, Balances, aggregate, equal_split_percentage, equal_splits};
pub use expense::{
    Expense, ExpenseDraft, ExpenseField, ExpenseValidationErrors, Split, SplitMode,
};
pub use participant::{Color, PALETTE, Participant};
pub use settlement::{Settlement, plan};

/// Smallest meaningful amount. Values within `EPSILON` of zero are treated as
/// zero by the planner, and split percentages may miss 100 by at most this much.
pub const EPSILON: f64 = 0.01;
