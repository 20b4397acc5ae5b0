//! `splitledger` command-line front end.

pub mod app;
pub mod args;
pub mod config;

pub use app::App;
pub use args::{Command, ExpenseArgs, USAGE, parse_args};
pub use config::CliConfig;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CliError {
    #[error("usage: {0}")]
    Usage(String),

    #[error("unknown participant: {0}")]
    UnknownParticipant(String),

    #[error("unknown expense: {0}")]
    UnknownExpense(String),

    #[error("unknown currency: {0}")]
    UnknownCurrency(String),
}
