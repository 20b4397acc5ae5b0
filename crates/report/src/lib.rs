//! Human-readable summaries of a group: plain text, HTML, share links.
//!
//! All rounding to display precision happens here; the ledger never rounds.

mod html;
mod text;

pub use html::{export_file_name, render_html};
pub use text::{render_text, share_url};

use chrono::NaiveDate;

use splitledger_core::ParticipantId;
use splitledger_group::{Currency, Group, GroupSummary};
use splitledger_ledger::{EPSILON, Expense, Participant};

/// Everything a renderer needs, borrowed from a [`Group`].
#[derive(Debug, Clone)]
pub struct Report<'a> {
    pub participants: &'a [Participant],
    pub expenses: &'a [Expense],
    pub currency: &'a Currency,
    pub summary: GroupSummary,
    pub generated_on: NaiveDate,
}

impl<'a> Report<'a> {
    pub fn new(group: &'a Group, generated_on: NaiveDate) -> Self {
        Self {
            participants: group.participants(),
            expenses: group.expenses(),
            currency: group.currency(),
            summary: group.summary(),
            generated_on,
        }
    }

    fn name_of(&self, id: ParticipantId) -> &str {
        self.participants
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.name.as_str())
            .unwrap_or("unknown")
    }

    /// Amount with currency symbol, two decimals.
    fn money(&self, amount: f64) -> String {
        format!("{}{:.2}", self.currency.symbol, amount)
    }
}

/// Direction of a participant's net balance, with `EPSILON` treated as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Standing {
    Receives,
    Owes,
    Settled,
}

impl Standing {
    fn of(balance: f64) -> Self {
        if balance > EPSILON {
            Standing::Receives
        } else if balance < -EPSILON {
            Standing::Owes
        } else {
            Standing::Settled
        }
    }
}
