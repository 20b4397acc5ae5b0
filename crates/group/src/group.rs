use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use splitledger_core::{
    Aggregate, AggregateRoot, DomainError, Event, ExpenseId, GroupId, ParticipantId,
};
use splitledger_ledger::{
    Balances, Color, Expense, ExpenseDraft, Participant, Settlement, aggregate, plan,
};

use crate::currency::Currency;

/// Durable state of a group, stored verbatim by the state store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSnapshot {
    pub id: GroupId,
    pub participants: Vec<Participant>,
    pub expenses: Vec<Expense>,
    pub currency: Currency,
}

/// Balances and settlements derived from the current state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSummary {
    pub balances: Balances,
    pub settlements: Vec<Settlement>,
    pub total_expenses: f64,
}

/// Aggregate root: Group.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    id: GroupId,
    participants: Vec<Participant>,
    expenses: Vec<Expense>,
    currency: Currency,
    version: u64,
}

impl Group {
    /// Empty group with the default currency.
    pub fn new(id: GroupId) -> Self {
        Self {
            id,
            participants: Vec::new(),
            expenses: Vec::new(),
            currency: Currency::default(),
            version: 0,
        }
    }

    /// Restore a previously stored group. Version restarts at 0.
    pub fn from_snapshot(snapshot: GroupSnapshot) -> Self {
        Self {
            id: snapshot.id,
            participants: snapshot.participants,
            expenses: snapshot.expenses,
            currency: snapshot.currency,
            version: 0,
        }
    }

    pub fn snapshot(&self) -> GroupSnapshot {
        GroupSnapshot {
            id: self.id,
            participants: self.participants.clone(),
            expenses: self.expenses.clone(),
            currency: self.currency.clone(),
        }
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    /// Case-insensitive lookup by display name.
    pub fn participant_by_name(&self, name: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.has_name(name))
    }

    pub fn expense(&self, id: ExpenseId) -> Option<&Expense> {
        self.expenses.iter().find(|e| e.id == id)
    }

    /// Recompute balances and settlements from scratch.
    pub fn summary(&self) -> GroupSummary {
        let balances = aggregate(&self.participants, &self.expenses);
        let settlements = plan(balances.net());
        GroupSummary {
            balances,
            settlements,
            total_expenses: self.expenses.iter().map(|e| e.amount).sum(),
        }
    }
}

impl AggregateRoot for Group {
    type Id = GroupId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: AddParticipant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddParticipant {
    pub participant_id: ParticipantId,
    pub name: String,
    /// Palette colour is assigned when `None`.
    pub color: Option<Color>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RenameParticipant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenameParticipant {
    pub participant_id: ParticipantId,
    pub name: String,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RemoveParticipant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoveParticipant {
    pub participant_id: ParticipantId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RecordExpense (adds, or replaces when `expense_id` already exists).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordExpense {
    pub expense_id: ExpenseId,
    pub draft: ExpenseDraft,
    pub occurred_at: DateTime<Utc>,
}

/// Command: DeleteExpense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteExpense {
    pub expense_id: ExpenseId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: SelectCurrency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectCurrency {
    pub currency: Currency,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GroupCommand {
    AddParticipant(AddParticipant),
    RenameParticipant(RenameParticipant),
    RemoveParticipant(RemoveParticipant),
    RecordExpense(RecordExpense),
    DeleteExpense(DeleteExpense),
    SelectCurrency(SelectCurrency),
}

/// Event: ParticipantAdded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantAdded {
    pub participant: Participant,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ParticipantRenamed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantRenamed {
    pub participant_id: ParticipantId,
    pub name: String,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ParticipantRemoved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantRemoved {
    pub participant_id: ParticipantId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ExpenseRecorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecorded {
    pub expense: Expense,
    /// true when an existing expense with the same id was replaced.
    pub replaced: bool,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ExpenseDeleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseDeleted {
    pub expense_id: ExpenseId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: CurrencySelected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencySelected {
    pub currency: Currency,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GroupEvent {
    ParticipantAdded(ParticipantAdded),
    ParticipantRenamed(ParticipantRenamed),
    ParticipantRemoved(ParticipantRemoved),
    ExpenseRecorded(ExpenseRecorded),
    ExpenseDeleted(ExpenseDeleted),
    CurrencySelected(CurrencySelected),
}

impl Event for GroupEvent {
    fn event_type(&self) -> &'static str {
        match self {
            GroupEvent::ParticipantAdded(_) => "group.participant.added",
            GroupEvent::ParticipantRenamed(_) => "group.participant.renamed",
            GroupEvent::ParticipantRemoved(_) => "group.participant.removed",
            GroupEvent::ExpenseRecorded(_) => "group.expense.recorded",
            GroupEvent::ExpenseDeleted(_) => "group.expense.deleted",
            GroupEvent::CurrencySelected(_) => "group.currency.selected",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            GroupEvent::ParticipantAdded(e) => e.occurred_at,
            GroupEvent::ParticipantRenamed(e) => e.occurred_at,
            GroupEvent::ParticipantRemoved(e) => e.occurred_at,
            GroupEvent::ExpenseRecorded(e) => e.occurred_at,
            GroupEvent::ExpenseDeleted(e) => e.occurred_at,
            GroupEvent::CurrencySelected(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Group {
    type Command = GroupCommand;
    type Event = GroupEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            GroupEvent::ParticipantAdded(e) => {
                self.participants.push(e.participant.clone());
            }
            GroupEvent::ParticipantRenamed(e) => {
                if let Some(p) = self
                    .participants
                    .iter_mut()
                    .find(|p| p.id == e.participant_id)
                {
                    p.name = e.name.clone();
                }
            }
            GroupEvent::ParticipantRemoved(e) => {
                self.participants.retain(|p| p.id != e.participant_id);
            }
            GroupEvent::ExpenseRecorded(e) => {
                match self.expenses.iter_mut().find(|x| x.id == e.expense.id) {
                    Some(existing) => *existing = e.expense.clone(),
                    None => self.expenses.push(e.expense.clone()),
                }
            }
            GroupEvent::ExpenseDeleted(e) => {
                self.expenses.retain(|x| x.id != e.expense_id);
            }
            GroupEvent::CurrencySelected(e) => {
                self.currency = e.currency.clone();
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            GroupCommand::AddParticipant(cmd) => self.handle_add_participant(cmd),
            GroupCommand::RenameParticipant(cmd) => self.handle_rename_participant(cmd),
            GroupCommand::RemoveParticipant(cmd) => self.handle_remove_participant(cmd),
            GroupCommand::RecordExpense(cmd) => self.handle_record_expense(cmd),
            GroupCommand::DeleteExpense(cmd) => self.handle_delete_expense(cmd),
            GroupCommand::SelectCurrency(cmd) => Ok(vec![GroupEvent::CurrencySelected(
                CurrencySelected {
                    currency: cmd.currency.clone(),
                    occurred_at: cmd.occurred_at,
                },
            )]),
        }
    }
}

impl Group {
    /// Trimmed, non-empty name not already used by another participant.
    fn ensure_name_available(
        &self,
        name: &str,
        except: Option<ParticipantId>,
    ) -> Result<String, DomainError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("Name is required"));
        }
        if self
            .participants
            .iter()
            .any(|p| Some(p.id) != except && p.has_name(trimmed))
        {
            return Err(DomainError::conflict(format!("Name already exists: {trimmed}")));
        }
        Ok(trimmed.to_string())
    }

    fn ensure_participant(&self, id: ParticipantId) -> Result<&Participant, DomainError> {
        self.participant(id)
            .ok_or_else(|| DomainError::not_found(format!("participant {id}")))
    }

    fn handle_add_participant(&self, cmd: &AddParticipant) -> Result<Vec<GroupEvent>, DomainError> {
        if self.participant(cmd.participant_id).is_some() {
            return Err(DomainError::conflict(format!(
                "participant {} already exists",
                cmd.participant_id
            )));
        }
        let name = self.ensure_name_available(&cmd.name, None)?;
        let color = cmd
            .color
            .clone()
            .unwrap_or_else(|| Color::from_palette(self.participants.len()));

        Ok(vec![GroupEvent::ParticipantAdded(ParticipantAdded {
            participant: Participant::new(cmd.participant_id, name, color),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_rename_participant(
        &self,
        cmd: &RenameParticipant,
    ) -> Result<Vec<GroupEvent>, DomainError> {
        self.ensure_participant(cmd.participant_id)?;
        let name = self.ensure_name_available(&cmd.name, Some(cmd.participant_id))?;

        Ok(vec![GroupEvent::ParticipantRenamed(ParticipantRenamed {
            participant_id: cmd.participant_id,
            name,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_remove_participant(
        &self,
        cmd: &RemoveParticipant,
    ) -> Result<Vec<GroupEvent>, DomainError> {
        let participant = self.ensure_participant(cmd.participant_id)?;

        if self
            .expenses
            .iter()
            .any(|e| e.references(cmd.participant_id))
        {
            return Err(DomainError::conflict(format!(
                "{} has associated expenses",
                participant.name
            )));
        }

        Ok(vec![GroupEvent::ParticipantRemoved(ParticipantRemoved {
            participant_id: cmd.participant_id,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_record_expense(&self, cmd: &RecordExpense) -> Result<Vec<GroupEvent>, DomainError> {
        let expense = cmd
            .draft
            .clone()
            .into_expense(cmd.expense_id, &self.participants)?;
        let replaced = self.expense(cmd.expense_id).is_some();

        Ok(vec![GroupEvent::ExpenseRecorded(ExpenseRecorded {
            expense,
            replaced,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_delete_expense(&self, cmd: &DeleteExpense) -> Result<Vec<GroupEvent>, DomainError> {
        if self.expense(cmd.expense_id).is_none() {
            return Err(DomainError::not_found(format!("expense {}", cmd.expense_id)));
        }

        Ok(vec![GroupEvent::ExpenseDeleted(ExpenseDeleted {
            expense_id: cmd.expense_id,
            occurred_at: cmd.occurred_at,
        })])
    }
}
