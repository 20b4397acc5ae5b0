use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use splitledger_core::{DomainError, Entity, ExpenseId, ParticipantId, ValueObject};

use crate::EPSILON;
use crate::balance::{equal_split_percentage, equal_splits};
use crate::participant::Participant;

/// One participant's share of an expense, in parts per hundred.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Split {
    pub participant_id: ParticipantId,
    pub percentage: f64,
}

impl Split {
    pub fn new(participant_id: ParticipantId, percentage: f64) -> Self {
        Self {
            participant_id,
            percentage,
        }
    }
}

impl ValueObject for Split {}

/// A stored expense. Immutable once recorded; edits replace it by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: ExpenseId,
    pub description: String,
    pub amount: f64,
    pub paid_by: ParticipantId,
    pub date: NaiveDate,
    pub splits: Vec<Split>,
}

impl Expense {
    /// Whether the participant pays for or shares this expense.
    pub fn references(&self, participant_id: ParticipantId) -> bool {
        self.paid_by == participant_id
            || self
                .splits
                .iter()
                .any(|s| s.participant_id == participant_id)
    }
}

impl Entity for Expense {
    type Id = ExpenseId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// How an expense is divided among participants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "type", content = "splits")]
pub enum SplitMode {
    /// Every current participant gets `100 / n` percent.
    Equal,
    /// Explicit percentages; must total 100.
    Custom(Vec<Split>),
}

impl SplitMode {
    /// Recover the split mode of a stored expense for re-editing.
    ///
    /// An expense reads back as `Equal` when every split is within [`EPSILON`]
    /// of `100 / participant_count`.
    pub fn infer(expense: &Expense, participant_count: usize) -> Self {
        if participant_count > 0 {
            let equal = equal_split_percentage(participant_count);
            if expense
                .splits
                .iter()
                .all(|s| (s.percentage - equal).abs() < EPSILON)
            {
                return SplitMode::Equal;
            }
        }
        SplitMode::Custom(expense.splits.clone())
    }
}

/// Form field an expense validation error is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExpenseField {
    Description,
    Amount,
    PaidBy,
    Splits,
}

impl core::fmt::Display for ExpenseField {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            ExpenseField::Description => "description",
            ExpenseField::Amount => "amount",
            ExpenseField::PaidBy => "paidBy",
            ExpenseField::Splits => "splits",
        };
        f.write_str(name)
    }
}

/// Every field error found in an [`ExpenseDraft`], keyed by field.
#[derive(Debug, Clone, PartialEq, Eq, Default, Error)]
#[error("invalid expense: {}", describe(.errors))]
pub struct ExpenseValidationErrors {
    pub errors: BTreeMap<ExpenseField, String>,
}

impl ExpenseValidationErrors {
    pub fn get(&self, field: ExpenseField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    fn insert(&mut self, field: ExpenseField, msg: &str) {
        self.errors.entry(field).or_insert_with(|| msg.to_string());
    }
}

fn describe(errors: &BTreeMap<ExpenseField, String>) -> String {
    errors
        .iter()
        .map(|(field, msg)| format!("{field}: {msg}"))
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<ExpenseValidationErrors> for DomainError {
    fn from(value: ExpenseValidationErrors) -> Self {
        DomainError::validation(describe(&value.errors))
    }
}

/// Unvalidated expense input, as entered on a form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseDraft {
    pub description: String,
    pub amount: f64,
    pub paid_by: Option<ParticipantId>,
    pub date: NaiveDate,
    pub split: SplitMode,
}

impl ExpenseDraft {
    /// Check the draft against the current participants and resolve its splits.
    ///
    /// All failing fields are reported together.
    pub fn validate(&self, participants: &[Participant]) -> Result<Vec<Split>, ExpenseValidationErrors> {
        let mut errs = ExpenseValidationErrors::default();
        let known = |id: ParticipantId| participants.iter().any(|p| p.id == id);

        if self.description.trim().is_empty() {
            errs.insert(ExpenseField::Description, "Description is required");
        }

        if !self.amount.is_finite() || self.amount <= 0.0 {
            errs.insert(ExpenseField::Amount, "Valid amount is required");
        }

        match self.paid_by {
            None => errs.insert(ExpenseField::PaidBy, "Please select who paid"),
            Some(id) if !known(id) => errs.insert(ExpenseField::PaidBy, "Payer is not a participant"),
            Some(_) => {}
        }

        let splits = match &self.split {
            SplitMode::Equal => {
                if participants.is_empty() {
                    errs.insert(ExpenseField::Splits, "Add a participant before splitting equally");
                    Vec::new()
                } else {
                    equal_splits(participants)
                }
            }
            SplitMode::Custom(splits) => {
                if splits
                    .iter()
                    .any(|s| !s.percentage.is_finite() || s.percentage < 0.0)
                {
                    errs.insert(ExpenseField::Splits, "Split percentages must be non-negative");
                }
                if splits.iter().any(|s| !known(s.participant_id)) {
                    errs.insert(ExpenseField::Splits, "Split references an unknown participant");
                }
                let total: f64 = splits.iter().map(|s| s.percentage).sum();
                if (total - 100.0).abs() > EPSILON {
                    errs.insert(ExpenseField::Splits, "Split percentages must total 100%");
                }
                splits.clone()
            }
        };

        if errs.is_empty() {
            Ok(splits)
        } else {
            Err(errs)
        }
    }

    /// Validate and build the stored expense under `id`.
    pub fn into_expense(
        self,
        id: ExpenseId,
        participants: &[Participant],
    ) -> Result<Expense, ExpenseValidationErrors> {
        let splits = self.validate(participants)?;
        let Some(paid_by) = self.paid_by else {
            // validate() already rejected a missing payer
            return Err(ExpenseValidationErrors::default());
        };
        Ok(Expense {
            id,
            description: self.description.trim().to_string(),
            amount: self.amount,
            paid_by,
            date: self.date,
            splits,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::participant::Color;
    use splitledger_core::SequentialIdGenerator;

    fn group(names: &[&str]) -> (SequentialIdGenerator, Vec<Participant>) {
        let ids = SequentialIdGenerator::new();
        let participants = names
            .iter()
            .enumerate()
            .map(|(i, n)| Participant::new(ParticipantId::generate(&ids), *n, Color::from_palette(i)))
            .collect();
        (ids, participants)
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[test]
    fn equal_draft_expands_to_every_participant() {
        let (ids, ps) = group(&["Alice", "Bob", "Cara", "Dan"]);
        let draft = ExpenseDraft {
            description: "  Dinner ".into(),
            amount: 80.0,
            paid_by: Some(ps[0].id),
            date: date(),
            split: SplitMode::Equal,
        };
        let expense = draft.into_expense(ExpenseId::generate(&ids), &ps).unwrap();
        assert_eq!(expense.description, "Dinner");
        assert_eq!(expense.splits.len(), 4);
        assert!(expense.splits.iter().all(|s| s.percentage == 25.0));
    }

    #[test]
    fn all_field_errors_are_reported_together() {
        let (_, ps) = group(&["Alice"]);
        let draft = ExpenseDraft {
            description: "   ".into(),
            amount: 0.0,
            paid_by: None,
            date: date(),
            split: SplitMode::Custom(vec![Split::new(ps[0].id, 90.0)]),
        };
        let errs = draft.validate(&ps).unwrap_err();
        assert_eq!(errs.get(ExpenseField::Description), Some("Description is required"));
        assert_eq!(errs.get(ExpenseField::Amount), Some("Valid amount is required"));
        assert_eq!(errs.get(ExpenseField::PaidBy), Some("Please select who paid"));
        assert_eq!(errs.get(ExpenseField::Splits), Some("Split percentages must total 100%"));
    }

    #[test]
    fn custom_split_total_tolerates_epsilon() {
        let (_, ps) = group(&["A", "B", "C"]);
        let splits = vec![
            Split::new(ps[0].id, 33.33),
            Split::new(ps[1].id, 33.33),
            Split::new(ps[2].id, 33.34),
        ];
        let draft = ExpenseDraft {
            description: "Taxi".into(),
            amount: 30.0,
            paid_by: Some(ps[1].id),
            date: date(),
            split: SplitMode::Custom(splits.clone()),
        };
        assert_eq!(draft.validate(&ps).unwrap(), splits);

        let off = ExpenseDraft {
            split: SplitMode::Custom(vec![Split::new(ps[0].id, 50.0), Split::new(ps[1].id, 49.9)]),
            ..draft
        };
        assert!(off.validate(&ps).is_err());
    }

    #[test]
    fn custom_split_must_name_known_participants() {
        let (ids, ps) = group(&["A"]);
        let stranger = ParticipantId::generate(&ids);
        let draft = ExpenseDraft {
            description: "Snacks".into(),
            amount: 10.0,
            paid_by: Some(ps[0].id),
            date: date(),
            split: SplitMode::Custom(vec![Split::new(ps[0].id, 50.0), Split::new(stranger, 50.0)]),
        };
        let errs = draft.validate(&ps).unwrap_err();
        assert_eq!(
            errs.get(ExpenseField::Splits),
            Some("Split references an unknown participant")
        );
    }

    #[test]
    fn equal_split_needs_participants() {
        let (ids, _) = group(&[]);
        let draft = ExpenseDraft {
            description: "Rent".into(),
            amount: 10.0,
            paid_by: Some(ParticipantId::generate(&ids)),
            date: date(),
            split: SplitMode::Equal,
        };
        let errs = draft.validate(&[]).unwrap_err();
        assert!(errs.get(ExpenseField::Splits).is_some());
        assert_eq!(errs.get(ExpenseField::PaidBy), Some("Payer is not a participant"));
    }

    #[test]
    fn infer_recognises_equal_and_custom_splits() {
        let (ids, ps) = group(&["A", "B", "C"]);
        let mut expense = ExpenseDraft {
            description: "Hotel".into(),
            amount: 300.0,
            paid_by: Some(ps[0].id),
            date: date(),
            split: SplitMode::Equal,
        }
        .into_expense(ExpenseId::generate(&ids), &ps)
        .unwrap();
        assert_eq!(SplitMode::infer(&expense, 3), SplitMode::Equal);

        expense.splits = vec![Split::new(ps[0].id, 0.0), Split::new(ps[1].id, 100.0)];
        assert!(matches!(SplitMode::infer(&expense, 3), SplitMode::Custom(s) if s.len() == 2));
    }

    #[test]
    fn expense_json_uses_camel_case_fields() {
        let (ids, ps) = group(&["A"]);
        let expense = Expense {
            id: ExpenseId::generate(&ids),
            description: "Coffee".into(),
            amount: 4.5,
            paid_by: ps[0].id,
            date: date(),
            splits: vec![Split::new(ps[0].id, 100.0)],
        };
        let json = serde_json::to_value(&expense).unwrap();
        assert!(json.get("paidBy").is_some());
        assert!(json["splits"][0].get("participantId").is_some());
        assert_eq!(json["date"], "2024-03-01");
    }
}
