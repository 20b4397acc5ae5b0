//! Executes parsed commands against the stored group.

use std::io::Write;

use anyhow::Context;
use chrono::{NaiveDate, Utc};

use splitledger_core::{Aggregate, Event, ExpenseId, IdGenerator, ParticipantId};
use splitledger_group::{
    AddParticipant, Currency, DeleteExpense, Group, GroupCommand, RecordExpense,
    RemoveParticipant, RenameParticipant, SelectCurrency,
};
use splitledger_infra::{GroupRepository, StateStore};
use splitledger_ledger::{Color, Expense, ExpenseDraft, Split, SplitMode};
use splitledger_report::{Report, export_file_name, render_html, render_text, share_url};

use crate::CliError;
use crate::args::{Command, ExpenseArgs, USAGE};

pub struct App<S> {
    repo: GroupRepository<S>,
    ids: Box<dyn IdGenerator>,
    today: NaiveDate,
}

impl<S: StateStore> App<S> {
    pub fn new(repo: GroupRepository<S>, ids: Box<dyn IdGenerator>, today: NaiveDate) -> Self {
        Self { repo, ids, today }
    }

    pub fn repo(&self) -> &GroupRepository<S> {
        &self.repo
    }

    /// Run one command: load the group, apply or render, save if it changed.
    pub fn run<W: Write>(&self, command: Command, out: &mut W) -> anyhow::Result<()> {
        let mut group = self
            .repo
            .load(self.ids.as_ref())
            .context("failed to load group")?;

        let Some((cmd, done)) = self.plan_mutation(&group, command, out)? else {
            return Ok(());
        };

        let events = group.execute(&cmd)?;
        for event in &events {
            tracing::info!(event = event.event_type(), "applied");
        }

        self.repo.save(&group).context("failed to save group")?;
        writeln!(out, "{done}")?;
        Ok(())
    }

    /// Read-only commands are answered directly and yield `None`; mutating
    /// commands yield the group command plus a confirmation line.
    fn plan_mutation<W: Write>(
        &self,
        group: &Group,
        command: Command,
        out: &mut W,
    ) -> anyhow::Result<Option<(GroupCommand, String)>> {
        let occurred_at = Utc::now();

        let planned = match command {
            Command::Help => {
                write!(out, "{USAGE}")?;
                None
            }
            Command::Summary => {
                write!(out, "{}", render_text(&Report::new(group, self.today)))?;
                None
            }
            Command::Share => {
                let text = render_text(&Report::new(group, self.today));
                writeln!(out, "{}", share_url(&text))?;
                None
            }
            Command::Export { path } => {
                let path = path.unwrap_or_else(|| export_file_name(self.today).into());
                let html = render_html(&Report::new(group, self.today));
                std::fs::write(&path, html)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                tracing::info!(path = %path.display(), "exported html summary");
                writeln!(out, "Exported summary to {}", path.display())?;
                None
            }
            Command::ParticipantList => {
                for p in group.participants() {
                    writeln!(out, "{}  {}  {}", p.id, p.name, p.color)?;
                }
                None
            }
            Command::ExpenseList => {
                let symbol = &group.currency().symbol;
                for e in group.expenses() {
                    let payer = group
                        .participant(e.paid_by)
                        .map(|p| p.name.as_str())
                        .unwrap_or("unknown");
                    writeln!(
                        out,
                        "{}  {}  {}  {}{:.2}  paid by {}",
                        e.id, e.date, e.description, symbol, e.amount, payer
                    )?;
                }
                None
            }
            Command::Currency { code: None } => {
                for c in Currency::catalog() {
                    let marker = if c.code == group.currency().code { "*" } else { " " };
                    writeln!(out, "{marker} {} {} {}", c.code, c.symbol, c.name)?;
                }
                None
            }
            Command::Currency { code: Some(code) } => {
                let currency =
                    Currency::by_code(&code).ok_or_else(|| CliError::UnknownCurrency(code.clone()))?;
                let done = format!("Currency set to {} ({})", currency.code, currency.symbol);
                Some((
                    GroupCommand::SelectCurrency(SelectCurrency {
                        currency,
                        occurred_at,
                    }),
                    done,
                ))
            }
            Command::ParticipantAdd { name, color } => {
                let color = color.map(|c| Color::parse(&c)).transpose()?;
                let participant_id = ParticipantId::generate(self.ids.as_ref());
                let done = format!("Added {} ({participant_id})", name.trim());
                Some((
                    GroupCommand::AddParticipant(AddParticipant {
                        participant_id,
                        name,
                        color,
                        occurred_at,
                    }),
                    done,
                ))
            }
            Command::ParticipantRename { participant, name } => {
                let participant_id = resolve_participant(group, &participant)?;
                let done = format!("Renamed to {}", name.trim());
                Some((
                    GroupCommand::RenameParticipant(RenameParticipant {
                        participant_id,
                        name,
                        occurred_at,
                    }),
                    done,
                ))
            }
            Command::ParticipantRemove { participant } => {
                let participant_id = resolve_participant(group, &participant)?;
                Some((
                    GroupCommand::RemoveParticipant(RemoveParticipant {
                        participant_id,
                        occurred_at,
                    }),
                    format!("Removed {participant}"),
                ))
            }
            Command::ExpenseAdd(fields) => {
                let expense_id = ExpenseId::generate(self.ids.as_ref());
                let draft = build_draft(group, fields, None, self.today)?;
                Some((
                    GroupCommand::RecordExpense(RecordExpense {
                        expense_id,
                        draft,
                        occurred_at,
                    }),
                    format!("Added expense {expense_id}"),
                ))
            }
            Command::ExpenseEdit { id, fields } => {
                let expense_id = resolve_expense(group, &id)?;
                let draft = build_draft(group, fields, group.expense(expense_id), self.today)?;
                Some((
                    GroupCommand::RecordExpense(RecordExpense {
                        expense_id,
                        draft,
                        occurred_at,
                    }),
                    format!("Updated expense {expense_id}"),
                ))
            }
            Command::ExpenseDelete { id } => {
                let expense_id = resolve_expense(group, &id)?;
                Some((
                    GroupCommand::DeleteExpense(DeleteExpense {
                        expense_id,
                        occurred_at,
                    }),
                    format!("Deleted expense {expense_id}"),
                ))
            }
        };

        Ok(planned)
    }
}

/// Accept either a participant id or a (case-insensitive) name.
fn resolve_participant(group: &Group, reference: &str) -> Result<ParticipantId, CliError> {
    if let Ok(id) = reference.parse::<ParticipantId>() {
        if group.participant(id).is_some() {
            return Ok(id);
        }
    }
    group
        .participant_by_name(reference)
        .map(|p| p.id)
        .ok_or_else(|| CliError::UnknownParticipant(reference.to_string()))
}

fn resolve_expense(group: &Group, reference: &str) -> Result<ExpenseId, CliError> {
    reference
        .parse::<ExpenseId>()
        .ok()
        .filter(|id| group.expense(*id).is_some())
        .ok_or_else(|| CliError::UnknownExpense(reference.to_string()))
}

/// Unparseable numbers become NaN so the draft validation reports them
/// against the right field.
fn number(raw: &str) -> f64 {
    raw.trim().parse().unwrap_or(f64::NAN)
}

/// Build a draft from typed fields. When editing, an omitted `--date` or
/// `--split` keeps what `existing` already has.
fn build_draft(
    group: &Group,
    fields: ExpenseArgs,
    existing: Option<&Expense>,
    today: NaiveDate,
) -> Result<ExpenseDraft, CliError> {
    let paid_by = resolve_participant(group, &fields.payer)?;

    let date = match fields.date {
        None => existing.map_or(today, |e| e.date),
        Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map_err(|_| CliError::Usage(format!("date must be YYYY-MM-DD, got {raw}")))?,
    };

    let split = if fields.splits.is_empty() {
        existing.map_or(SplitMode::Equal, |e| {
            SplitMode::infer(e, group.participants().len())
        })
    } else {
        let splits = fields
            .splits
            .iter()
            .map(|(who, pct)| Ok(Split::new(resolve_participant(group, who)?, number(pct))))
            .collect::<Result<Vec<_>, CliError>>()?;
        SplitMode::Custom(splits)
    };

    Ok(ExpenseDraft {
        description: fields.description,
        amount: number(&fields.amount),
        paid_by: Some(paid_by),
        date,
        split,
    })
}
