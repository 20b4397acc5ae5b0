use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use splitledger_core::{Aggregate, AggregateRoot, ExpenseId, ParticipantId, SequentialIdGenerator};
use splitledger_group::{
    AddParticipant, Currency, GroupCommand, RecordExpense, SelectCurrency,
};
use splitledger_infra::{
    FileStateStore, GroupRepository, InMemoryStateStore, StateStore, StoreError,
};
use splitledger_ledger::{ExpenseDraft, SplitMode};

fn add(ids: &SequentialIdGenerator, name: &str) -> (ParticipantId, GroupCommand) {
    let participant_id = ParticipantId::generate(ids);
    (
        participant_id,
        GroupCommand::AddParticipant(AddParticipant {
            participant_id,
            name: name.to_string(),
            color: None,
            occurred_at: Utc::now(),
        }),
    )
}

#[test]
fn empty_store_loads_an_empty_group_with_default_currency() {
    let repo = GroupRepository::new(InMemoryStateStore::new());
    let group = repo.load(&SequentialIdGenerator::new()).unwrap();

    assert!(group.participants().is_empty());
    assert!(group.expenses().is_empty());
    assert_eq!(group.currency(), &Currency::default());
}

#[test]
fn saved_group_reloads_identically() {
    let ids = SequentialIdGenerator::new();
    let store = Arc::new(InMemoryStateStore::new());
    let repo = GroupRepository::new(Arc::clone(&store));
    let mut group = repo.load(&ids).unwrap();

    let (alice, cmd) = add(&ids, "Alice");
    group.execute(&cmd).unwrap();
    let (_, cmd) = add(&ids, "Bob");
    group.execute(&cmd).unwrap();
    group
        .execute(&GroupCommand::RecordExpense(RecordExpense {
            expense_id: ExpenseId::generate(&ids),
            draft: ExpenseDraft {
                description: "Dinner".to_string(),
                amount: 64.0,
                paid_by: Some(alice),
                date: NaiveDate::from_ymd_opt(2024, 2, 14).unwrap(),
                split: SplitMode::Equal,
            },
            occurred_at: Utc::now(),
        }))
        .unwrap();
    group
        .execute(&GroupCommand::SelectCurrency(SelectCurrency {
            currency: Currency::by_code("GBP").unwrap(),
            occurred_at: Utc::now(),
        }))
        .unwrap();

    repo.save(&group).unwrap();
    for key in [
        "splitledger-currency",
        "splitledger-expenses",
        "splitledger-group",
        "splitledger-participants",
    ] {
        assert!(store.get(key).unwrap().is_some(), "{key} not stored");
    }

    let reloaded = repo.load(&ids).unwrap();
    assert_eq!(reloaded.id(), group.id());
    assert_eq!(reloaded.snapshot(), group.snapshot());
    assert_eq!(reloaded.summary(), group.summary());
}

#[test]
fn participants_are_stored_verbatim_as_json() {
    let ids = SequentialIdGenerator::new();
    let store = Arc::new(InMemoryStateStore::new());
    let repo = GroupRepository::with_prefix(Arc::clone(&store), "trip-");
    let mut group = repo.load(&ids).unwrap();
    let (_, cmd) = add(&ids, "Zoe");
    group.execute(&cmd).unwrap();
    repo.save(&group).unwrap();

    let raw = store.get("trip-participants").unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json[0]["name"], "Zoe");
    assert_eq!(json[0]["color"], "#ef4444");
}

#[test]
fn corrupt_document_is_reported_with_its_key() {
    let store = InMemoryStateStore::new();
    store
        .put("splitledger-expenses", "{not json".to_string())
        .unwrap();
    let repo = GroupRepository::new(store);

    match repo.load(&SequentialIdGenerator::new()) {
        Err(err @ StoreError::Serde { .. }) => {
            assert_eq!(err.to_string(), "failed to (de)serialize `splitledger-expenses`");
            assert!(std::error::Error::source(&err).is_some());
        }
        other => panic!("Expected Serde error, got {other:?}"),
    }
}

#[test]
fn file_store_round_trip() {
    let dir = std::env::temp_dir().join(format!("splitledger-repo-{}", uuid::Uuid::now_v7()));
    let ids = SequentialIdGenerator::new();

    let repo = GroupRepository::new(FileStateStore::new(&dir));
    let mut group = repo.load(&ids).unwrap();
    let (_, cmd) = add(&ids, "Ann");
    group.execute(&cmd).unwrap();
    repo.save(&group).unwrap();

    let reopened = GroupRepository::new(FileStateStore::new(&dir));
    let reloaded = reopened.load(&ids).unwrap();
    assert_eq!(reloaded.snapshot(), group.snapshot());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn non_hex_colour_still_loads() {
    let store = InMemoryStateStore::new();
    store
        .put(
            "splitledger-participants",
            r#"[{"id":"00000000-0000-0000-0000-000000000001","name":"Ann","color":"red"}]"#
                .to_string(),
        )
        .unwrap();
    let repo = GroupRepository::new(store);

    let group = repo.load(&SequentialIdGenerator::new()).unwrap();
    assert_eq!(group.participants()[0].name, "Ann");
    assert_eq!(group.participants()[0].color.as_str(), "red");
    assert!(group.summary().settlements.is_empty());
}
