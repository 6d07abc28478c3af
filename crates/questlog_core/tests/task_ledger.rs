use questlog_core::{LedgerError, TaskFilter, TaskLedger, TaskValidationError};
use std::collections::HashSet;

#[test]
fn add_appends_in_insertion_order() {
    let mut ledger = TaskLedger::new();
    let a = ledger.add("A").unwrap();
    let b = ledger.add("B").unwrap();
    let c = ledger.add("C").unwrap();

    let ids: Vec<_> = ledger.tasks().iter().map(|t| t.id.clone()).collect();
    assert_eq!(ids, vec![a.id, b.id, c.id]);
    assert!(ledger.tasks().iter().all(|t| !t.completed));
}

#[test]
fn add_generates_unique_ids() {
    let mut ledger = TaskLedger::new();
    for n in 0..200 {
        ledger.add(format!("task {n}")).unwrap();
    }
    let ids: HashSet<_> = ledger.tasks().iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids.len(), 200);
}

#[test]
fn whitespace_only_add_leaves_ledger_unchanged() {
    let mut ledger = TaskLedger::new();
    ledger.add("keep").unwrap();
    let before = ledger.clone();

    assert_eq!(ledger.add("   ").unwrap_err(), TaskValidationError::EmptyText);
    assert_eq!(ledger, before);
}

#[test]
fn toggle_reports_completion_then_uncompletion() {
    let mut ledger = TaskLedger::new();
    let task = ledger.add("write report").unwrap();

    let first = ledger.toggle(&task.id).unwrap();
    assert!(first.was_completing);
    assert!(first.task.completed);

    let second = ledger.toggle(&task.id).unwrap();
    assert!(!second.was_completing);
    assert!(!second.task.completed);
}

#[test]
fn toggle_unknown_id_is_not_found() {
    let mut ledger = TaskLedger::new();
    let err = ledger.toggle("missing").unwrap_err();
    assert_eq!(err, LedgerError::NotFound("missing".to_string()));
}

#[test]
fn remove_is_idempotent() {
    let mut ledger = TaskLedger::new();
    let task = ledger.add("once").unwrap();

    assert_eq!(ledger.remove(&task.id).map(|t| t.id), Some(task.id.clone()));
    assert!(ledger.remove(&task.id).is_none());
    assert!(ledger.remove("never-existed").is_none());
    assert!(ledger.is_empty());
}

#[test]
fn filter_preserves_order_and_counts_add_up() {
    let mut ledger = TaskLedger::new();
    let a = ledger.add("A").unwrap();
    let b = ledger.add("B").unwrap();
    let c = ledger.add("C").unwrap();
    ledger.toggle(&a.id).unwrap();
    ledger.toggle(&c.id).unwrap();

    let completed: Vec<_> = ledger
        .filter(TaskFilter::Completed)
        .into_iter()
        .map(|t| t.id.clone())
        .collect();
    assert_eq!(completed, vec![a.id.clone(), c.id.clone()]);

    let active: Vec<_> = ledger
        .filter(TaskFilter::Active)
        .into_iter()
        .map(|t| t.id.clone())
        .collect();
    assert_eq!(active, vec![b.id.clone()]);

    assert_eq!(ledger.filter(TaskFilter::All).len(), 3);
    assert_eq!(ledger.completed_count(), 2);
    assert_eq!(ledger.remaining_count(), 1);
}
