use chrono::{Duration, Utc};
use domain::{HistoryMap, Reachability, StatusEvent};
use fleet_storage::{RetentionPolicy, merge_histories};

fn event(status: Reachability, age: Duration) -> StatusEvent {
    StatusEvent::new(status, (Utc::now() - age).fixed_offset())
}

#[test]
fn events_older_than_window_are_pruned() {
    let mut incoming = HistoryMap::new();
    incoming.insert(
        "10.0.0.1".to_string(),
        vec![
            event(Reachability::Online, Duration::days(31)),
            event(Reachability::Offline, Duration::days(1)),
        ],
    );
    let cutoff = RetentionPolicy::days(30).cutoff(Utc::now());
    let (merged, report) = merge_histories(HistoryMap::new(), incoming, cutoff);

    let sequence = &merged["10.0.0.1"];
    assert_eq!(sequence.len(), 1);
    assert_eq!(sequence[0].status, Reachability::Offline);
    assert_eq!(report.pruned, 1);
}

#[test]
fn fully_pruned_identifier_is_removed() {
    let mut persisted = HistoryMap::new();
    persisted.insert(
        "10.0.0.9".to_string(),
        vec![event(Reachability::Online, Duration::days(40))],
    );
    let cutoff = RetentionPolicy::default().cutoff(Utc::now());
    let (merged, _) = merge_histories(persisted, HistoryMap::new(), cutoff);
    assert!(merged.is_empty());
}

#[test]
fn merging_same_batch_twice_is_idempotent() {
    let mut batch = HistoryMap::new();
    batch.insert(
        "10.0.0.1".to_string(),
        vec![event(Reachability::Offline, Duration::minutes(5))],
    );
    let cutoff = RetentionPolicy::default().cutoff(Utc::now());

    let (once, _) = merge_histories(HistoryMap::new(), batch.clone(), cutoff);
    let (twice, report) = merge_histories(once.clone(), batch, cutoff);

    assert_eq!(once, twice);
    assert_eq!(report.duplicates, 1);
    assert_eq!(report.appended, 0);
}

#[test]
fn repeated_status_collapses_to_first() {
    let first = event(Reachability::Online, Duration::minutes(10));
    let mut persisted = HistoryMap::new();
    persisted.insert("10.0.0.1".to_string(), vec![first.clone()]);

    let mut incoming = HistoryMap::new();
    incoming.insert(
        "10.0.0.1".to_string(),
        vec![event(Reachability::Online, Duration::minutes(1))],
    );
    let cutoff = RetentionPolicy::default().cutoff(Utc::now());
    let (merged, report) = merge_histories(persisted, incoming, cutoff);

    assert_eq!(merged["10.0.0.1"], vec![first]);
    assert_eq!(report.collapsed, 1);
}

#[test]
fn blank_identifiers_are_ignored() {
    let mut incoming = HistoryMap::new();
    incoming.insert(
        "  ".to_string(),
        vec![event(Reachability::Online, Duration::minutes(1))],
    );
    let cutoff = RetentionPolicy::default().cutoff(Utc::now());
    let (merged, _) = merge_histories(HistoryMap::new(), incoming, cutoff);
    assert!(merged.is_empty());
}
