use chrono::{Duration, Utc};
use domain::{HistoryMap, Reachability, StatusEvent};
use fleet_storage::{HistoryStore, InMemoryHistoryStore, RetentionPolicy};

#[tokio::test]
async fn in_memory_merge_and_read() {
    let store = InMemoryHistoryStore::default();
    let base = Utc::now() - Duration::minutes(30);

    let mut first = HistoryMap::new();
    first.insert(
        "10.0.0.1".to_string(),
        vec![StatusEvent::new(Reachability::Online, base.fixed_offset())],
    );
    store.merge_and_save(first).await.expect("merge first");

    let mut second = HistoryMap::new();
    second.insert(
        "10.0.0.1".to_string(),
        vec![StatusEvent::new(
            Reachability::Offline,
            (base + Duration::minutes(10)).fixed_offset(),
        )],
    );
    store.merge_and_save(second).await.expect("merge second");

    let history = store.history_of("10.0.0.1").await.expect("history");
    assert_eq!(history.len(), 2);
    let latest = store.latest("10.0.0.1").await.expect("latest").expect("event");
    assert_eq!(latest.status, Reachability::Offline);
    assert!(store.history_of("10.0.0.2").await.expect("history").is_empty());
}

#[tokio::test]
async fn seeded_history_is_pruned_on_next_merge() {
    let mut seed = HistoryMap::new();
    seed.insert(
        "10.0.0.1".to_string(),
        vec![StatusEvent::new(
            Reachability::Online,
            (Utc::now() - Duration::days(3)).fixed_offset(),
        )],
    );
    let store = InMemoryHistoryStore::seeded(seed, RetentionPolicy::days(1));
    assert_eq!(store.load().await.expect("load").len(), 1);

    let report = store.merge_and_save(HistoryMap::new()).await.expect("merge");
    assert_eq!(report.pruned, 1);
    assert!(store.load().await.expect("load").is_empty());
}
