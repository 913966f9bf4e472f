//! Team discovery: distinct non-empty names from historical stats, with a
//! configurable fallback for an uninitialized store.

use matchstream_core::{
    config::StreamConfig,
    error::StreamError,
    registry,
    scheduler::StreamLoop,
    store::MetricsStore,
};

fn seeded_store() -> MetricsStore {
    let store = MetricsStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    store
}

#[test]
fn discovers_distinct_sorted_teams() {
    let store = seeded_store();
    store.insert_player_stat(1, "TenZ", Some("Sentinels")).expect("insert");
    store.insert_player_stat(1, "Zyppan", Some("NAVI")).expect("insert");
    store.insert_player_stat(2, "TenZ", Some("Sentinels")).expect("insert");
    store.insert_player_stat(2, "sub", Some("")).expect("insert");
    store.insert_player_stat(2, "coach", None).expect("insert");

    let fallback = vec!["Team Alpha".to_string()];
    let teams = registry::discover_teams(&store, &fallback).expect("discover");

    assert_eq!(teams, vec!["NAVI".to_string(), "Sentinels".to_string()]);
}

#[test]
fn empty_store_uses_fallback() {
    let store = seeded_store();
    let fallback = vec!["Team Alpha".to_string(), "Team Beta".to_string()];

    let teams = registry::discover_teams(&store, &fallback).expect("discover");

    assert_eq!(teams, fallback);
}

#[test]
fn empty_store_and_empty_fallback_aborts_startup() {
    let store = seeded_store();
    let mut cfg = StreamConfig::default_test();
    cfg.fallback_teams.clear();

    let err = StreamLoop::build(&cfg, store).err().expect("build must fail");
    assert!(matches!(err, StreamError::NoTeams));
}
