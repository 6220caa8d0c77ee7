use treadline_core::CoreError;
use treadline_store::error::StoreError;
use treadline_store::repo::GoalUpsert;
use treadline_store::Store;

fn goal(month: u32, year: i32, leads: i64) -> GoalUpsert {
    GoalUpsert {
        month,
        year,
        target_leads: leads,
        target_conversions: 5,
        notes: None,
    }
}

#[test]
fn upsert_keeps_one_goal_per_period() {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");

    let first = store.goals().upsert(100, goal(3, 2025, 40)).expect("upsert");
    let second = store.goals().upsert(200, goal(3, 2025, 60)).expect("upsert");
    store.goals().upsert(300, goal(4, 2025, 10)).expect("upsert");

    assert_eq!(first.id, second.id);
    assert_eq!(second.target_leads, 60);
    assert_eq!(second.created_at, 100);
    assert_eq!(second.updated_at, 200);

    let goals = store.goals().list().expect("list");
    assert_eq!(goals.len(), 2);
    assert_eq!(goals[0].period_label(), "2025-04");
}

#[test]
fn upsert_validates_period_and_targets() {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");

    let err = store.goals().upsert(1, goal(13, 2025, 1)).unwrap_err();
    assert!(matches!(err, StoreError::Core(CoreError::InvalidGoalMonth(13))));
    let err = store.goals().upsert(1, goal(1, 2025, -1)).unwrap_err();
    assert!(matches!(err, StoreError::Core(CoreError::InvalidGoalTarget(-1))));
}
