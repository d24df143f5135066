use std::thread;
use std::time::Duration;

use treedo_core::{decode_state, OrphanPolicy, PersistenceQueue, SerializedState, ROOT_ID};
use treedo_testing::{
    add_item, child_ids, engine_with_project, FailingStorage, GatedStorage, RecordingStorage,
};

#[test]
fn snapshots_are_written_one_at_a_time_in_commit_order() {
    let storage = GatedStorage::new();
    let mut engine = engine_with_project(storage.clone(), "Home");
    add_item(&mut engine, "a", ROOT_ID);
    add_item(&mut engine, "b", ROOT_ID);
    engine.remove_todo_item("a", OrphanPolicy::KillAll).unwrap();

    thread::sleep(Duration::from_millis(20));
    storage.open();
    engine.flush();

    assert_eq!(storage.max_in_flight(), 1);
    let roots: Vec<Vec<String>> = storage
        .writes()
        .iter()
        .map(|(_, blob)| decode_state(blob).unwrap())
        .filter_map(|state| state.all_projects.first().map(|p| p.root_children.clone()))
        .collect();
    let tail: Vec<Vec<String>> = roots.iter().rev().take(3).rev().cloned().collect();
    assert_eq!(
        tail,
        vec![
            vec!["a".to_string()],
            vec!["a".to_string(), "b".to_string()],
            vec!["b".to_string()],
        ]
    );
}

#[test]
fn failed_writes_leave_memory_state_authoritative() {
    let storage = FailingStorage::new();
    let mut engine = engine_with_project(storage.clone(), "Home");
    add_item(&mut engine, "a", ROOT_ID);
    engine.flush();
    assert_eq!(child_ids(&engine, ROOT_ID), vec!["a"]);
    let stats = engine.persistence_stats();
    assert_eq!(stats.failed, stats.enqueued);
    assert_eq!(storage.attempts() as u64, stats.enqueued);
}

#[test]
fn queue_can_be_used_directly() {
    let storage = RecordingStorage::new();
    let queue = PersistenceQueue::new(storage.clone(), "custom");
    let mut state = SerializedState::empty();
    state.current_project = Some("p".into());
    queue.save_state(&state);
    queue.flush();
    assert_eq!(queue.load().unwrap(), Some(state));
    assert_eq!(storage.writes()[0].0, "custom");
    drop(queue);
    assert_eq!(storage.write_count(), 1);
}
