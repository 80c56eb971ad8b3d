//! Integration tests for the recording state machine and session history.

use craftmark_core::{CraftTimer, EffectTracker, Event, SessionId, SessionStore, TimerState};
use proptest::prelude::*;

const TODAY: &str = "2026.10.18";

#[test]
fn test_record_session_onto_seeded_history() {
    let mut store = SessionStore::with_seed();
    let mut timer = CraftTimer::new();
    let mut effects = EffectTracker::default();

    timer.start();
    for i in 0..3 {
        timer.tap(10.0 * i as f64, 20.0, &mut effects, i * 100);
    }
    for _ in 0..10 {
        timer.tick();
    }
    let event = timer.stop(&mut store, TODAY).expect("stop while recording");

    let new_id = match event {
        Event::RecordingStopped { session, .. } => {
            assert_eq!(session.duration, 10);
            assert_eq!(session.taps, 3);
            session.id
        }
        other => panic!("Expected RecordingStopped, got {other:?}"),
    };

    assert_eq!(store.ids(), vec![new_id, SessionId(1), SessionId(2)]);
    assert_eq!(store.sessions()[1].duration, 5400);
    assert_eq!(store.sessions()[2].taps, 89);
    assert_eq!(timer.duration(), 0);
    assert_eq!(timer.taps(), 0);
    assert_eq!(timer.state(), TimerState::Idle);
}

#[test]
fn test_immediate_stop_files_empty_session() {
    let mut store = SessionStore::new();
    let mut timer = CraftTimer::new();

    timer.toggle(&mut store, TODAY);
    timer.toggle(&mut store, TODAY);

    let session = &store.sessions()[0];
    assert_eq!(session.duration, 0);
    assert_eq!(session.taps, 0);
    assert_eq!(session.date, TODAY);
    assert_eq!(session.craft_type, "New craft");
}

#[test]
fn test_delete_from_middle_of_history() {
    let mut store = SessionStore::with_seed();
    let mut timer = CraftTimer::new();
    timer.start();
    timer.stop(&mut store, TODAY);
    let c = store.sessions()[0].id;

    assert!(store.delete(SessionId(1)));
    assert_eq!(store.ids(), vec![c, SessionId(2)]);
}

#[test]
fn test_second_session_does_not_inherit_first() {
    let mut store = SessionStore::new();
    let mut timer = CraftTimer::new();
    let mut effects = EffectTracker::default();

    timer.start();
    for _ in 0..5 {
        timer.tick();
        timer.tap(0.0, 0.0, &mut effects, 0);
    }
    timer.stop(&mut store, TODAY);

    timer.start();
    timer.tick();
    timer.stop(&mut store, TODAY);

    assert_eq!(store.sessions()[0].duration, 1);
    assert_eq!(store.sessions()[0].taps, 0);
    assert_eq!(store.sessions()[1].duration, 5);
    assert_eq!(store.sessions()[1].taps, 5);
}

proptest! {
    #[test]
    fn idle_taps_change_nothing(points in prop::collection::vec((0.0f64..1000.0, 0.0f64..1000.0), 0..50)) {
        let mut timer = CraftTimer::new();
        let mut effects = EffectTracker::default();
        for (x, y) in points {
            prop_assert!(timer.tap(x, y, &mut effects, 0).is_none());
        }
        prop_assert_eq!(timer.taps(), 0);
        prop_assert!(effects.is_empty());
    }

    #[test]
    fn recording_taps_count_one_each(points in prop::collection::vec((0.0f64..1000.0, 0.0f64..1000.0), 0..50)) {
        let mut timer = CraftTimer::new();
        let mut effects = EffectTracker::default();
        timer.start();
        for (i, (x, y)) in points.iter().enumerate() {
            timer.tap(*x, *y, &mut effects, 0);
            prop_assert_eq!(timer.taps(), i as u64 + 1);
            prop_assert_eq!(effects.len(), i + 1);
        }
    }

    #[test]
    fn start_always_resets_counters(ticks in 0u64..100, taps in 0usize..100) {
        let mut store = SessionStore::new();
        let mut timer = CraftTimer::new();
        let mut effects = EffectTracker::default();
        timer.start();
        for _ in 0..ticks {
            timer.tick();
        }
        for _ in 0..taps {
            timer.tap(0.0, 0.0, &mut effects, 0);
        }
        timer.stop(&mut store, TODAY);
        timer.start();
        prop_assert_eq!(timer.duration(), 0);
        prop_assert_eq!(timer.taps(), 0);
        prop_assert_eq!(store.sessions()[0].duration, ticks);
        prop_assert_eq!(store.sessions()[0].taps, taps as u64);
    }

    #[test]
    fn deleting_unknown_id_keeps_history(id in 3u64..10_000) {
        let mut store = SessionStore::with_seed();
        let before = store.sessions().to_vec();
        prop_assert!(!store.delete(SessionId(id)));
        prop_assert_eq!(store.sessions(), before.as_slice());
    }
}
