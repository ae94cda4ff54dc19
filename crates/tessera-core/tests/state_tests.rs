//! Tests for observable state and its notification phases.

use std::sync::Arc;

use parking_lot::Mutex;
use tessera_core::{ConnectionGuard, State};

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn record(log: &Arc<Mutex<Vec<String>>>, entry: impl Into<String>) {
    log.lock().push(entry.into());
}

#[test]
fn test_phases_bracket_change_listeners() {
    init_logging();
    let state = State::new(1);
    let log = Arc::new(Mutex::new(Vec::new()));

    let (begin, change, end) = (log.clone(), log.clone(), log.clone());
    let _guards: Vec<ConnectionGuard> = vec![
        state.on_begin(move || record(&begin, "begin")),
        state.subscribe(move |old, new| record(&change, format!("{old}->{new}"))),
        state.on_end(move || record(&end, "end")),
    ];

    state.set(2);
    state.update(|value| *value *= 10);

    assert_eq!(*log.lock(), ["begin", "1->2", "end", "begin", "2->20", "end"]);
}

#[test]
fn test_listeners_fire_in_registration_order() {
    let state = State::new(0);
    let log = Arc::new(Mutex::new(Vec::new()));

    let guards: Vec<_> = (0..3)
        .map(|id| {
            let log = log.clone();
            state.subscribe(move |_, _| record(&log, format!("listener-{id}")))
        })
        .collect();

    state.set(1);
    assert_eq!(*log.lock(), ["listener-0", "listener-1", "listener-2"]);
    drop(guards);
    assert_eq!(state.subscriber_count(), 0);
}

#[test]
fn test_listener_can_read_observed_state() {
    let state = State::new(String::from("a"));
    let seen = Arc::new(Mutex::new(String::new()));

    let reader = state.clone();
    let seen_clone = seen.clone();
    let _guard = state.subscribe(move |_, _| {
        *seen_clone.lock() = reader.get();
    });

    state.set(String::from("b"));
    assert_eq!(*seen.lock(), "b");
}

#[test]
fn test_set_if_changed_skips_equal_values() {
    let state = State::new(5);
    let count = Arc::new(Mutex::new(0));
    let count_clone = count.clone();
    let _guard = state.subscribe(move |_, _| *count_clone.lock() += 1);

    assert!(!state.set_if_changed(5));
    assert!(state.set_if_changed(6));
    state.set(6);

    assert_eq!(*count.lock(), 2);
}

#[test]
fn test_silent_set_does_not_notify() {
    let state = State::new(1);
    let count = Arc::new(Mutex::new(0));
    let count_clone = count.clone();
    let _guard = state.subscribe(move |_, _| *count_clone.lock() += 1);

    state.set_silent(2);
    assert_eq!(state.get(), 2);
    assert_eq!(*count.lock(), 0);
}

#[test]
fn test_derived_state_chain() {
    let base = State::new(2);
    let doubled = base.map(|value| value * 2);
    let label = doubled.map(|value| format!("{value}px"));

    base.set(5);
    assert_eq!(doubled.get(), 10);
    assert_eq!(label.get(), "10px");

    drop(label);
    drop(doubled);
    assert_eq!(base.subscriber_count(), 0);
}

#[test]
fn test_debug_shows_value_and_subscribers() {
    let state = State::new(vec![1, 2]);
    let _guard = state.subscribe(|_, _| {});

    let debug = format!("{state:?}");
    assert!(debug.contains("[1, 2]"), "unexpected debug output: {debug}");
    assert!(debug.contains("subscribers: 1"), "unexpected debug output: {debug}");
}
