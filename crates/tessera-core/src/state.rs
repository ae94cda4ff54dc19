//! Observable state for Tessera.
//!
//! [`State<T>`] is a shared, reactive value. Every mutation runs the same
//! three-phase notification sequence, synchronously and in order:
//!
//! 1. `begin` listeners ([`State::on_begin`])
//! 2. change listeners with `(old, new)` ([`State::subscribe`])
//! 3. `end` listeners ([`State::on_end`])
//!
//! The begin/end pair lets consumers that react to a change with several
//! downstream writes batch those writes into one update.
//!
//! # Example
//!
//! ```
//! use tessera_core::State;
//! use std::sync::Arc;
//! use parking_lot::Mutex;
//!
//! let count = State::new(0);
//! let seen = Arc::new(Mutex::new(Vec::new()));
//!
//! let seen_clone = seen.clone();
//! let _guard = count.subscribe(move |old, new| {
//!     seen_clone.lock().push((*old, *new));
//! });
//!
//! count.set(1);
//! count.update(|value| *value += 10);
//!
//! assert_eq!(count.get(), 11);
//! assert_eq!(*seen.lock(), vec![(0, 1), (1, 11)]);
//! ```

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};

use crate::logging::targets;
use crate::signal::{ConnectionGuard, Signal};

struct StateInner<T> {
    value: RwLock<T>,
    began: Signal<()>,
    changed: Signal<(T, T)>,
    ended: Signal<()>,
    /// Keeps a derived state's upstream subscription alive.
    upstream: Mutex<Option<ConnectionGuard>>,
}

/// A shared reactive value with change notification.
///
/// Cloning a `State` produces another handle to the same value; a mutation
/// through either handle notifies the listeners of both.
///
/// # Thread Safety
///
/// `State<T>` uses interior mutability with `RwLock` and is `Send + Sync` when
/// `T` is. Listeners always run after the lock has been released, so a
/// listener may read the state it is observing.
pub struct State<T> {
    inner: Arc<StateInner<T>>,
}

impl<T> Clone for State<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> State<T> {
    /// Create a new state with an initial value.
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(StateInner {
                value: RwLock::new(value),
                began: Signal::new(),
                changed: Signal::new(),
                ended: Signal::new(),
                upstream: Mutex::new(None),
            }),
        }
    }

    /// Get the current value.
    ///
    /// This clones the value. For large types, consider using `with()` instead.
    pub fn get(&self) -> T {
        self.inner.value.read().clone()
    }

    /// Access the value through a closure without cloning.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.inner.value.read())
    }

    /// Set the value without change notification.
    pub fn set_silent(&self, value: T) {
        *self.inner.value.write() = value;
    }

    /// Replace the value and notify listeners.
    ///
    /// Listeners are notified even when the new value equals the old one;
    /// use [`State::set_if_changed`] to skip no-op writes.
    pub fn set(&self, value: T) {
        let old = std::mem::replace(&mut *self.inner.value.write(), value.clone());
        self.notify(old, value);
    }

    /// Mutate the value in place and notify listeners.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut T),
    {
        let (old, new) = {
            let mut value = self.inner.value.write();
            let old = value.clone();
            f(&mut value);
            (old, value.clone())
        };
        self.notify(old, new);
    }

    /// Listen for changes. The slot receives `(old, new)`.
    pub fn subscribe<F>(&self, f: F) -> ConnectionGuard
    where
        F: Fn(&T, &T) + Send + Sync + 'static,
    {
        self.inner.changed.connect_scoped(move |(old, new)| f(old, new))
    }

    /// Listen for the start of each mutation, before any change listener runs.
    pub fn on_begin<F>(&self, f: F) -> ConnectionGuard
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.inner.began.connect_scoped(move |_| f())
    }

    /// Listen for the end of each mutation, after every change listener ran.
    pub fn on_end<F>(&self, f: F) -> ConnectionGuard
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.inner.ended.connect_scoped(move |_| f())
    }

    /// Number of live change listeners.
    pub fn subscriber_count(&self) -> usize {
        self.inner.changed.connection_count()
    }

    /// Derive a state that follows this one through `f`.
    ///
    /// The derived state keeps its upstream subscription alive for as long as
    /// any handle to it exists; the upstream only holds a weak reference back.
    pub fn map<U, F>(&self, f: F) -> State<U>
    where
        U: Clone + Send + Sync + 'static,
        F: Fn(&T) -> U + Send + Sync + 'static,
    {
        let derived = State::new(self.with(&f));
        let weak: Weak<StateInner<U>> = Arc::downgrade(&derived.inner);
        let guard = self.subscribe(move |_, new| {
            if let Some(inner) = weak.upgrade() {
                State { inner }.set(f(new));
            }
        });
        *derived.inner.upstream.lock() = Some(guard);
        derived
    }

    fn notify(&self, old: T, new: T) {
        tracing::trace!(target: targets::STATE, "state changed");
        self.inner.began.emit(());
        self.inner.changed.emit((old, new));
        self.inner.ended.emit(());
    }
}

impl<T: Clone + PartialEq + Send + Sync + 'static> State<T> {
    /// Set the value, returning `true` (and notifying) only if it changed.
    pub fn set_if_changed(&self, value: T) -> bool {
        if self.with(|current| *current == value) {
            return false;
        }
        self.set(value);
        true
    }
}

impl<T: Clone + Default + Send + Sync + 'static> Default for State<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + Send + Sync + 'static> From<T> for State<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: fmt::Debug + 'static> fmt::Debug for State<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("value", &*self.inner.value.read())
            .field("subscribers", &self.inner.changed.connection_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_target_matches_module() {
        assert_eq!(targets::STATE, module_path!().trim_end_matches("::tests"));
    }

    #[test]
    fn test_state_basic() {
        let state = State::new(42);
        assert_eq!(state.get(), 42);
    }

    #[test]
    fn test_clones_share_value() {
        let a = State::new(1);
        let b = a.clone();
        b.set(2);
        assert_eq!(a.get(), 2);
    }

    #[test]
    fn test_set_notifies_old_and_new() {
        let state = State::new("a".to_string());
        let seen = Arc::new(Mutex::new(Vec::new()));

        let seen_clone = seen.clone();
        let _guard = state.subscribe(move |old, new| {
            seen_clone.lock().push(format!("{old}->{new}"));
        });

        state.set("b".to_string());
        state.set("b".to_string());
        assert_eq!(*seen.lock(), vec!["a->b", "b->b"]);
    }

    #[test]
    fn test_set_if_changed() {
        let state = State::new(10);
        let hits = Arc::new(Mutex::new(0));

        let hits_clone = hits.clone();
        let _guard = state.subscribe(move |_, _| *hits_clone.lock() += 1);

        assert!(!state.set_if_changed(10));
        assert!(state.set_if_changed(20));
        assert_eq!(*hits.lock(), 1);
    }

    #[test]
    fn test_set_silent_skips_listeners() {
        let state = State::new(100);
        let hits = Arc::new(Mutex::new(0));

        let hits_clone = hits.clone();
        let _guard = state.subscribe(move |_, _| *hits_clone.lock() += 1);

        state.set_silent(200);
        assert_eq!(state.get(), 200);
        assert_eq!(*hits.lock(), 0);
    }

    #[test]
    fn test_begin_change_end_order() {
        let state = State::new(vec![1]);
        let log = Arc::new(Mutex::new(Vec::new()));

        let l = log.clone();
        let _end = state.on_end(move || l.lock().push("end"));
        let l = log.clone();
        let _change = state.subscribe(move |_, _| l.lock().push("change"));
        let l = log.clone();
        let _begin = state.on_begin(move || l.lock().push("begin"));

        state.update(|v| v.push(2));
        assert_eq!(*log.lock(), vec!["begin", "change", "end"]);
        assert_eq!(state.get(), vec![1, 2]);
    }

    #[test]
    fn test_dropping_guard_unsubscribes() {
        let state = State::new(0);
        let guard = state.subscribe(|_, _| {});
        assert_eq!(state.subscriber_count(), 1);
        drop(guard);
        assert_eq!(state.subscriber_count(), 0);
    }

    #[test]
    fn test_listener_can_read_state() {
        let state = State::new(1);
        let seen = Arc::new(Mutex::new(0));

        let reader = state.clone();
        let seen_clone = seen.clone();
        let _guard = state.subscribe(move |_, _| *seen_clone.lock() = reader.get());

        state.set(5);
        assert_eq!(*seen.lock(), 5);
    }

    #[test]
    fn test_map_follows_source() {
        let width = State::new(10);
        let label = width.map(|w| format!("{w}px"));
        assert_eq!(label.get(), "10px");

        width.set(25);
        assert_eq!(label.get(), "25px");

        drop(label);
        assert_eq!(width.subscriber_count(), 0);
        width.set(30);
    }
}
