//! Reactive primitives for Tessera.
//!
//! This crate provides the pieces the styling engine builds its change
//! propagation on:
//!
//! - **Signal/Slot System**: Ordered, synchronous observer notification
//! - **Connection Guards**: Explicit, droppable listener registrations
//! - **State**: Shared observable values with begin/change/end notification
//!
//! Everything runs inline on the calling thread: a mutation notifies every
//! listener, depth-first, before it returns.
//!
//! # Signal/Slot Example
//!
//! ```
//! use tessera_core::Signal;
//!
//! let value_changed = Signal::<i32>::new();
//!
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! value_changed.emit(42);
//! value_changed.disconnect(conn_id);
//! ```
//!
//! # State Example
//!
//! ```
//! use tessera_core::State;
//!
//! let items = State::new(vec!["a", "b"]);
//! let _guard = items.subscribe(|old, new| {
//!     println!("{} -> {} items", old.len(), new.len());
//! });
//!
//! items.update(|v| v.push("c"));
//! assert_eq!(items.get().len(), 3);
//! ```

pub mod logging;
pub mod signal;
pub mod state;

pub use logging::PerfSpan;
pub use signal::{ConnectionGuard, ConnectionId, Signal};
pub use state::State;
