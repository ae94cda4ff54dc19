//! Signal/slot system for Tessera.
//!
//! This module provides a small, type-safe observer mechanism. Signals are
//! emitted when a value changes, and connected slots (callbacks) are invoked
//! synchronously, in the order they were connected, before `emit` returns.
//!
//! # Key Types
//!
//! - [`Signal<Args>`] - The signal type used for emitting notifications
//! - [`ConnectionId`] - Unique identifier returned when connecting a slot
//! - [`ConnectionGuard`] - Handle that disconnects when dropped
//!
//! # Reentrancy
//!
//! The connection table is never locked while slots run, so a slot may
//! connect or disconnect other slots (including itself) on the signal that is
//! currently emitting. Changes made during an emission take effect on the
//! next emission.
//!
//! # Example
//!
//! ```
//! use tessera_core::Signal;
//!
//! // Create a signal that passes a string argument
//! let text_changed = Signal::<String>::new();
//!
//! // Connect a slot (closure)
//! let conn_id = text_changed.connect(|text| {
//!     println!("Text changed to: {}", text);
//! });
//!
//! // Emit the signal
//! text_changed.emit("Hello, World!".to_string());
//!
//! // Disconnect when done
//! text_changed.disconnect(conn_id);
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use slotmap::{new_key_type, SlotMap};

use crate::logging::targets;

new_key_type! {
    /// A unique identifier for a signal-slot connection.
    ///
    /// Use this ID to disconnect a specific connection via [`Signal::disconnect`].
    /// The ID remains valid until the connection is explicitly disconnected or
    /// the signal is dropped.
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

/// Internal storage for a single connection.
struct Connection<Args> {
    /// The slot function to invoke.
    slot: Slot<Args>,
    /// Monotonic sequence number; slot keys are reused, this is not.
    order: u64,
}

type ConnectionTable<Args> = Mutex<SlotMap<ConnectionId, Connection<Args>>>;

/// A type-safe signal that can have multiple connected slots.
///
/// When a signal is emitted, all connected slots are invoked with the provided
/// arguments, in connection order.
///
/// # Type Parameter
///
/// - `Args`: The argument type passed to connected slots. Use `()` for signals
///   with no arguments, or a tuple like `(String, i32)` for multiple arguments.
pub struct Signal<Args> {
    /// All active connections.
    connections: Arc<ConnectionTable<Args>>,
    /// Next connection sequence number.
    next_order: AtomicU64,
}

impl<Args: 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: 'static> Signal<Args> {
    /// Create a new signal with no connections.
    pub fn new() -> Self {
        Self {
            connections: Arc::new(Mutex::new(SlotMap::with_key())),
            next_order: AtomicU64::new(0),
        }
    }

    /// Connect a slot (closure) to this signal.
    ///
    /// Returns a `ConnectionId` that can be used to disconnect the slot later.
    ///
    /// # Example
    ///
    /// ```
    /// use tessera_core::Signal;
    ///
    /// let signal = Signal::<String>::new();
    /// let id = signal.connect(|s| println!("Got: {}", s));
    /// signal.emit("Hello".to_string());
    /// ```
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let connection = Connection {
            slot: Arc::new(slot),
            order: self.next_order.fetch_add(1, Ordering::Relaxed),
        };
        self.connections.lock().insert(connection)
    }

    /// Connect a slot and return a guard that disconnects it when dropped.
    ///
    /// The guard only holds a weak reference to the connection table, so it
    /// may safely outlive the signal.
    ///
    /// # Example
    ///
    /// ```
    /// use tessera_core::Signal;
    /// use std::sync::atomic::{AtomicI32, Ordering};
    /// use std::sync::Arc;
    ///
    /// let signal = Signal::<i32>::new();
    /// let counter = Arc::new(AtomicI32::new(0));
    /// {
    ///     let counter_clone = counter.clone();
    ///     let _guard = signal.connect_scoped(move |&n| {
    ///         counter_clone.fetch_add(n, Ordering::SeqCst);
    ///     });
    ///     signal.emit(42);  // counter = 42
    /// }
    /// signal.emit(43);  // Nothing happens - connection was dropped
    /// assert_eq!(counter.load(Ordering::SeqCst), 42);
    /// ```
    pub fn connect_scoped<F>(&self, slot: F) -> ConnectionGuard
    where
        Args: Send,
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let id = self.connect(slot);
        let table: Weak<ConnectionTable<Args>> = Arc::downgrade(&self.connections);
        ConnectionGuard::new(move || {
            if let Some(table) = table.upgrade() {
                table.lock().remove(id);
            }
        })
    }

    /// Disconnect a specific slot by its connection ID.
    ///
    /// Returns `true` if the connection was found and removed, `false` otherwise.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.lock().remove(id).is_some()
    }

    /// Get the number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }

    /// Emit the signal, invoking all connected slots in connection order.
    #[tracing::instrument(skip_all, target = "tessera_core::signal", level = "trace")]
    pub fn emit(&self, args: Args) {
        let slots = self.snapshot();
        tracing::trace!(target: targets::SIGNAL, connection_count = slots.len(), "emitting signal");

        for slot in slots {
            slot(&args);
        }
    }

    /// Clone the slots out of the table, ordered by connection time.
    fn snapshot(&self) -> Vec<Slot<Args>> {
        let connections = self.connections.lock();
        let mut ordered: Vec<(u64, Slot<Args>)> = connections
            .values()
            .map(|conn| (conn.order, conn.slot.clone()))
            .collect();
        drop(connections);

        ordered.sort_by_key(|(order, _)| *order);
        ordered.into_iter().map(|(_, slot)| slot).collect()
    }
}

impl<Args> fmt::Debug for Signal<Args> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("connections", &self.connections.lock().len())
            .finish()
    }
}

/// A connection handle that disconnects when dropped.
///
/// Guards are type-erased so that owners can keep guards for signals of
/// different argument types in one collection. Created via
/// [`Signal::connect_scoped`] or by the subscription methods of
/// [`crate::State`].
#[must_use = "dropping a ConnectionGuard disconnects the slot immediately"]
pub struct ConnectionGuard {
    disconnect: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl ConnectionGuard {
    /// Create a guard that runs `disconnect` exactly once.
    pub fn new<F>(disconnect: F) -> Self
    where
        F: FnOnce() + Send + Sync + 'static,
    {
        Self {
            disconnect: Some(Box::new(disconnect)),
        }
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        if let Some(disconnect) = self.disconnect.take() {
            disconnect();
        }
    }
}

impl fmt::Debug for ConnectionGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionGuard").finish_non_exhaustive()
    }
}
