//! Signal/slot system for Horizon Fieldset.
//!
//! This module provides a type-safe, Qt-inspired signal/slot mechanism for
//! widget-to-host communication. Widgets emit signals when their consolidated
//! state changes, and connected slots (callbacks) are invoked in response.
//!
//! # Key Types
//!
//! - [`Signal<Args>`] - The main signal type for emitting notifications
//! - [`ConnectionId`] - Unique identifier returned when connecting a slot
//! - [`ConnectionGuard`] - RAII guard that disconnects when dropped
//!
//! # Direct and Deferred Emission
//!
//! All widget logic runs inside a single-threaded cooperative host loop, so
//! slots are invoked directly in the emitting call stack. Notifications that
//! must not interleave with the current interaction (a self-managing widget
//! reporting non-essential state, for example) can be queued with
//! [`Signal::emit_deferred`] and delivered later via
//! [`Signal::flush_deferred`] — typically at the end of the host's
//! synchronization pass.
//!
//! # Example
//!
//! ```
//! use horizon_fieldset_core::Signal;
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

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// A unique identifier for a signal-slot connection.
    ///
    /// Use this ID to disconnect a specific connection via
    /// [`Signal::disconnect`]. The ID remains valid until the connection is
    /// explicitly disconnected or the signal is dropped.
    pub struct ConnectionId;
}

/// Internal storage for a single connection.
struct Connection<Args> {
    /// The slot function to invoke (Arc-wrapped for cheap cloning while the
    /// connection table lock is released).
    slot: Arc<dyn Fn(&Args) + Send + Sync>,
}

/// A type-safe signal that can have multiple connected slots.
///
/// When a signal is emitted, all connected slots are invoked with the
/// provided arguments, in connection order.
///
/// # Type Parameter
///
/// - `Args`: The argument type passed to connected slots. Use `()` for
///   signals with no arguments, or a tuple like `(String, i64)` for multiple
///   arguments.
///
/// # Related Types
///
/// - [`ConnectionId`] - Returned by [`connect`](Self::connect), used to disconnect
/// - [`ConnectionGuard`] - RAII-style connection that auto-disconnects on drop
pub struct Signal<Args> {
    /// All active connections.
    connections: Mutex<SlotMap<ConnectionId, Connection<Args>>>,
    /// Whether signal emission is temporarily blocked.
    blocked: AtomicBool,
    /// Queued argument sets awaiting [`Signal::flush_deferred`].
    deferred: Mutex<VecDeque<Args>>,
}

impl<Args: Clone + Send + 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: Clone + Send + 'static> Signal<Args> {
    /// Create a new signal with no connections.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(SlotMap::with_key()),
            blocked: AtomicBool::new(false),
            deferred: Mutex::new(VecDeque::new()),
        }
    }

    /// Connect a slot (closure) to this signal.
    ///
    /// Returns a `ConnectionId` that can be used to disconnect the slot later.
    ///
    /// # Example
    ///
    /// ```
    /// use horizon_fieldset_core::Signal;
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
        };
        self.connections.lock().insert(connection)
    }

    /// Disconnect a specific slot by its connection ID.
    ///
    /// Returns `true` if the connection was found and removed, `false` otherwise.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.lock().remove(id).is_some()
    }

    /// Disconnect a specific slot, reporting an unknown or already removed
    /// connection as an error.
    pub fn try_disconnect(&self, id: ConnectionId) -> crate::error::Result<()> {
        if self.disconnect(id) {
            Ok(())
        } else {
            Err(crate::error::SignalError::InvalidConnection.into())
        }
    }

    /// Disconnect all slots from this signal.
    pub fn disconnect_all(&self) {
        self.connections.lock().clear();
        self.deferred.lock().clear();
    }

    /// Get the number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }

    /// Check whether at least one slot is connected.
    ///
    /// Widgets use this to decide whether an externally supplied value makes
    /// them controlled: supplying a change callback means connecting a slot.
    pub fn has_connections(&self) -> bool {
        !self.connections.lock().is_empty()
    }

    /// Block signal emission temporarily.
    ///
    /// While blocked, calls to `emit()` and `emit_deferred()` do nothing.
    /// This is useful during initialization or batch updates to prevent
    /// cascading notifications.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.store(blocked, Ordering::SeqCst);
    }

    /// Check if signal emission is currently blocked.
    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::SeqCst)
    }

    /// Emit the signal, invoking all connected slots directly.
    ///
    /// If the signal is blocked, this does nothing.
    #[tracing::instrument(skip_all, target = "horizon_fieldset_core::signal", level = "trace")]
    pub fn emit(&self, args: Args) {
        if self.is_blocked() {
            tracing::trace!(
                target: "horizon_fieldset_core::signal",
                "signal blocked, skipping emit"
            );
            return;
        }

        // Clone the slots out so re-entrant connect/disconnect from inside a
        // slot cannot deadlock on the connection table.
        let slots: Vec<Arc<dyn Fn(&Args) + Send + Sync>> = {
            let connections = self.connections.lock();
            tracing::trace!(
                target: "horizon_fieldset_core::signal",
                connection_count = connections.len(),
                "emitting signal"
            );
            connections.iter().map(|(_, c)| c.slot.clone()).collect()
        };

        for slot in slots {
            slot(&args);
        }
    }

    /// Queue an emission for a later [`flush_deferred`](Self::flush_deferred).
    ///
    /// Returns `true` if the arguments were queued, `false` if the signal is
    /// blocked.
    pub fn emit_deferred(&self, args: Args) -> bool {
        if self.is_blocked() {
            return false;
        }
        self.deferred.lock().push_back(args);
        true
    }

    /// Deliver all queued emissions in order.
    ///
    /// Slots connected after an emission was queued still receive it; the
    /// queue stores arguments, not resolved slot lists. Returns the number of
    /// emissions delivered.
    pub fn flush_deferred(&self) -> usize {
        let mut delivered = 0;
        loop {
            // Pop one at a time so slots may queue further emissions without
            // holding the queue lock.
            let args = self.deferred.lock().pop_front();
            match args {
                Some(args) => {
                    self.emit(args);
                    delivered += 1;
                }
                None => break,
            }
        }
        delivered
    }

    /// Number of queued emissions awaiting delivery.
    pub fn pending_deferred(&self) -> usize {
        self.deferred.lock().len()
    }
}

impl<Args> std::fmt::Debug for Signal<Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("connection_count", &self.connections.lock().len())
            .field("blocked", &self.blocked.load(Ordering::SeqCst))
            .field("pending_deferred", &self.deferred.lock().len())
            .finish()
    }
}

static_assertions::assert_impl_all!(Signal<String>: Send, Sync);

/// A connection guard that automatically disconnects when dropped.
///
/// This is useful for RAII-style connection management, ensuring connections
/// are cleaned up when the receiver goes out of scope. Created via
/// [`Signal::connect_scoped`].
///
/// # Example
///
/// ```
/// use horizon_fieldset_core::Signal;
/// use std::sync::atomic::{AtomicI64, Ordering};
/// use std::sync::Arc;
///
/// let signal = Signal::<i64>::new();
/// let counter = Arc::new(AtomicI64::new(0));
/// {
///     let counter_clone = counter.clone();
///     let _guard = signal.connect_scoped(move |&n| {
///         counter_clone.fetch_add(n, Ordering::SeqCst);
///     });
///     signal.emit(42); // counter = 42
/// }
/// signal.emit(43); // Nothing happens - connection was dropped
/// assert_eq!(counter.load(Ordering::SeqCst), 42);
/// ```
pub struct ConnectionGuard<'a, Args: Clone + Send + 'static> {
    signal: &'a Signal<Args>,
    id: ConnectionId,
}

impl<Args: Clone + Send + 'static> Signal<Args> {
    /// Connect a slot with automatic disconnection when the guard is dropped.
    pub fn connect_scoped<F>(&self, slot: F) -> ConnectionGuard<'_, Args>
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let id = self.connect(slot);
        ConnectionGuard { signal: self, id }
    }
}

impl<Args: Clone + Send + 'static> ConnectionGuard<'_, Args> {
    /// The ID of the guarded connection.
    pub fn id(&self) -> ConnectionId {
        self.id
    }
}

impl<Args: Clone + Send + 'static> Drop for ConnectionGuard<'_, Args> {
    fn drop(&mut self) {
        self.signal.disconnect(self.id);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    #[test]
    fn test_connect_and_emit() {
        let signal = Signal::<i64>::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        let received_clone = received.clone();
        signal.connect(move |&value| {
            received_clone.lock().push(value);
        });

        signal.emit(1);
        signal.emit(2);

        assert_eq!(*received.lock(), vec![1, 2]);
    }

    #[test]
    fn test_disconnect() {
        let signal = Signal::<()>::new();
        let count = Arc::new(AtomicUsize::new(0));

        let count_clone = count.clone();
        let id = signal.connect(move |_| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        signal.emit(());
        assert!(signal.disconnect(id));
        assert!(!signal.disconnect(id));
        signal.emit(());

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_try_disconnect_reports_unknown_connection() {
        let signal = Signal::<()>::new();
        let id = signal.connect(|_| {});

        assert!(signal.try_disconnect(id).is_ok());
        let error = signal.try_disconnect(id).unwrap_err();
        assert!(matches!(
            error,
            crate::error::CoreError::Signal(crate::error::SignalError::InvalidConnection)
        ));
    }

    #[test]
    fn test_connection_count() {
        let signal = Signal::<()>::new();
        assert_eq!(signal.connection_count(), 0);
        assert!(!signal.has_connections());

        let a = signal.connect(|_| {});
        let _b = signal.connect(|_| {});
        assert_eq!(signal.connection_count(), 2);
        assert!(signal.has_connections());

        signal.disconnect(a);
        assert_eq!(signal.connection_count(), 1);

        signal.disconnect_all();
        assert!(!signal.has_connections());
    }

    #[test]
    fn test_blocked_signal_skips_emit() {
        let signal = Signal::<()>::new();
        let count = Arc::new(AtomicUsize::new(0));

        let count_clone = count.clone();
        signal.connect(move |_| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        signal.set_blocked(true);
        signal.emit(());
        assert!(!signal.emit_deferred(()));
        assert_eq!(count.load(Ordering::SeqCst), 0);

        signal.set_blocked(false);
        signal.emit(());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_deferred_emission_order() {
        let signal = Signal::<i64>::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        let received_clone = received.clone();
        signal.connect(move |&value| {
            received_clone.lock().push(value);
        });

        signal.emit_deferred(1);
        signal.emit_deferred(2);
        assert_eq!(signal.pending_deferred(), 2);
        assert!(received.lock().is_empty());

        assert_eq!(signal.flush_deferred(), 2);
        assert_eq!(*received.lock(), vec![1, 2]);
        assert_eq!(signal.pending_deferred(), 0);
    }

    #[test]
    fn test_deferred_reaches_late_connection() {
        let signal = Signal::<i64>::new();
        signal.emit_deferred(7);

        let received = Arc::new(Mutex::new(Vec::new()));
        let received_clone = received.clone();
        signal.connect(move |&value| {
            received_clone.lock().push(value);
        });

        signal.flush_deferred();
        assert_eq!(*received.lock(), vec![7]);
    }

    #[test]
    fn test_scoped_connection_drops() {
        let signal = Signal::<()>::new();
        let count = Arc::new(AtomicUsize::new(0));

        {
            let count_clone = count.clone();
            let _guard = signal.connect_scoped(move |_| {
                count_clone.fetch_add(1, Ordering::SeqCst);
            });
            signal.emit(());
            assert_eq!(signal.connection_count(), 1);
        }

        signal.emit(());
        assert_eq!(signal.connection_count(), 0);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_reentrant_connect_does_not_deadlock() {
        let signal = Arc::new(Signal::<()>::new());

        let signal_clone = signal.clone();
        signal.connect(move |_| {
            // Connecting from inside a slot must not deadlock.
            signal_clone.connect(|_| {});
        });

        signal.emit(());
        assert_eq!(signal.connection_count(), 2);
    }
}
