//! Direct-invocation signals for Trellis.
//!
//! A [`Signal`] is the notification primitive underneath the observable cell
//! and the event emitter: handlers connect to it, and emitting invokes every
//! connected handler with a reference to the arguments.
//!
//! Handlers are always invoked synchronously on the emitting thread, in
//! connection order. Before invocation the handler list is copied out of the
//! connection table, so a handler may freely re-enter the signal to connect,
//! disconnect, or emit again. Handlers connected during an emit are not
//! invoked until the next emit.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use trellis_core::Signal;
//!
//! let signal = Signal::<i32>::new();
//! let hits = Arc::new(AtomicUsize::new(0));
//!
//! let hits_in_handler = hits.clone();
//! let id = signal.connect(move |value| {
//!     assert_eq!(*value, 7);
//!     hits_in_handler.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! signal.emit(&7);
//! assert_eq!(hits.load(Ordering::SeqCst), 1);
//!
//! signal.disconnect(id);
//! signal.emit(&7);
//! assert_eq!(hits.load(Ordering::SeqCst), 1);
//! ```

use std::sync::Arc;

use parking_lot::Mutex;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// A unique identifier for a connected handler.
    ///
    /// Returned by [`Signal::connect`]; pass it to [`Signal::disconnect`] to
    /// remove the handler. The id stays valid until disconnected or until the
    /// signal is dropped.
    pub struct ConnectionId;
}

type Handler<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

/// A signal with synchronously invoked handlers.
///
/// `Signal<Args>` is `Send + Sync`; `Args` is the argument type handlers
/// receive by reference. Use `()` for argument-less signals or a tuple for
/// several arguments.
pub struct Signal<Args> {
    connections: Mutex<SlotMap<ConnectionId, Handler<Args>>>,
}

impl<Args> Signal<Args> {
    /// Create a new signal with no connections.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(SlotMap::with_key()),
        }
    }

    /// Connect a handler, returning an id that can disconnect it later.
    pub fn connect<F>(&self, handler: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.connections.lock().insert(Arc::new(handler))
    }

    /// Disconnect a handler by id.
    ///
    /// Returns `true` if the connection existed.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.lock().remove(id).is_some()
    }

    /// Disconnect every handler.
    pub fn disconnect_all(&self) {
        self.connections.lock().clear();
    }

    /// Number of connected handlers.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }

    /// Invoke every connected handler with `args`.
    ///
    /// The connection table is snapshotted before the first handler runs, and
    /// the lock is released for the duration of the calls: handlers may
    /// re-enter the signal without deadlocking. Handlers added or removed
    /// during an emit take effect on the next emit.
    pub fn emit(&self, args: &Args) {
        let handlers: Vec<Handler<Args>> = self.connections.lock().values().cloned().collect();
        tracing::trace!(
            target: "trellis_core::signal",
            handler_count = handlers.len(),
            "emitting signal"
        );
        for handler in &handlers {
            handler(args);
        }
    }
}

impl<Args> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args> std::fmt::Debug for Signal<Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("connections", &self.connection_count())
            .finish()
    }
}

static_assertions::assert_impl_all!(Signal<(bool, bool)>: Send, Sync);
