//! Observable value cells for Trellis.
//!
//! An [`ObservableCell`] wraps a value and notifies two kinds of listeners:
//!
//! - **Interceptors** (pre-commit) run with `(old, new)` *before* the new
//!   value is stored. Reads performed inside an interceptor observe the
//!   previous value. Activation propagation hangs off this hook.
//! - **Subscribers** (post-commit) run with the committed value after every
//!   set.
//!
//! Two properties distinguish the cell from an ordinary change-detecting
//! property:
//!
//! 1. [`set`](ObservableCell::set) notifies even when the new value equals the
//!    current one. Re-activating an already-active view must re-run its
//!    cascade, so equality is not a short-circuit here.
//! 2. [`update`](ObservableCell::update) re-emits the current value through
//!    interceptors and subscribers without changing it. This is how a view
//!    re-propagates activation to children that appeared after the last
//!    propagation.
//!
//! Cells are shared handles: cloning returns another handle to the same value
//! and the same listener tables.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use trellis_core::ObservableCell;
//!
//! let cell = ObservableCell::new(false);
//! let notifications = Arc::new(AtomicUsize::new(0));
//!
//! let notifications_clone = notifications.clone();
//! cell.subscribe(move |_| {
//!     notifications_clone.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! cell.set(true);
//! cell.set(true); // same value still notifies
//! cell.update();  // re-emit without a set
//! assert_eq!(notifications.load(Ordering::SeqCst), 3);
//! assert!(cell.get());
//! ```

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::signal::{ConnectionId, Signal};

struct CellInner<T> {
    value: RwLock<T>,
    /// Pre-commit listeners, invoked with `(old, new)`.
    changing: Signal<(T, T)>,
    /// Post-commit listeners, invoked with the committed value.
    changed: Signal<T>,
}

/// A shared, observable value cell.
///
/// See the [module documentation](self) for the notification contract.
pub struct ObservableCell<T> {
    inner: Arc<CellInner<T>>,
}

impl<T: Clone> ObservableCell<T> {
    /// Create a new cell with an initial value.
    ///
    /// Construction does not notify.
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(CellInner {
                value: RwLock::new(value),
                changing: Signal::new(),
                changed: Signal::new(),
            }),
        }
    }

    /// Get the committed value.
    ///
    /// This clones the value. For large types, use [`with`](Self::with).
    pub fn get(&self) -> T {
        self.inner.value.read().clone()
    }

    /// Access the committed value through a closure without cloning.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.inner.value.read())
    }

    /// Set the value: run interceptors with `(old, new)`, commit, then notify
    /// subscribers.
    ///
    /// Interceptors and subscribers run even when `value` equals the current
    /// value. No lock is held while listeners run; an interceptor that
    /// re-enters the same cell with another `set` will have its write
    /// overwritten when this outer set commits.
    pub fn set(&self, value: T) {
        let old = self.get();
        self.inner.changing.emit(&(old, value.clone()));
        *self.inner.value.write() = value.clone();
        self.inner.changed.emit(&value);
    }

    /// Re-emit the current value without changing it.
    ///
    /// Interceptors run with `(current, current)`, then subscribers run with
    /// the committed value. Used to re-propagate state to listeners attached
    /// (or children discovered) after the last real change.
    pub fn update(&self) {
        let current = self.get();
        self.inner.changing.emit(&(current.clone(), current));
        let committed = self.get();
        self.inner.changed.emit(&committed);
    }

    /// Register a pre-commit interceptor, invoked with `(old, new)`.
    pub fn intercept<F>(&self, interceptor: F) -> ConnectionId
    where
        F: Fn(&T, &T) + Send + Sync + 'static,
        T: Send + 'static,
    {
        self.inner
            .changing
            .connect(move |(old, new)| interceptor(old, new))
    }

    /// Remove a pre-commit interceptor.
    pub fn unintercept(&self, id: ConnectionId) -> bool {
        self.inner.changing.disconnect(id)
    }

    /// Register a post-commit subscriber, invoked with the committed value.
    pub fn subscribe<F>(&self, subscriber: F) -> ConnectionId
    where
        F: Fn(&T) + Send + Sync + 'static,
        T: Send + 'static,
    {
        self.inner.changed.connect(subscriber)
    }

    /// Remove a post-commit subscriber.
    pub fn unsubscribe(&self, id: ConnectionId) -> bool {
        self.inner.changed.disconnect(id)
    }

    /// A read-only handle to this cell.
    pub fn read_only(&self) -> ReadOnlyCell<T> {
        ReadOnlyCell {
            inner: self.clone(),
        }
    }
}

impl<T> Clone for ObservableCell<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone + Default> Default for ObservableCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for ObservableCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableCell")
            .field("value", &self.get())
            .finish()
    }
}

static_assertions::assert_impl_all!(ObservableCell<bool>: Send, Sync, Clone);

/// A read-only view of an [`ObservableCell`].
///
/// Exposes reads and subscription without the ability to set or re-emit.
/// Useful for handing state to renderers while keeping mutation private.
pub struct ReadOnlyCell<T> {
    inner: ObservableCell<T>,
}

impl<T: Clone> ReadOnlyCell<T> {
    /// Get the committed value.
    pub fn get(&self) -> T {
        self.inner.get()
    }

    /// Access the committed value through a closure.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        self.inner.with(f)
    }

    /// Register a post-commit subscriber.
    pub fn subscribe<F>(&self, subscriber: F) -> ConnectionId
    where
        F: Fn(&T) + Send + Sync + 'static,
        T: Send + 'static,
    {
        self.inner.subscribe(subscriber)
    }

    /// Remove a post-commit subscriber.
    pub fn unsubscribe(&self, id: ConnectionId) -> bool {
        self.inner.unsubscribe(id)
    }
}

impl<T> Clone for ReadOnlyCell<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for ReadOnlyCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadOnlyCell")
            .field("value", &self.get())
            .finish()
    }
}
