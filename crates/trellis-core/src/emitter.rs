//! String-keyed event emitter.
//!
//! [`Emitter`] is the generic publish/subscribe mixin views expose as
//! `on` / `off` / `trigger`. Events are named by string; handlers receive a
//! type-erased [`ArgList`].
//!
//! Like [`Signal`](crate::Signal), handlers are invoked with the internal
//! lock released, so a handler may re-enter the emitter.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use slotmap::{new_key_type, SlotMap};

use crate::args::ArgList;

new_key_type! {
    /// A unique identifier for a registered event handler.
    pub struct HandlerId;
}

type EventHandler = Arc<dyn Fn(&ArgList) + Send + Sync>;

struct EmitterInner {
    handlers: Mutex<HashMap<String, SlotMap<HandlerId, EventHandler>>>,
}

/// A shared event hub.
///
/// Cloning returns another handle to the same handler tables.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use trellis_core::{ArgList, Emitter};
///
/// let emitter = Emitter::new();
/// let opened = Arc::new(AtomicUsize::new(0));
///
/// let opened_clone = opened.clone();
/// emitter.on("open", move |args| {
///     assert_eq!(args.get::<&str>(0), Some(&"door"));
///     opened_clone.fetch_add(1, Ordering::SeqCst);
/// });
///
/// emitter.trigger("open", &ArgList::new().with("door"));
/// assert_eq!(opened.load(Ordering::SeqCst), 1);
/// ```
pub struct Emitter {
    inner: Arc<EmitterInner>,
}

impl Emitter {
    /// Create an emitter with no handlers.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(EmitterInner {
                handlers: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Register a handler for `event`.
    pub fn on<F>(&self, event: &str, handler: F) -> HandlerId
    where
        F: Fn(&ArgList) + Send + Sync + 'static,
    {
        self.inner
            .handlers
            .lock()
            .entry(event.to_owned())
            .or_default()
            .insert(Arc::new(handler))
    }

    /// Remove a handler from `event`.
    ///
    /// Returns `true` if the handler was registered for that event.
    pub fn off(&self, event: &str, id: HandlerId) -> bool {
        let mut handlers = self.inner.handlers.lock();
        match handlers.get_mut(event) {
            Some(table) => {
                let removed = table.remove(id).is_some();
                if table.is_empty() {
                    handlers.remove(event);
                }
                removed
            }
            None => false,
        }
    }

    /// Invoke every handler registered for `event` with `args`.
    ///
    /// Unknown events are a no-op.
    pub fn trigger(&self, event: &str, args: &ArgList) {
        let handlers: Vec<EventHandler> = {
            let table = self.inner.handlers.lock();
            match table.get(event) {
                Some(entries) => entries.values().cloned().collect(),
                None => return,
            }
        };
        tracing::trace!(
            target: "trellis_core::emitter",
            event,
            handler_count = handlers.len(),
            "triggering event"
        );
        for handler in &handlers {
            handler(args);
        }
    }

    /// Number of handlers registered for `event`.
    pub fn handler_count(&self, event: &str) -> usize {
        self.inner
            .handlers
            .lock()
            .get(event)
            .map_or(0, SlotMap::len)
    }
}

impl Clone for Emitter {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Default for Emitter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Emitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("events", &self.inner.handlers.lock().len())
            .finish()
    }
}

static_assertions::assert_impl_all!(Emitter: Send, Sync, Clone);
