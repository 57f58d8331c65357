//! View nodes and the activation lifecycle.
//!
//! A view moves through four effective states: inactive, pending load (active
//! but awaiting remote content), initializing, and initialized. Transitions
//! are driven by writes to the view's `is_active` cell: a pre-commit
//! interceptor cascades the new value to route-less children (depth-first,
//! the whole subtree settles before the triggering write commits) and then
//! runs the initialization gate.
//!
//! The gate fires the user's `init` callback at most once per view. For
//! url-bearing views the callback runs early (before content arrives) for
//! setup that does not depend on content, but the view is only marked
//! initialized once content is present. After a completed initialization the
//! view re-emits its activation so children constructed inside the callback
//! receive the cascade they would otherwise have missed.
//!
//! Route matches arrive via [`ViewRef::dispatch_route`]: the gate is forced,
//! the `routed` callback runs, the match is forwarded to every active child,
//! and finally the view is activated, which re-runs the cascade for
//! route-less children added along the way.
//!
//! Locking discipline: registry locks are short-scoped snapshots; no lock is
//! held while user callbacks, interceptors, or subscribers run. A panic in a
//! lifecycle callback unwinds to whoever triggered the cascade; the flags
//! guarding one-shot behavior commit before the callback is entered.

use std::fmt;
use std::sync::Arc;

use trellis_core::{ArgList, HandlerId, ObservableCell, ReadOnlyCell};

use crate::application::{AppInner, InitScope};
use crate::definition::{ViewDefinition, ViewOptions};
use crate::loader::LoadError;
use crate::registry::{ViewId, ViewResult};
use crate::router::RouteParams;

/// Handle to one view in the tree.
///
/// `ViewRef` is cheap to clone and keeps the owning application alive. All
/// lifecycle operations run through it.
pub struct ViewRef {
    app: Arc<AppInner>,
    id: ViewId,
}

impl ViewRef {
    pub(crate) fn new(app: Arc<AppInner>, id: ViewId) -> Self {
        Self { app, id }
    }

    /// The view's arena id.
    pub fn id(&self) -> ViewId {
        self.id
    }

    /// The name given in the definition, empty if unnamed.
    pub fn name(&self) -> String {
        self.read(|d| d.name.clone()).unwrap_or_default()
    }

    /// The option snapshot the view was constructed with.
    pub fn options(&self) -> ViewOptions {
        self.read(|d| d.options.clone()).unwrap_or_default()
    }

    /// The owning parent view, or `None` for a root.
    pub fn parent_view(&self) -> Option<ViewRef> {
        let parent = {
            let registry = self.app.registry.read();
            registry.parent(self.id).ok().flatten()
        };
        parent.map(|id| ViewRef::new(Arc::clone(&self.app), id))
    }

    /// The view's children, in discovery order.
    pub fn children(&self) -> Vec<ViewRef> {
        self.read(|d| d.children.clone())
            .unwrap_or_default()
            .into_iter()
            .map(|id| ViewRef::new(Arc::clone(&self.app), id))
            .collect()
    }

    /// Whether the view is currently active.
    pub fn is_active(&self) -> bool {
        self.read(|d| d.is_active.get()).unwrap_or(false)
    }

    /// Write the activation state.
    ///
    /// The activation cascade runs before the write commits; writing the
    /// current value re-runs the full cascade.
    pub fn set_active(&self, active: bool) {
        if let Some(cell) = self.read(|d| d.is_active.clone()) {
            cell.set(active);
        }
    }

    /// Read-only observation handle for the activation state.
    pub fn activation(&self) -> ReadOnlyCell<bool> {
        self.cell(|d| &d.is_active).read_only()
    }

    /// Whether a content fetch is outstanding.
    pub fn is_loading(&self) -> bool {
        self.read(|d| d.loading.get()).unwrap_or(false)
    }

    /// Read-only observation handle for the loading state.
    pub fn loading(&self) -> ReadOnlyCell<bool> {
        self.cell(|d| &d.loading).read_only()
    }

    /// Whether initialization has completed.
    pub fn is_initialized(&self) -> bool {
        self.read(|d| d.initialized).unwrap_or(false)
    }

    /// The fetched content, if the fetch has been satisfied.
    pub fn content(&self) -> Option<String> {
        self.read(|d| d.content.clone()).flatten()
    }

    /// Construct a child of this view.
    pub fn create_child(&self, definition: ViewDefinition) -> ViewResult<ViewRef> {
        crate::application::create_view(&self.app, Some(self.id), definition)
    }

    /// Navigate to a slash-joined path via the application's router.
    ///
    /// Returns the view for chaining.
    pub fn route<I, S>(&self, segments: I) -> &Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let path = segments
            .into_iter()
            .map(|s| s.as_ref().to_owned())
            .collect::<Vec<_>>()
            .join("/");
        self.app.router.navigate(&path);
        self
    }

    /// Forward a navigation request to the application.
    pub fn navigate_to(&self, target: &str, params: &RouteParams) {
        self.app.router.navigate_to(target, params);
    }

    /// Notify this view that the router matched its route.
    ///
    /// Forces the initialization gate, invokes the `routed` callback,
    /// forwards the match to every currently active child, and finally
    /// activates the view. After this returns the view is active regardless
    /// of its prior state.
    pub fn dispatch_route(&self, params: &RouteParams) {
        dispatch_routed(&self.app, self.id, params);
    }

    /// Register an event handler on this view.
    pub fn on<F>(&self, event: &str, handler: F) -> HandlerId
    where
        F: Fn(&ArgList) + Send + Sync + 'static,
    {
        self.events().on(event, handler)
    }

    /// Remove an event handler.
    pub fn off(&self, event: &str, id: HandlerId) -> bool {
        self.events().off(event, id)
    }

    /// Trigger an event on this view.
    pub fn trigger(&self, event: &str, args: &ArgList) {
        self.events().trigger(event, args);
    }

    fn events(&self) -> trellis_core::Emitter {
        self.read(|d| d.events.clone()).unwrap_or_default()
    }

    fn read<R>(&self, f: impl FnOnce(&crate::registry::ViewData) -> R) -> Option<R> {
        let registry = self.app.registry.read();
        registry.get(self.id).map(f)
    }

    fn cell(
        &self,
        f: impl FnOnce(&crate::registry::ViewData) -> &ObservableCell<bool>,
    ) -> ObservableCell<bool> {
        self.read(|d| f(d).clone())
            .unwrap_or_else(|| ObservableCell::new(false))
    }
}

impl Clone for ViewRef {
    fn clone(&self) -> Self {
        Self {
            app: Arc::clone(&self.app),
            id: self.id,
        }
    }
}

impl PartialEq for ViewRef {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.app, &other.app) && self.id == other.id
    }
}

impl Eq for ViewRef {}

impl fmt::Debug for ViewRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewRef")
            .field("id", &self.id)
            .field("name", &self.name())
            .finish()
    }
}

/// Pre-commit reaction to an `is_active` write.
///
/// Cascades the new value to route-less children, then attempts
/// initialization. Children are snapshotted before the first recursive set so
/// no registry lock is held while child interceptors run.
pub(crate) fn activation_changed(app: &Arc<AppInner>, id: ViewId, active: bool) {
    tracing::trace!(target: "trellis::view", ?id, active, "activation changing");

    let cascade: Vec<ObservableCell<bool>> = {
        let registry = app.registry.read();
        let child_ids = match registry.children(id) {
            Ok(ids) => ids,
            Err(_) => return,
        };
        child_ids
            .into_iter()
            .filter_map(|child| registry.get(child))
            .filter(|child| child.options.route.is_none())
            .map(|child| child.is_active.clone())
            .collect()
    };
    for child in cascade {
        child.set(active);
    }

    try_initialize(app, id, active);
}

/// The initialization gate.
///
/// No-op when already initialized or `active` is false. For url-bearing views
/// without content: run the callback early and start the loader, leaving the
/// view un-initialized. Otherwise: mark initialized, run the callback with
/// the ambient initializing context pushed, and re-emit the activation if it
/// still reads true so late-added children get cascaded.
pub(crate) fn try_initialize(app: &Arc<AppInner>, id: ViewId, active: bool) {
    let (initialized, awaiting_content, is_active) = {
        let registry = app.registry.read();
        match registry.get(id) {
            Some(data) => (
                data.initialized,
                data.options.url.is_some() && data.content.is_none(),
                data.is_active.clone(),
            ),
            None => return,
        }
    };
    if initialized || !active {
        return;
    }

    if awaiting_content {
        tracing::trace!(target: "trellis::view", ?id, "initialization awaits content");
        call_init(app, id, active);
        start_load(app, id);
    } else {
        if let Some(data) = app.registry.write().get_mut(id) {
            data.initialized = true;
        }
        tracing::debug!(target: "trellis::view", ?id, "view initialized");
        call_init(app, id, active);
        if is_active.get() {
            is_active.update();
        }
    }
}

/// Invoke the user's `init` callback, at most once per view.
///
/// `init_called` commits before the callback is entered, so a panicking
/// callback still counts as called. The initializing scope stays pushed for
/// the duration of the callback and pops even on unwind.
fn call_init(app: &Arc<AppInner>, id: ViewId, active: bool) {
    let taken = {
        let mut registry = app.registry.write();
        match registry.get_mut(id) {
            Some(data) if !data.init_called => {
                data.init_called = true;
                Some((data.behavior.clone(), data.init_args.clone()))
            }
            _ => None,
        }
    };
    let Some((behavior, args)) = taken else {
        return;
    };

    let _scope = InitScope::enter(app, id, active);
    behavior.init(&ViewRef::new(Arc::clone(app), id), &args);
}

/// Start a content fetch if the view has a url and none is in flight.
pub(crate) fn start_load(app: &Arc<AppInner>, id: ViewId) {
    let (url, loading) = {
        let registry = app.registry.read();
        match registry.get(id) {
            Some(data) => (data.options.url.clone(), data.loading.clone()),
            None => return,
        }
    };
    let Some(url) = url else {
        return;
    };
    if loading.get() {
        // One fetch in flight per view.
        return;
    }
    let Some(transport) = app.transport.clone() else {
        tracing::warn!(
            target: "trellis::view",
            ?id,
            url = %url,
            "content requested but no transport installed"
        );
        return;
    };

    tracing::debug!(target: "trellis::view", ?id, url = %url, "content fetch started");
    loading.set(true);

    let weak = Arc::downgrade(app);
    transport.fetch(
        &url,
        Box::new(move |result| {
            if let Some(app) = weak.upgrade() {
                finish_load(&app, id, result);
            }
        }),
    );
}

/// Settle a fetch: store content and re-attempt the gate on success, stay
/// silent on failure. `loading` drops in both cases.
fn finish_load(app: &Arc<AppInner>, id: ViewId, result: Result<String, LoadError>) {
    let (loading, is_active) = {
        let registry = app.registry.read();
        match registry.get(id) {
            Some(data) => (data.loading.clone(), data.is_active.clone()),
            None => return,
        }
    };

    match result {
        Ok(content) => {
            if let Some(data) = app.registry.write().get_mut(id) {
                data.content = Some(content);
            }
            tracing::debug!(target: "trellis::view", ?id, "content fetch finished");
            // The gate re-checks the current activation: a view deactivated
            // while the fetch was in flight keeps its content but stays
            // un-initialized.
            try_initialize(app, id, is_active.get());
        }
        Err(err) => {
            tracing::warn!(target: "trellis::view", ?id, error = %err, "content fetch failed");
        }
    }

    loading.set(false);
}

/// React to a route match.
fn dispatch_routed(app: &Arc<AppInner>, id: ViewId, params: &RouteParams) {
    tracing::debug!(target: "trellis::view", ?id, "route matched");

    try_initialize(app, id, true);

    let behavior = {
        let registry = app.registry.read();
        match registry.get(id) {
            Some(data) => data.behavior.clone(),
            None => return,
        }
    };
    behavior.routed(&ViewRef::new(Arc::clone(app), id), params);

    let child_ids = app.registry.read().children(id).unwrap_or_default();
    for child in child_ids {
        let child_active = {
            let registry = app.registry.read();
            registry.get(child).map(|d| d.is_active.get()).unwrap_or(false)
        };
        if child_active {
            dispatch_routed(app, child, params);
        }
    }

    let is_active = {
        let registry = app.registry.read();
        match registry.get(id) {
            Some(data) => data.is_active.clone(),
            None => return,
        }
    };
    is_active.set(true);
}
