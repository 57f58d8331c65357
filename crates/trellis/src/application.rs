//! Application: owner of the view tree.
//!
//! An [`Application`] is a cheaply cloneable handle to one view tree. It owns
//! the arena, the router and transport collaborators, and the ambient
//! initializing stack that attributes views constructed inside lifecycle
//! callbacks to their parents. Dropping the last handle tears down the whole
//! tree.

use std::fmt;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use trellis_core::{Emitter, ObservableCell};

use crate::definition::ViewDefinition;
use crate::loader::ContentTransport;
use crate::registry::{ViewData, ViewError, ViewId, ViewRegistry, ViewResult};
use crate::router::{NullRouter, RouteParams, Router};
use crate::view::{self, ViewRef};

pub(crate) struct AppInner {
    pub(crate) registry: RwLock<ViewRegistry>,
    /// Views whose lifecycle callback is currently executing, innermost last.
    /// Each entry carries the activation value the initialization was
    /// requested with.
    pub(crate) initializing: Mutex<Vec<(ViewId, bool)>>,
    pub(crate) router: Arc<dyn Router>,
    pub(crate) transport: Option<Arc<dyn ContentTransport>>,
}

/// Handle to a view tree and its collaborators.
///
/// # Example
///
/// ```
/// use trellis::{Application, ViewDefinition};
///
/// let app = Application::new();
/// let home = app
///     .create_view(None, ViewDefinition::new().named("Home"))
///     .unwrap();
///
/// assert!(home.is_active());
/// assert_eq!(app.view("Home").map(|v| v.id()), Some(home.id()));
/// ```
pub struct Application {
    inner: Arc<AppInner>,
}

impl Application {
    /// Create an application with a [`NullRouter`] and no content transport.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a builder for configuring router and transport.
    pub fn builder() -> ApplicationBuilder {
        ApplicationBuilder::new()
    }

    /// Construct a view from a declarative definition.
    ///
    /// `parent` of `None` attributes the view to the innermost currently
    /// initializing view, or makes it a root. An id that does not belong to
    /// this tree is rejected.
    ///
    /// Route-bound views start inactive. A route-less view inherits its
    /// parent's effective activation (or starts active as a root), and starts
    /// fetching immediately when `preload` is set or it comes up active.
    /// Construction alone never runs the lifecycle callback.
    pub fn create_view(
        &self,
        parent: Option<ViewId>,
        definition: ViewDefinition,
    ) -> ViewResult<ViewRef> {
        create_view(&self.inner, parent, definition)
    }

    /// Find a view by the name given in its definition.
    pub fn view(&self, name: &str) -> Option<ViewRef> {
        let id = self.inner.registry.read().find_by_name(name)?;
        Some(ViewRef::new(self.inner.clone(), id))
    }

    /// Every view in the tree, in registration order.
    pub fn views(&self) -> Vec<ViewRef> {
        self.inner
            .registry
            .read()
            .ids()
            .into_iter()
            .map(|id| ViewRef::new(self.inner.clone(), id))
            .collect()
    }

    /// Number of views in the tree.
    pub fn view_count(&self) -> usize {
        self.inner.registry.read().len()
    }

    /// Forward a navigation request to the installed router.
    pub fn navigate_to(&self, target: &str, params: &RouteParams) {
        self.inner.router.navigate_to(target, params);
    }
}

impl Clone for Application {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Default for Application {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Application {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Application")
            .field("views", &self.view_count())
            .finish()
    }
}

/// Builder for [`Application`].
pub struct ApplicationBuilder {
    router: Arc<dyn Router>,
    transport: Option<Arc<dyn ContentTransport>>,
}

impl ApplicationBuilder {
    /// Start from the defaults: [`NullRouter`], no transport.
    pub fn new() -> Self {
        Self {
            router: Arc::new(NullRouter),
            transport: None,
        }
    }

    /// Install a router.
    pub fn router(mut self, router: impl Router + 'static) -> Self {
        self.router = Arc::new(router);
        self
    }

    /// Install an already-shared router.
    pub fn shared_router(mut self, router: Arc<dyn Router>) -> Self {
        self.router = router;
        self
    }

    /// Install a content transport.
    pub fn transport(mut self, transport: impl ContentTransport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Install an already-shared content transport.
    pub fn shared_transport(mut self, transport: Arc<dyn ContentTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the application.
    pub fn build(self) -> Application {
        Application {
            inner: Arc::new(AppInner {
                registry: RwLock::new(ViewRegistry::new()),
                initializing: Mutex::new(Vec::new()),
                router: self.router,
                transport: self.transport,
            }),
        }
    }
}

impl Default for ApplicationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Scope guard for the ambient initializing stack.
///
/// Pushed when a lifecycle callback starts and popped on drop, so a panicking
/// callback cannot leave the stack dirty.
pub(crate) struct InitScope {
    app: Arc<AppInner>,
}

impl InitScope {
    pub(crate) fn enter(app: &Arc<AppInner>, id: ViewId, active: bool) -> Self {
        app.initializing.lock().push((id, active));
        Self { app: Arc::clone(app) }
    }
}

impl Drop for InitScope {
    fn drop(&mut self) {
        self.app.initializing.lock().pop();
    }
}

/// The activation value a child constructed under `parent` should start with.
///
/// While `parent` is inside the initialization gate, its committed `is_active`
/// may lag the activation being applied; children constructed during the
/// callback take the in-flight value so they come up in the state the cascade
/// is converging on.
fn effective_activation(app: &AppInner, parent: ViewId) -> bool {
    {
        let stack = app.initializing.lock();
        if let Some(&(_, active)) = stack.iter().rev().find(|(id, _)| *id == parent) {
            return active;
        }
    }
    app.registry
        .read()
        .get(parent)
        .map(|d| d.is_active.get())
        .unwrap_or(false)
}

pub(crate) fn create_view(
    app: &Arc<AppInner>,
    parent: Option<ViewId>,
    definition: ViewDefinition,
) -> ViewResult<ViewRef> {
    let parent = match parent {
        Some(id) => {
            if !app.registry.read().contains(id) {
                return Err(ViewError::InvalidViewId);
            }
            Some(id)
        }
        None => app.initializing.lock().last().map(|&(id, _)| id),
    };

    let ViewDefinition {
        name,
        options,
        behavior,
        init_args,
    } = definition;

    let initially_active = if options.route.is_some() {
        false
    } else {
        match parent {
            Some(parent_id) => effective_activation(app, parent_id),
            None => true,
        }
    };
    let preload = options.preload;

    let is_active = ObservableCell::new(initially_active);
    let loading = ObservableCell::new(false);

    let id = {
        let mut registry = app.registry.write();
        let id = registry.insert(ViewData {
            name,
            options,
            parent,
            children: Vec::new(),
            behavior,
            is_active: is_active.clone(),
            loading,
            initialized: false,
            init_called: false,
            content: None,
            init_args,
            events: Emitter::new(),
        });
        if let Some(parent_id) = parent {
            registry.attach_child(parent_id, id)?;
        }
        id
    };

    // Activation writes cascade before they commit.
    let weak = Arc::downgrade(app);
    is_active.intercept(move |_, new| {
        if let Some(app) = weak.upgrade() {
            view::activation_changed(&app, id, *new);
        }
    });

    tracing::debug!(
        target: "trellis::application",
        ?id,
        active = initially_active,
        "view created"
    );

    if preload || initially_active {
        view::start_load(app, id);
    }

    Ok(ViewRef::new(Arc::clone(app), id))
}
