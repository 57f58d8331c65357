//! Declarative view configuration.
//!
//! A view is created from a [`ViewDefinition`]: a name, a [`ViewOptions`]
//! snapshot, a [`ViewBehavior`] supplying the lifecycle callbacks, and an
//! argument pack replayed into `init`.

use std::fmt;
use std::sync::Arc;

use trellis_core::ArgList;

use crate::router::RouteParams;
use crate::view::ViewRef;

/// Immutable configuration snapshot for a view.
#[derive(Clone, Debug, Default)]
pub struct ViewOptions {
    /// Route string that activates this view when the router matches it.
    /// Route-bound views start inactive.
    pub route: Option<String>,
    /// URL of remote content that gates full initialization.
    pub url: Option<String>,
    /// Start fetching content at construction even if the view is inactive.
    pub preload: bool,
}

impl ViewOptions {
    /// Create empty options: no route, no url, no preload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the view to a route.
    pub fn route(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self
    }

    /// Gate initialization on content fetched from `url`.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Fetch content eagerly at construction.
    pub fn preload(mut self) -> Self {
        self.preload = true;
        self
    }
}

/// Lifecycle callbacks for a view.
///
/// Both methods default to no-ops; implement the ones the view needs.
pub trait ViewBehavior: Send + Sync {
    /// Called when the view is first initialized.
    ///
    /// Runs at most once per view. Views constructed inside this callback
    /// without an explicit parent are attributed to the initializing view.
    /// `args` is the argument pack captured at construction.
    fn init(&self, view: &ViewRef, args: &ArgList) {
        let _ = (view, args);
    }

    /// Called when the router matches this view's route.
    fn routed(&self, view: &ViewRef, params: &RouteParams) {
        let _ = (view, params);
    }
}

/// A behavior with no lifecycle reactions.
#[derive(Debug, Default)]
pub struct NoopBehavior;

impl ViewBehavior for NoopBehavior {}

/// Declarative description of a view, consumed by
/// [`Application::create_view`](crate::Application::create_view).
pub struct ViewDefinition {
    pub(crate) name: String,
    pub(crate) options: ViewOptions,
    pub(crate) behavior: Arc<dyn ViewBehavior>,
    pub(crate) init_args: ArgList,
}

impl ViewDefinition {
    /// Create an unnamed definition with empty options and a no-op behavior.
    pub fn new() -> Self {
        Self {
            name: String::new(),
            options: ViewOptions::default(),
            behavior: Arc::new(NoopBehavior),
            init_args: ArgList::new(),
        }
    }

    /// Name the view for lookup via [`Application::view`](crate::Application::view).
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the option snapshot.
    pub fn options(mut self, options: ViewOptions) -> Self {
        self.options = options;
        self
    }

    /// Supply the lifecycle behavior.
    pub fn behavior(mut self, behavior: impl ViewBehavior + 'static) -> Self {
        self.behavior = Arc::new(behavior);
        self
    }

    /// Supply an already-shared lifecycle behavior.
    pub fn shared_behavior(mut self, behavior: Arc<dyn ViewBehavior>) -> Self {
        self.behavior = behavior;
        self
    }

    /// Capture arguments to replay into `init`.
    pub fn init_args(mut self, args: ArgList) -> Self {
        self.init_args = args;
        self
    }
}

impl Default for ViewDefinition {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ViewDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewDefinition")
            .field("name", &self.name)
            .field("options", &self.options)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_builder() {
        let options = ViewOptions::new().route("about").url("/about.html").preload();
        assert_eq!(options.route.as_deref(), Some("about"));
        assert_eq!(options.url.as_deref(), Some("/about.html"));
        assert!(options.preload);
    }

    #[test]
    fn test_default_options_are_empty() {
        let options = ViewOptions::default();
        assert!(options.route.is_none());
        assert!(options.url.is_none());
        assert!(!options.preload);
    }

    #[test]
    fn test_definition_builder() {
        let definition = ViewDefinition::new()
            .named("Statistics")
            .options(ViewOptions::new().url("/stats"))
            .init_args(ArgList::new().with(9i32));

        assert_eq!(definition.name, "Statistics");
        assert_eq!(definition.options.url.as_deref(), Some("/stats"));
        assert_eq!(definition.init_args.get::<i32>(0), Some(&9));
    }
}
