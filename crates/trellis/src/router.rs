//! Routing boundary.
//!
//! Trellis does not match URLs. The embedding application installs a
//! [`Router`]; views forward navigation requests to it, and the router calls
//! back into matched views via [`ViewRef::dispatch_route`](crate::ViewRef::dispatch_route).

use std::collections::HashMap;

/// Parameters extracted from a matched route.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RouteParams {
    values: HashMap<String, String>,
}

impl RouteParams {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a parameter, builder style.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a parameter.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Look up a parameter.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Navigation entry points the view tree delegates to.
pub trait Router: Send + Sync {
    /// Navigate to a slash-joined path.
    fn navigate(&self, path: &str);

    /// Navigate to a named view with parameters.
    fn navigate_to(&self, target: &str, params: &RouteParams);
}

/// A router that ignores navigation.
///
/// Installed by default so embedders without routing can still construct an
/// application; requests are logged and dropped.
#[derive(Debug, Default)]
pub struct NullRouter;

impl Router for NullRouter {
    fn navigate(&self, path: &str) {
        tracing::debug!(target: "trellis::router", path, "navigation ignored, no router installed");
    }

    fn navigate_to(&self, target: &str, _params: &RouteParams) {
        tracing::debug!(target: "trellis::router", target, "navigation ignored, no router installed");
    }
}
