//! Trellis: a reactive view-tree toolkit.
//!
//! Trellis manages a hierarchy of view components whose activation is driven
//! by reactive state and client-side routing:
//!
//! - **Application**: owns the tree, the router, and the content transport
//! - **Views**: arena-allocated nodes with activation, loading, and
//!   initialization state
//! - **Activation cascade**: an `is_active` write propagates depth-first to
//!   route-less children before it commits
//! - **Initialization gate**: the `init` callback fires exactly once per
//!   view, deferred for url-bearing views until their content arrives
//! - **Routing cascade**: a route match re-enters an already constructed
//!   tree without double-initializing
//!
//! # Example
//!
//! ```
//! use trellis::{Application, ViewDefinition, ViewOptions};
//!
//! let app = Application::new();
//!
//! let nav = app
//!     .create_view(None, ViewDefinition::new().named("Navigation"))
//!     .unwrap();
//! assert!(nav.is_active());
//! assert!(!nav.is_initialized());
//!
//! // Activation drives initialization.
//! nav.set_active(true);
//! assert!(nav.is_initialized());
//!
//! // Route-bound views wait for the router.
//! let about = app
//!     .create_view(
//!         None,
//!         ViewDefinition::new()
//!             .named("About")
//!             .options(ViewOptions::new().route("about")),
//!     )
//!     .unwrap();
//! assert!(!about.is_active());
//!
//! about.dispatch_route(&trellis::RouteParams::new());
//! assert!(about.is_active());
//! assert!(about.is_initialized());
//! ```

mod application;
mod definition;
mod loader;
mod registry;
mod router;
mod view;

pub use application::{Application, ApplicationBuilder};
pub use definition::{NoopBehavior, ViewBehavior, ViewDefinition, ViewOptions};
pub use loader::{ContentTransport, FetchCallback, LoadError};
pub use registry::{ViewError, ViewId, ViewResult};
pub use router::{NullRouter, RouteParams, Router};
pub use view::ViewRef;

// Re-export the reactive foundation so embedders depend on one crate.
pub use trellis_core::{
    ArgList, ConnectionId, Emitter, HandlerId, ObservableCell, ReadOnlyCell, Signal,
};
