//! HTTP content transport for Trellis.
//!
//! Views with a `url` option fetch their content through the
//! [`ContentTransport`](trellis::ContentTransport) boundary; this crate
//! provides the HTTP implementation:
//!
//! ```no_run
//! use trellis::Application;
//! use trellis_net::HttpTransport;
//!
//! let app = Application::builder()
//!     .transport(HttpTransport::new())
//!     .build();
//! ```
//!
//! Requests run on a small shared tokio runtime ([`runtime`]); completions
//! re-enter the view tree from the worker that finished them.

pub mod runtime;
mod transport;

pub use transport::{HttpTransport, HttpTransportBuilder, HttpTransportConfig};
