//! Content-loader boundary.
//!
//! Views with a `url` option fetch their content through a
//! [`ContentTransport`]. The trait is the whole contract: the view tree hands
//! over a URL and a completion callback, the transport calls the callback
//! exactly once with the outcome. Completion may arrive on any thread.
//!
//! The reqwest-backed implementation lives in the `trellis-net` crate; tests
//! substitute transports that resolve on demand.

use std::fmt;

/// Completion callback for a fetch. Invoked exactly once.
pub type FetchCallback = Box<dyn FnOnce(Result<String, LoadError>) + Send>;

/// Transport used to satisfy a view's lazy content fetch.
pub trait ContentTransport: Send + Sync {
    /// Start fetching `url`, delivering the outcome to `done`.
    fn fetch(&self, url: &str, done: FetchCallback);
}

/// Errors a content fetch can settle with.
///
/// A failed fetch is not surfaced to lifecycle callbacks or event handlers:
/// the owning view resets its `loading` flag, keeps its content absent, and
/// records the cause in the log. This taxonomy exists for transports and for
/// embedders that inspect fetch outcomes directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The request failed to complete.
    Request(String),
    /// The URL could not be parsed.
    InvalidUrl(String),
    /// The server answered with a non-success status.
    HttpStatus {
        /// The HTTP status code.
        status: u16,
    },
    /// The request timed out.
    Timeout,
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request(msg) => write!(f, "request error: {msg}"),
            Self::InvalidUrl(msg) => write!(f, "invalid URL: {msg}"),
            Self::HttpStatus { status } => write!(f, "HTTP {status}"),
            Self::Timeout => write!(f, "request timed out"),
        }
    }
}

impl std::error::Error for LoadError {}
