//! Shared tokio runtime for transport work.
//!
//! Fetches are fire-and-forget from the view tree's perspective, so the
//! transport owns a small multi-threaded runtime shared by every client in
//! the process. It is created lazily on first use; call [`init`] early to
//! control when that happens.

use std::sync::OnceLock;

use tokio::runtime::Runtime;

static RUNTIME: OnceLock<Runtime> = OnceLock::new();

/// Initialize the shared runtime.
///
/// Idempotent; returns the same runtime on every call.
pub fn init() -> &'static Runtime {
    RUNTIME.get_or_init(|| {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .expect("Failed to create tokio runtime")
    })
}

/// Get the shared runtime, initializing it if needed.
pub fn get() -> &'static Runtime {
    init()
}

/// Spawn a future on the shared runtime.
pub fn spawn<F>(future: F) -> tokio::task::JoinHandle<F::Output>
where
    F: std::future::Future + Send + 'static,
    F::Output: Send + 'static,
{
    get().spawn(future)
}

/// Block on a future using the shared runtime.
///
/// Do not call from within the runtime's own worker threads.
pub fn block_on<F: std::future::Future>(future: F) -> F::Output {
    get().block_on(future)
}
