//! Shared fixtures for the view-tree tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use trellis::{
    ArgList, ContentTransport, FetchCallback, LoadError, RouteParams, Router, ViewBehavior,
    ViewRef,
};

type InitFn = Box<dyn Fn(&ViewRef, &ArgList) + Send + Sync>;
type RoutedFn = Box<dyn Fn(&ViewRef, &RouteParams) + Send + Sync>;

/// Lifecycle behavior that counts invocations and runs optional extra hooks.
pub struct Hooks {
    inits: Arc<AtomicUsize>,
    routes: Arc<AtomicUsize>,
    init_fn: Option<InitFn>,
    routed_fn: Option<RoutedFn>,
}

impl Hooks {
    pub fn new() -> Self {
        Self {
            inits: Arc::new(AtomicUsize::new(0)),
            routes: Arc::new(AtomicUsize::new(0)),
            init_fn: None,
            routed_fn: None,
        }
    }

    /// Build a behavior that reports into existing counters.
    pub fn sharing(inits: Arc<AtomicUsize>, routes: Arc<AtomicUsize>) -> Self {
        Self {
            inits,
            routes,
            init_fn: None,
            routed_fn: None,
        }
    }

    pub fn on_init(mut self, f: impl Fn(&ViewRef, &ArgList) + Send + Sync + 'static) -> Self {
        self.init_fn = Some(Box::new(f));
        self
    }

    pub fn on_routed(mut self, f: impl Fn(&ViewRef, &RouteParams) + Send + Sync + 'static) -> Self {
        self.routed_fn = Some(Box::new(f));
        self
    }

    pub fn init_count(&self) -> Arc<AtomicUsize> {
        self.inits.clone()
    }

    pub fn routed_count(&self) -> Arc<AtomicUsize> {
        self.routes.clone()
    }
}

impl ViewBehavior for Hooks {
    fn init(&self, view: &ViewRef, args: &ArgList) {
        self.inits.fetch_add(1, Ordering::SeqCst);
        if let Some(f) = &self.init_fn {
            f(view, args);
        }
    }

    fn routed(&self, view: &ViewRef, params: &RouteParams) {
        self.routes.fetch_add(1, Ordering::SeqCst);
        if let Some(f) = &self.routed_fn {
            f(view, params);
        }
    }
}

/// Transport that parks fetches until the test resolves them.
#[derive(Clone, Default)]
pub struct TestTransport {
    queue: Arc<Mutex<VecDeque<(String, FetchCallback)>>>,
}

impl TestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of unresolved fetches.
    pub fn pending(&self) -> usize {
        self.queue.lock().len()
    }

    /// URLs of unresolved fetches, oldest first.
    pub fn requested_urls(&self) -> Vec<String> {
        self.queue.lock().iter().map(|(url, _)| url.clone()).collect()
    }

    /// Resolve the oldest fetch. Returns `false` if none is pending.
    pub fn resolve_next(&self, result: Result<String, LoadError>) -> bool {
        let next = self.queue.lock().pop_front();
        match next {
            Some((_, done)) => {
                done(result);
                true
            }
            None => false,
        }
    }
}

impl ContentTransport for TestTransport {
    fn fetch(&self, url: &str, done: FetchCallback) {
        self.queue.lock().push_back((url.to_owned(), done));
    }
}

/// Router that records every navigation request.
#[derive(Clone, Default)]
pub struct RecordingRouter {
    paths: Arc<Mutex<Vec<String>>>,
    targets: Arc<Mutex<Vec<(String, RouteParams)>>>,
}

impl RecordingRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().clone()
    }

    pub fn targets(&self) -> Vec<(String, RouteParams)> {
        self.targets.lock().clone()
    }
}

impl Router for RecordingRouter {
    fn navigate(&self, path: &str) {
        self.paths.lock().push(path.to_owned());
    }

    fn navigate_to(&self, target: &str, params: &RouteParams) {
        self.targets.lock().push((target.to_owned(), params.clone()));
    }
}
