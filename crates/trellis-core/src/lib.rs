//! Reactive foundation for Trellis.
//!
//! This crate provides the primitives the view tree is built on:
//!
//! - **Observable cells**: shared value cells with pre-commit interceptors
//!   and an explicit "re-emit current value" operation
//! - **Signals**: synchronous, re-entrancy-safe notification
//! - **Event emitter**: string-keyed `on` / `off` / `trigger` publish/subscribe
//! - **Argument lists**: positional, type-erased argument packs
//!
//! # Observable cell example
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use trellis_core::ObservableCell;
//!
//! let visible = ObservableCell::new(false);
//! let repaints = Arc::new(AtomicUsize::new(0));
//!
//! let repaints_clone = repaints.clone();
//! visible.subscribe(move |_| {
//!     repaints_clone.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! visible.set(true);
//! assert!(visible.get());
//! assert_eq!(repaints.load(Ordering::SeqCst), 1);
//! ```
//!
//! # Emitter example
//!
//! ```
//! use trellis_core::{ArgList, Emitter};
//!
//! let events = Emitter::new();
//! let id = events.on("refresh", |_| {});
//! events.trigger("refresh", &ArgList::new());
//! events.off("refresh", id);
//! ```

pub mod args;
pub mod cell;
pub mod emitter;
pub mod signal;

pub use args::ArgList;
pub use cell::{ObservableCell, ReadOnlyCell};
pub use emitter::{Emitter, HandlerId};
pub use signal::{ConnectionId, Signal};
