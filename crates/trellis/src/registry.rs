//! Arena storage for view nodes.
//!
//! Views live in a slotmap arena keyed by [`ViewId`]. The parent owns its
//! child list; the child keeps a non-owning `ViewId` back-reference. Child
//! lists only grow; the tree is torn down as a whole when the owning
//! application is dropped.

use std::fmt;
use std::sync::Arc;

use slotmap::{new_key_type, SlotMap};
use trellis_core::{ArgList, Emitter, ObservableCell};

use crate::definition::{ViewBehavior, ViewOptions};

new_key_type! {
    /// A stable identifier for a view in the arena.
    pub struct ViewId;
}

/// Errors that can occur during view-tree operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    /// The view id does not belong to this application's tree.
    InvalidViewId,
}

impl fmt::Display for ViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidViewId => write!(f, "invalid view id"),
        }
    }
}

impl std::error::Error for ViewError {}

/// Result type for view-tree operations.
pub type ViewResult<T> = std::result::Result<T, ViewError>;

/// Per-view state stored in the arena.
pub(crate) struct ViewData {
    pub(crate) name: String,
    pub(crate) options: ViewOptions,
    pub(crate) parent: Option<ViewId>,
    pub(crate) children: Vec<ViewId>,
    pub(crate) behavior: Arc<dyn ViewBehavior>,
    pub(crate) is_active: ObservableCell<bool>,
    pub(crate) loading: ObservableCell<bool>,
    pub(crate) initialized: bool,
    pub(crate) init_called: bool,
    pub(crate) content: Option<String>,
    pub(crate) init_args: ArgList,
    pub(crate) events: Emitter,
}

/// The arena managing every view of one application.
pub(crate) struct ViewRegistry {
    views: SlotMap<ViewId, ViewData>,
}

impl ViewRegistry {
    pub(crate) fn new() -> Self {
        Self {
            views: SlotMap::with_key(),
        }
    }

    /// Insert a view and return its id. Parent links are wired separately
    /// via [`attach_child`](Self::attach_child).
    pub(crate) fn insert(&mut self, data: ViewData) -> ViewId {
        let id = self.views.insert(data);
        tracing::trace!(target: "trellis::registry", ?id, "registered view");
        id
    }

    pub(crate) fn contains(&self, id: ViewId) -> bool {
        self.views.contains_key(id)
    }

    pub(crate) fn get(&self, id: ViewId) -> Option<&ViewData> {
        self.views.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: ViewId) -> Option<&mut ViewData> {
        self.views.get_mut(id)
    }

    /// Append `child` to `parent`'s child list.
    pub(crate) fn attach_child(&mut self, parent: ViewId, child: ViewId) -> ViewResult<()> {
        let parent_data = self.views.get_mut(parent).ok_or(ViewError::InvalidViewId)?;
        parent_data.children.push(child);
        Ok(())
    }

    /// The parent of `id`, if any.
    pub(crate) fn parent(&self, id: ViewId) -> ViewResult<Option<ViewId>> {
        self.views
            .get(id)
            .map(|d| d.parent)
            .ok_or(ViewError::InvalidViewId)
    }

    /// A snapshot of `id`'s children, in insertion order.
    pub(crate) fn children(&self, id: ViewId) -> ViewResult<Vec<ViewId>> {
        self.views
            .get(id)
            .map(|d| d.children.clone())
            .ok_or(ViewError::InvalidViewId)
    }

    /// Find the first view registered with `name`.
    pub(crate) fn find_by_name(&self, name: &str) -> Option<ViewId> {
        self.views
            .iter()
            .find(|(_, data)| data.name == name)
            .map(|(id, _)| id)
    }

    /// Every view id, in registration order.
    pub(crate) fn ids(&self) -> Vec<ViewId> {
        self.views.keys().collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.views.len()
    }
}
