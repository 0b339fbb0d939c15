//! Declarative route tree.
//!
//! Route modules contribute independently authored subtrees which are
//! concatenated into one [`RouteTree`]. The tree drives:
//! - Page rendering (via the gated tree, see [`crate::auth::gate`])
//! - The sidebar menu (see [`crate::menu`])
//! - Breadcrumb resolution (via [`flatten_routes`])
//!
//! The tree is never mutated after construction; every derivation
//! returns new records.

mod flatten;
mod manifest;
pub mod path;

pub use flatten::{FlattenedRoute, flatten_routes};
pub use manifest::{RouteModule, load_modules};
pub use path::{PathMatch, PathPattern, join_paths, match_path, normalize_path};

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Opaque reference to the content a route renders.
///
/// The engine never interprets it; gated copies of a node share the
/// same handle.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ViewHandle(Arc<str>);

impl ViewHandle {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether both handles point at the same allocation.
    #[cfg(test)]
    pub(crate) fn same_handle(&self, other: &ViewHandle) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ViewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ViewHandle({})", self.0)
    }
}

impl From<String> for ViewHandle {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

impl From<ViewHandle> for String {
    fn from(view: ViewHandle) -> Self {
        view.0.to_string()
    }
}

/// Navigation metadata attached to a route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeMeta {
    /// Menu label.
    #[serde(default)]
    pub label: String,
    /// Breadcrumb title. Untitled routes fall back to a derived label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Stable identity, conventionally the absolute path.
    pub key: String,
    /// Opaque icon reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Sort position among siblings (lower = earlier).
    #[serde(default)]
    pub order: i32,
    /// Keep this route out of the menu.
    #[serde(default)]
    pub hide_in_menu: bool,
}

impl NodeMeta {
    /// Metadata with a label and title both set to `label`.
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            title: Some(label.clone()),
            label,
            key: key.into(),
            icon: None,
            order: 0,
            hide_in_menu: false,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn untitled(mut self) -> Self {
        self.title = None;
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hide_in_menu = true;
        self
    }
}

/// How rendering a route is gated.
///
/// Authored routes are [`Access::Unguarded`]; only gate composition
/// assigns the other variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    #[default]
    Unguarded,
    /// Public entry point, rendered without consulting the session.
    Public,
    /// Requires an authenticated session.
    Protected,
    /// Not-found fallback, always redirects to the entry point.
    Fallback,
}

/// One node of the route tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteNode {
    /// Path fragment relative to the parent; `None` for layout nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Content this route renders.
    pub view: ViewHandle,

    /// Navigation metadata; `None` means not navigable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<NodeMeta>,

    /// Nested routes, in authored order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RouteNode>,

    /// Gate classification (set by gate composition only).
    #[serde(skip)]
    pub access: Access,
}

impl RouteNode {
    /// A route with a path fragment.
    pub fn new(path: impl Into<String>, view: ViewHandle) -> Self {
        Self {
            path: Some(path.into()),
            view,
            meta: None,
            children: Vec::new(),
            access: Access::Unguarded,
        }
    }

    /// A pathless grouping/layout route.
    pub fn layout(view: ViewHandle) -> Self {
        Self {
            path: None,
            view,
            meta: None,
            children: Vec::new(),
            access: Access::Unguarded,
        }
    }

    pub fn with_meta(mut self, meta: NodeMeta) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn with_children(mut self, children: Vec<RouteNode>) -> Self {
        self.children = children;
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// The breadcrumb title, if this route has one.
    pub fn title(&self) -> Option<&str> {
        self.meta.as_ref().and_then(|m| m.title.as_deref())
    }

    /// Absolute path of this node given its parent's absolute path.
    ///
    /// Layout nodes share their parent's path.
    pub fn absolute_path(&self, parent: &str) -> String {
        match &self.path {
            Some(path) => join_paths(parent, path),
            None => normalize_path(parent),
        }
    }
}

/// The application's route tree: an ordered sequence of top-level routes.
///
/// Cloning is cheap and clones share the same node allocation.
#[derive(Debug, Clone)]
pub struct RouteTree {
    routes: Arc<[RouteNode]>,
}

impl RouteTree {
    pub fn new(routes: Vec<RouteNode>) -> Self {
        Self {
            routes: Arc::from(routes),
        }
    }

    /// Concatenate module contributions in the given order.
    ///
    /// No deduplication is performed; modules own disjoint top-level paths.
    pub fn from_modules<I, M>(modules: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: IntoIterator<Item = RouteNode>,
    {
        Self::new(modules.into_iter().flatten().collect())
    }

    pub fn routes(&self) -> &[RouteNode] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Total number of nodes at every depth.
    pub fn node_count(&self) -> usize {
        fn count(nodes: &[RouteNode]) -> usize {
            nodes.iter().map(|n| 1 + count(&n.children)).sum()
        }
        count(&self.routes)
    }

    /// Whether both values are the same tree instance.
    #[cfg(test)]
    pub(crate) fn same_tree(&self, other: &RouteTree) -> bool {
        Arc::ptr_eq(&self.routes, &other.routes)
    }
}

impl PartialEq for RouteTree {
    fn eq(&self, other: &Self) -> bool {
        self.routes == other.routes
    }
}
