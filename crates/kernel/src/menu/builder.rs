//! Menu builder - derives the sidebar menu from the route tree.
//!
//! At each level, routes without metadata are dropped and the rest are
//! stable-sorted by `order`. Hidden routes contribute no entry of their
//! own; their visible descendants take their place. A route whose
//! children produce entries becomes a submenu, anything else is a leaf.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::route::RouteNode;
use crate::route::path::SEPARATOR;

/// A derived, user-facing navigation entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Stable identity (the route's `meta.key`).
    pub key: String,
    /// Display label.
    pub label: String,
    /// Opaque icon reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Leaf destination or nested entries.
    #[serde(flatten)]
    pub target: MenuTarget,
}

/// What selecting a menu entry does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MenuTarget {
    /// Navigates to an absolute path.
    Leaf { path: String },
    /// Opens a nested list; navigates nowhere by itself.
    Submenu { children: Vec<MenuItem> },
}

impl MenuItem {
    /// Destination path for leaves.
    pub fn path(&self) -> Option<&str> {
        match &self.target {
            MenuTarget::Leaf { path } => Some(path),
            MenuTarget::Submenu { .. } => None,
        }
    }

    /// Nested entries for submenus (empty for leaves).
    pub fn children(&self) -> &[MenuItem] {
        match &self.target {
            MenuTarget::Leaf { .. } => &[],
            MenuTarget::Submenu { children } => children,
        }
    }

    pub fn is_submenu(&self) -> bool {
        matches!(self.target, MenuTarget::Submenu { .. })
    }
}

/// The derived menu for one route tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Menu {
    items: Vec<MenuItem>,
}

impl Menu {
    /// Build the menu for a list of top-level routes.
    pub fn build(routes: &[RouteNode]) -> Self {
        let items = build_level(routes, &SEPARATOR.to_string());
        debug!(entries = items.len(), "built menu");
        Self { items }
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Find an entry by key at any depth.
    pub fn find(&self, key: &str) -> Option<&MenuItem> {
        fn search<'a>(items: &'a [MenuItem], key: &str) -> Option<&'a MenuItem> {
            items.iter().find_map(|item| {
                if item.key == key {
                    Some(item)
                } else {
                    search(item.children(), key)
                }
            })
        }
        search(&self.items, key)
    }

    /// Key path of an entry, leaf first (e.g. `["/products/new", "/products"]`).
    pub fn key_path(&self, key: &str) -> Option<Vec<String>> {
        fn search(items: &[MenuItem], key: &str, path: &mut Vec<String>) -> bool {
            for item in items {
                path.push(item.key.clone());
                if item.key == key || search(item.children(), key, path) {
                    return true;
                }
                path.pop();
            }
            false
        }

        let mut path = Vec::new();
        if search(&self.items, key, &mut path) {
            path.reverse();
            Some(path)
        } else {
            None
        }
    }
}

fn build_level(routes: &[RouteNode], parent: &str) -> Vec<MenuItem> {
    let mut navigable: Vec<_> = routes
        .iter()
        .filter_map(|route| route.meta.as_ref().map(|meta| (route, meta)))
        .collect();
    // `sort_by_key` is stable: equal orders keep authored order.
    navigable.sort_by_key(|(_, meta)| meta.order);

    let mut items = Vec::with_capacity(navigable.len());
    for (route, meta) in navigable {
        let path = route.absolute_path(parent);
        let children = build_level(&route.children, &path);

        if meta.hide_in_menu {
            items.extend(children);
            continue;
        }

        let target = if children.is_empty() {
            MenuTarget::Leaf { path }
        } else {
            MenuTarget::Submenu { children }
        };

        items.push(MenuItem {
            key: meta.key.clone(),
            label: meta.label.clone(),
            icon: meta.icon.clone(),
            target,
        });
    }
    items
}
