//! Flattened `(pattern, title)` index used for breadcrumb lookup.

use serde::{Deserialize, Serialize};

use super::RouteNode;
use super::path::{child_prefix, normalize_path};

/// A titled route with its absolute pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlattenedRoute {
    /// Absolute path, parameters left as placeholders.
    pub pattern: String,
    /// Breadcrumb title.
    pub title: String,
}

/// Flatten a route list in pre-order, keeping only titled routes.
///
/// Layout (pathless) routes emit nothing and pass `prefix` through to
/// their children unchanged.
pub fn flatten_routes(routes: &[RouteNode], prefix: &str) -> Vec<FlattenedRoute> {
    let mut flat = Vec::new();
    flatten_into(routes, prefix, &mut flat);
    flat
}

fn flatten_into(routes: &[RouteNode], prefix: &str, flat: &mut Vec<FlattenedRoute>) {
    for route in routes {
        match &route.path {
            Some(path) => {
                if let Some(title) = route.title() {
                    flat.push(FlattenedRoute {
                        pattern: normalize_path(&format!("{prefix}{path}")),
                        title: title.to_string(),
                    });
                }
                if !route.is_leaf() {
                    flatten_into(&route.children, &child_prefix(prefix, path), flat);
                }
            }
            None => flatten_into(&route.children, prefix, flat),
        }
    }
}
