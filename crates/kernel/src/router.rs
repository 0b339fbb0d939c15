//! Route table - the authored tree, its gated copy, and cached projections.
//!
//! Built once at startup. The flattened index and the menu are computed on
//! first use and kept for the lifetime of the table, which is the lifetime
//! of the tree.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::auth::AuthGate;
use crate::error::{RouteError, RouteResult};
use crate::menu::Menu;
use crate::route::path::PathPattern;
use crate::route::{Access, FlattenedRoute, RouteNode, RouteTree, ViewHandle, flatten_routes};

/// One route in a matched chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchedRoute {
    /// Concrete pathname consumed up to and including this route.
    pub pathname: String,
    /// Absolute pattern of this route.
    pub pattern: String,
    /// Parameters bound so far.
    pub params: BTreeMap<String, String>,
    /// Content to render.
    #[serde(serialize_with = "serialize_view")]
    pub view: ViewHandle,
    /// Gate classification.
    pub access: Access,
    /// Whether the route has its own path fragment (layouts do not).
    pub has_path: bool,
}

fn serialize_view<S: serde::Serializer>(view: &ViewHandle, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(view.as_str())
}

/// Match a concrete path against a route list, returning the chain of
/// routes that render it, outermost first.
///
/// Siblings are tried in authored order and the first match wins, so a
/// literal declared before a parameter takes precedence.
pub fn match_routes(routes: &[RouteNode], path: &str) -> Option<Vec<MatchedRoute>> {
    let mut chain = Vec::new();
    if match_level(routes, "/", path, &mut chain) {
        Some(chain)
    } else {
        None
    }
}

fn match_level(
    routes: &[RouteNode],
    parent: &str,
    path: &str,
    chain: &mut Vec<MatchedRoute>,
) -> bool {
    for route in routes {
        let absolute = route.absolute_path(parent);
        let pattern = PathPattern::parse(&absolute);

        let matched = if route.is_leaf() {
            pattern.matches(path)
        } else {
            pattern.match_prefix(path)
        };
        let Some(matched) = matched else {
            continue;
        };

        chain.push(MatchedRoute {
            pathname: matched.pathname,
            pattern: pattern.as_str().to_string(),
            params: matched.params,
            view: route.view.clone(),
            access: route.access,
            has_path: route.path.is_some(),
        });

        if route.is_leaf() || match_level(&route.children, &absolute, path, chain) {
            return true;
        }
        if matched.remainder.is_empty() {
            // A branch renders on its own when nothing is left to match.
            return true;
        }
        chain.pop();
    }
    false
}

/// The application's routes and everything derived from them.
#[derive(Debug)]
pub struct RouteTable {
    authored: RouteTree,
    gated: RouteTree,
    gate: AuthGate,
    flattened: OnceLock<Vec<FlattenedRoute>>,
    menu: OnceLock<Menu>,
}

impl RouteTable {
    /// Gate the authored tree and validate the result.
    ///
    /// Fails when no route is reachable without a session or when the
    /// gate's entry point does not resolve to a public route.
    pub fn build(authored: RouteTree, gate: AuthGate) -> RouteResult<Self> {
        let gated = gate.compose(&authored);
        gate.validate(&gated)?;

        let entry_reachable = match_routes(gated.routes(), gate.entry_point()).is_some_and(|chain| {
            chain
                .iter()
                .all(|m| matches!(m.access, Access::Public | Access::Unguarded))
        });
        if !entry_reachable {
            return Err(RouteError::EntryPointGated {
                path: gate.entry_point().to_string(),
                public_prefix: gate.public_prefix().to_string(),
            });
        }

        warn_malformed(authored.routes(), "/");

        info!(
            routes = authored.node_count(),
            entry_point = %gate.entry_point(),
            "route table built"
        );

        Ok(Self {
            authored,
            gated,
            gate,
            flattened: OnceLock::new(),
            menu: OnceLock::new(),
        })
    }

    /// The tree as authored by route modules.
    pub fn authored(&self) -> &RouteTree {
        &self.authored
    }

    /// The tree mounted for rendering.
    pub fn gated(&self) -> &RouteTree {
        &self.gated
    }

    pub fn gate(&self) -> &AuthGate {
        &self.gate
    }

    /// Flattened breadcrumb index, computed once.
    pub fn flattened(&self) -> &[FlattenedRoute] {
        self.flattened.get_or_init(|| {
            let flat = flatten_routes(self.authored.routes(), "/");
            debug!(entries = flat.len(), "flattened route index");
            flat
        })
    }

    /// Sidebar menu, computed once.
    pub fn menu(&self) -> &Menu {
        self.menu.get_or_init(|| Menu::build(self.authored.routes()))
    }

    /// Match a concrete path against the gated tree.
    pub fn match_path(&self, path: &str) -> Option<Vec<MatchedRoute>> {
        match_routes(self.gated.routes(), path)
    }
}

fn warn_malformed(routes: &[RouteNode], parent: &str) {
    for route in routes {
        let absolute = route.absolute_path(parent);
        if PathPattern::parse(&absolute).is_malformed() {
            warn!(pattern = %absolute, "route pattern is malformed and will never match");
        }
        warn_malformed(&route.children, &absolute);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::route::NodeMeta;

    fn page(path: &str, title: &str) -> RouteNode {
        RouteNode::new(path, ViewHandle::new(title)).with_meta(NodeMeta::new(path, title))
    }

    fn pathnames(chain: &[MatchedRoute]) -> Vec<&str> {
        chain.iter().map(|m| m.pathname.as_str()).collect()
    }

    fn sample_routes() -> Vec<RouteNode> {
        vec![
            page("auth/login", "Login"),
            page("products", "Products")
                .with_children(vec![page("new", "Add Product"), page(":id", "Edit Product")]),
        ]
    }

    #[test]
    fn nested_match_reports_chain() {
        let chain = match_routes(&sample_routes(), "/products/7").unwrap();
        assert_eq!(pathnames(&chain), ["/products", "/products/7"]);
        assert_eq!(chain[1].pattern, "/products/:id");
        assert_eq!(chain[1].params.get("id"), Some(&"7".to_string()));
    }

    #[test]
    fn literal_declared_first_wins() {
        let chain = match_routes(&sample_routes(), "/products/new").unwrap();
        assert_eq!(chain[1].view.as_str(), "Add Product");
    }

    #[test]
    fn branch_renders_itself_when_path_ends() {
        let chain = match_routes(&sample_routes(), "/products").unwrap();
        assert_eq!(pathnames(&chain), ["/products"]);
    }

    #[test]
    fn unmatched_remainder_is_no_match() {
        assert!(match_routes(&sample_routes(), "/products/7/extra").is_none());
        assert!(match_routes(&sample_routes(), "/reports").is_none());
    }

    #[test]
    fn layouts_join_the_chain_without_a_path() {
        let routes = vec![RouteNode::layout(ViewHandle::new("Frame"))
            .with_children(vec![page("dashboard", "Dashboard")])];
        let chain = match_routes(&routes, "/dashboard").unwrap();
        assert_eq!(chain.len(), 2);
        assert!(!chain[0].has_path);
        assert!(chain[1].has_path);
    }

    #[test]
    fn build_rejects_gated_entry_point() {
        let gate = AuthGate::new("/auth", "/login");
        let err = RouteTable::build(RouteTree::new(sample_routes()), gate).unwrap_err();
        assert!(matches!(err, RouteError::EntryPointGated { .. }));
    }

    #[test]
    fn gated_tree_falls_back_for_unknown_paths() {
        let table = RouteTable::build(RouteTree::new(sample_routes()), AuthGate::default()).unwrap();
        let chain = table.match_path("/no/such/page").unwrap();
        assert_eq!(chain.last().unwrap().access, Access::Fallback);
    }

    #[test]
    fn projections_are_cached() {
        let table = RouteTable::build(RouteTree::new(sample_routes()), AuthGate::default()).unwrap();
        let first = table.flattened().as_ptr();
        let second = table.flattened().as_ptr();
        assert_eq!(first, second);
        assert!(std::ptr::eq(table.menu(), table.menu()));
        // The fallback only exists in the gated tree.
        assert_eq!(table.flattened().len(), 4);
    }
}
