//! Route gating.
//!
//! Composition walks the authored tree once at startup and returns a new
//! tree in which every route is classified:
//! 1. Routes at or under the public prefix (default `/auth`) are `Public`.
//! 2. Every other route, at every depth, is `Protected`, so deep links to
//!    nested routes are gated too.
//! 3. A catch-all fallback is appended last and always redirects to the
//!    entry point.
//!
//! The authored tree is never modified; gated nodes share its view handles.
//! Evaluation happens on every navigation and is never cached.

use serde::Serialize;
use tracing::debug;

use super::AuthSignal;
use crate::error::{RouteError, RouteResult};
use crate::route::path::{CATCH_ALL, SEPARATOR, normalize_path};
use crate::route::{Access, NodeMeta, RouteNode, RouteTree, ViewHandle};

/// Default prefix of publicly reachable routes.
pub const DEFAULT_PUBLIC_PREFIX: &str = "/auth";

/// Default public entry point.
pub const DEFAULT_ENTRY_POINT: &str = "/auth/login";

/// View handle of the appended not-found fallback.
pub const FALLBACK_VIEW: &str = "RedirectToEntryPoint";

/// Where the gate sends a navigation instead of rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Redirect {
    /// Destination path.
    pub to: String,
    /// Original destination to return to after login.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// Replace the current history entry instead of pushing.
    pub replace: bool,
}

/// Outcome of evaluating the gate for a matched route chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    Redirect(Redirect),
}

/// Route gate configuration and composition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthGate {
    public_prefix: String,
    entry_point: String,
}

impl Default for AuthGate {
    fn default() -> Self {
        Self::new(DEFAULT_PUBLIC_PREFIX, DEFAULT_ENTRY_POINT)
    }
}

impl AuthGate {
    pub fn new(public_prefix: &str, entry_point: &str) -> Self {
        Self {
            public_prefix: normalize_path(public_prefix),
            entry_point: normalize_path(entry_point),
        }
    }

    pub fn public_prefix(&self) -> &str {
        &self.public_prefix
    }

    pub fn entry_point(&self) -> &str {
        &self.entry_point
    }

    /// Whether an absolute path is at or under the public prefix.
    pub fn is_public(&self, absolute_path: &str) -> bool {
        let path = normalize_path(absolute_path);
        if self.public_prefix == "/" {
            return true;
        }
        path == self.public_prefix
            || path
                .strip_prefix(self.public_prefix.as_str())
                .is_some_and(|rest| rest.starts_with(SEPARATOR))
    }

    /// Produce the gated copy of a tree.
    ///
    /// Access is recomputed from paths and an existing trailing fallback is
    /// replaced, so composing an already-gated tree yields an equal tree.
    pub fn compose(&self, tree: &RouteTree) -> RouteTree {
        let authored = match tree.routes().split_last() {
            Some((last, rest)) if last.access == Access::Fallback => rest,
            _ => tree.routes(),
        };

        let mut routes: Vec<RouteNode> = authored
            .iter()
            .map(|route| self.gate_node(route, "/"))
            .collect();
        routes.push(self.fallback_node());

        let gated = RouteTree::new(routes);
        debug!(
            nodes = gated.node_count(),
            public_prefix = %self.public_prefix,
            "composed gated route tree"
        );
        gated
    }

    fn gate_node(&self, route: &RouteNode, parent: &str) -> RouteNode {
        let absolute = route.absolute_path(parent);
        let access = if self.is_public(&absolute) {
            Access::Public
        } else {
            Access::Protected
        };

        RouteNode {
            path: route.path.clone(),
            view: route.view.clone(),
            meta: route.meta.clone(),
            children: route
                .children
                .iter()
                .map(|child| self.gate_node(child, &absolute))
                .collect(),
            access,
        }
    }

    fn fallback_node(&self) -> RouteNode {
        RouteNode {
            path: Some(CATCH_ALL.to_string()),
            view: ViewHandle::new(FALLBACK_VIEW),
            meta: Some(NodeMeta {
                label: String::new(),
                title: None,
                key: CATCH_ALL.to_string(),
                icon: None,
                order: 0,
                hide_in_menu: true,
            }),
            children: Vec::new(),
            access: Access::Fallback,
        }
    }

    /// Evaluate the gate for a matched chain of access markers, outermost
    /// first. The first route that refuses decides the redirect.
    pub fn evaluate<I>(&self, chain: I, pathname: &str, auth: &dyn AuthSignal) -> GateDecision
    where
        I: IntoIterator<Item = Access>,
    {
        for access in chain {
            match access {
                Access::Unguarded | Access::Public => {}
                Access::Protected => {
                    if !auth.is_authenticated() {
                        return GateDecision::Redirect(Redirect {
                            to: self.entry_point.clone(),
                            from: Some(normalize_path(pathname)),
                            replace: true,
                        });
                    }
                }
                Access::Fallback => {
                    return GateDecision::Redirect(Redirect {
                        to: self.entry_point.clone(),
                        from: None,
                        replace: true,
                    });
                }
            }
        }
        GateDecision::Allow
    }

    /// Fail unless at least one route renders without a session.
    ///
    /// A public route nested under a protected one is not reachable
    /// ungated and does not count.
    pub fn validate(&self, gated: &RouteTree) -> RouteResult<()> {
        fn has_public(routes: &[RouteNode]) -> bool {
            routes.iter().any(|route| {
                route.access == Access::Public
                    && (route.path.is_some() || has_public(&route.children))
            })
        }

        if has_public(gated.routes()) {
            Ok(())
        } else {
            Err(RouteError::NoPublicEntry {
                public_prefix: self.public_prefix.clone(),
            })
        }
    }
}
