//! Navigation: turn a requested path into what the shell renders.
//!
//! Every navigation re-reads the authentication signal; nothing about the
//! session is cached between navigations.

use serde::Serialize;
use tracing::{debug, warn};

use crate::auth::{AuthSignal, GateDecision, Redirect};
use crate::breadcrumb::{Breadcrumb, resolve_breadcrumbs};
use crate::route::path::normalize_path;
use crate::router::{MatchedRoute, RouteTable};

/// Redirect hops followed before giving up on a navigation.
const MAX_REDIRECTS: usize = 8;

/// The location being displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub pathname: String,
    /// Where the user was headed before the gate redirected them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
}

/// Page chrome surrounding the rendered route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Chrome {
    /// Public pages render alone.
    Bare,
    /// Everything else renders inside header, sidebar and breadcrumb.
    Shell,
}

/// A successfully resolved navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedView {
    pub location: Location,
    pub chain: Vec<MatchedRoute>,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub chrome: Chrome,
    /// Menu keys to highlight.
    pub selected_keys: Vec<String>,
}

impl RenderedView {
    /// Pathnames of the matched routes that own a path segment, most
    /// general first.
    pub fn matched_pathnames(&self) -> Vec<&str> {
        path_owning_pathnames(&self.chain)
    }

    pub fn breadcrumb_titles(&self) -> Vec<&str> {
        self.breadcrumbs.iter().map(|b| b.title.as_str()).collect()
    }
}

/// Pathnames of the routes in a chain that own a path segment; layouts
/// are skipped.
fn path_owning_pathnames(chain: &[MatchedRoute]) -> Vec<&str> {
    chain
        .iter()
        .filter(|m| m.has_path)
        .map(|m| m.pathname.as_str())
        .collect()
}

/// One resolution step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Render(RenderedView),
    Redirect(Redirect),
    NotFound { pathname: String },
}

/// Final outcome of a navigation, redirects followed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Navigation {
    /// Redirects taken on the way, in order.
    pub redirects: Vec<Redirect>,
    /// The rendered view, or `None` when nothing matched.
    pub view: Option<RenderedView>,
}

/// Resolves paths against a route table for a given session.
pub struct Navigator<'a> {
    table: &'a RouteTable,
    auth: &'a dyn AuthSignal,
    home: String,
}

impl<'a> Navigator<'a> {
    pub fn new(table: &'a RouteTable, auth: &'a dyn AuthSignal, home: &str) -> Self {
        Self {
            table,
            auth,
            home: normalize_path(home),
        }
    }

    /// Resolve a single step without following redirects.
    pub fn resolve(&self, path: &str, from: Option<String>) -> Resolution {
        let pathname = normalize_path(path);
        let gate = self.table.gate();

        if pathname == "/" {
            let to = if self.auth.is_authenticated() {
                self.home.clone()
            } else {
                gate.entry_point().to_string()
            };
            return Resolution::Redirect(Redirect {
                to,
                from: None,
                replace: true,
            });
        }

        let Some(chain) = self.table.match_path(&pathname) else {
            return Resolution::NotFound { pathname };
        };

        if let GateDecision::Redirect(redirect) =
            gate.evaluate(chain.iter().map(|m| m.access), &pathname, self.auth)
        {
            return Resolution::Redirect(redirect);
        }

        let breadcrumbs =
            resolve_breadcrumbs(&path_owning_pathnames(&chain), self.table.flattened());

        let chrome = if gate.is_public(&pathname) {
            Chrome::Bare
        } else {
            Chrome::Shell
        };

        Resolution::Render(RenderedView {
            selected_keys: vec![pathname.clone()],
            location: Location { pathname, from },
            chain,
            breadcrumbs,
            chrome,
        })
    }

    /// Navigate to a path, following redirects.
    pub fn navigate(&self, path: &str) -> Navigation {
        self.navigate_from(path, None)
    }

    /// Navigate carrying an original destination in the location state.
    pub fn navigate_from(&self, path: &str, from: Option<String>) -> Navigation {
        let mut redirects = Vec::new();
        let mut target = path.to_string();
        let mut from = from;

        loop {
            match self.resolve(&target, from.take()) {
                Resolution::Render(view) => {
                    debug!(
                        pathname = %view.location.pathname,
                        redirects = redirects.len(),
                        "navigation rendered"
                    );
                    return Navigation {
                        redirects,
                        view: Some(view),
                    };
                }
                Resolution::Redirect(redirect) => {
                    if redirects.len() >= MAX_REDIRECTS {
                        warn!(path = %path, "too many redirects, giving up");
                        return Navigation {
                            redirects,
                            view: None,
                        };
                    }
                    target = redirect.to.clone();
                    from = redirect.from.clone();
                    redirects.push(redirect);
                }
                Resolution::NotFound { pathname } => {
                    debug!(pathname = %pathname, "no route matched");
                    return Navigation {
                        redirects,
                        view: None,
                    };
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::auth::AuthGate;
    use crate::route::{NodeMeta, RouteNode, RouteTree, ViewHandle};

    fn page(path: &str, key: &str, title: &str) -> RouteNode {
        RouteNode::new(path, ViewHandle::new(title)).with_meta(NodeMeta::new(key, title))
    }

    fn table() -> RouteTable {
        let tree = RouteTree::new(vec![
            page("auth/login", "/auth/login", "Login"),
            page("products", "/products", "Products").with_children(vec![
                page("new", "/products/new", "Add Product"),
                page(":id", "/products/:id", "Edit Product"),
            ]),
        ]);
        RouteTable::build(tree, AuthGate::default()).unwrap()
    }

    #[test]
    fn signed_in_navigation_renders_with_breadcrumbs() {
        let table = table();
        let nav = Navigator::new(&table, &true, "/products").navigate("/products/7");

        assert!(nav.redirects.is_empty());
        let view = nav.view.unwrap();
        assert_eq!(view.breadcrumb_titles(), ["Products", "Edit Product"]);
        assert_eq!(view.matched_pathnames(), ["/products", "/products/7"]);
        assert_eq!(view.selected_keys, ["/products/7"]);
        assert_eq!(view.chrome, Chrome::Shell);
    }

    #[test]
    fn signed_out_navigation_lands_on_login_with_origin() {
        let table = table();
        let nav = Navigator::new(&table, &false, "/products").navigate("/products/7");

        assert_eq!(nav.redirects.len(), 1);
        let view = nav.view.unwrap();
        assert_eq!(view.location.pathname, "/auth/login");
        assert_eq!(view.location.from.as_deref(), Some("/products/7"));
        assert_eq!(view.chrome, Chrome::Bare);
    }

    #[test]
    fn root_redirects_by_session() {
        let table = table();

        let signed_in = Navigator::new(&table, &true, "/products").navigate("/");
        assert_eq!(signed_in.view.unwrap().location.pathname, "/products");

        let signed_out = Navigator::new(&table, &false, "/products").navigate("/");
        assert_eq!(signed_out.view.unwrap().location.pathname, "/auth/login");
    }

    #[test]
    fn unknown_path_falls_back_to_login() {
        let table = table();
        let nav = Navigator::new(&table, &true, "/products").navigate("/no/such/page");
        let view = nav.view.unwrap();
        assert_eq!(view.location.pathname, "/auth/login");
        assert!(view.location.from.is_none());
    }

    #[test]
    fn gate_is_reevaluated_every_navigation() {
        let table = table();
        let session = crate::auth::SessionStore::new();
        let navigator = Navigator::new(&table, &session, "/products");

        assert_eq!(
            navigator.navigate("/products").view.unwrap().location.pathname,
            "/auth/login"
        );

        session.set_user(Some(crate::auth::User {
            id: "1".into(),
            username: "alice".into(),
            email: "alice@example.com".into(),
            avatar: None,
        }));
        assert_eq!(
            navigator.navigate("/products").view.unwrap().location.pathname,
            "/products"
        );
    }
}
