#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Route table tests: menu, breadcrumb index, matching and gating over a
//! realistic admin tree.

mod common;

use portico_kernel::AppState;
use portico_kernel::auth::AuthGate;
use portico_kernel::error::RouteError;
use portico_kernel::navigation::Navigator;
use portico_kernel::route::{Access, RouteTree, load_modules};
use portico_kernel::router::RouteTable;

use common::{admin_state, admin_tree, page, sample_routes_dir, test_config};

fn labels(items: &[portico_kernel::menu::MenuItem]) -> Vec<&str> {
    items.iter().map(|i| i.label.as_str()).collect()
}

#[test]
fn test_menu_nests_visible_children_only() {
    let state = admin_state();
    let menu = state.routes().menu();

    assert_eq!(labels(menu.items()), ["Dashboard", "Products"]);
    assert_eq!(menu.items()[0].path(), Some("/dashboard"));

    let products = &menu.items()[1];
    assert!(products.is_submenu());
    assert_eq!(labels(products.children()), ["Add Product"]);
    assert_eq!(products.children()[0].path(), Some("/products/new"));
}

#[test]
fn test_flattened_index_is_preorder() {
    let state = admin_state();
    let patterns: Vec<&str> = state
        .routes()
        .flattened()
        .iter()
        .map(|r| r.pattern.as_str())
        .collect();

    assert_eq!(
        patterns,
        [
            "/auth/login",
            "/dashboard",
            "/products",
            "/products/new",
            "/products/:id"
        ]
    );
}

#[test]
fn test_hidden_route_still_has_breadcrumb() {
    let state = admin_state();
    let view = Navigator::new(state.routes(), &true, "/products")
        .navigate("/products/7")
        .view
        .unwrap();

    assert_eq!(view.breadcrumb_titles(), ["Products", "Edit Product"]);
    assert_eq!(view.chain.last().unwrap().params["id"], "7");
}

#[test]
fn test_literal_sibling_wins_over_parameter() {
    let state = admin_state();
    let chain = state.routes().match_path("/products/new").unwrap();
    let leaf = chain.last().unwrap();

    assert_eq!(leaf.pattern, "/products/new");
    assert!(leaf.params.is_empty());
}

#[test]
fn test_unmatched_segment_gets_derived_breadcrumb() {
    let tree = RouteTree::new(vec![
        page("auth/login", "/auth/login", "Login"),
        page("reports", "/reports", "Reports").with_children(vec![
            portico_kernel::route::RouteNode::new(
                "monthly-sales",
                portico_kernel::route::ViewHandle::new("MonthlySales"),
            ),
        ]),
    ]);
    let state = AppState::from_tree(&test_config(), tree).unwrap();

    let view = Navigator::new(state.routes(), &true, "/reports")
        .navigate("/reports/monthly-sales")
        .view
        .unwrap();
    assert_eq!(view.breadcrumb_titles(), ["Reports", "Monthly Sales"]);
}

#[test]
fn test_gating_is_idempotent() {
    let state = admin_state();
    let table = state.routes();

    let regated = table.gate().compose(table.gated());
    assert_eq!(&regated, table.gated());
    assert_eq!(regated.len(), table.authored().len() + 1);
}

#[test]
fn test_gated_tree_classifies_every_depth() {
    let state = admin_state();
    let gated = state.routes().gated();

    let products = &gated.routes()[2];
    assert_eq!(gated.routes()[0].access, Access::Public);
    assert_eq!(products.access, Access::Protected);
    assert!(products.children.iter().all(|c| c.access == Access::Protected));
    assert_eq!(gated.routes().last().unwrap().access, Access::Fallback);
}

#[test]
fn test_authored_tree_is_untouched_by_gating() {
    let authored = admin_tree();
    let table = RouteTable::build(authored.clone(), AuthGate::default()).unwrap();

    assert_eq!(table.authored(), &authored);
    assert!(
        table
            .authored()
            .routes()
            .iter()
            .all(|r| r.access == Access::Unguarded)
    );
}

#[test]
fn test_tree_without_public_route_is_rejected() {
    let tree = RouteTree::new(vec![page("dashboard", "/dashboard", "Dashboard")]);
    let err = RouteTable::build(tree, AuthGate::default()).unwrap_err();
    assert!(matches!(err, RouteError::NoPublicEntry { .. }));
}

#[test]
fn test_entry_point_outside_public_prefix_is_rejected() {
    let tree = RouteTree::new(vec![
        page("auth/login", "/auth/login", "Login"),
        page("signin", "/signin", "Sign In"),
    ]);
    let err = RouteTable::build(tree, AuthGate::new("/auth", "/signin")).unwrap_err();
    assert!(matches!(err, RouteError::EntryPointGated { .. }));
}

#[test]
fn test_malformed_pattern_falls_through_to_fallback() {
    let tree = RouteTree::new(vec![
        page("auth/login", "/auth/login", "Login"),
        page("products/:", "/products/:", "Broken"),
    ]);
    let state = AppState::from_tree(&test_config(), tree).unwrap();

    let chain = state.routes().match_path("/products/7").unwrap();
    assert_eq!(chain.len(), 1);
    assert_eq!(chain[0].access, Access::Fallback);

    let nav = Navigator::new(state.routes(), &true, "/dashboard").navigate("/products/7");
    assert_eq!(nav.redirects.len(), 1);
    assert!(nav.redirects[0].from.is_none());
    assert_eq!(nav.view.unwrap().location.pathname, "/auth/login");
}

// -------------------------------------------------------------------------
// Sample route modules
// -------------------------------------------------------------------------

#[test]
fn test_sample_modules_load_in_weight_order() {
    let modules = load_modules(&sample_routes_dir()).unwrap();
    let names: Vec<&str> = modules.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, ["auth", "dashboard", "products"]);
}

#[test]
fn test_sample_modules_build_admin_shell() {
    let state = AppState::new(&test_config()).unwrap();
    let menu = state.routes().menu();

    assert_eq!(labels(menu.items()), ["Dashboard", "Products"]);
    assert_eq!(labels(menu.items()[1].children()), ["Add Product"]);
    assert_eq!(menu.items()[0].icon.as_deref(), Some("DashboardOutlined"));
    assert_eq!(state.routes().flattened().len(), 5);

    let view = Navigator::new(state.routes(), &true, "/products")
        .navigate("/products/42")
        .view
        .unwrap();
    assert_eq!(view.breadcrumb_titles(), ["Products", "Edit Product"]);
}
