#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Common test utilities for integration tests.
//!
//! Fixtures are built with the real kernel types; nothing here is mocked.

#![allow(dead_code)]

use std::path::PathBuf;

use portico_kernel::auth::User;
use portico_kernel::route::{NodeMeta, RouteNode, RouteTree, ViewHandle};
use portico_kernel::{AppState, Config};

/// A titled page whose key is `key` and whose view is named after `title`.
pub fn page(path: &str, key: &str, title: &str) -> RouteNode {
    RouteNode::new(path, ViewHandle::new(title)).with_meta(NodeMeta::new(key, title))
}

/// The admin tree: login, dashboard, and products with nested create/edit.
pub fn admin_tree() -> RouteTree {
    RouteTree::new(vec![
        RouteNode::new("auth/login", ViewHandle::new("Login"))
            .with_meta(NodeMeta::new("/auth/login", "Login").hidden()),
        page("dashboard", "/dashboard", "Dashboard"),
        RouteNode::new("products", ViewHandle::new("Products"))
            .with_meta(NodeMeta::new("/products", "Products").with_order(1))
            .with_children(vec![
                RouteNode::new("new", ViewHandle::new("Add Product"))
                    .with_meta(NodeMeta::new("/products/new", "Add Product").with_order(2)),
                RouteNode::new(":id", ViewHandle::new("Edit Product"))
                    .with_meta(NodeMeta::new("/products/:id", "Edit Product").hidden()),
            ]),
    ])
}

/// Default configuration pointing at the repository's sample routes.
pub fn test_config() -> Config {
    Config {
        routes_dir: sample_routes_dir(),
        ..Config::default()
    }
}

/// The `routes/` directory at the workspace root.
pub fn sample_routes_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../routes")
}

/// App state around [`admin_tree`] with a fresh, signed-out session.
pub fn admin_state() -> AppState {
    AppState::from_tree(&test_config(), admin_tree()).expect("admin tree is valid")
}

pub fn alice() -> User {
    User {
        id: "1".to_string(),
        username: "alice".to_string(),
        email: "alice@example.com".to_string(),
        avatar: None,
    }
}

/// A unique scratch directory under the system temp dir.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("portico-{name}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}
