//! Application state shared by the CLI and the shell runtime.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::auth::{AuthGate, SessionStore};
use crate::config::Config;
use crate::navigation::Navigator;
use crate::route::{RouteTree, load_modules};
use crate::router::RouteTable;

/// Shared application state.
///
/// Wrapped in Arc internally so Clone is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,

    /// Authored and gated routes with their cached projections.
    routes: RouteTable,

    /// Session consulted by the gate on every navigation.
    session: SessionStore,
}

impl AppState {
    /// Load route modules from `config.routes_dir` and build the state.
    pub fn new(config: &Config) -> Result<Self> {
        let modules = load_modules(&config.routes_dir).with_context(|| {
            format!(
                "failed to load route modules from {}",
                config.routes_dir.display()
            )
        })?;

        let names: Vec<&str> = modules.iter().map(|m| m.name.as_str()).collect();
        info!(modules = ?names, "route modules");

        let tree = RouteTree::from_modules(modules.into_iter().map(|m| m.routes));
        Self::from_tree(config, tree)
    }

    /// Build the state around an already assembled tree.
    pub fn from_tree(config: &Config, tree: RouteTree) -> Result<Self> {
        Self::with_session(config, tree, SessionStore::new())
    }

    /// Build the state around a caller-provided session store.
    pub fn with_session(config: &Config, tree: RouteTree, session: SessionStore) -> Result<Self> {
        let gate = AuthGate::new(&config.public_prefix, &config.login_path);
        let routes = RouteTable::build(tree, gate).context("invalid route configuration")?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config: config.clone(),
                routes,
                session,
            }),
        })
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn routes(&self) -> &RouteTable {
        &self.inner.routes
    }

    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    /// Navigator bound to this state's routes and session.
    pub fn navigator(&self) -> Navigator<'_> {
        Navigator::new(
            &self.inner.routes,
            &self.inner.session,
            &self.inner.config.home_path,
        )
    }
}
