//! Configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::auth::gate::{DEFAULT_ENTRY_POINT, DEFAULT_PUBLIC_PREFIX};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory of route module manifests (default: ./routes).
    pub routes_dir: PathBuf,

    /// Public entry point unauthenticated users are sent to (default: /auth/login).
    pub login_path: String,

    /// Prefix of routes reachable without a session (default: /auth).
    pub public_prefix: String,

    /// Landing page for authenticated users (default: /products).
    pub home_path: String,

    /// Remember open submenus when a menu item is selected (default: true).
    pub sidebar_auto_collapse: bool,

    /// Viewport width assumed when none is reported (default: 1280).
    pub viewport_width: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            routes_dir: PathBuf::from("./routes"),
            login_path: DEFAULT_ENTRY_POINT.to_string(),
            public_prefix: DEFAULT_PUBLIC_PREFIX.to_string(),
            home_path: "/products".to_string(),
            sidebar_auto_collapse: true,
            viewport_width: 1280,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let routes_dir = env::var("ROUTES_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.routes_dir);

        let login_path = env::var("LOGIN_PATH").unwrap_or(defaults.login_path);

        let public_prefix = env::var("PUBLIC_PREFIX").unwrap_or(defaults.public_prefix);

        let home_path = env::var("HOME_PATH").unwrap_or(defaults.home_path);

        let sidebar_auto_collapse = env::var("SIDEBAR_AUTO_COLLAPSE")
            .unwrap_or_else(|_| "true".to_string())
            .parse()
            .context("SIDEBAR_AUTO_COLLAPSE must be true or false")?;

        let viewport_width = env::var("VIEWPORT_WIDTH")
            .unwrap_or_else(|_| defaults.viewport_width.to_string())
            .parse()
            .context("VIEWPORT_WIDTH must be a valid u32")?;

        Ok(Self {
            routes_dir,
            login_path,
            public_prefix,
            home_path,
            sidebar_auto_collapse,
            viewport_width,
        })
    }
}
