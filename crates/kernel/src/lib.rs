//! Portico Admin Shell Kernel Library
//!
//! Declarative route tree, derived sidebar menu and breadcrumb index,
//! authentication gate, and responsive shell state. The `portico` binary
//! exposes the same pieces from the command line.

pub mod auth;
pub mod breadcrumb;
pub mod config;
pub mod error;
pub mod menu;
pub mod navigation;
pub mod route;
pub mod router;
pub mod shell;
pub mod state;

pub use config::Config;
pub use state::AppState;
