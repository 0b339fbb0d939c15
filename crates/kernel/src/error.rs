//! Route configuration error types with clear, actionable messages.
//!
//! The route engine performs no I/O at navigation time; every error here
//! is a configuration defect caught while loading or validating the tree
//! at startup.

use thiserror::Error;

/// Errors raised while building the route tree.
#[derive(Debug, Error)]
pub enum RouteError {
    /// A route module file could not be read.
    #[error("route module at {path}: failed to read: {details}")]
    UnreadableModule { path: String, details: String },

    /// A route module file could not be parsed.
    #[error("route module at {path}: failed to parse: {details}")]
    InvalidModule { path: String, details: String },

    /// A route module declares an empty name.
    #[error("route module at {path} has an empty 'name' field")]
    UnnamedModule { path: String },

    /// The gated tree has no route that renders without a session.
    #[error(
        "no public route found: at least one route must live under '{public_prefix}' \
         so unauthenticated users have somewhere to land"
    )]
    NoPublicEntry { public_prefix: String },

    /// The configured entry point is missing or sits behind the gate.
    #[error(
        "entry point '{path}' does not resolve to a public route; \
         add it under '{public_prefix}' or change LOGIN_PATH"
    )]
    EntryPointGated { path: String, public_prefix: String },
}

impl RouteError {
    /// Create an unreadable module error.
    pub fn unreadable(path: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::UnreadableModule {
            path: path.into(),
            details: err.to_string(),
        }
    }

    /// Create an invalid module error.
    pub fn invalid(path: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::InvalidModule {
            path: path.into(),
            details: err.to_string(),
        }
    }
}

/// Result type alias using RouteError.
pub type RouteResult<T> = Result<T, RouteError>;
