//! Authentication state consumed by the route gate.
//!
//! The gate only ever asks one question, "is there a session right now?",
//! through [`AuthSignal`]. [`SessionStore`] is the in-memory implementation
//! used by the shell; credential exchange and token persistence belong to
//! the host.

pub mod gate;

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::info;

pub use gate::{AuthGate, GateDecision, Redirect};

/// Synchronous "is authenticated" query, read on every gated navigation.
pub trait AuthSignal: Send + Sync {
    fn is_authenticated(&self) -> bool;
}

/// Fixed signal, handy for evaluating the gate in a known state.
impl AuthSignal for bool {
    fn is_authenticated(&self) -> bool {
        *self
    }
}

/// Signed-in user profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Partial profile update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<Option<String>>,
}

/// Snapshot of the session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Session {
    pub user: Option<User>,
    pub token: Option<String>,
    pub is_authenticated: bool,
}

/// Shared, in-memory session state.
///
/// Wrapped in Arc internally so Clone is cheap; clones observe the same
/// session.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current session snapshot.
    pub fn snapshot(&self) -> Session {
        self.inner.read().clone()
    }

    pub fn user(&self) -> Option<User> {
        self.inner.read().user.clone()
    }

    pub fn token(&self) -> Option<String> {
        self.inner.read().token.clone()
    }

    /// Record a successful login.
    pub fn login(&self, user: User, token: impl Into<String>) {
        info!(user = %user.username, "session started");
        let mut session = self.inner.write();
        session.user = Some(user);
        session.token = Some(token.into());
        session.is_authenticated = true;
    }

    /// End the session.
    pub fn logout(&self) {
        info!("session ended");
        *self.inner.write() = Session::default();
    }

    /// Replace the user; the session is authenticated iff a user is set.
    pub fn set_user(&self, user: Option<User>) {
        let mut session = self.inner.write();
        session.is_authenticated = user.is_some();
        session.user = user;
    }

    pub fn set_token(&self, token: Option<String>) {
        self.inner.write().token = token;
    }

    /// Merge an update into the current user. No-op without a user.
    pub fn update_user(&self, update: UserUpdate) {
        let mut session = self.inner.write();
        let Some(user) = session.user.as_mut() else {
            return;
        };
        if let Some(username) = update.username {
            user.username = username;
        }
        if let Some(email) = update.email {
            user.email = email;
        }
        if let Some(avatar) = update.avatar {
            user.avatar = avatar;
        }
    }
}

impl AuthSignal for SessionStore {
    fn is_authenticated(&self) -> bool {
        self.inner.read().is_authenticated
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn alice() -> User {
        User {
            id: "1".into(),
            username: "alice".into(),
            email: "alice@example.com".into(),
            avatar: None,
        }
    }

    #[test]
    fn login_then_logout() {
        let store = SessionStore::new();
        assert!(!store.is_authenticated());

        store.login(alice(), "tok");
        assert!(store.is_authenticated());
        assert_eq!(store.token().as_deref(), Some("tok"));

        store.logout();
        assert_eq!(store.snapshot(), Session::default());
    }

    #[test]
    fn clones_share_state() {
        let store = SessionStore::new();
        let observer = store.clone();
        store.login(alice(), "tok");
        assert!(observer.is_authenticated());
    }

    #[test]
    fn set_user_drives_authentication() {
        let store = SessionStore::new();
        store.set_user(Some(alice()));
        assert!(store.is_authenticated());
        store.set_user(None);
        assert!(!store.is_authenticated());
    }

    #[test]
    fn update_user_merges_fields() {
        let store = SessionStore::new();
        store.update_user(UserUpdate {
            username: Some("nobody".into()),
            ..Default::default()
        });
        assert!(store.user().is_none());

        store.login(alice(), "tok");
        store.update_user(UserUpdate {
            avatar: Some(Some("a.png".into())),
            ..Default::default()
        });
        let user = store.user().unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(user.avatar.as_deref(), Some("a.png"));
    }
}
