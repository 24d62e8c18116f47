//! Process-wide authentication state.
//!
//! [`SessionStore`] holds who is signed in. Sign-in, sign-out and user
//! updates are dispatched as a
//! [`StoreEvent::SessionChanged`](crate::events::StoreEvent) carrying a
//! [`SessionSnapshot`], the subset written to the `auth-storage` key. The
//! loading flag is never part of it, so a restart always begins in the
//! loading state.

mod store;

use serde::{Deserialize, Serialize};

use crate::api::{AuthTokens, User};

pub use store::SessionStore;

/// Current authentication state.
///
/// `is_authenticated` implies both `user` and `tokens` are present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub user: Option<User>,
    pub tokens: Option<AuthTokens>,
    pub is_authenticated: bool,
    pub is_loading: bool,
}

impl Session {
    pub(crate) fn loading() -> Self {
        Self {
            is_loading: true,
            ..Default::default()
        }
    }

    /// The persisted subset.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            user: self.user.clone(),
            tokens: self.tokens.clone(),
            is_authenticated: self.is_authenticated,
        }
    }
}

/// Persisted subset of the session, stored under `auth-storage`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub tokens: Option<AuthTokens>,
    #[serde(default, rename = "isAuthenticated")]
    pub is_authenticated: bool,
}
