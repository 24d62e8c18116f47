use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;

use super::{Session, SessionSnapshot};
use crate::api::{AuthTokens, User};
use crate::events::{EventRegistry, StoreEvent};

/// Shared handle to the session. Clones observe the same state.
///
/// Readers never block on a writer for longer than a field copy; the lock
/// is released before listeners run.
///
/// ```rust
/// use std::sync::Arc;
///
/// use nutritrack::api::{AuthTokens, User};
/// use nutritrack::events::EventRegistry;
/// use nutritrack::SessionStore;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let session = SessionStore::new(Arc::new(EventRegistry::new()));
/// assert!(session.is_loading());
///
/// session.login(User { id: 1, ..Default::default() }, AuthTokens::new("a", "r")).await;
/// assert!(session.is_authenticated());
/// assert!(!session.is_loading());
/// # }
/// ```
#[derive(Clone)]
pub struct SessionStore {
    state: Arc<RwLock<Session>>,
    events: Arc<EventRegistry>,
}

impl SessionStore {
    /// A fresh store starts empty and loading, until bootstrap finishes.
    pub fn new(events: Arc<EventRegistry>) -> Self {
        Self {
            state: Arc::new(RwLock::new(Session::loading())),
            events,
        }
    }

    /// Signs in: user and tokens set, authenticated, not loading.
    pub async fn login(&self, user: User, tokens: AuthTokens) {
        let snapshot = {
            let mut state = self.write();
            state.user = Some(user);
            state.tokens = Some(tokens);
            state.is_authenticated = true;
            state.is_loading = false;
            state.snapshot()
        };
        self.emit(snapshot).await;
    }

    /// Resets to the empty session.
    pub async fn logout(&self) {
        let snapshot = {
            let mut state = self.write();
            *state = Session::default();
            state.snapshot()
        };
        self.emit(snapshot).await;
    }

    /// Replaces the user record only.
    pub async fn set_user(&self, user: User) {
        let snapshot = {
            let mut state = self.write();
            state.user = Some(user);
            state.snapshot()
        };
        self.emit(snapshot).await;
    }

    /// Toggles the loading flag. Nothing persisted changes, so no event is
    /// emitted and a stored session is never overwritten before bootstrap
    /// has read it.
    pub async fn set_loading(&self, is_loading: bool) {
        self.write().is_loading = is_loading;
    }

    pub fn snapshot(&self) -> Session {
        self.read().clone()
    }

    pub fn user(&self) -> Option<User> {
        self.read().user.clone()
    }

    pub fn tokens(&self) -> Option<AuthTokens> {
        self.read().tokens.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_authenticated
    }

    pub fn is_loading(&self) -> bool {
        self.read().is_loading
    }

    async fn emit(&self, snapshot: SessionSnapshot) {
        self.events
            .dispatch(StoreEvent::SessionChanged {
                snapshot,
                at: Utc::now(),
            })
            .await;
    }

    // A panic while holding the lock leaves a fully written Session behind,
    // so poisoning is ignored.
    fn read(&self) -> RwLockReadGuard<'_, Session> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Session> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.read();
        f.debug_struct("SessionStore")
            .field("is_authenticated", &state.is_authenticated)
            .field("is_loading", &state.is_loading)
            .field("user_id", &state.user.as_ref().map(|u| u.id))
            .finish()
    }
}
