use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::events::{EventRegistry, StoreEvent};
use crate::router::Screen;

/// Persisted subset of the app state, stored under `app-storage`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppStateSnapshot {
    #[serde(default, rename = "isOnboardingCompleted")]
    pub onboarding_completed: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct AppState {
    onboarding_completed: bool,
    current_screen: Screen,
}

/// Onboarding flag and the currently shown screen.
///
/// Only the onboarding flag survives a restart.
#[derive(Clone)]
pub struct AppStore {
    state: Arc<RwLock<AppState>>,
    events: Arc<EventRegistry>,
}

impl AppStore {
    pub fn new(events: Arc<EventRegistry>) -> Self {
        Self {
            state: Arc::new(RwLock::new(AppState::default())),
            events,
        }
    }

    pub async fn set_onboarding_completed(&self, completed: bool) {
        self.write().onboarding_completed = completed;
        self.emit().await;
    }

    pub async fn set_current_screen(&self, screen: Screen) {
        self.write().current_screen = screen;
        self.emit().await;
    }

    /// Back to defaults: onboarding not completed, Home selected.
    pub async fn reset(&self) {
        *self.write() = AppState::default();
        self.emit().await;
    }

    /// Loads the persisted flag at startup without emitting an event.
    pub(crate) fn restore(&self, snapshot: AppStateSnapshot) {
        self.write().onboarding_completed = snapshot.onboarding_completed;
    }

    pub fn onboarding_completed(&self) -> bool {
        self.read().onboarding_completed
    }

    pub fn current_screen(&self) -> Screen {
        self.read().current_screen
    }

    pub fn snapshot(&self) -> AppStateSnapshot {
        AppStateSnapshot {
            onboarding_completed: self.onboarding_completed(),
        }
    }

    async fn emit(&self) {
        self.events
            .dispatch(StoreEvent::AppStateChanged {
                snapshot: self.snapshot(),
                at: Utc::now(),
            })
            .await;
    }

    fn read(&self) -> RwLockReadGuard<'_, AppState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, AppState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
