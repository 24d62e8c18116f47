use async_trait::async_trait;
use serde::Serialize;

use crate::events::{Listener, StoreEvent};
use crate::storage::{keys, KeyValueStore, Persisted};

/// Mirrors each store's persisted subset into the key-value store.
///
/// | Event | Key |
/// |---|---|
/// | `SessionChanged` | `auth-storage` |
/// | `NutritionChanged` | `nutrition-storage` |
/// | `AppStateChanged` | `app-storage` |
///
/// Write failures are logged and never reach the store that changed.
pub struct PersistenceListener<S> {
    storage: S,
}

impl<S: KeyValueStore> PersistenceListener<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    async fn write<T: Serialize>(&self, key: &str, state: &T) {
        let result = match Persisted::new(state).to_json() {
            Ok(json) => self.storage.set_item(key, &json).await,
            Err(e) => Err(e),
        };

        if let Err(e) = result {
            log::warn!(
                target: "nutritrack",
                "msg=\"failed to persist store snapshot\" key={key} error=\"{e}\""
            );
        }
    }
}

#[async_trait]
impl<S: KeyValueStore + 'static> Listener for PersistenceListener<S> {
    async fn handle(&self, event: &StoreEvent) {
        match event {
            StoreEvent::SessionChanged { snapshot, .. } => {
                self.write(keys::AUTH_SESSION, snapshot).await;
            }
            StoreEvent::NutritionChanged { snapshot, .. } => {
                self.write(keys::NUTRITION, snapshot).await;
            }
            StoreEvent::AppStateChanged { snapshot, .. } => {
                self.write(keys::APP_STATE, snapshot).await;
            }
            StoreEvent::CacheCleared { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::api::{AuthTokens, User};
    use crate::session::SessionSnapshot;
    use crate::state::AppStateSnapshot;
    use crate::InMemoryKeyValueStore;

    #[tokio::test]
    async fn test_session_snapshot_written_as_envelope() {
        let storage = InMemoryKeyValueStore::new();
        let listener = PersistenceListener::new(storage.clone());

        let snapshot = SessionSnapshot {
            user: Some(User {
                id: 1,
                first_name: "Ana".to_owned(),
                ..Default::default()
            }),
            tokens: Some(AuthTokens::new("a", "r")),
            is_authenticated: true,
        };
        listener
            .handle(&StoreEvent::SessionChanged {
                snapshot,
                at: Utc::now(),
            })
            .await;

        let raw = storage.get_item(keys::AUTH_SESSION).await.unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["version"], 0);
        assert_eq!(value["state"]["isAuthenticated"], true);
        assert_eq!(value["state"]["user"]["first_name"], "Ana");
        assert_eq!(value["state"]["tokens"]["access"], "a");
    }

    #[tokio::test]
    async fn test_app_state_written() {
        let storage = InMemoryKeyValueStore::new();
        let listener = PersistenceListener::new(storage.clone());

        listener
            .handle(&StoreEvent::AppStateChanged {
                snapshot: AppStateSnapshot {
                    onboarding_completed: true,
                },
                at: Utc::now(),
            })
            .await;

        assert_eq!(
            storage.get_item(keys::APP_STATE).await.unwrap().as_deref(),
            Some(r#"{"state":{"isOnboardingCompleted":true},"version":0}"#)
        );
    }

    #[tokio::test]
    async fn test_cache_cleared_writes_nothing() {
        let storage = InMemoryKeyValueStore::new();
        let listener = PersistenceListener::new(storage.clone());

        listener
            .handle(&StoreEvent::CacheCleared { at: Utc::now() })
            .await;

        assert!(storage.is_empty());
    }
}
