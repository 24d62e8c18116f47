use std::sync::Arc;

use chrono::Utc;

use crate::api::NutritionApi;
use crate::events::{EventRegistry, StoreEvent};
use crate::query::QueryCache;
use crate::session::SessionStore;
use crate::state::{AppStore, NutritionStore};
use crate::storage::{keys, KeyValueStore};

/// Signs out everywhere the client keeps state.
///
/// Runs in a fixed order and always completes locally:
///
/// 1. `POST /users/auth/logout/`, best effort
/// 2. remove `auth_tokens`, `nutrition-storage` and `app-storage`
/// 3. reset the session
/// 4. clear the nutrition store and reset the app state
/// 5. clear the query cache
pub struct LogoutAction<A: NutritionApi, S: KeyValueStore> {
    api: A,
    storage: S,
    session: SessionStore,
    nutrition: NutritionStore,
    app: AppStore,
    cache: QueryCache,
    events: Arc<EventRegistry>,
}

impl<A: NutritionApi, S: KeyValueStore> LogoutAction<A, S> {
    pub fn new(
        api: A,
        storage: S,
        session: SessionStore,
        nutrition: NutritionStore,
        app: AppStore,
        cache: QueryCache,
        events: Arc<EventRegistry>,
    ) -> Self {
        LogoutAction {
            api,
            storage,
            session,
            nutrition,
            app,
            cache,
            events,
        }
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(name = "logout", skip_all))]
    pub async fn execute(&self) {
        let user_id = self.session.user().map(|u| u.id);

        if let Err(e) = self.api.logout().await {
            log::warn!(
                target: "nutritrack",
                "msg=\"server logout failed, continuing\" error=\"{e}\""
            );
        }

        if let Err(e) = self.storage.multi_remove(&keys::LOGOUT_KEYS).await {
            log::warn!(
                target: "nutritrack",
                "msg=\"failed to remove persisted state on logout\" error=\"{e}\""
            );
        }

        self.session.logout().await;
        self.nutrition.clear().await;
        self.app.reset().await;

        self.cache.clear();
        self.events
            .dispatch(StoreEvent::CacheCleared { at: Utc::now() })
            .await;

        log::info!(
            target: "nutritrack",
            "msg=\"logout complete\" user_id={user_id:?}"
        );
    }
}
