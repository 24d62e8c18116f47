//! The wired-up client: one per signed-in device, or one per test.

use std::sync::Arc;

use crate::actions::{
    AnalyzeImageAction, BootstrapAction, CalculateTargetsAction, CompleteOnboardingAction,
    CreateGoalAction, LoginAction, LogoutAction, QuickLogAction, RefreshAllAction,
    RegisterAction, SearchFoodsAction, UpdateProfileAction,
};
use crate::api::{ApiClient, NutritionApi, User};
use crate::config::ClientConfig;
use crate::events::listeners::{LoggingListener, PersistenceListener};
use crate::events::EventRegistry;
use crate::query::{Queries, QueryCache};
use crate::router::{self, Route};
use crate::session::{Session, SessionStore};
use crate::state::{AppStore, NutritionStore};
use crate::storage::KeyValueStore;
use crate::validators::{LoginForm, RegisterForm};
use crate::ClientError;

/// Backend handle shared by every query and action of a context.
pub type SharedApi = Arc<dyn NutritionApi>;

/// Key-value store handle shared by the executor, listeners and actions.
pub type SharedStorage = Arc<dyn KeyValueStore>;

/// Owns the configuration, the backend, the stores, the query cache and the
/// event registry they report to.
///
/// Nothing here is global: two contexts never share state, which is how
/// tests stay isolated.
///
/// ```rust
/// use std::sync::Arc;
///
/// use nutritrack::config::ClientConfig;
/// use nutritrack::{AppContext, InMemoryKeyValueStore, Route};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), nutritrack::ClientError> {
/// let ctx = AppContext::create(ClientConfig::default(), Arc::new(InMemoryKeyValueStore::new()))?;
/// assert_eq!(ctx.route(), Route::Loading);
///
/// ctx.bootstrap().await;
/// assert_eq!(ctx.route(), Route::Auth);
/// # Ok(())
/// # }
/// ```
pub struct AppContext {
    config: ClientConfig,
    storage: SharedStorage,
    api: SharedApi,
    events: Arc<EventRegistry>,
    session: SessionStore,
    nutrition: NutritionStore,
    app: AppStore,
    cache: QueryCache,
}

impl AppContext {
    /// Builds a context talking to the configured backend over HTTP.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Network` if the HTTP client cannot be built.
    pub fn create(config: ClientConfig, storage: SharedStorage) -> Result<Self, ClientError> {
        let client = ApiClient::new(&config.api, storage.clone())?;
        Ok(Self::with_api(config, storage, Arc::new(client)))
    }

    /// Builds a context around any backend implementation.
    pub fn with_api(config: ClientConfig, storage: SharedStorage, api: SharedApi) -> Self {
        let events = Arc::new(EventRegistry::new());
        events
            .listen(PersistenceListener::new(storage.clone()))
            .listen(LoggingListener::with_level(log::Level::Debug));
        #[cfg(feature = "tracing")]
        events.listen(crate::events::listeners::TracingListener);

        log::debug!(
            target: "nutritrack",
            "msg=\"app context created\" listeners={}",
            events.len()
        );

        Self {
            session: SessionStore::new(events.clone()),
            nutrition: NutritionStore::new(events.clone()),
            app: AppStore::new(events.clone()),
            cache: QueryCache::with_gc_time(config.queries.gc_time),
            config,
            storage,
            api,
            events,
        }
    }

    /// Restores the persisted session. See [`BootstrapAction`].
    pub async fn bootstrap(&self) -> Session {
        self.bootstrap_action().execute().await
    }

    /// Which stack the navigation shows right now.
    pub fn route(&self) -> Route {
        router::route(
            self.session.is_loading(),
            self.session.is_authenticated(),
            self.app.onboarding_completed(),
        )
    }

    pub fn queries(&self) -> Queries<SharedApi> {
        Queries::new(
            self.api.clone(),
            self.cache.clone(),
            self.session.clone(),
            self.config.queries.clone(),
        )
    }

    pub async fn login(&self, form: &LoginForm) -> Result<User, ClientError> {
        self.login_action().execute(form).await
    }

    pub async fn register(&self, form: &RegisterForm) -> Result<User, ClientError> {
        self.register_action().execute(form).await
    }

    pub async fn logout(&self) {
        self.logout_action().execute().await;
    }

    pub fn bootstrap_action(&self) -> BootstrapAction<SharedStorage> {
        BootstrapAction::new(
            self.storage.clone(),
            self.session.clone(),
            self.nutrition.clone(),
            self.app.clone(),
        )
    }

    pub fn login_action(&self) -> LoginAction<SharedApi, SharedStorage> {
        LoginAction::new(self.api.clone(), self.storage.clone(), self.session.clone())
    }

    pub fn register_action(&self) -> RegisterAction<SharedApi, SharedStorage> {
        RegisterAction::new(self.api.clone(), self.storage.clone(), self.session.clone())
    }

    pub fn logout_action(&self) -> LogoutAction<SharedApi, SharedStorage> {
        LogoutAction::new(
            self.api.clone(),
            self.storage.clone(),
            self.session.clone(),
            self.nutrition.clone(),
            self.app.clone(),
            self.cache.clone(),
            self.events.clone(),
        )
    }

    pub fn update_profile_action(&self) -> UpdateProfileAction<SharedApi> {
        UpdateProfileAction::new(self.api.clone(), self.cache.clone(), self.nutrition.clone())
    }

    pub fn create_goal_action(&self) -> CreateGoalAction<SharedApi> {
        CreateGoalAction::new(self.api.clone(), self.cache.clone(), self.nutrition.clone())
    }

    pub fn calculate_targets_action(&self) -> CalculateTargetsAction<SharedApi> {
        CalculateTargetsAction::new(self.api.clone(), self.cache.clone(), self.nutrition.clone())
    }

    pub fn quick_log_action(&self) -> QuickLogAction<SharedApi> {
        QuickLogAction::new(self.api.clone(), self.cache.clone())
    }

    pub fn analyze_image_action(&self) -> AnalyzeImageAction<SharedApi> {
        AnalyzeImageAction::new(self.api.clone(), self.cache.clone())
    }

    pub fn search_foods_action(&self) -> SearchFoodsAction<SharedApi> {
        SearchFoodsAction::new(self.api.clone(), self.cache.clone())
    }

    pub fn refresh_all_action(&self) -> RefreshAllAction {
        RefreshAllAction::new(self.cache.clone())
    }

    pub fn complete_onboarding_action(&self) -> CompleteOnboardingAction<SharedApi> {
        CompleteOnboardingAction::new(
            self.api.clone(),
            self.cache.clone(),
            self.nutrition.clone(),
            self.app.clone(),
        )
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn api(&self) -> &SharedApi {
        &self.api
    }

    pub fn storage(&self) -> &SharedStorage {
        &self.storage
    }

    pub fn events(&self) -> &Arc<EventRegistry> {
        &self.events
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn nutrition(&self) -> &NutritionStore {
        &self.nutrition
    }

    pub fn app(&self) -> &AppStore {
        &self.app
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Drops cached data and every listener. Fetches still running finish
    /// without writing anything.
    pub fn teardown(&self) {
        self.cache.clear();
        self.events.clear();
        log::debug!(target: "nutritrack", "msg=\"app context torn down\"");
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("config", &self.config)
            .field("session", &self.session)
            .field("cache", &self.cache)
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::keys;
    use crate::{InMemoryKeyValueStore, MockNutritionApi};

    fn context() -> (AppContext, MockNutritionApi, InMemoryKeyValueStore) {
        let api = MockNutritionApi::new().with_account(
            User {
                id: 1,
                email: "ana@example.com".to_owned(),
                ..Default::default()
            },
            "secret1",
        );
        let storage = InMemoryKeyValueStore::new();
        let ctx = AppContext::with_api(
            ClientConfig::default(),
            Arc::new(storage.clone()),
            Arc::new(api.clone()),
        );
        (ctx, api, storage)
    }

    #[tokio::test]
    async fn test_route_follows_session() {
        let (ctx, _, _) = context();
        assert_eq!(ctx.route(), Route::Loading);

        ctx.bootstrap().await;
        assert_eq!(ctx.route(), Route::Auth);

        ctx.login(&LoginForm::new("ana@example.com", "secret1"))
            .await
            .unwrap();
        assert_eq!(ctx.route(), Route::Onboarding);

        ctx.app().set_onboarding_completed(true).await;
        assert_eq!(ctx.route(), Route::Main);

        ctx.logout().await;
        assert_eq!(ctx.route(), Route::Auth);
    }

    #[tokio::test]
    async fn test_login_persists_session_for_next_start() {
        let (ctx, api, storage) = context();
        ctx.bootstrap().await;
        ctx.login(&LoginForm::new("ana@example.com", "secret1"))
            .await
            .unwrap();
        assert!(storage.contains_key(keys::AUTH_TOKENS));
        assert!(storage.contains_key(keys::AUTH_SESSION));

        let restarted = AppContext::with_api(
            ClientConfig::default(),
            Arc::new(storage.clone()),
            Arc::new(api),
        );
        let session = restarted.bootstrap().await;
        assert!(session.is_authenticated);
        assert_eq!(session.user.map(|u| u.id), Some(1));
    }

    #[tokio::test]
    async fn test_contexts_are_isolated() {
        let (first, _, _) = context();
        let (second, _, _) = context();
        first.bootstrap().await;
        first
            .login(&LoginForm::new("ana@example.com", "secret1"))
            .await
            .unwrap();

        assert!(first.session().is_authenticated());
        assert!(!second.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_teardown_drops_listeners_and_cache() {
        let (ctx, _, _) = context();
        ctx.bootstrap().await;
        ctx.login(&LoginForm::new("ana@example.com", "secret1"))
            .await
            .unwrap();
        ctx.queries().today_log().await.unwrap();
        assert_eq!(ctx.cache().len(), 1);

        ctx.teardown();

        assert!(ctx.cache().is_empty());
        assert!(ctx.events().is_empty());
    }
}
