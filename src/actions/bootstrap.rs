use crate::api::{AuthTokens, User};
use crate::session::{Session, SessionSnapshot, SessionStore};
use crate::state::{AppStateSnapshot, AppStore, NutritionSnapshot, NutritionStore};
use crate::storage::{keys, KeyValueStore, Persisted};
use crate::ClientError;

/// Restores the previous session at startup.
///
/// The session is only restored when both `auth_tokens` and `auth-storage`
/// are present and readable, the token blob has a non-empty `access` and the
/// session blob carries a user. Anything else, including storage failures,
/// leaves the session empty. The loading flag is cleared last, whatever
/// happened.
///
/// Running it again re-reads storage and ends in the same state.
pub struct BootstrapAction<S: KeyValueStore> {
    storage: S,
    session: SessionStore,
    nutrition: NutritionStore,
    app: AppStore,
}

impl<S: KeyValueStore> BootstrapAction<S> {
    pub fn new(storage: S, session: SessionStore, nutrition: NutritionStore, app: AppStore) -> Self {
        BootstrapAction {
            storage,
            session,
            nutrition,
            app,
        }
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(name = "bootstrap", skip_all))]
    pub async fn execute(&self) -> Session {
        self.session.set_loading(true).await;

        let (tokens, session, app, nutrition) = futures::join!(
            self.storage.get_item(keys::AUTH_TOKENS),
            self.storage.get_item(keys::AUTH_SESSION),
            self.storage.get_item(keys::APP_STATE),
            self.storage.get_item(keys::NUTRITION),
        );

        match restore(tokens, session) {
            Ok(Some((user, tokens))) => {
                log::info!(
                    target: "nutritrack",
                    "msg=\"session restored\" user_id={}",
                    user.id
                );
                self.session.login(user, tokens).await;

                if let Some(snapshot) = read_state::<NutritionSnapshot>(keys::NUTRITION, nutrition) {
                    self.nutrition.hydrate(snapshot);
                }
            }
            Ok(None) => {
                log::debug!(target: "nutritrack", "msg=\"no previous session\"");
            }
            Err(e) => {
                log::warn!(
                    target: "nutritrack",
                    "msg=\"failed to read persisted session\" error=\"{e}\""
                );
            }
        }

        let app_state = read_state::<AppStateSnapshot>(keys::APP_STATE, app).unwrap_or_default();
        self.app.restore(app_state);

        self.session.set_loading(false).await;
        self.session.snapshot()
    }
}

fn restore(
    tokens: Result<Option<String>, ClientError>,
    session: Result<Option<String>, ClientError>,
) -> Result<Option<(User, AuthTokens)>, ClientError> {
    let (Some(tokens), Some(session)) = (tokens?, session?) else {
        return Ok(None);
    };

    let tokens: AuthTokens = match serde_json::from_str(&tokens) {
        Ok(tokens) => tokens,
        Err(e) => {
            log::warn!(
                target: "nutritrack",
                "msg=\"ignoring unreadable auth tokens\" error=\"{e}\""
            );
            return Ok(None);
        }
    };
    if tokens.access.is_empty() {
        return Ok(None);
    }

    let user = Persisted::<SessionSnapshot>::from_json(&session).and_then(|p| p.state.user);
    Ok(user.map(|user| (user, tokens)))
}

fn read_state<T: serde::de::DeserializeOwned>(
    key: &str,
    raw: Result<Option<String>, ClientError>,
) -> Option<T> {
    match raw {
        Ok(raw) => raw
            .as_deref()
            .and_then(Persisted::<T>::from_json)
            .map(|p| p.state),
        Err(e) => {
            log::warn!(
                target: "nutritrack",
                "msg=\"failed to read persisted state\" key={key} error=\"{e}\""
            );
            None
        }
    }
}
