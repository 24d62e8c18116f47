use crate::api::{AuthTokens, NutritionApi, User};
use crate::session::SessionStore;
use crate::storage::{keys, KeyValueStore};
use crate::validators::LoginForm;
use crate::ClientError;

pub struct LoginAction<A: NutritionApi, S: KeyValueStore> {
    api: A,
    storage: S,
    session: SessionStore,
}

impl<A: NutritionApi, S: KeyValueStore> LoginAction<A, S> {
    pub fn new(api: A, storage: S, session: SessionStore) -> Self {
        LoginAction {
            api,
            storage,
            session,
        }
    }

    /// Validates the form, signs in and persists the token pair before the
    /// session flips to authenticated.
    ///
    /// # Returns
    ///
    /// - `Ok(user)` - signed in
    /// - `Err(ClientError::Validation(_))` - form rejected, nothing sent
    /// - `Err(_)` - backend or storage failure, session unchanged
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "login", skip_all, err)
    )]
    pub async fn execute(&self, form: &LoginForm) -> Result<User, ClientError> {
        let request = form.validate()?;
        let (user, tokens) = self.api.login(&request).await?;

        persist_tokens(&self.storage, &tokens).await?;
        self.session.login(user.clone(), tokens).await;

        log::info!(
            target: "nutritrack",
            "msg=\"login success\" user_id={}",
            user.id
        );

        Ok(user)
    }
}

/// Writes the raw token blob the request executor reads on every call.
pub(crate) async fn persist_tokens<S: KeyValueStore + ?Sized>(
    storage: &S,
    tokens: &AuthTokens,
) -> Result<(), ClientError> {
    let json = serde_json::to_string(tokens)
        .map_err(|e| ClientError::Storage(format!("Failed to serialize tokens: {e}")))?;
    storage.set_item(keys::AUTH_TOKENS, &json).await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::events::EventRegistry;
    use crate::{InMemoryKeyValueStore, MockNutritionApi};

    fn setup() -> (
        LoginAction<MockNutritionApi, InMemoryKeyValueStore>,
        MockNutritionApi,
        InMemoryKeyValueStore,
        SessionStore,
    ) {
        let api = MockNutritionApi::new().with_account(
            User {
                id: 7,
                email: "ana@example.com".to_owned(),
                first_name: "Ana".to_owned(),
                ..Default::default()
            },
            "secret1",
        );
        let storage = InMemoryKeyValueStore::new();
        let session = SessionStore::new(Arc::new(EventRegistry::new()));
        let action = LoginAction::new(api.clone(), storage.clone(), session.clone());
        (action, api, storage, session)
    }

    #[tokio::test]
    async fn test_login_success() {
        let (action, _, storage, session) = setup();

        let user = action
            .execute(&LoginForm::new("ana@example.com", "secret1"))
            .await
            .unwrap();

        assert_eq!(user.id, 7);
        assert!(session.is_authenticated());
        assert_eq!(
            session.tokens().unwrap().access.expose_secret(),
            "access-7"
        );

        let raw = storage.get_item(keys::AUTH_TOKENS).await.unwrap().unwrap();
        let stored: AuthTokens = serde_json::from_str(&raw).unwrap();
        assert_eq!(stored.access.expose_secret(), "access-7");
    }

    #[tokio::test]
    async fn test_invalid_form_sends_nothing() {
        let (action, api, storage, session) = setup();

        let result = action.execute(&LoginForm::new("ana", "123")).await;

        let Err(ClientError::Validation(errors)) = result else {
            panic!("expected validation error");
        };
        assert!(errors.contains("email"));
        assert!(errors.contains("password"));
        assert!(api.calls().is_empty());
        assert!(storage.is_empty());
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_wrong_password() {
        let (action, _, storage, session) = setup();

        let err = action
            .execute(&LoginForm::new("ana@example.com", "wrong-password"))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(400));
        assert_eq!(err.message(), "Invalid credentials");
        assert!(!storage.contains_key(keys::AUTH_TOKENS));
        assert!(!session.is_authenticated());
    }
}
