use super::login::persist_tokens;
use crate::api::{NutritionApi, User};
use crate::session::SessionStore;
use crate::storage::KeyValueStore;
use crate::validators::RegisterForm;
use crate::ClientError;

/// Creates an account and signs straight into it.
pub struct RegisterAction<A: NutritionApi, S: KeyValueStore> {
    api: A,
    storage: S,
    session: SessionStore,
}

impl<A: NutritionApi, S: KeyValueStore> RegisterAction<A, S> {
    pub fn new(api: A, storage: S, session: SessionStore) -> Self {
        RegisterAction {
            api,
            storage,
            session,
        }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "register", skip_all, err)
    )]
    pub async fn execute(&self, form: &RegisterForm) -> Result<User, ClientError> {
        let request = form.validate()?;
        let (user, tokens) = self.api.register(&request).await?;

        persist_tokens(&self.storage, &tokens).await?;
        self.session.login(user.clone(), tokens).await;

        log::info!(
            target: "nutritrack",
            "msg=\"registration success\" user_id={}",
            user.id
        );

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::events::EventRegistry;
    use crate::storage::keys;
    use crate::{InMemoryKeyValueStore, MockNutritionApi};

    fn form() -> RegisterForm {
        RegisterForm {
            email: "ana@example.com".to_owned(),
            password1: "Secret123".into(),
            password2: "Secret123".into(),
            first_name: "Ana".to_owned(),
            last_name: "Silva".to_owned(),
        }
    }

    #[tokio::test]
    async fn test_register_signs_in() {
        let api = MockNutritionApi::new();
        let storage = InMemoryKeyValueStore::new();
        let session = SessionStore::new(Arc::new(EventRegistry::new()));
        let action = RegisterAction::new(api.clone(), storage.clone(), session.clone());

        let user = action.execute(&form()).await.unwrap();

        assert_eq!(user.email, "ana@example.com");
        assert_eq!(user.first_name, "Ana");
        assert!(session.is_authenticated());
        assert!(storage.contains_key(keys::AUTH_TOKENS));
        assert_eq!(api.call_count("register"), 1);
    }

    #[tokio::test]
    async fn test_duplicate_email() {
        let api = MockNutritionApi::new();
        let storage = InMemoryKeyValueStore::new();
        let session = SessionStore::new(Arc::new(EventRegistry::new()));
        let action = RegisterAction::new(api, storage, session.clone());

        action.execute(&form()).await.unwrap();
        session.logout().await;

        let err = action.execute(&form()).await.unwrap_err();
        assert_eq!(err.status(), Some(400));
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_mismatched_passwords_rejected_locally() {
        let api = MockNutritionApi::new();
        let session = SessionStore::new(Arc::new(EventRegistry::new()));
        let action = RegisterAction::new(api.clone(), InMemoryKeyValueStore::new(), session);

        let form = RegisterForm {
            password2: "Secret124".into(),
            ..form()
        };
        let err = action.execute(&form).await.unwrap_err();

        assert!(matches!(err, ClientError::Validation(_)));
        assert!(api.calls().is_empty());
    }
}
