use std::future::Future;

use chrono::NaiveDate;

use super::{resources, QueryCache, QueryKey, QueryOptions, Resource};
use crate::api::{
    endpoints, AiStats, DailyLog, FitnessGoal, NutritionApi, NutritionSummary, NutritionTargets,
    ScannedFoodsResponse, User, UserProfile,
};
use crate::config::QueryConfig;
use crate::session::SessionStore;
use crate::validators::{FieldErrors, ValidationError};
use crate::ClientError;

/// Whether the signed-in user still has onboarding to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OnboardingStatus {
    pub needs_profile: bool,
    pub needs_goal: bool,
}

impl OnboardingStatus {
    pub fn is_complete(&self) -> bool {
        !self.needs_profile && !self.needs_goal
    }
}

/// Cached reads of the backend.
///
/// Every read is skipped while the session is unauthenticated: no request
/// is sent, no entry is created and [`ClientError::NotAuthenticated`] is
/// returned.
#[derive(Clone)]
pub struct Queries<A> {
    api: A,
    cache: QueryCache,
    session: SessionStore,
    config: QueryConfig,
}

impl<A> Queries<A>
where
    A: NutritionApi + Clone + 'static,
{
    pub fn new(api: A, cache: QueryCache, session: SessionStore, config: QueryConfig) -> Self {
        Self {
            api,
            cache,
            session,
            config,
        }
    }

    /// A freshly fetched user also replaces the session's copy, as long as
    /// the session is still signed in when the response arrives.
    pub async fn current_user(&self) -> Result<User, ClientError> {
        let session = self.session.clone();
        self.read(
            resources::CURRENT_USER.key(),
            &resources::CURRENT_USER,
            move |api| {
                let session = session.clone();
                async move {
                    let user = api.current_user().await?;
                    if session.is_authenticated() {
                        session.set_user(user.clone()).await;
                    }
                    Ok(user)
                }
            },
        )
        .await
    }

    pub async fn user_profile(&self) -> Result<UserProfile, ClientError> {
        self.read(resources::USER_PROFILE.key(), &resources::USER_PROFILE, |api| async move {
            api.user_profile().await
        })
        .await
    }

    pub async fn active_fitness_goal(&self) -> Result<FitnessGoal, ClientError> {
        self.read(
            resources::ACTIVE_FITNESS_GOAL.key(),
            &resources::ACTIVE_FITNESS_GOAL,
            |api| async move { api.active_fitness_goal().await },
        )
        .await
    }

    pub async fn today_targets(&self) -> Result<NutritionTargets, ClientError> {
        self.read(resources::TODAY_TARGETS.key(), &resources::TODAY_TARGETS, |api| async move {
            api.today_targets().await
        })
        .await
    }

    /// The most recent scans, newest first.
    pub async fn scanned_foods(&self) -> Result<ScannedFoodsResponse, ClientError> {
        self.read(resources::SCANNED_FOODS.key(), &resources::SCANNED_FOODS, |api| async move {
            api.scanned_foods(endpoints::DEFAULT_SCANNED_LIMIT).await
        })
        .await
    }

    pub async fn ai_stats(&self) -> Result<AiStats, ClientError> {
        self.read(resources::USER_STATS.key(), &resources::USER_STATS, |api| async move {
            api.ai_stats().await
        })
        .await
    }

    pub async fn today_log(&self) -> Result<DailyLog, ClientError> {
        self.read(resources::TODAY_LOG.key(), &resources::TODAY_LOG, |api| async move {
            api.today_log().await
        })
        .await
    }

    pub async fn nutrition_summary(&self) -> Result<NutritionSummary, ClientError> {
        self.read(
            resources::NUTRITION_SUMMARY.key(),
            &resources::NUTRITION_SUMMARY,
            |api| async move { api.nutrition_summary().await },
        )
        .await
    }

    /// The log for `date` (`YYYY-MM-DD`), cached per date.
    pub async fn daily_log(&self, date: &str) -> Result<DailyLog, ClientError> {
        let date = parse_date(date)?;
        let key = resources::DAILY_LOG
            .key()
            .with(date.format("%Y-%m-%d").to_string());

        self.read(key, &resources::DAILY_LOG, move |api| async move {
            api.log_by_date(date).await
        })
        .await
    }

    /// Complete when the profile has weight, height and age and there is an
    /// active goal. A missing goal (404) counts as "needs goal".
    pub async fn onboarding_status(&self) -> Result<OnboardingStatus, ClientError> {
        let (profile, goal) = futures::join!(self.user_profile(), self.active_fitness_goal());

        let needs_profile = match profile {
            Ok(profile) => !profile.has_physical_data(),
            Err(ClientError::Http { status: 404, .. }) => true,
            Err(e) => return Err(e),
        };
        let needs_goal = match goal {
            Ok(goal) => !goal.is_active,
            Err(ClientError::Http { status: 404, .. }) => true,
            Err(e) => return Err(e),
        };

        Ok(OnboardingStatus {
            needs_profile,
            needs_goal,
        })
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    async fn read<T, F, Fut>(
        &self,
        key: QueryKey,
        resource: &Resource,
        call: F,
    ) -> Result<T, ClientError>
    where
        T: Clone + Send + Sync + 'static,
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, ClientError>> + Send + 'static,
    {
        if !self.session.is_authenticated() {
            log::debug!(
                target: "nutritrack",
                "msg=\"skipping read while signed out\" key={key}"
            );
            return Err(ClientError::NotAuthenticated);
        }

        let api = self.api.clone();
        let options = QueryOptions::for_resource(resource, &self.config);
        self.cache
            .fetch(&key, &options, move || call(api.clone()))
            .await
    }
}

fn parse_date(date: &str) -> Result<NaiveDate, ClientError> {
    let date = date.trim();
    if date.is_empty() {
        return Err(FieldErrors::single("date", ValidationError::Required).into());
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| FieldErrors::single("date", ValidationError::InvalidDate).into())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::api::{AuthTokens, GoalType, MockNutritionApi};
    use crate::events::EventRegistry;

    async fn signed_in() -> (Queries<MockNutritionApi>, MockNutritionApi) {
        let api = MockNutritionApi::new();
        let session = SessionStore::new(Arc::new(EventRegistry::new()));
        session
            .login(
                User {
                    id: 1,
                    ..Default::default()
                },
                AuthTokens::new("a", "r"),
            )
            .await;
        let queries = Queries::new(
            api.clone(),
            QueryCache::new(),
            session,
            QueryConfig::default(),
        );
        (queries, api)
    }

    #[tokio::test]
    async fn test_reads_skipped_while_signed_out() {
        let api = MockNutritionApi::new();
        let session = SessionStore::new(Arc::new(EventRegistry::new()));
        session.set_loading(false).await;
        let queries = Queries::new(
            api.clone(),
            QueryCache::new(),
            session,
            QueryConfig::default(),
        );

        assert_eq!(
            queries.today_log().await,
            Err(ClientError::NotAuthenticated)
        );
        assert!(api.calls().is_empty());
        assert!(queries.cache().is_empty());
    }

    #[tokio::test]
    async fn test_today_log_cached() {
        let (queries, api) = signed_in().await;

        queries.today_log().await.unwrap();
        queries.today_log().await.unwrap();

        assert_eq!(api.call_count("today_log"), 1);
        assert_eq!(
            queries
                .cache()
                .get_query_data::<DailyLog>(&resources::TODAY_LOG.key()),
            Some(DailyLog::default())
        );
    }

    #[tokio::test]
    async fn test_current_user_refreshes_session_user() {
        let (queries, api) = signed_in().await;
        api.backend.lock().unwrap().current_user = Some(User {
            id: 1,
            first_name: "Ana".to_owned(),
            is_email_verified: true,
            ..Default::default()
        });

        let user = queries.current_user().await.unwrap();

        assert_eq!(queries.session.user(), Some(user));
        assert!(queries.session.is_authenticated());
    }

    #[tokio::test]
    async fn test_current_user_after_logout_leaves_session_empty() {
        let (queries, api) = signed_in().await;
        api.backend.lock().unwrap().current_user = Some(User {
            id: 1,
            ..Default::default()
        });
        api.set_delay(Duration::from_millis(50));

        let (result, ()) = tokio::join!(queries.current_user(), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            queries.session.logout().await;
        });

        assert!(result.is_ok());
        assert_eq!(queries.session.user(), None);
    }

    #[tokio::test]
    async fn test_daily_log_keyed_by_date() {
        let (queries, api) = signed_in().await;

        let log = queries.daily_log("2024-05-01").await.unwrap();
        assert_eq!(log.date, NaiveDate::from_ymd_opt(2024, 5, 1));
        queries.daily_log("2024-05-02").await.unwrap();
        queries.daily_log("2024-05-01").await.unwrap();

        assert_eq!(api.call_count("log_by_date"), 2);
        assert_eq!(queries.cache().len(), 2);
    }

    #[tokio::test]
    async fn test_daily_log_rejects_bad_dates() {
        let (queries, api) = signed_in().await;

        let err = queries.daily_log("").await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        let err = queries.daily_log("01/05/2024").await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_onboarding_status() {
        let (queries, api) = signed_in().await;

        let status = queries.onboarding_status().await.unwrap();
        assert!(status.needs_profile);
        assert!(status.needs_goal);
        assert!(!status.is_complete());

        {
            let mut backend = api.backend.lock().unwrap();
            backend.profile = Some(UserProfile {
                weight: Some(70.0),
                height: Some(175.0),
                age: Some(30),
                ..Default::default()
            });
            backend.goal = Some(FitnessGoal {
                id: Some(1),
                goal_type: GoalType::Maintenance,
                goal_type_display: String::new(),
                is_active: true,
                created_at: None,
                updated_at: None,
            });
        }
        queries.cache().clear();

        assert!(queries.onboarding_status().await.unwrap().is_complete());
    }
}
