use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;

use super::{
    AiStats, AnalyzeImageRequest, AnalyzeImageResponse, AuthTokens, CalculateTargetsRequest,
    DailyLog, FitnessGoal, FoodSearchResponse, GoalType, LoginRequest, NutritionSummary,
    NutritionTargets, ProfileUpdateRequest, QuickLogRequest, QuickLogResponse, RegisterRequest,
    ScannedFoodsResponse, User, UserProfile,
};
use crate::ClientError;

/// The backend, one method per endpoint.
///
/// [`ApiClient`](super::ApiClient) is the HTTP implementation. Everything
/// above this trait (queries, actions, the app context) only sees the
/// trait, so tests swap in [`MockNutritionApi`](super::MockNutritionApi).
///
/// Implementations have no side effects on the session, stores or cache.
#[async_trait]
pub trait NutritionApi: Send + Sync {
    /// Exchanges credentials for a user and a token pair. Sent without
    /// an `Authorization` header.
    async fn login(&self, request: &LoginRequest) -> Result<(User, AuthTokens), ClientError>;

    /// Creates an account. Sent without an `Authorization` header.
    async fn register(&self, request: &RegisterRequest)
        -> Result<(User, AuthTokens), ClientError>;

    /// Invalidates the server-side session. The response body is ignored.
    async fn logout(&self) -> Result<(), ClientError>;

    async fn current_user(&self) -> Result<User, ClientError>;

    async fn user_profile(&self) -> Result<UserProfile, ClientError>;

    async fn update_user_profile(
        &self,
        request: &ProfileUpdateRequest,
    ) -> Result<UserProfile, ClientError>;

    async fn create_fitness_goal(&self, goal_type: GoalType) -> Result<FitnessGoal, ClientError>;

    async fn active_fitness_goal(&self) -> Result<FitnessGoal, ClientError>;

    async fn today_targets(&self) -> Result<NutritionTargets, ClientError>;

    async fn calculate_targets(
        &self,
        request: &CalculateTargetsRequest,
    ) -> Result<NutritionTargets, ClientError>;

    async fn search_foods(&self, query: &str, limit: u32)
        -> Result<FoodSearchResponse, ClientError>;

    async fn scanned_foods(&self, limit: u32) -> Result<ScannedFoodsResponse, ClientError>;

    async fn analyze_image(
        &self,
        request: &AnalyzeImageRequest,
    ) -> Result<AnalyzeImageResponse, ClientError>;

    async fn ai_stats(&self) -> Result<AiStats, ClientError>;

    async fn today_log(&self) -> Result<DailyLog, ClientError>;

    async fn log_by_date(&self, date: NaiveDate) -> Result<DailyLog, ClientError>;

    async fn quick_log_food(
        &self,
        request: &QuickLogRequest,
    ) -> Result<QuickLogResponse, ClientError>;

    async fn nutrition_summary(&self) -> Result<NutritionSummary, ClientError>;
}

#[async_trait]
impl<T: NutritionApi + ?Sized> NutritionApi for Arc<T> {
    async fn login(&self, request: &LoginRequest) -> Result<(User, AuthTokens), ClientError> {
        (**self).login(request).await
    }

    async fn register(
        &self,
        request: &RegisterRequest,
    ) -> Result<(User, AuthTokens), ClientError> {
        (**self).register(request).await
    }

    async fn logout(&self) -> Result<(), ClientError> {
        (**self).logout().await
    }

    async fn current_user(&self) -> Result<User, ClientError> {
        (**self).current_user().await
    }

    async fn user_profile(&self) -> Result<UserProfile, ClientError> {
        (**self).user_profile().await
    }

    async fn update_user_profile(
        &self,
        request: &ProfileUpdateRequest,
    ) -> Result<UserProfile, ClientError> {
        (**self).update_user_profile(request).await
    }

    async fn create_fitness_goal(&self, goal_type: GoalType) -> Result<FitnessGoal, ClientError> {
        (**self).create_fitness_goal(goal_type).await
    }

    async fn active_fitness_goal(&self) -> Result<FitnessGoal, ClientError> {
        (**self).active_fitness_goal().await
    }

    async fn today_targets(&self) -> Result<NutritionTargets, ClientError> {
        (**self).today_targets().await
    }

    async fn calculate_targets(
        &self,
        request: &CalculateTargetsRequest,
    ) -> Result<NutritionTargets, ClientError> {
        (**self).calculate_targets(request).await
    }

    async fn search_foods(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<FoodSearchResponse, ClientError> {
        (**self).search_foods(query, limit).await
    }

    async fn scanned_foods(&self, limit: u32) -> Result<ScannedFoodsResponse, ClientError> {
        (**self).scanned_foods(limit).await
    }

    async fn analyze_image(
        &self,
        request: &AnalyzeImageRequest,
    ) -> Result<AnalyzeImageResponse, ClientError> {
        (**self).analyze_image(request).await
    }

    async fn ai_stats(&self) -> Result<AiStats, ClientError> {
        (**self).ai_stats().await
    }

    async fn today_log(&self) -> Result<DailyLog, ClientError> {
        (**self).today_log().await
    }

    async fn log_by_date(&self, date: NaiveDate) -> Result<DailyLog, ClientError> {
        (**self).log_by_date(date).await
    }

    async fn quick_log_food(
        &self,
        request: &QuickLogRequest,
    ) -> Result<QuickLogResponse, ClientError> {
        (**self).quick_log_food(request).await
    }

    async fn nutrition_summary(&self) -> Result<NutritionSummary, ClientError> {
        (**self).nutrition_summary().await
    }
}
