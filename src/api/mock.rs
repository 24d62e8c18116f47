#![allow(clippy::unwrap_used)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

use super::{
    AiStats, AnalyzeImageRequest, AnalyzeImageResponse, AuthTokens, CalculateTargetsRequest,
    DailyLog, FitnessGoal, Food, FoodSearchResponse, GoalType, LoggedFood, LoginRequest,
    NutritionApi, NutritionAverages, NutritionSummary, NutritionTargets, ProfileUpdateRequest,
    QuickLogRequest, QuickLogResponse, RegisterRequest, ScannedFood, ScannedFoodsResponse, User,
    UserProfile,
};
use crate::ClientError;

/// In-memory backend state behind [`MockNutritionApi`].
#[derive(Debug, Default)]
pub struct MockBackend {
    /// Registered accounts as `(user, password)`.
    pub accounts: Vec<(User, String)>,
    /// User returned by `current_user`; set by login and registration.
    pub current_user: Option<User>,
    pub profile: Option<UserProfile>,
    pub goal: Option<FitnessGoal>,
    pub targets: Option<NutritionTargets>,
    pub foods: Vec<Food>,
    pub scanned_foods: Vec<ScannedFood>,
    pub today_log: DailyLog,
    pub logs_by_date: HashMap<NaiveDate, DailyLog>,
    /// Errors returned, in order, by the next calls of any endpoint.
    pub failures: VecDeque<ClientError>,
    /// Every call made, by method name.
    pub calls: Vec<&'static str>,
    next_id: i64,
}

impl MockBackend {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// [`NutritionApi`] backed by [`MockBackend`], for tests.
///
/// Clones share the same backend.
#[derive(Clone, Default)]
pub struct MockNutritionApi {
    pub backend: Arc<Mutex<MockBackend>>,
    delay: Arc<Mutex<Option<Duration>>>,
}

impl MockNutritionApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an account that can log in with `password`.
    pub fn with_account(self, user: User, password: &str) -> Self {
        self.backend
            .lock()
            .unwrap()
            .accounts
            .push((user, password.to_owned()));
        self
    }

    /// Every call sleeps this long before answering.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    /// Queues an error for the next call.
    pub fn fail_next(&self, error: ClientError) {
        self.backend.lock().unwrap().failures.push_back(error);
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.backend
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|call| **call == method)
            .count()
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.backend.lock().unwrap().calls.clone()
    }

    async fn enter(&self, method: &'static str) -> Result<(), ClientError> {
        self.backend.lock().unwrap().calls.push(method);

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match self.backend.lock().unwrap().failures.pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn tokens_for(user: &User) -> AuthTokens {
        AuthTokens::new(format!("access-{}", user.id), format!("refresh-{}", user.id))
    }
}

fn not_found(message: &str) -> ClientError {
    ClientError::Http {
        status: 404,
        message: message.to_owned(),
    }
}

#[async_trait]
impl NutritionApi for MockNutritionApi {
    async fn login(&self, request: &LoginRequest) -> Result<(User, AuthTokens), ClientError> {
        self.enter("login").await?;
        let mut backend = self.backend.lock().unwrap();
        let user = backend
            .accounts
            .iter()
            .find(|(user, password)| {
                user.email == request.email && password == request.password.expose_secret()
            })
            .map(|(user, _)| user.clone())
            .ok_or_else(|| ClientError::Http {
                status: 400,
                message: "Invalid credentials".to_owned(),
            })?;
        backend.current_user = Some(user.clone());
        let tokens = Self::tokens_for(&user);
        Ok((user, tokens))
    }

    async fn register(
        &self,
        request: &RegisterRequest,
    ) -> Result<(User, AuthTokens), ClientError> {
        self.enter("register").await?;
        let mut backend = self.backend.lock().unwrap();
        if backend.accounts.iter().any(|(u, _)| u.email == request.email) {
            return Err(ClientError::Http {
                status: 400,
                message: "A user is already registered with this e-mail address.".to_owned(),
            });
        }
        let user = User {
            id: backend.next_id(),
            email: request.email.clone(),
            first_name: request.first_name.clone(),
            last_name: request.last_name.clone(),
            date_joined: Some(Utc::now()),
            ..Default::default()
        };
        backend
            .accounts
            .push((user.clone(), request.password1.expose_secret().to_owned()));
        backend.current_user = Some(user.clone());
        let tokens = Self::tokens_for(&user);
        Ok((user, tokens))
    }

    async fn logout(&self) -> Result<(), ClientError> {
        self.enter("logout").await?;
        self.backend.lock().unwrap().current_user = None;
        Ok(())
    }

    async fn current_user(&self) -> Result<User, ClientError> {
        self.enter("current_user").await?;
        self.backend
            .lock()
            .unwrap()
            .current_user
            .clone()
            .ok_or_else(|| ClientError::Http {
                status: 401,
                message: "Authentication credentials were not provided.".to_owned(),
            })
    }

    async fn user_profile(&self) -> Result<UserProfile, ClientError> {
        self.enter("user_profile").await?;
        self.backend
            .lock()
            .unwrap()
            .profile
            .clone()
            .ok_or_else(|| not_found("Profile not found"))
    }

    async fn update_user_profile(
        &self,
        request: &ProfileUpdateRequest,
    ) -> Result<UserProfile, ClientError> {
        self.enter("update_user_profile").await?;
        let mut backend = self.backend.lock().unwrap();

        if let Some(user) = backend.current_user.as_mut() {
            if let Some(first_name) = &request.first_name {
                user.first_name.clone_from(first_name);
            }
            if let Some(last_name) = &request.last_name {
                user.last_name.clone_from(last_name);
            }
        }

        let profile = backend.profile.get_or_insert_with(UserProfile::default);
        profile.weight = request.weight.or(profile.weight);
        profile.height = request.height.or(profile.height);
        profile.age = request.age.or(profile.age);
        profile.gender = request.gender.or(profile.gender);
        profile.activity_level = request.activity_level.or(profile.activity_level);
        profile.updated_at = Some(Utc::now());
        Ok(profile.clone())
    }

    async fn create_fitness_goal(&self, goal_type: GoalType) -> Result<FitnessGoal, ClientError> {
        self.enter("create_fitness_goal").await?;
        let mut backend = self.backend.lock().unwrap();
        let goal = FitnessGoal {
            id: Some(backend.next_id()),
            goal_type,
            goal_type_display: goal_type.to_string(),
            is_active: true,
            created_at: Some(Utc::now()),
            updated_at: None,
        };
        backend.goal = Some(goal.clone());
        Ok(goal)
    }

    async fn active_fitness_goal(&self) -> Result<FitnessGoal, ClientError> {
        self.enter("active_fitness_goal").await?;
        self.backend
            .lock()
            .unwrap()
            .goal
            .clone()
            .ok_or_else(|| not_found("No active fitness goal found"))
    }

    async fn today_targets(&self) -> Result<NutritionTargets, ClientError> {
        self.enter("today_targets").await?;
        self.backend
            .lock()
            .unwrap()
            .targets
            .clone()
            .ok_or_else(|| not_found("No targets found for today"))
    }

    async fn calculate_targets(
        &self,
        request: &CalculateTargetsRequest,
    ) -> Result<NutritionTargets, ClientError> {
        self.enter("calculate_targets").await?;
        let mut backend = self.backend.lock().unwrap();
        // Flat numbers; the real formulas live on the server.
        let calories = 30.0 * request.profile_data.weight;
        let targets = NutritionTargets {
            id: Some(backend.next_id()),
            date: request.date,
            calories,
            protein: 2.0 * request.profile_data.weight,
            carbs: calories * 0.45 / 4.0,
            fat: calories * 0.25 / 9.0,
            bmi: None,
            bmr: None,
            tdee: Some(calories),
            fitness_goal: backend.goal.as_ref().and_then(|g| g.id),
            fitness_goal_display: request.goal_type.to_string(),
        };
        backend.targets = Some(targets.clone());
        Ok(targets)
    }

    async fn search_foods(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<FoodSearchResponse, ClientError> {
        self.enter("search_foods").await?;
        let needle = query.to_lowercase();
        let foods: Vec<Food> = self
            .backend
            .lock()
            .unwrap()
            .foods
            .iter()
            .filter(|food| food.name.to_lowercase().contains(&needle))
            .take(limit as usize)
            .cloned()
            .collect();
        Ok(FoodSearchResponse {
            count: foods.len() as u32,
            foods,
        })
    }

    async fn scanned_foods(&self, limit: u32) -> Result<ScannedFoodsResponse, ClientError> {
        self.enter("scanned_foods").await?;
        let scanned_foods: Vec<ScannedFood> = self
            .backend
            .lock()
            .unwrap()
            .scanned_foods
            .iter()
            .take(limit as usize)
            .cloned()
            .collect();
        Ok(ScannedFoodsResponse {
            count: scanned_foods.len() as u32,
            scanned_foods,
        })
    }

    async fn analyze_image(
        &self,
        _request: &AnalyzeImageRequest,
    ) -> Result<AnalyzeImageResponse, ClientError> {
        self.enter("analyze_image").await?;
        let mut backend = self.backend.lock().unwrap();
        let scanned = ScannedFood {
            id: backend.next_id(),
            ai_identified_name: "Apple".to_owned(),
            serving_size: "1 medium (182g)".to_owned(),
            calories: Some(95.0),
            protein: Some(0.5),
            carbs: Some(25.0),
            fat: Some(0.3),
            confidence_score: Some(0.92),
            created_at: Some(Utc::now()),
        };
        backend.scanned_foods.insert(0, scanned.clone());
        Ok(AnalyzeImageResponse {
            scanned_food: Some(scanned),
        })
    }

    async fn ai_stats(&self) -> Result<AiStats, ClientError> {
        self.enter("ai_stats").await?;
        let backend = self.backend.lock().unwrap();
        Ok(AiStats {
            total_analyses: backend.scanned_foods.len() as u64,
            ..Default::default()
        })
    }

    async fn today_log(&self) -> Result<DailyLog, ClientError> {
        self.enter("today_log").await?;
        Ok(self.backend.lock().unwrap().today_log.clone())
    }

    async fn log_by_date(&self, date: NaiveDate) -> Result<DailyLog, ClientError> {
        self.enter("log_by_date").await?;
        let backend = self.backend.lock().unwrap();
        Ok(backend
            .logs_by_date
            .get(&date)
            .cloned()
            .unwrap_or_else(|| DailyLog {
                date: Some(date),
                ..Default::default()
            }))
    }

    async fn quick_log_food(
        &self,
        request: &QuickLogRequest,
    ) -> Result<QuickLogResponse, ClientError> {
        self.enter("quick_log_food").await?;
        let mut backend = self.backend.lock().unwrap();
        let item = LoggedFood {
            id: Some(backend.next_id()),
            meal_type: request.meal_type,
            meal_type_display: request.meal_type.as_str().to_owned(),
            name: request.name.clone().unwrap_or_default(),
            quantity: request.quantity,
            unit: request.unit.clone(),
            calories: request.calories.unwrap_or_default(),
            protein: request.protein.unwrap_or_default(),
            carbs: request.carbs.unwrap_or_default(),
            fat: request.fat.unwrap_or_default(),
        };

        let log = &mut backend.today_log;
        log.date = Some(request.date);
        log.total_calories += item.calories;
        log.total_protein += item.protein;
        log.total_carbs += item.carbs;
        log.total_fat += item.fat;
        log.food_items.push(item.clone());

        Ok(QuickLogResponse {
            message: Some("Food logged successfully".to_owned()),
            food_item: Some(item),
            daily_log: Some(log.clone()),
        })
    }

    async fn nutrition_summary(&self) -> Result<NutritionSummary, ClientError> {
        self.enter("nutrition_summary").await?;
        let backend = self.backend.lock().unwrap();
        let log = &backend.today_log;
        if log.food_items.is_empty() {
            return Ok(NutritionSummary::default());
        }
        Ok(NutritionSummary {
            days_logged: 1,
            averages: NutritionAverages {
                calories: log.total_calories,
                protein: log.total_protein,
                carbs: log.total_carbs,
                fat: log.total_fat,
            },
            daily_logs: vec![log.clone()],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MealType;
    use crate::SecretString;

    fn ana() -> User {
        User {
            id: 1,
            email: "ana@example.com".to_owned(),
            first_name: "Ana".to_owned(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_login_checks_password() {
        let api = MockNutritionApi::new().with_account(ana(), "secret1");

        let wrong = LoginRequest {
            email: "ana@example.com".to_owned(),
            password: SecretString::new("nope"),
        };
        assert_eq!(api.login(&wrong).await.unwrap_err().status(), Some(400));

        let right = LoginRequest {
            email: "ana@example.com".to_owned(),
            password: SecretString::new("secret1"),
        };
        let (user, tokens) = api.login(&right).await.unwrap();
        assert_eq!(user.first_name, "Ana");
        assert_eq!(tokens.access.expose_secret(), "access-1");
        assert_eq!(api.call_count("login"), 2);
    }

    #[tokio::test]
    async fn test_queued_failure_is_consumed_once() {
        let api = MockNutritionApi::new();
        api.fail_next(ClientError::Timeout);

        assert_eq!(api.today_log().await, Err(ClientError::Timeout));
        assert!(api.today_log().await.is_ok());
    }

    #[tokio::test]
    async fn test_quick_log_updates_today() {
        let api = MockNutritionApi::new();
        let request = QuickLogRequest {
            date: Utc::now().date_naive(),
            meal_type: MealType::Lunch,
            name: Some("Rice".to_owned()),
            food_id: None,
            scanned_food_id: None,
            quantity: 150.0,
            unit: "g".to_owned(),
            calories: Some(195.0),
            protein: None,
            carbs: None,
            fat: None,
        };
        api.quick_log_food(&request).await.unwrap();

        let log = api.today_log().await.unwrap();
        assert_eq!(log.food_items.len(), 1);
        assert_eq!(log.total_calories, 195.0);
        assert_eq!(api.nutrition_summary().await.unwrap().days_logged, 1);
    }
}
