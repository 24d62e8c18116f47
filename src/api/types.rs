use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::SecretString;

// Enumerations

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

impl FromStr for Gender {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            _ => Err(()),
        }
    }
}

/// Fitness goal kinds accepted by `/nutrition/goals/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    WeightLoss,
    MuscleGain,
    Maintenance,
    Recomposition,
}

impl GoalType {
    pub const ALL: [GoalType; 4] = [
        Self::WeightLoss,
        Self::MuscleGain,
        Self::Maintenance,
        Self::Recomposition,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::WeightLoss => "weight_loss",
            Self::MuscleGain => "muscle_gain",
            Self::Maintenance => "maintenance",
            Self::Recomposition => "recomposition",
        }
    }
}

impl fmt::Display for GoalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GoalType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|goal| goal.as_str() == s)
            .ok_or(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
    Other,
}

impl MealType {
    pub const ALL: [MealType; 5] = [
        Self::Breakfast,
        Self::Lunch,
        Self::Dinner,
        Self::Snack,
        Self::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
            Self::Snack => "snack",
            Self::Other => "other",
        }
    }
}

impl FromStr for MealType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|meal| meal.as_str() == s)
            .ok_or(())
    }
}

// Auth

/// The backend sends only the fields it knows about; everything but `id`
/// falls back to empty values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_email_verified: bool,
    pub date_joined: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Stored as-is under the `auth_tokens` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthTokens {
    pub access: SecretString,
    #[serde(default)]
    pub refresh: SecretString,
}

impl AuthTokens {
    pub fn new(access: impl Into<SecretString>, refresh: impl Into<SecretString>) -> Self {
        Self {
            access: access.into(),
            refresh: refresh.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: SecretString,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password1: SecretString,
    pub password2: SecretString,
    pub first_name: String,
    pub last_name: String,
}

/// Body of a successful login or registration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub access: SecretString,
    #[serde(default)]
    pub refresh: SecretString,
}

impl AuthResponse {
    pub fn into_parts(self) -> (User, AuthTokens) {
        (
            self.user,
            AuthTokens {
                access: self.access,
                refresh: self.refresh,
            },
        )
    }
}

// Profile, goals, targets

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub id: Option<i64>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    pub activity_level: Option<f64>,
    pub bmi: Option<f64>,
    pub bmr: Option<f64>,
    pub tdee: Option<f64>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    /// Weight, height and age are all filled in.
    pub fn has_physical_data(&self) -> bool {
        self.weight.is_some_and(|w| w > 0.0)
            && self.height.is_some_and(|h| h > 0.0)
            && self.age.is_some_and(|a| a > 0)
    }
}

/// `PUT /nutrition/profile/`. Only the present fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProfileUpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_level: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessGoal {
    #[serde(default)]
    pub id: Option<i64>,
    pub goal_type: GoalType,
    #[serde(default)]
    pub goal_type_display: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateGoalRequest {
    pub goal_type: GoalType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionTargets {
    #[serde(default)]
    pub id: Option<i64>,
    pub date: NaiveDate,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    #[serde(default)]
    pub bmi: Option<f64>,
    #[serde(default)]
    pub bmr: Option<f64>,
    #[serde(default)]
    pub tdee: Option<f64>,
    #[serde(default)]
    pub fitness_goal: Option<i64>,
    #[serde(default)]
    pub fitness_goal_display: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileData {
    pub weight: f64,
    pub height: f64,
    pub age: u32,
    pub gender: Gender,
    pub activity_level: f64,
}

/// `POST /nutrition/targets/calculate/`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculateTargetsRequest {
    pub profile_data: ProfileData,
    pub goal_type: GoalType,
    pub date: NaiveDate,
}

// Foods

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Food {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub calories_per_100g: f64,
    #[serde(default)]
    pub protein_per_100g: f64,
    #[serde(default)]
    pub carbs_per_100g: f64,
    #[serde(default)]
    pub fat_per_100g: f64,
    #[serde(default)]
    pub is_verified: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct FoodSearchRequest {
    pub query: String,
    pub limit: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoodSearchResponse {
    pub foods: Vec<Food>,
    pub count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannedFood {
    pub id: i64,
    pub ai_identified_name: String,
    pub serving_size: String,
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
    pub confidence_score: Option<f64>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannedFoodsResponse {
    pub scanned_foods: Vec<ScannedFood>,
    pub count: u32,
}

/// `POST /ai/analyze/`. `image_data` is base64 without a data-URL prefix.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeImageRequest {
    pub image_data: String,
    pub image_format: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzeImageResponse {
    pub scanned_food: Option<ScannedFood>,
}

/// Usage and cost counters. Fields the backend adds later land in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiStats {
    pub total_analyses: u64,
    pub total_cost: f64,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// Tracking

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggedFood {
    #[serde(default)]
    pub id: Option<i64>,
    pub meal_type: MealType,
    #[serde(default)]
    pub meal_type_display: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fat: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyLog {
    pub id: Option<i64>,
    pub date: Option<NaiveDate>,
    pub total_calories: f64,
    pub total_protein: f64,
    pub total_carbs: f64,
    pub total_fat: f64,
    pub food_items: Vec<LoggedFood>,
}

/// `POST /tracking/foods/quick-log/`. Either `name` or one of the food
/// references identifies what was eaten.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuickLogRequest {
    pub date: NaiveDate,
    pub meal_type: MealType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub food_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scanned_food_id: Option<i64>,
    pub quantity: f64,
    pub unit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protein: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carbs: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fat: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuickLogResponse {
    pub message: Option<String>,
    pub food_item: Option<LoggedFood>,
    pub daily_log: Option<DailyLog>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NutritionAverages {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NutritionSummary {
    pub days_logged: u32,
    pub averages: NutritionAverages,
    pub daily_logs: Vec<DailyLog>,
}

// Errors

/// Error body shape used by the backend. `error` wins over `detail`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ErrorBody {
    pub error: Option<String>,
    pub detail: Option<String>,
}

impl ErrorBody {
    pub(crate) fn into_message(self) -> Option<String> {
        self.error
            .or(self.detail)
            .filter(|message| !message.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_user_parses() {
        let user: User = serde_json::from_str(r#"{"id":1,"first_name":"Ana"}"#).unwrap();
        assert_eq!(user.id, 1);
        assert_eq!(user.first_name, "Ana");
        assert!(user.email.is_empty());
        assert!(user.date_joined.is_none());
    }

    #[test]
    fn test_auth_response_into_parts() {
        let body = r#"{"user":{"id":7,"email":"a@b.co"},"access":"acc","refresh":"ref"}"#;
        let (user, tokens) = serde_json::from_str::<AuthResponse>(body)
            .unwrap()
            .into_parts();

        assert_eq!(user.id, 7);
        assert_eq!(tokens.access.expose_secret(), "acc");
        assert_eq!(tokens.refresh.expose_secret(), "ref");
    }

    #[test]
    fn test_auth_response_requires_access() {
        let body = r#"{"user":{"id":7},"refresh":"ref"}"#;
        assert!(serde_json::from_str::<AuthResponse>(body).is_err());
    }

    #[test]
    fn test_goal_type_wire_names() {
        assert_eq!(
            serde_json::to_string(&GoalType::WeightLoss).unwrap(),
            "\"weight_loss\""
        );
        assert_eq!("recomposition".parse::<GoalType>(), Ok(GoalType::Recomposition));
        assert!("bulk".parse::<GoalType>().is_err());
    }

    #[test]
    fn test_profile_update_skips_absent_fields() {
        let request = ProfileUpdateRequest {
            weight: Some(70.5),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            r#"{"weight":70.5}"#
        );
    }

    #[test]
    fn test_daily_log_defaults() {
        let log: DailyLog = serde_json::from_str(r#"{"date":"2024-05-01"}"#).unwrap();
        assert_eq!(log.date, NaiveDate::from_ymd_opt(2024, 5, 1));
        assert!(log.food_items.is_empty());
        assert_eq!(log.total_calories, 0.0);
    }

    #[test]
    fn test_ai_stats_keeps_unknown_fields() {
        let stats: AiStats =
            serde_json::from_str(r#"{"total_analyses":3,"monthly_budget":5.0}"#).unwrap();
        assert_eq!(stats.total_analyses, 3);
        assert!(stats.extra.contains_key("monthly_budget"));
    }

    #[test]
    fn test_error_body_precedence() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"error":"Invalid credentials","detail":"x"}"#).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("Invalid credentials"));

        let body: ErrorBody = serde_json::from_str(r#"{"detail":"Not found."}"#).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("Not found."));

        let body: ErrorBody = serde_json::from_str(r#"{"error":""}"#).unwrap();
        assert_eq!(body.into_message(), None);
    }
}
