use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::endpoints;
use super::types::ErrorBody;
use super::{
    AiStats, AnalyzeImageRequest, AnalyzeImageResponse, AuthResponse, AuthTokens,
    CalculateTargetsRequest, CreateGoalRequest, DailyLog, FitnessGoal, FoodSearchRequest,
    FoodSearchResponse, GoalType, LoginRequest, NutritionApi, NutritionSummary,
    NutritionTargets, ProfileUpdateRequest, QuickLogRequest, QuickLogResponse,
    RegisterRequest, ScannedFoodsResponse, User, UserProfile,
};
use crate::config::ApiConfig;
use crate::storage::{keys, KeyValueStore};
use crate::{ClientError, SecretString};

/// A single call to the backend.
///
/// ```rust
/// use nutritrack::api::ApiRequest;
///
/// let request = ApiRequest::get("/tracking/logs/by-date/")
///     .query("date", "2024-05-01")
///     .header("Accept-Language", "pt-PT");
/// assert_eq!(request.endpoint(), "/tracking/logs/by-date/");
/// ```
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    endpoint: String,
    body: Option<String>,
    headers: Vec<(String, String)>,
    query: Vec<(String, String)>,
    authorized: bool,
}

impl ApiRequest {
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            body: None,
            headers: Vec::new(),
            query: Vec::new(),
            authorized: true,
        }
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(Method::GET, endpoint)
    }

    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(Method::POST, endpoint)
    }

    pub fn put(endpoint: impl Into<String>) -> Self {
        Self::new(Method::PUT, endpoint)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Serializes `body` as the JSON request body.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ClientError> {
        let encoded = serde_json::to_string(body)
            .map_err(|e| ClientError::Parse(format!("Failed to encode request body: {e}")))?;
        self.body = Some(encoded);
        Ok(self)
    }

    /// Overrides a default header. `Authorization` cannot be overridden.
    /// An invalid name or value fails the call with
    /// [`ClientError::InvalidRequest`] before anything is sent.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Sends the request without a bearer token (login, registration).
    pub fn without_auth(mut self) -> Self {
        self.authorized = false;
        self
    }
}

/// HTTP implementation of [`NutritionApi`].
///
/// The access token is re-read from the `auth_tokens` key on every call, so
/// a login or logout is picked up by the next request without rebuilding
/// the client. The configured timeout bounds the whole exchange; on expiry
/// the request future is dropped, which closes the connection.
///
/// ```rust,no_run
/// use std::sync::Arc;
///
/// use nutritrack::api::{ApiClient, NutritionApi};
/// use nutritrack::config::ApiConfig;
/// use nutritrack::InMemoryKeyValueStore;
///
/// # async fn run() -> Result<(), nutritrack::ClientError> {
/// let storage = Arc::new(InMemoryKeyValueStore::new());
/// let api = ApiClient::new(&ApiConfig::default(), storage)?;
/// let log = api.today_log().await?;
/// println!("{} kcal so far", log.total_calories);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ApiClient<S> {
    http: reqwest::Client,
    base_url: String,
    storage: S,
}

impl<S: KeyValueStore> ApiClient<S> {
    pub fn new(config: &ApiConfig, storage: S) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ClientError::Network(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            storage,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends `request` and parses a 2xx body as `T`.
    pub async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ClientError> {
        let endpoint = request.endpoint.clone();
        let body = self.execute(request).await?;

        serde_json::from_slice(&body).map_err(|e| {
            log::warn!(
                target: "nutritrack",
                "msg=\"response did not match schema\" endpoint={endpoint} error=\"{e}\""
            );
            ClientError::Parse(format!("{endpoint}: {e}"))
        })
    }

    /// Sends `request` and discards the body of a 2xx response.
    pub async fn send_empty(&self, request: ApiRequest) -> Result<(), ClientError> {
        self.execute(request).await.map(|_| ())
    }

    async fn execute(&self, request: ApiRequest) -> Result<Vec<u8>, ClientError> {
        let url = format!("{}{}", self.base_url, request.endpoint);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (name, value) in &request.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ClientError::InvalidRequest(format!("header name {name}: {e}")))?;
            if name == AUTHORIZATION {
                continue;
            }
            let value = HeaderValue::from_str(value)
                .map_err(|e| ClientError::InvalidRequest(format!("header value: {e}")))?;
            headers.insert(name, value);
        }

        if request.authorized {
            if let Some(access) = self.access_token().await {
                let mut value = HeaderValue::from_str(&format!("Bearer {}", access.expose_secret()))
                    .map_err(|e| ClientError::InvalidRequest(format!("stored access token: {e}")))?;
                value.set_sensitive(true);
                headers.insert(AUTHORIZATION, value);
            }
        }

        let mut builder = self
            .http
            .request(request.method.clone(), &url)
            .headers(headers);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        log::debug!(
            target: "nutritrack",
            "msg=\"sending request\" method={} endpoint={}",
            request.method,
            request.endpoint
        );

        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(transport_error)?;

        if status.is_success() {
            return Ok(body.to_vec());
        }

        let message = serde_json::from_slice::<ErrorBody>(&body)
            .ok()
            .and_then(ErrorBody::into_message)
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));

        log::debug!(
            target: "nutritrack",
            "msg=\"request failed\" endpoint={} status={}",
            request.endpoint,
            status.as_u16()
        );

        Err(ClientError::Http {
            status: status.as_u16(),
            message,
        })
    }

    async fn access_token(&self) -> Option<SecretString> {
        let raw = match self.storage.get_item(keys::AUTH_TOKENS).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                log::warn!(
                    target: "nutritrack",
                    "msg=\"could not read stored tokens\" error=\"{e}\""
                );
                return None;
            }
        };

        match serde_json::from_str::<AuthTokens>(&raw) {
            Ok(tokens) if !tokens.access.is_empty() => Some(tokens.access),
            Ok(_) => None,
            Err(e) => {
                log::warn!(
                    target: "nutritrack",
                    "msg=\"stored tokens are unreadable\" error=\"{e}\""
                );
                None
            }
        }
    }

    async fn authenticate(&self, request: ApiRequest) -> Result<(User, AuthTokens), ClientError> {
        let response: AuthResponse = self.send(request.without_auth()).await?;
        Ok(response.into_parts())
    }
}

fn transport_error(e: reqwest::Error) -> ClientError {
    if e.is_timeout() {
        ClientError::Timeout
    } else {
        ClientError::Network(e.to_string())
    }
}

#[async_trait]
impl<S: KeyValueStore> NutritionApi for ApiClient<S> {
    async fn login(&self, request: &LoginRequest) -> Result<(User, AuthTokens), ClientError> {
        self.authenticate(ApiRequest::post(endpoints::LOGIN).json(request)?)
            .await
    }

    async fn register(
        &self,
        request: &RegisterRequest,
    ) -> Result<(User, AuthTokens), ClientError> {
        self.authenticate(ApiRequest::post(endpoints::REGISTER).json(request)?)
            .await
    }

    async fn logout(&self) -> Result<(), ClientError> {
        self.send_empty(ApiRequest::post(endpoints::LOGOUT)).await
    }

    async fn current_user(&self) -> Result<User, ClientError> {
        self.send(ApiRequest::get(endpoints::CURRENT_USER)).await
    }

    async fn user_profile(&self) -> Result<UserProfile, ClientError> {
        self.send(ApiRequest::get(endpoints::PROFILE)).await
    }

    async fn update_user_profile(
        &self,
        request: &ProfileUpdateRequest,
    ) -> Result<UserProfile, ClientError> {
        self.send(ApiRequest::put(endpoints::PROFILE).json(request)?)
            .await
    }

    async fn create_fitness_goal(&self, goal_type: GoalType) -> Result<FitnessGoal, ClientError> {
        let body = CreateGoalRequest { goal_type };
        self.send(ApiRequest::post(endpoints::GOALS).json(&body)?)
            .await
    }

    async fn active_fitness_goal(&self) -> Result<FitnessGoal, ClientError> {
        self.send(ApiRequest::get(endpoints::ACTIVE_GOAL)).await
    }

    async fn today_targets(&self) -> Result<NutritionTargets, ClientError> {
        self.send(ApiRequest::get(endpoints::TODAY_TARGETS)).await
    }

    async fn calculate_targets(
        &self,
        request: &CalculateTargetsRequest,
    ) -> Result<NutritionTargets, ClientError> {
        self.send(ApiRequest::post(endpoints::CALCULATE_TARGETS).json(request)?)
            .await
    }

    async fn search_foods(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<FoodSearchResponse, ClientError> {
        let body = FoodSearchRequest {
            query: query.to_owned(),
            limit,
        };
        self.send(ApiRequest::post(endpoints::FOOD_SEARCH).json(&body)?)
            .await
    }

    async fn scanned_foods(&self, limit: u32) -> Result<ScannedFoodsResponse, ClientError> {
        self.send(ApiRequest::get(endpoints::SCANNED_FOODS).query("limit", limit.to_string()))
            .await
    }

    async fn analyze_image(
        &self,
        request: &AnalyzeImageRequest,
    ) -> Result<AnalyzeImageResponse, ClientError> {
        self.send(ApiRequest::post(endpoints::ANALYZE_IMAGE).json(request)?)
            .await
    }

    async fn ai_stats(&self) -> Result<AiStats, ClientError> {
        self.send(ApiRequest::get(endpoints::AI_STATS)).await
    }

    async fn today_log(&self) -> Result<DailyLog, ClientError> {
        self.send(ApiRequest::get(endpoints::TODAY_LOG)).await
    }

    async fn log_by_date(&self, date: NaiveDate) -> Result<DailyLog, ClientError> {
        let date = date.format("%Y-%m-%d").to_string();
        self.send(ApiRequest::get(endpoints::LOG_BY_DATE).query("date", date))
            .await
    }

    async fn quick_log_food(
        &self,
        request: &QuickLogRequest,
    ) -> Result<QuickLogResponse, ClientError> {
        self.send(ApiRequest::post(endpoints::QUICK_LOG).json(request)?)
            .await
    }

    async fn nutrition_summary(&self) -> Result<NutritionSummary, ClientError> {
        self.send(ApiRequest::get(endpoints::SUMMARY)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults_to_authorized() {
        let request = ApiRequest::get(endpoints::TODAY_LOG);
        assert!(request.authorized);
        assert!(!request.without_auth().authorized);
    }

    #[test]
    fn test_request_json_body() {
        let request = ApiRequest::post(endpoints::GOALS)
            .json(&CreateGoalRequest {
                goal_type: GoalType::MuscleGain,
            })
            .unwrap();
        assert_eq!(request.body.as_deref(), Some(r#"{"goal_type":"muscle_gain"}"#));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = ApiConfig {
            base_url: "http://localhost:8000/api/".to_owned(),
            ..Default::default()
        };
        let client = ApiClient::new(&config, crate::InMemoryKeyValueStore::new()).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000/api");
    }

    #[tokio::test]
    async fn test_access_token_from_storage() {
        let storage = crate::InMemoryKeyValueStore::new();
        let client = ApiClient::new(&ApiConfig::default(), storage.clone()).unwrap();
        assert!(client.access_token().await.is_none());

        storage
            .set_item(keys::AUTH_TOKENS, r#"{"access":"abc","refresh":"def"}"#)
            .await
            .unwrap();
        assert_eq!(
            client.access_token().await.map(|t| t.expose_secret().to_owned()),
            Some("abc".to_owned())
        );

        storage
            .set_item(keys::AUTH_TOKENS, "not json")
            .await
            .unwrap();
        assert!(client.access_token().await.is_none());

        storage
            .set_item(keys::AUTH_TOKENS, r#"{"access":""}"#)
            .await
            .unwrap();
        assert!(client.access_token().await.is_none());
    }
}
