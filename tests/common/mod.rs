//! Scriptable fake backend served over real HTTP with axum.

#![allow(dead_code, clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderName, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use nutritrack::config::{ApiConfig, ClientConfig, QueryConfig};
use serde_json::{json, Value};

/// A request as the backend saw it. `path` is relative to the API root.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

impl Recorded {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

#[derive(Debug, Clone)]
struct Canned {
    status: StatusCode,
    body: String,
    delay: Option<Duration>,
}

#[derive(Default)]
struct Script {
    responses: HashMap<String, Canned>,
    requests: Vec<Recorded>,
}

/// Paths without a scripted answer get `404 {"detail": "Not found."}`.
#[derive(Clone, Default)]
pub struct FakeBackend {
    script: Arc<Mutex<Script>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, path: &str, status: u16, body: Value) -> &Self {
        self.respond_raw(path, status, &body.to_string())
    }

    pub fn respond_raw(&self, path: &str, status: u16, body: &str) -> &Self {
        let mut script = self.script.lock().unwrap();
        let delay = script.responses.get(path).and_then(|c| c.delay);
        script.responses.insert(
            path.to_owned(),
            Canned {
                status: StatusCode::from_u16(status).unwrap(),
                body: body.to_owned(),
                delay,
            },
        );
        self
    }

    /// Holds every answer on `path` back for `delay`.
    pub fn delay(&self, path: &str, delay: Duration) -> &Self {
        if let Some(canned) = self.script.lock().unwrap().responses.get_mut(path) {
            canned.delay = Some(delay);
        }
        self
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.script.lock().unwrap().requests.clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }

    pub fn paths(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.path).collect()
    }

    /// Serves on an ephemeral port and returns the API base URL.
    pub async fn serve(&self) -> String {
        let app = Router::new().fallback(handle).with_state(self.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/api")
    }

    /// The usual happy-path answers for Ana's account.
    pub fn with_ana(&self) -> &Self {
        self.respond("/users/auth/login/", 200, auth_response())
            .respond("/users/auth/registration/", 201, auth_response())
            .respond("/users/auth/logout/", 200, json!({"detail": "Successfully logged out."}))
            .respond("/users/me/", 200, ana())
            .respond("/tracking/logs/today/", 200, daily_log(0.0))
            .respond("/tracking/foods/quick-log/", 201, json!({"message": "Food logged successfully"}))
            .respond(
                "/tracking/summary/",
                200,
                json!({"days_logged": 0, "averages": {}, "daily_logs": []}),
            )
            .respond(
                "/nutrition/profile/",
                200,
                json!({"id": 1, "weight": 62.0, "height": 168.0, "age": 31, "gender": "female", "activity_level": 1.55}),
            )
            .respond("/nutrition/targets/today/", 200, targets())
            .respond("/nutrition/targets/calculate/", 201, targets())
            .respond(
                "/nutrition/goals/",
                201,
                json!({"id": 4, "goal_type": "weight_loss", "goal_type_display": "Weight loss", "is_active": true}),
            )
    }
}

async fn handle(
    State(backend): State<FakeBackend>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let path = uri.path().trim_start_matches("/api").to_owned();
    let header = |name: HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
    };

    let canned = {
        let mut script = backend.script.lock().unwrap();
        script.requests.push(Recorded {
            method,
            path: path.clone(),
            query: uri.query().map(str::to_owned),
            authorization: header(AUTHORIZATION),
            content_type: header(CONTENT_TYPE),
            body,
        });
        script.responses.get(&path).cloned()
    };

    let canned = canned.unwrap_or_else(|| Canned {
        status: StatusCode::NOT_FOUND,
        body: json!({"detail": "Not found."}).to_string(),
        delay: None,
    });
    if let Some(delay) = canned.delay {
        tokio::time::sleep(delay).await;
    }

    (
        canned.status,
        [(CONTENT_TYPE, "application/json")],
        canned.body,
    )
        .into_response()
}

pub fn ana() -> Value {
    json!({
        "id": 1,
        "email": "ana@example.com",
        "first_name": "Ana",
        "last_name": "Silva",
        "is_email_verified": true
    })
}

pub fn auth_response() -> Value {
    json!({"user": ana(), "access": "tok-ana", "refresh": "ref-ana"})
}

pub fn daily_log(calories: f64) -> Value {
    json!({
        "id": 9,
        "date": "2024-05-01",
        "total_calories": calories,
        "total_protein": 0.0,
        "total_carbs": 0.0,
        "total_fat": 0.0,
        "food_items": []
    })
}

pub fn targets() -> Value {
    json!({
        "id": 2,
        "date": "2024-05-01",
        "calories": 1850.0,
        "protein": 110.0,
        "carbs": 210.0,
        "fat": 60.0
    })
}

/// Client config for tests: short timeout, fast retries.
pub fn config(base_url: &str) -> ClientConfig {
    ClientConfig {
        api: ApiConfig {
            base_url: base_url.to_owned(),
            request_timeout: Duration::from_secs(2),
        },
        queries: QueryConfig {
            retry_delay: Duration::from_millis(10),
            ..Default::default()
        },
    }
}
