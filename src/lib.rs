//! Client core for the NutriTrack nutrition-tracking app.
//!
//! The crate covers everything between the screens and the backend API:
//! the persisted session, the authorized request executor, the query cache
//! with its invalidation wiring, the startup bootstrap and the navigation
//! decision. All nutrition math and food recognition happen server side.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use nutritrack::config::ClientConfig;
//! use nutritrack::storage::FileKeyValueStore;
//! use nutritrack::AppContext;
//!
//! # async fn run() -> Result<(), nutritrack::ClientError> {
//! let storage = Arc::new(FileKeyValueStore::new("/var/lib/nutritrack")?);
//! let ctx = AppContext::create(ClientConfig::from_env(), storage)?;
//!
//! ctx.bootstrap().await;
//! println!("{:?}", ctx.route());
//! # Ok(())
//! # }
//! ```

pub mod actions;
pub mod api;
pub mod config;
pub mod context;
pub mod events;
pub mod query;
pub mod router;
mod secret;
pub mod session;
pub mod state;
pub mod storage;
pub mod validators;

use std::fmt;

pub use api::{ApiClient, NutritionApi};
#[cfg(any(test, feature = "mocks"))]
pub use api::MockNutritionApi;
pub use context::AppContext;
pub use query::{QueryCache, QueryKey};
pub use router::{Route, Screen};
pub use secret::SecretString;
pub use session::{Session, SessionStore};
pub use storage::{FileKeyValueStore, InMemoryKeyValueStore, KeyValueStore};
pub use validators::{FieldErrors, ValidationError};

/// Errors surfaced by the client core.
///
/// Network failures and timeouts carry only a message; HTTP failures also
/// carry the status code. Callers showing an error to the user should use
/// [`ClientError::message`].
#[derive(Debug, Clone, PartialEq)]
pub enum ClientError {
    /// The request did not complete within the configured timeout.
    Timeout,
    /// The request failed before an HTTP status was received.
    Network(String),
    /// The backend answered with a non-success status.
    Http { status: u16, message: String },
    /// A response body did not match its declared schema.
    Parse(String),
    /// The persistent key-value store failed.
    Storage(String),
    /// User input was rejected before any request was sent.
    Validation(FieldErrors),
    /// The request could not be built (bad header name or value); nothing
    /// was sent.
    InvalidRequest(String),
    /// The operation needs an authenticated session.
    NotAuthenticated,
}

impl ClientError {
    /// Returns the HTTP status, if the failure came from an HTTP response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Human-readable message suitable for a blocking dialog.
    pub fn message(&self) -> String {
        match self {
            Self::Http { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// True for `401 Unauthorized`. Access tokens are never refreshed
    /// automatically, so callers react to this by sending the user back to
    /// the login screen.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Whether a read may be retried transparently.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout | Self::Network(_) => true,
            Self::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl std::error::Error for ClientError {}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "Request timed out"),
            Self::Network(msg) => write!(f, "Network error: {msg}"),
            Self::Http { status, message } => write!(f, "HTTP {status}: {message}"),
            Self::Parse(msg) => write!(f, "Unexpected response: {msg}"),
            Self::Storage(msg) => write!(f, "Storage error: {msg}"),
            Self::Validation(errors) => write!(f, "Invalid input: {errors}"),
            Self::InvalidRequest(msg) => write!(f, "Invalid request: {msg}"),
            Self::NotAuthenticated => write!(f, "Not authenticated"),
        }
    }
}

impl From<FieldErrors> for ClientError {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}
