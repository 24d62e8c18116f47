//! Persisted key names and the envelope stored under the state keys.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::ClientError;

/// Raw `{"access": .., "refresh": ..}` blob read by the request executor.
pub const AUTH_TOKENS: &str = "auth_tokens";

/// Session snapshot: user, tokens and the authenticated flag.
pub const AUTH_SESSION: &str = "auth-storage";

/// Nutrition store snapshot: profile, fitness goal, targets.
pub const NUTRITION: &str = "nutrition-storage";

/// App state snapshot: the onboarding-completed flag.
pub const APP_STATE: &str = "app-storage";

/// Keys removed by a logout.
pub const LOGOUT_KEYS: [&str; 3] = [AUTH_TOKENS, NUTRITION, APP_STATE];

/// Envelope written under the state keys, `{"state": .., "version": 0}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persisted<T> {
    pub state: T,
    #[serde(default)]
    pub version: u32,
}

impl<T> Persisted<T> {
    pub const VERSION: u32 = 0;

    pub fn new(state: T) -> Self {
        Self {
            state,
            version: Self::VERSION,
        }
    }
}

impl<T: Serialize> Persisted<T> {
    pub fn to_json(&self) -> Result<String, ClientError> {
        serde_json::to_string(self)
            .map_err(|e| ClientError::Storage(format!("Failed to serialize state: {e}")))
    }
}

impl<T: DeserializeOwned> Persisted<T> {
    /// Parses an envelope. Corrupt blobs are treated as absent.
    pub fn from_json(raw: &str) -> Option<Self> {
        match serde_json::from_str(raw) {
            Ok(envelope) => Some(envelope),
            Err(e) => {
                log::warn!(
                    target: "nutritrack",
                    "msg=\"ignoring unreadable persisted state\" error=\"{e}\""
                );
                None
            }
        }
    }
}
