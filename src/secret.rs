//! Wrapper for credentials that must never reach the logs.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A credential (access token, refresh token, password) that redacts itself
/// in `Debug` and `Display` output.
///
/// Serialization writes the raw value: tokens have to reach the persisted
/// `auth_tokens` blob and passwords have to reach the login request body.
///
/// ```rust
/// use nutritrack::SecretString;
///
/// let access = SecretString::new("eyJhbGciOi");
/// assert_eq!(format!("{access:?}"), "SecretString([REDACTED])");
/// assert_eq!(access.expose_secret(), "eyJhbGciOi");
/// ```
#[derive(Clone, Default)]
pub struct SecretString(String);

impl SecretString {
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Returns the raw value. Only call this where the value leaves the
    /// process on purpose (headers, request bodies, storage).
    #[must_use]
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretString([REDACTED])")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl PartialEq for SecretString {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for SecretString {}

impl Serialize for SecretString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for SecretString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretString)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redacted_output() {
        let token = SecretString::new("access-token");
        assert_eq!(format!("{token:?}"), "SecretString([REDACTED])");
        assert_eq!(format!("{token}"), "[REDACTED]");
    }

    #[test]
    fn test_serializes_raw_value() {
        let token = SecretString::new("access-token");
        assert_eq!(serde_json::to_string(&token).unwrap(), "\"access-token\"");

        let restored: SecretString = serde_json::from_str("\"access-token\"").unwrap();
        assert_eq!(restored, token);
    }

    #[test]
    fn test_empty() {
        assert!(SecretString::default().is_empty());
        assert!(!SecretString::from("x").is_empty());
    }
}
