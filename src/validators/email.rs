use std::sync::LazyLock;

use regex::Regex;

use super::ValidationError;

static EMAIL_REGEX: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

/// Non-empty, at most 254 characters, `local@domain.tld` shape.
/// Surrounding whitespace is ignored.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required);
    }

    if email.len() > 254 {
        return Err(ValidationError::EmailTooLong);
    }

    let matches = EMAIL_REGEX
        .as_ref()
        .is_some_and(|regex| regex.is_match(email));
    if !matches {
        return Err(ValidationError::EmailInvalidFormat);
    }

    Ok(())
}
