use super::ValidationError;

/// Required after trimming, at most 100 characters.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::Required);
    }

    if trimmed.chars().count() > 100 {
        return Err(ValidationError::NameTooLong);
    }

    Ok(())
}
