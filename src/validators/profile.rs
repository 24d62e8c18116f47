use crate::api::{ProfileUpdateRequest, QuickLogRequest};

use super::{validate_name, FieldErrors, ValidationError};

/// Activity multipliers offered during onboarding, sedentary to extra active.
pub const ACTIVITY_LEVELS: [f64; 5] = [1.2, 1.375, 1.55, 1.725, 1.9];

pub const DEFAULT_ACTIVITY_LEVEL: f64 = 1.55;

/// Parses a free-text number that must be greater than zero.
pub fn parse_positive(input: &str) -> Result<f64, ValidationError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ValidationError::Required);
    }
    match input.parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Ok(value),
        _ => Err(ValidationError::MustBePositive),
    }
}

/// Parses a free-text age in whole years.
pub fn parse_age(input: &str) -> Result<u32, ValidationError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ValidationError::Required);
    }
    let age = input
        .parse::<u32>()
        .map_err(|_| ValidationError::AgeOutOfRange)?;
    validate_age(age)?;
    Ok(age)
}

pub fn validate_age(age: u32) -> Result<(), ValidationError> {
    if (1..=120).contains(&age) {
        Ok(())
    } else {
        Err(ValidationError::AgeOutOfRange)
    }
}

pub fn validate_activity_level(level: f64) -> Result<(), ValidationError> {
    if ACTIVITY_LEVELS.iter().any(|known| (known - level).abs() < 1e-9) {
        Ok(())
    } else {
        Err(ValidationError::InvalidChoice)
    }
}

fn positive(value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::MustBePositive)
    }
}

/// Checks the fields that are present; absent fields are left untouched by
/// the backend and are not validated.
pub fn validate_profile_update(request: &ProfileUpdateRequest) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    if let Some(first_name) = &request.first_name {
        errors.check("first_name", validate_name(first_name));
    }
    if let Some(last_name) = &request.last_name {
        errors.check("last_name", validate_name(last_name));
    }
    if let Some(weight) = request.weight {
        errors.check("weight", positive(weight));
    }
    if let Some(height) = request.height {
        errors.check("height", positive(height));
    }
    if let Some(age) = request.age {
        errors.check("age", validate_age(age));
    }
    if let Some(level) = request.activity_level {
        errors.check("activity_level", validate_activity_level(level));
    }

    errors.into_result()
}

/// A quick-log entry needs a positive quantity, a unit, and either a name
/// or a reference to a known or scanned food.
pub fn validate_quick_log(request: &QuickLogRequest) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    errors.check("quantity", positive(request.quantity));
    if request.unit.trim().is_empty() {
        errors.insert("unit", ValidationError::Required);
    }

    let named = request
        .name
        .as_deref()
        .is_some_and(|name| !name.trim().is_empty());
    if !named && request.food_id.is_none() && request.scanned_food_id.is_none() {
        errors.insert("name", ValidationError::Required);
    }

    for (field, value) in [
        ("calories", request.calories),
        ("protein", request.protein),
        ("carbs", request.carbs),
        ("fat", request.fat),
    ] {
        if value.is_some_and(|v| !v.is_finite() || v < 0.0) {
            errors.insert(field, ValidationError::MustBePositive);
        }
    }

    errors.into_result()
}
