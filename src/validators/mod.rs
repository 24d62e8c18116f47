//! Input validation, run before anything is sent to the backend.
//!
//! Single-value rules return a [`ValidationError`]; forms collect them per
//! field into [`FieldErrors`], keeping the first failure of each field.

pub mod email;
pub mod forms;
pub mod name;
pub mod onboarding;
pub mod password;
pub mod profile;

use std::collections::BTreeMap;
use std::fmt;

pub use email::validate_email;
pub use forms::{LoginForm, RegisterForm};
pub use name::validate_name;
pub use onboarding::{OnboardingFlow, OnboardingForm, OnboardingStep, OnboardingSubmission};
pub use password::{validate_password_confirmation, PasswordPolicy};
pub use profile::{
    validate_activity_level, validate_age, validate_profile_update, validate_quick_log,
    ACTIVITY_LEVELS,
};

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    Required,
    EmailTooLong,
    EmailInvalidFormat,
    PasswordTooShort(usize),
    PasswordTooLong(usize),
    PasswordMissingUppercase,
    PasswordMissingLowercase,
    PasswordMissingDigit,
    PasswordMismatch,
    NameTooLong,
    MustBePositive,
    AgeOutOfRange,
    InvalidChoice,
    InvalidDate,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => write!(f, "This field is required"),
            Self::EmailTooLong => write!(f, "Email is too long (max 254 characters)"),
            Self::EmailInvalidFormat => write!(f, "Invalid email format"),
            Self::PasswordTooShort(min) => {
                write!(f, "Password must be at least {min} characters")
            }
            Self::PasswordTooLong(max) => {
                write!(f, "Password is too long (max {max} characters)")
            }
            Self::PasswordMissingUppercase => {
                write!(f, "Password must contain at least one uppercase letter")
            }
            Self::PasswordMissingLowercase => {
                write!(f, "Password must contain at least one lowercase letter")
            }
            Self::PasswordMissingDigit => write!(f, "Password must contain at least one digit"),
            Self::PasswordMismatch => write!(f, "Passwords do not match"),
            Self::NameTooLong => write!(f, "Name is too long (max 100 characters)"),
            Self::MustBePositive => write!(f, "Must be a number greater than zero"),
            Self::AgeOutOfRange => write!(f, "Age must be between 1 and 120"),
            Self::InvalidChoice => write!(f, "Please select one of the options"),
            Self::InvalidDate => write!(f, "Date must be in YYYY-MM-DD format"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Per-field validation failures, keyed by the field's wire name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors(BTreeMap<String, ValidationError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: impl Into<String>, error: ValidationError) -> Self {
        let mut errors = Self::new();
        errors.insert(field, error);
        errors
    }

    /// Records `error` unless `field` already failed.
    pub fn insert(&mut self, field: impl Into<String>, error: ValidationError) {
        self.0.entry(field.into()).or_insert(error);
    }

    /// Records the error of `result`, if any.
    pub fn check(&mut self, field: &str, result: Result<(), ValidationError>) {
        if let Err(error) = result {
            self.insert(field, error);
        }
    }

    pub fn merge(&mut self, other: FieldErrors) {
        for (field, error) in other.0 {
            self.insert(field, error);
        }
    }

    pub fn get(&self, field: &str) -> Option<&ValidationError> {
        self.0.get(field)
    }

    /// Message to show under `field`.
    pub fn message(&self, field: &str) -> Option<String> {
        self.get(field).map(ToString::to_string)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ValidationError)> {
        self.0.iter().map(|(field, error)| (field.as_str(), error))
    }

    /// `Ok` when nothing failed.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, error)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}
