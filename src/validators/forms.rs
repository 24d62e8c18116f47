//! Login and registration forms.

use crate::api::{LoginRequest, RegisterRequest};
use crate::SecretString;

use super::{
    validate_email, validate_name, validate_password_confirmation, FieldErrors, PasswordPolicy,
};

/// Raw contents of the login screen.
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: SecretString,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<SecretString>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Validates every field and builds the request body. The email is
    /// sent trimmed.
    pub fn validate(&self) -> Result<LoginRequest, FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check("email", validate_email(&self.email));
        errors.check(
            "password",
            PasswordPolicy::login().validate(self.password.expose_secret()),
        );
        errors.into_result()?;

        Ok(LoginRequest {
            email: self.email.trim().to_owned(),
            password: self.password.clone(),
        })
    }
}

/// Raw contents of the registration screen. Field names follow the
/// backend's (`password1` / `password2`).
#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub email: String,
    pub password1: SecretString,
    pub password2: SecretString,
    pub first_name: String,
    pub last_name: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<RegisterRequest, FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check("first_name", validate_name(&self.first_name));
        errors.check("last_name", validate_name(&self.last_name));
        errors.check("email", validate_email(&self.email));
        errors.check(
            "password1",
            PasswordPolicy::registration().validate(self.password1.expose_secret()),
        );
        errors.check(
            "password2",
            validate_password_confirmation(
                self.password1.expose_secret(),
                self.password2.expose_secret(),
            ),
        );
        errors.into_result()?;

        Ok(RegisterRequest {
            email: self.email.trim().to_owned(),
            password1: self.password1.clone(),
            password2: self.password2.clone(),
            first_name: self.first_name.trim().to_owned(),
            last_name: self.last_name.trim().to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ValidationError;

    fn register_form() -> RegisterForm {
        RegisterForm {
            email: "ana@example.com".to_owned(),
            password1: "Secret123".into(),
            password2: "Secret123".into(),
            first_name: " Ana ".to_owned(),
            last_name: "Silva".to_owned(),
        }
    }

    #[test]
    fn test_login_form_valid() {
        let request = LoginForm::new(" ana@example.com ", "secret")
            .validate()
            .unwrap();
        assert_eq!(request.email, "ana@example.com");
        assert_eq!(request.password.expose_secret(), "secret");
    }

    #[test]
    fn test_login_form_reports_each_field() {
        let errors = LoginForm::new("bad", "123").validate().unwrap_err();
        assert_eq!(errors.get("email"), Some(&ValidationError::EmailInvalidFormat));
        assert_eq!(
            errors.get("password"),
            Some(&ValidationError::PasswordTooShort(6))
        );
    }

    #[test]
    fn test_register_form_valid_trims_names() {
        let request = register_form().validate().unwrap();
        assert_eq!(request.first_name, "Ana");
        assert_eq!(request.last_name, "Silva");
    }

    #[test]
    fn test_register_form_mismatch() {
        let form = RegisterForm {
            password2: "Secret124".into(),
            ..register_form()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("password2"), Some(&ValidationError::PasswordMismatch));
    }

    #[test]
    fn test_register_form_weak_password_and_missing_name() {
        let form = RegisterForm {
            password1: "secret12".into(),
            password2: "secret12".into(),
            last_name: String::new(),
            ..register_form()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.get("password1"),
            Some(&ValidationError::PasswordMissingUppercase)
        );
        assert_eq!(errors.get("last_name"), Some(&ValidationError::Required));
        assert!(!errors.contains("password2"));
    }
}
