use super::ValidationError;

/// Password rules.
///
/// # Examples
///
/// ```
/// use nutritrack::validators::PasswordPolicy;
///
/// // Sign-in only checks a minimum length
/// let login = PasswordPolicy::login();
/// assert!(login.validate("secret").is_ok());
///
/// // New accounts need 8+ characters with upper, lower and a digit
/// let registration = PasswordPolicy::registration();
/// assert!(registration.validate("Secret123").is_ok());
/// assert!(registration.validate("secret123").is_err());
/// ```
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordPolicy {
    /// Minimum password length (default: 8)
    pub min_length: usize,
    /// Maximum password length (default: 128)
    pub max_length: usize,
    /// Require at least one uppercase letter
    pub require_uppercase: bool,
    /// Require at least one lowercase letter
    pub require_lowercase: bool,
    /// Require at least one digit
    pub require_digit: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            max_length: 128,
            require_uppercase: false,
            require_lowercase: false,
            require_digit: false,
        }
    }
}

impl PasswordPolicy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Policy applied on the login form: at least 6 characters.
    #[must_use]
    pub fn login() -> Self {
        Self::default().min(6)
    }

    /// Policy applied on registration: at least 8 characters, one
    /// uppercase letter, one lowercase letter and one digit.
    #[must_use]
    pub fn registration() -> Self {
        Self::default()
            .require_uppercase()
            .require_lowercase()
            .require_digit()
    }

    /// Sets the minimum password length.
    #[must_use]
    pub fn min(mut self, len: usize) -> Self {
        self.min_length = len;
        self
    }

    /// Sets the maximum password length.
    #[must_use]
    pub fn max(mut self, len: usize) -> Self {
        self.max_length = len;
        self
    }

    #[must_use]
    pub fn require_uppercase(mut self) -> Self {
        self.require_uppercase = true;
        self
    }

    #[must_use]
    pub fn require_lowercase(mut self) -> Self {
        self.require_lowercase = true;
        self
    }

    #[must_use]
    pub fn require_digit(mut self) -> Self {
        self.require_digit = true;
        self
    }

    /// Validates a password against this policy, reporting the first rule
    /// it breaks.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` if the password doesn't meet the policy requirements.
    pub fn validate(&self, password: &str) -> Result<(), ValidationError> {
        if password.is_empty() {
            return Err(ValidationError::Required);
        }

        let length = password.chars().count();
        if length < self.min_length {
            return Err(ValidationError::PasswordTooShort(self.min_length));
        }

        if length > self.max_length {
            return Err(ValidationError::PasswordTooLong(self.max_length));
        }

        if self.require_uppercase && !password.chars().any(char::is_uppercase) {
            return Err(ValidationError::PasswordMissingUppercase);
        }

        if self.require_lowercase && !password.chars().any(char::is_lowercase) {
            return Err(ValidationError::PasswordMissingLowercase);
        }

        if self.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(ValidationError::PasswordMissingDigit);
        }

        Ok(())
    }
}

/// The confirmation field must be filled in and equal the password.
pub fn validate_password_confirmation(
    password: &str,
    confirmation: &str,
) -> Result<(), ValidationError> {
    if confirmation.is_empty() {
        return Err(ValidationError::Required);
    }
    if password != confirmation {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_policy() {
        let policy = PasswordPolicy::login();
        assert_eq!(policy.validate("").unwrap_err(), ValidationError::Required);
        assert_eq!(
            policy.validate("12345").unwrap_err(),
            ValidationError::PasswordTooShort(6)
        );
        assert!(policy.validate("123456").is_ok());
    }

    #[test]
    fn test_registration_policy() {
        let policy = PasswordPolicy::registration();
        assert_eq!(
            policy.validate("Ab1").unwrap_err(),
            ValidationError::PasswordTooShort(8)
        );
        assert_eq!(
            policy.validate("abcdefg1").unwrap_err(),
            ValidationError::PasswordMissingUppercase
        );
        assert_eq!(
            policy.validate("ABCDEFG1").unwrap_err(),
            ValidationError::PasswordMissingLowercase
        );
        assert_eq!(
            policy.validate("Abcdefgh").unwrap_err(),
            ValidationError::PasswordMissingDigit
        );
        assert!(policy.validate("Abcdefg1").is_ok());
    }

    #[test]
    fn test_too_long() {
        let policy = PasswordPolicy::default().max(10);
        assert_eq!(
            policy.validate("12345678901").unwrap_err(),
            ValidationError::PasswordTooLong(10)
        );
    }

    #[test]
    fn test_confirmation() {
        assert_eq!(
            validate_password_confirmation("Secret123", "").unwrap_err(),
            ValidationError::Required
        );
        assert_eq!(
            validate_password_confirmation("Secret123", "Secret124").unwrap_err(),
            ValidationError::PasswordMismatch
        );
        assert!(validate_password_confirmation("Secret123", "Secret123").is_ok());
    }
}
