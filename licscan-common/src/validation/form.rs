//! Credential form validation
//!
//! Rules are checked top-to-bottom per form; only the first failure is
//! reported so the UI never shows two messages at once.

use serde::Deserialize;
use thiserror::Error;

/// Minimum username length after trimming
pub const USERNAME_MIN_LEN: usize = 4;

/// Maximum username length after trimming
pub const USERNAME_MAX_LEN: usize = 100;

/// Minimum password length
pub const PASSWORD_MIN_LEN: usize = 4;

/// First failing form rule
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Username must be between {} and {} characters.", USERNAME_MIN_LEN, USERNAME_MAX_LEN)]
    UsernameLength,

    #[error("Password must be at least {} characters.", PASSWORD_MIN_LEN)]
    PasswordLength,

    #[error("Passwords do not match.")]
    PasswordMismatch,
}

/// Login form fields
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Registration form fields
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegistrationForm {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

/// Username length must be within `[4, 100]` characters after trimming
pub fn validate_username(username: &str) -> Result<(), FormError> {
    let len = username.trim().chars().count();
    if (USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&len) {
        Ok(())
    } else {
        Err(FormError::UsernameLength)
    }
}

/// Password must have at least 4 characters (not trimmed)
pub fn validate_password(password: &str) -> Result<(), FormError> {
    if password.chars().count() >= PASSWORD_MIN_LEN {
        Ok(())
    } else {
        Err(FormError::PasswordLength)
    }
}

/// Validate the login form: username, then password
pub fn validate_login(form: &LoginForm) -> Result<(), FormError> {
    validate_username(&form.username)?;
    validate_password(&form.password)
}

/// Validate the registration form: username, password, then confirmation
///
/// # Examples
///
/// ```
/// use licscan_common::validation::form::{validate_registration, FormError, RegistrationForm};
///
/// let form = RegistrationForm {
///     username: "abcd".to_string(),
///     password: "password123".to_string(),
///     confirm_password: "password124".to_string(),
/// };
/// assert_eq!(validate_registration(&form), Err(FormError::PasswordMismatch));
/// ```
pub fn validate_registration(form: &RegistrationForm) -> Result<(), FormError> {
    validate_username(&form.username)?;
    validate_password(&form.password)?;
    if form.password != form.confirm_password {
        return Err(FormError::PasswordMismatch);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_length_bounds() {
        assert_eq!(validate_username("abc"), Err(FormError::UsernameLength));
        assert_eq!(validate_username(""), Err(FormError::UsernameLength));
        assert!(validate_username("abcd").is_ok());
        assert!(validate_username(&"a".repeat(100)).is_ok());
        assert_eq!(
            validate_username(&"a".repeat(101)),
            Err(FormError::UsernameLength)
        );
    }

    #[test]
    fn test_username_is_trimmed() {
        // Whitespace does not count toward the minimum
        assert_eq!(validate_username("  abc  "), Err(FormError::UsernameLength));
        assert!(validate_username("  abcd  ").is_ok());
    }

    #[test]
    fn test_password_minimum() {
        assert_eq!(validate_password("abc"), Err(FormError::PasswordLength));
        assert!(validate_password("abcd").is_ok());
        // Not trimmed
        assert!(validate_password("    ").is_ok());
    }

    #[test]
    fn test_login_reports_first_failure_only() {
        let form = LoginForm {
            username: "ab".to_string(),
            password: "x".to_string(),
        };
        assert_eq!(validate_login(&form), Err(FormError::UsernameLength));

        let form = LoginForm {
            username: "abcd".to_string(),
            password: "x".to_string(),
        };
        assert_eq!(validate_login(&form), Err(FormError::PasswordLength));
    }

    #[test]
    fn test_registration_mismatch_even_when_lengths_pass() {
        let form = RegistrationForm {
            username: "abcd".to_string(),
            password: "secret-one".to_string(),
            confirm_password: "secret-two".to_string(),
        };
        assert_eq!(validate_registration(&form), Err(FormError::PasswordMismatch));

        let form = RegistrationForm {
            confirm_password: "secret-one".to_string(),
            ..form
        };
        assert!(validate_registration(&form).is_ok());
    }

    #[test]
    fn test_registration_length_checked_before_mismatch() {
        let form = RegistrationForm {
            username: "abcd".to_string(),
            password: "ab".to_string(),
            confirm_password: "cd".to_string(),
        };
        assert_eq!(validate_registration(&form), Err(FormError::PasswordLength));
    }
}
