//! Account credential validation

use super::validation::check_max_chars;
use super::ValidationError;

/// Maximum length for usernames
const MAX_USERNAME_LEN: usize = 150;

/// Minimum length for passwords
const MIN_PASSWORD_LEN: usize = 6;

/// Validated username
///
/// Letters, digits and `@.+-_` only, like most account systems accept.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    /// # Example
    /// ```
    /// use geopin_server::models::Username;
    ///
    /// assert!(Username::new("alice.b+geo").is_ok());
    /// assert!(Username::new("no spaces").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "username" });
        }
        check_max_chars(s, "username", MAX_USERNAME_LEN)?;

        let valid = s
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'));
        if !valid {
            return Err(ValidationError::InvalidFormat {
                field: "username",
                reason: "only letters, digits and @/./+/-/_ are allowed",
            });
        }

        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validated plaintext password; never logged or serialized
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        if s.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::TooShort {
                field: "password",
                min: MIN_PASSWORD_LEN,
            });
        }
        Ok(Self(s.to_owned()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_rules() {
        assert!(Username::new("user_1").is_ok());
        assert!(Username::new("").is_err());
        assert!(Username::new(&"u".repeat(151)).is_err());
        assert!(matches!(
            Username::new("bad/name").unwrap_err(),
            ValidationError::InvalidFormat { .. }
        ));
    }

    #[test]
    fn password_min_length() {
        assert!(Password::new("secret").is_ok());
        assert!(matches!(
            Password::new("12345").unwrap_err(),
            ValidationError::TooShort { min: 6, .. }
        ));
    }

    #[test]
    fn password_debug_is_redacted() {
        let p = Password::new("hunter22").unwrap();
        assert!(!format!("{p:?}").contains("hunter22"));
    }
}
