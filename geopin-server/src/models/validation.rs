//! Validation error types

use std::fmt;

use serde::{Deserialize, Deserializer};

/// Validation error for request input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required field absent from the request body
    Missing { field: &'static str },

    /// Field sent as JSON `null` where a value is required
    Null { field: &'static str },

    /// Field is empty when it shouldn't be
    Empty { field: &'static str },

    /// Field exceeds maximum length (in characters)
    TooLong { field: &'static str, max: usize },

    /// Field is shorter than the minimum length (in characters)
    TooShort { field: &'static str, min: usize },

    /// String doesn't match the required format
    InvalidFormat { field: &'static str, reason: &'static str },

    /// Value is already taken by another record
    Taken { field: &'static str },
}

impl ValidationError {
    /// Name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Missing { field }
            | Self::Null { field }
            | Self::Empty { field }
            | Self::TooLong { field, .. }
            | Self::TooShort { field, .. }
            | Self::InvalidFormat { field, .. }
            | Self::Taken { field } => field,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { field } => write!(f, "{} is required", field),
            Self::Null { field } => write!(f, "{} may not be null", field),
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
            Self::TooShort { field, min } => {
                write!(f, "{} must be at least {} characters", field, min)
            }
            Self::InvalidFormat { field, reason } => write!(f, "{}: {}", field, reason),
            Self::Taken { field } => write!(f, "a user with that {} already exists", field),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Require a field that the request body may have omitted.
pub fn required<T>(value: Option<T>, field: &'static str) -> Result<T, ValidationError> {
    value.ok_or(ValidationError::Missing { field })
}

/// Body field that tells an omitted key apart from an explicit `null`.
///
/// Use with `#[serde(default)]` so a missing key becomes `Absent`.
#[derive(Debug, Clone, PartialEq)]
pub enum Field<T> {
    Absent,
    Null,
    Present(T),
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Self::Absent
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Field<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => Self::Present(value),
            None => Self::Null,
        })
    }
}

impl<T> Field<T> {
    /// `None` if omitted; an explicit `null` is a validation error.
    pub fn non_null(self, field: &'static str) -> Result<Option<T>, ValidationError> {
        match self {
            Self::Absent => Ok(None),
            Self::Null => Err(ValidationError::Null { field }),
            Self::Present(value) => Ok(Some(value)),
        }
    }
}

/// Character-count check shared by all bounded text fields.
pub(crate) fn check_max_chars(
    s: &str,
    field: &'static str,
    max: usize,
) -> Result<(), ValidationError> {
    if s.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}
