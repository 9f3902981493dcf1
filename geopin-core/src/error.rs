//! Errors raised while turning raw request input into core queries.
//!
//! The display string of every variant is the message returned to HTTP
//! clients, so it must stay stable.

use thiserror::Error;

/// Detail message for any malformed radius search.
pub const SEARCH_PARAMS_REQUIRED: &str = "latitude, longitude and radius are required";

/// Radius search parameter failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchParamsError {
    /// A required parameter was absent
    #[error("latitude, longitude and radius are required")]
    Missing { param: &'static str },

    /// A parameter was present but not a finite decimal number
    #[error("latitude, longitude and radius are required")]
    NotANumber { param: &'static str, value: String },

    /// The query string itself could not be decoded
    #[error("latitude, longitude and radius are required")]
    Undecodable { reason: String },
}

impl SearchParamsError {
    /// Name of the offending query parameter, if a single one is at fault.
    pub fn param(&self) -> Option<&'static str> {
        match self {
            Self::Missing { param } | Self::NotANumber { param, .. } => Some(param),
            Self::Undecodable { .. } => None,
        }
    }
}
