//! API error types with IntoResponse
//!
//! Errors are converted to JSON responses `{"error": <code>, "detail": <message>}`
//! with appropriate status codes.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use geopin_core::SearchParamsError;
use serde_json::json;

use crate::db::DbError;
use crate::models::ValidationError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Body field failed validation (400)
    Validation(ValidationError),

    /// Radius search parameters missing or malformed (400)
    SearchParams(SearchParamsError),

    /// Body is not the JSON we expect (400)
    MalformedBody { message: String },

    /// No or bad credentials (401)
    Unauthorized { reason: &'static str },

    /// Authenticated, but not the owner (403)
    Forbidden { reason: &'static str },

    /// Resource not found (404)
    NotFound { resource: &'static str, id: String },

    /// Database error (500, logged)
    Database(DbError),

    /// Internal error (500, logged)
    Internal { message: String },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::SearchParams(_) | Self::MalformedBody { .. } => {
                StatusCode::BAD_REQUEST
            }
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Database(_) | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::Validation(e) => json!({
                "error": "validation_error",
                "detail": e.to_string(),
                "field": e.field(),
            }),
            Self::SearchParams(e) => {
                tracing::debug!(param = ?e.param(), error = ?e, "rejected radius search");
                json!({
                    "error": "validation_error",
                    "detail": e.to_string(),
                })
            }
            Self::MalformedBody { message } => json!({
                "error": "malformed_body",
                "detail": message,
            }),
            Self::Unauthorized { reason } => json!({
                "error": "unauthorized",
                "detail": reason,
            }),
            Self::Forbidden { reason } => json!({
                "error": "forbidden",
                "detail": reason,
            }),
            Self::NotFound { resource, id } => json!({
                "error": "not_found",
                "detail": format!("{} '{}' not found", resource, id),
            }),
            Self::Database(e) => {
                // Log the actual error, return generic message
                tracing::error!("Database error: {}", e);
                json!({
                    "error": "internal_error",
                    "detail": "an internal error occurred",
                })
            }
            Self::Internal { message } => {
                tracing::error!("Internal error: {}", message);
                json!({
                    "error": "internal_error",
                    "detail": "an internal error occurred",
                })
            }
        };

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Token"));
        }
        response
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<SearchParamsError> for ApiError {
    fn from(e: SearchParamsError) -> Self {
        Self::SearchParams(e)
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound { resource, id } => Self::NotFound { resource, id },
            DbError::Conflict { field, .. } => Self::Validation(ValidationError::Taken { field }),
            DbError::Sqlx(_) => Self::Database(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn validation_error_is_400() {
        let err = ApiError::Validation(ValidationError::Empty { field: "name" });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["field"], "name");
    }

    #[tokio::test]
    async fn search_params_error_has_exact_detail() {
        let err = ApiError::from(SearchParamsError::Missing { param: "radius" });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["detail"], "latitude, longitude and radius are required");
    }

    #[tokio::test]
    async fn unauthorized_sets_challenge_header() {
        let response = ApiError::Unauthorized {
            reason: "Invalid credentials",
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "Token");
    }

    #[tokio::test]
    async fn not_found_is_404() {
        let err = ApiError::from(DbError::NotFound {
            resource: "point",
            id: "7".into(),
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn forbidden_is_403() {
        let err = ApiError::Forbidden {
            reason: "not the owner",
        };
        assert_eq!(err.into_response().status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn conflict_becomes_validation() {
        let err = ApiError::from(DbError::Conflict {
            resource: "user",
            field: "username",
        });
        assert!(matches!(err, ApiError::Validation(ValidationError::Taken { field: "username" })));
    }

    #[tokio::test]
    async fn database_error_is_500_without_leaking() {
        let err = ApiError::from(DbError::Sqlx(sqlx::Error::PoolTimedOut));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["detail"], "an internal error occurred");
    }
}
