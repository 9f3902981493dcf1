//! Custom Axum extractors
//!
//! Every rejection is an `ApiError`, so clients always get the JSON error
//! shape instead of axum's plain-text defaults.

use std::marker::PhantomData;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;

use super::error::ApiError;
use crate::db::User;
use crate::state::AppState;

/// Authenticated caller, resolved from `Authorization: Token <key>`.
///
/// `Bearer <key>` is accepted as well.
pub struct AuthUser(pub User);

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(ApiError::Unauthorized {
                reason: "Authentication credentials were not provided.",
            })?;

        let key = header
            .to_str()
            .ok()
            .and_then(parse_token_header)
            .ok_or(ApiError::Unauthorized {
                reason: "Invalid token header.",
            })?;

        let user = state
            .store()
            .user_for_token(key)
            .await?
            .ok_or(ApiError::Unauthorized {
                reason: "Invalid token.",
            })?;

        tracing::debug!(user_id = %user.id, "request authenticated");
        Ok(Self(user))
    }
}

/// Pull the key out of `Token <key>` / `Bearer <key>`.
fn parse_token_header(value: &str) -> Option<&str> {
    let (scheme, key) = value.trim().split_once(' ')?;
    let key = key.trim();
    let known = scheme.eq_ignore_ascii_case("token") || scheme.eq_ignore_ascii_case("bearer");
    (known && !key.is_empty() && !key.contains(' ')).then_some(key)
}

/// Integer primary key from the path.
///
/// Anything that is not an integer cannot name a record, so it is a 404
/// rather than a 400.
pub struct PathId(pub i64);

impl<S> FromRequestParts<S> for PathId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::Internal {
                message: format!("path extraction failed: {e}"),
            })?;

        let id = raw.parse::<i64>().map_err(|_| ApiError::NotFound {
            resource: "resource",
            id: raw.clone(),
        })?;

        Ok(Self(id))
    }
}

/// JSON body whose rejection is reported as an `ApiError`.
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e: JsonRejection| ApiError::MalformedBody {
                message: e.body_text(),
            })?;
        Ok(Self(value))
    }
}

/// JSON body that is read eagerly but parsed on demand.
///
/// Update handlers check existence and ownership before they look at the
/// payload, so a malformed body on someone else's object is still a 403.
/// An empty body parses as `{}`.
pub struct DeferredJson<T> {
    bytes: Bytes,
    _target: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> DeferredJson<T> {
    pub fn parse(&self) -> Result<T, ApiError> {
        let raw: &[u8] = if self.bytes.iter().all(u8::is_ascii_whitespace) {
            b"{}"
        } else {
            &self.bytes
        };
        serde_json::from_slice(raw).map_err(|e| ApiError::MalformedBody {
            message: format!("Failed to parse the request body as JSON: {e}"),
        })
    }
}

impl<S, T> FromRequest<S> for DeferredJson<T>
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::MalformedBody {
                message: e.body_text(),
            })?;
        Ok(Self {
            bytes,
            _target: PhantomData,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_token_schemes() {
        assert_eq!(parse_token_header("Token abc123"), Some("abc123"));
        assert_eq!(parse_token_header("bearer abc123"), Some("abc123"));
        assert_eq!(parse_token_header("  Token   abc123 "), Some("abc123"));
    }

    #[derive(Debug, serde::Deserialize)]
    struct Body {
        text: Option<String>,
    }

    fn deferred(raw: &'static str) -> DeferredJson<Body> {
        DeferredJson {
            bytes: Bytes::from_static(raw.as_bytes()),
            _target: PhantomData,
        }
    }

    #[test]
    fn deferred_json_parses_on_demand() {
        assert_eq!(deferred(r#"{"text": "hi"}"#).parse().unwrap().text.as_deref(), Some("hi"));
        assert!(deferred("").parse().unwrap().text.is_none());
        assert!(matches!(
            deferred("{not json").parse().unwrap_err(),
            ApiError::MalformedBody { .. }
        ));
    }

    #[test]
    fn rejects_bad_headers() {
        assert_eq!(parse_token_header("Basic abc"), None);
        assert_eq!(parse_token_header("Token"), None);
        assert_eq!(parse_token_header("Token "), None);
        assert_eq!(parse_token_header("Token a b"), None);
    }
}
