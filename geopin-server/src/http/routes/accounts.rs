//! Account endpoints: register, login, logout

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use crate::auth::{generate_token, hash_password, verify_password};
use crate::http::error::ApiError;
use crate::http::extractors::{AuthUser, ValidJson};
use crate::models::{required, Password, Username};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CredentialsRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub username: String,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct DetailResponse {
    pub detail: &'static str,
}

/// Run password hashing off the async workers
async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Internal {
            message: format!("blocking task failed: {e}"),
        })
}

/// POST /accounts/register/
async fn register(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<CredentialsRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let username = Username::new(&required(req.username, "username")?)?;
    let password = Password::new(&required(req.password, "password")?)?;

    let password_hash = blocking(move || hash_password(password.expose()))
        .await?
        .map_err(|e| ApiError::Internal {
            message: format!("password hashing failed: {e}"),
        })?;

    let user = state
        .store()
        .create_user(&username, &password_hash)
        .await?;
    let token = state
        .store()
        .get_or_create_token(user.id, &generate_token())
        .await?;

    tracing::info!(user_id = %user.id, username = %user.username, "account registered");
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            username: user.username,
            token,
        }),
    ))
}

/// POST /accounts/login/ - returns the caller's token, creating one if needed
async fn login(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<CredentialsRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let invalid = ApiError::Unauthorized {
        reason: "Invalid credentials",
    };
    let (Some(username), Some(password)) = (req.username, req.password) else {
        return Err(invalid);
    };

    let Some(user) = state.store().find_user_by_username(&username).await? else {
        tracing::info!(%username, "login for unknown user");
        return Err(invalid);
    };
    let stored = user.password_hash.clone();
    if !blocking(move || verify_password(&password, &stored)).await? {
        tracing::info!(user_id = %user.id, "login with wrong password");
        return Err(invalid);
    }

    let token = state
        .store()
        .get_or_create_token(user.id, &generate_token())
        .await?;

    tracing::info!(user_id = %user.id, "logged in");
    Ok(Json(TokenResponse { token }))
}

/// POST /accounts/logout/ - revokes the caller's token
async fn logout(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<Json<DetailResponse>, ApiError> {
    state.store().delete_token(user.id).await?;

    tracing::info!(user_id = %user.id, "logged out");
    Ok(Json(DetailResponse {
        detail: "Logged out",
    }))
}

/// Account routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/accounts/register/", post(register))
        .route("/accounts/login/", post(login))
        .route("/accounts/logout/", post(logout))
}
