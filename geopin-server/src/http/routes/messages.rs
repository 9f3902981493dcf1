//! Message endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::{Method, StatusCode},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::Message;
use crate::http::error::ApiError;
use crate::http::extractors::{AuthUser, DeferredJson, PathId, ValidJson};
use crate::http::guard::authorize;
use crate::models::{required, Field, MessageText, ValidationError};
use crate::state::AppState;

/// Create/update message request
///
/// Read-only fields (`id`, `author`, timestamps) are ignored if sent;
/// `"text": null` is rejected.
#[derive(Debug, Default, Deserialize)]
pub struct MessageRequest {
    #[serde(default)]
    pub text: Field<String>,
}

/// Message response
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub id: i64,
    pub text: String,
    pub author: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Message> for MessageResponse {
    fn from(m: Message) -> Self {
        Self {
            id: m.id,
            text: m.text,
            author: m.author,
            created_at: m.created_at.to_rfc3339(),
            updated_at: m.updated_at.to_rfc3339(),
        }
    }
}

/// GET /points/{id}/messages/ - messages of a point
async fn list_messages(
    State(state): State<Arc<AppState>>,
    PathId(point_id): PathId,
) -> Result<Json<Vec<MessageResponse>>, ApiError> {
    let messages = state.store().list_messages(point_id).await?;
    Ok(Json(messages.into_iter().map(MessageResponse::from).collect()))
}

/// POST /points/{id}/messages/ - add a message to a point
async fn create_message(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    PathId(point_id): PathId,
    ValidJson(req): ValidJson<MessageRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let text = MessageText::new(&required(req.text.non_null("text")?, "text")?)?;

    let message = state
        .store()
        .create_message(point_id, user.id, text)
        .await?;

    tracing::info!(message_id = message.id, point_id, author = %user.id, "message created");
    Ok((StatusCode::CREATED, Json(MessageResponse::from(message))))
}

/// GET /points/messages/{id}/
async fn get_message(
    State(state): State<Arc<AppState>>,
    method: Method,
    PathId(id): PathId,
) -> Result<Json<MessageResponse>, ApiError> {
    let message = state.store().get_message(id).await?;
    authorize(&method, None, &message)?;
    Ok(Json(MessageResponse::from(message)))
}

/// PUT/PATCH /points/messages/{id}/
///
/// PUT requires `text`; PATCH without `text` leaves the message as is.
async fn update_message(
    State(state): State<Arc<AppState>>,
    method: Method,
    AuthUser(user): AuthUser,
    PathId(id): PathId,
    body: DeferredJson<MessageRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let existing = state.store().get_message(id).await?;
    authorize(&method, Some(&user), &existing)?;

    let req = body.parse()?;
    let text = match (req.text.non_null("text")?, method == Method::PATCH) {
        (Some(text), _) => MessageText::new(&text)?,
        (None, true) => return Ok(Json(MessageResponse::from(existing))),
        (None, false) => return Err(ValidationError::Missing { field: "text" }.into()),
    };

    let message = state.store().update_message(id, text).await?;
    tracing::info!(message_id = id, "message updated");
    Ok(Json(MessageResponse::from(message)))
}

/// DELETE /points/messages/{id}/
async fn delete_message(
    State(state): State<Arc<AppState>>,
    method: Method,
    AuthUser(user): AuthUser,
    PathId(id): PathId,
) -> Result<StatusCode, ApiError> {
    let existing = state.store().get_message(id).await?;
    authorize(&method, Some(&user), &existing)?;

    state.store().delete_message(id).await?;
    tracing::info!(message_id = id, "message deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Message routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/points/{id}/messages/",
            get(list_messages).post(create_message),
        )
        .route(
            "/points/messages/{id}/",
            get(get_message)
                .put(update_message)
                .patch(update_message)
                .delete(delete_message),
        )
}
