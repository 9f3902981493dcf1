//! Point endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::{Method, StatusCode},
    routing::get,
    Json, Router,
};
use geopin_core::Coordinate;
use serde::{Deserialize, Serialize};

use super::messages::MessageResponse;
use crate::db::Point;
use crate::http::error::ApiError;
use crate::http::extractors::{AuthUser, DeferredJson, PathId, ValidJson};
use crate::http::guard::authorize;
use crate::models::{
    required, Field, NewPoint, PointChanges, PointDescription, PointName, ValidationError,
};
use crate::state::AppState;

/// Create/update point request
///
/// Read-only fields (`id`, `creator`, `messages`, timestamps) are ignored.
/// An explicit `null` is rejected rather than treated as omitted.
#[derive(Debug, Default, Deserialize)]
pub struct PointRequest {
    #[serde(default)]
    pub name: Field<String>,
    #[serde(default)]
    pub description: Field<String>,
    #[serde(default)]
    pub latitude: Field<f64>,
    #[serde(default)]
    pub longitude: Field<f64>,
}

impl PointRequest {
    /// Validate for insertion: name and coordinates required.
    pub fn into_new_point(self) -> Result<NewPoint, ValidationError> {
        let name = PointName::new(&required(self.name.non_null("name")?, "name")?)?;
        let latitude = required(self.latitude.non_null("latitude")?, "latitude")?;
        let longitude = required(self.longitude.non_null("longitude")?, "longitude")?;
        let description = match self.description.non_null("description")? {
            Some(d) => PointDescription::new(&d)?,
            None => PointDescription::default(),
        };

        Ok(NewPoint {
            name,
            description,
            coordinate: Coordinate::new(latitude, longitude),
        })
    }

    /// Validate for update. A full update (PUT) requires name and
    /// coordinates; an omitted description keeps its current value.
    pub fn into_changes(self, partial: bool) -> Result<PointChanges, ValidationError> {
        let name = self.name.non_null("name")?;
        let description = self.description.non_null("description")?;
        let latitude = self.latitude.non_null("latitude")?;
        let longitude = self.longitude.non_null("longitude")?;

        if !partial {
            required(name.as_ref(), "name")?;
            required(latitude, "latitude")?;
            required(longitude, "longitude")?;
        }

        Ok(PointChanges {
            name: name.as_deref().map(PointName::new).transpose()?,
            description: description
                .as_deref()
                .map(PointDescription::new)
                .transpose()?,
            latitude,
            longitude,
        })
    }
}

/// Point response with nested messages
#[derive(Debug, Serialize)]
pub struct PointResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    pub creator: String,
    pub created_at: String,
    pub updated_at: String,
    pub messages: Vec<MessageResponse>,
}

impl From<Point> for PointResponse {
    fn from(p: Point) -> Self {
        Self {
            id: p.id,
            name: p.name,
            description: p.description,
            latitude: p.latitude,
            longitude: p.longitude,
            creator: p.creator,
            created_at: p.created_at.to_rfc3339(),
            updated_at: p.updated_at.to_rfc3339(),
            messages: p.messages.into_iter().map(MessageResponse::from).collect(),
        }
    }
}

/// GET /points/ - all points
async fn list_points(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PointResponse>>, ApiError> {
    let points = state.store().list_points().await?;
    Ok(Json(points.into_iter().map(PointResponse::from).collect()))
}

/// POST /points/ - create a point owned by the caller
async fn create_point(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    ValidJson(req): ValidJson<PointRequest>,
) -> Result<(StatusCode, Json<PointResponse>), ApiError> {
    let new_point = req.into_new_point()?;
    let point = state.store().create_point(user.id, new_point).await?;

    tracing::info!(point_id = point.id, creator = %user.id, "point created");
    Ok((StatusCode::CREATED, Json(PointResponse::from(point))))
}

/// GET /points/{id}/
async fn get_point(
    State(state): State<Arc<AppState>>,
    method: Method,
    PathId(id): PathId,
) -> Result<Json<PointResponse>, ApiError> {
    let point = state.store().get_point(id).await?;
    authorize(&method, None, &point)?;
    Ok(Json(PointResponse::from(point)))
}

/// PUT/PATCH /points/{id}/
async fn update_point(
    State(state): State<Arc<AppState>>,
    method: Method,
    AuthUser(user): AuthUser,
    PathId(id): PathId,
    body: DeferredJson<PointRequest>,
) -> Result<Json<PointResponse>, ApiError> {
    let existing = state.store().get_point(id).await?;
    authorize(&method, Some(&user), &existing)?;

    let changes = body.parse()?.into_changes(method == Method::PATCH)?;
    let point = state.store().update_point(id, changes).await?;

    tracing::info!(point_id = id, "point updated");
    Ok(Json(PointResponse::from(point)))
}

/// DELETE /points/{id}/ - removes the point and its messages
async fn delete_point(
    State(state): State<Arc<AppState>>,
    method: Method,
    AuthUser(user): AuthUser,
    PathId(id): PathId,
) -> Result<StatusCode, ApiError> {
    let existing = state.store().get_point(id).await?;
    authorize(&method, Some(&user), &existing)?;

    state.store().delete_point(id).await?;
    tracing::info!(point_id = id, messages = existing.messages.len(), "point deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Point routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/points/", get(list_points).post(create_point))
        .route(
            "/points/{id}/",
            get(get_point)
                .put(update_point)
                .patch(update_point)
                .delete(delete_point),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full() -> PointRequest {
        PointRequest {
            name: Field::Present("Cafe".into()),
            description: Field::Absent,
            latitude: Field::Present(59.93),
            longitude: Field::Present(30.33),
        }
    }

    #[test]
    fn new_point_defaults_description() {
        let p = full().into_new_point().unwrap();
        assert_eq!(p.description.as_str(), "");
        assert_eq!(p.coordinate, Coordinate::new(59.93, 30.33));
    }

    #[test]
    fn new_point_requires_coordinates() {
        let req = PointRequest {
            latitude: Field::Absent,
            ..full()
        };
        assert_eq!(
            req.into_new_point().unwrap_err(),
            ValidationError::Missing { field: "latitude" }
        );
    }

    #[test]
    fn put_requires_name() {
        let req = PointRequest {
            name: Field::Absent,
            ..full()
        };
        assert_eq!(
            req.into_changes(false).unwrap_err(),
            ValidationError::Missing { field: "name" }
        );
    }

    #[test]
    fn patch_accepts_anything_partial() {
        let changes = PointRequest {
            description: Field::Present("new".into()),
            ..Default::default()
        }
        .into_changes(true)
        .unwrap();
        assert!(changes.name.is_none());
        assert_eq!(changes.description.unwrap().as_str(), "new");
    }

    #[test]
    fn patch_rejects_null_coordinate() {
        let req = PointRequest {
            latitude: Field::Null,
            ..Default::default()
        };
        assert_eq!(
            req.into_changes(true).unwrap_err(),
            ValidationError::Null { field: "latitude" }
        );
    }
}
