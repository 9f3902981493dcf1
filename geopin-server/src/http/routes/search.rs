//! Radius search endpoint
//!
//! Full scan of every point, haversine filter, store order preserved
//! (ascending id). Fine for small collections; there is no spatial index.

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use geopin_core::{filter_within_radius, RadiusQuery, SearchParamsError};

use super::points::PointResponse;
use crate::http::error::ApiError;
use crate::state::AppState;

/// Raw query parameters; parsed by `RadiusQuery::from_raw`
#[derive(Debug, Default)]
pub struct SearchParams {
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub radius: Option<String>,
}

impl SearchParams {
    /// Collect decoded query pairs. A repeated key keeps its last value;
    /// unknown keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "latitude" => &mut params.latitude,
                "longitude" => &mut params.longitude,
                "radius" => &mut params.radius,
                _ => continue,
            };
            *slot = Some(value);
        }
        params
    }

    pub fn to_query(&self) -> Result<RadiusQuery, SearchParamsError> {
        RadiusQuery::from_raw(
            self.latitude.as_deref(),
            self.longitude.as_deref(),
            self.radius.as_deref(),
        )
    }
}

/// GET /points/search/?latitude=&longitude=&radius=
async fn search_points(
    State(state): State<Arc<AppState>>,
    pairs: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<Vec<PointResponse>>, ApiError> {
    let Query(pairs) = pairs.map_err(|e| SearchParamsError::Undecodable {
        reason: e.body_text(),
    })?;
    let query = SearchParams::from_pairs(pairs).to_query()?;

    let points = state.store().list_points().await?;
    let total = points.len();
    let matched = filter_within_radius(points, &query);

    tracing::info!(
        latitude = query.center.latitude,
        longitude = query.center.longitude,
        radius_km = query.radius_km,
        scanned = total,
        matched = matched.len(),
        "radius search"
    );
    Ok(Json(matched.into_iter().map(PointResponse::from).collect()))
}

/// Search routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/points/search/", get(search_points))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_to_query() {
        let params = SearchParams {
            latitude: Some("1".into()),
            longitude: Some("2".into()),
            radius: Some("3.5".into()),
        };
        assert_eq!(params.to_query().unwrap(), RadiusQuery::new(1.0, 2.0, 3.5));
    }

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn repeated_key_keeps_last_value() {
        let params = SearchParams::from_pairs(pairs(&[
            ("latitude", "abc"),
            ("latitude", "1"),
            ("longitude", "2"),
            ("radius", "3"),
            ("format", "json"),
        ]));
        assert_eq!(params.latitude.as_deref(), Some("1"));
        assert_eq!(params.to_query().unwrap(), RadiusQuery::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn empty_params_rejected() {
        let err = SearchParams::default().to_query().unwrap_err();
        assert_eq!(err, SearchParamsError::Missing { param: "latitude" });
    }
}
