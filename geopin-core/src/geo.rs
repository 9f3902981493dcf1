//! Great-circle distance on a spherical Earth
//!
//! Coordinates are plain degrees. Ranges are not validated: callers pass
//! whatever the store holds, and antimeridian/pole handling is out of scope.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Haversine distance to `other` in kilometres.
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        distance_km(self.latitude, self.longitude, other.latitude, other.longitude)
    }
}

/// Haversine distance between two points, in kilometres.
///
/// The intermediate `a` term is clamped to `[0, 1]`: rounding can push it a
/// hair past 1.0 for near-antipodal pairs, where `asin` would yield NaN.
///
/// # Example
/// ```
/// use geopin_core::geo::distance_km;
///
/// let d = distance_km(0.0, 0.0, 0.0, 1.0);
/// assert!((d - 111.19).abs() < 0.01);
/// ```
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (lat1, lon1) = (lat1.to_radians(), lon1.to_radians());
    let (lat2, lon2) = (lat2.to_radians(), lon2.to_radians());

    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let a = a.clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE_KM: f64 = 1e-6;

    #[test]
    fn same_point_is_zero() {
        assert_eq!(distance_km(55.75, 37.62, 55.75, 37.62), 0.0);
    }

    #[test]
    fn one_degree_on_equator() {
        // 2πR / 360
        let expected = 2.0 * std::f64::consts::PI * EARTH_RADIUS_KM / 360.0;
        let d = distance_km(0.0, 0.0, 0.0, 1.0);
        assert!((d - expected).abs() < TOLERANCE_KM, "got {d}");
    }

    #[test]
    fn antipodal_points_are_half_circumference() {
        let d = distance_km(0.0, 0.0, 0.0, 180.0);
        let half = std::f64::consts::PI * EARTH_RADIUS_KM;
        assert!(d.is_finite());
        assert!((d - half).abs() < 1e-3, "got {d}");
    }

    #[test]
    fn pole_to_pole() {
        let d = distance_km(90.0, 0.0, -90.0, 0.0);
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-3);
    }

    #[test]
    fn known_city_pair() {
        // Moscow -> Saint Petersburg, roughly 634 km
        let moscow = Coordinate::new(55.7558, 37.6173);
        let spb = Coordinate::new(59.9343, 30.3351);
        let d = moscow.distance_to(&spb);
        assert!((d - 634.0).abs() < 5.0, "got {d}");
    }
}
