//! Radius search over located items
//!
//! Full scan, no spatial index. Every candidate is measured with the
//! haversine distance and kept when it lies within the radius, boundary
//! included. Input order is preserved.

use crate::error::SearchParamsError;
use crate::geo::Coordinate;

/// Something that sits at a coordinate.
pub trait Located {
    fn coordinate(&self) -> Coordinate;
}

impl<T: Located + ?Sized> Located for &T {
    fn coordinate(&self) -> Coordinate {
        (**self).coordinate()
    }
}

/// A validated radius search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusQuery {
    pub center: Coordinate,
    pub radius_km: f64,
}

impl RadiusQuery {
    pub fn new(latitude: f64, longitude: f64, radius_km: f64) -> Self {
        Self {
            center: Coordinate::new(latitude, longitude),
            radius_km,
        }
    }

    /// Build a query from raw query-string values.
    ///
    /// All three values are required and must parse as finite numbers.
    /// There are no defaults and no partial queries.
    ///
    /// # Example
    /// ```
    /// use geopin_core::RadiusQuery;
    ///
    /// assert!(RadiusQuery::from_raw(Some("0"), Some("0"), Some("50")).is_ok());
    /// assert!(RadiusQuery::from_raw(Some("0"), None, Some("50")).is_err());
    /// assert!(RadiusQuery::from_raw(Some("0"), Some("0"), Some("abc")).is_err());
    /// ```
    pub fn from_raw(
        latitude: Option<&str>,
        longitude: Option<&str>,
        radius: Option<&str>,
    ) -> Result<Self, SearchParamsError> {
        let latitude = parse_param("latitude", latitude)?;
        let longitude = parse_param("longitude", longitude)?;
        let radius_km = parse_param("radius", radius)?;
        Ok(Self::new(latitude, longitude, radius_km))
    }

    /// Distance from the query centre to `item`, in kilometres.
    pub fn distance_to<L: Located + ?Sized>(&self, item: &L) -> f64 {
        self.center.distance_to(&item.coordinate())
    }

    /// Whether `item` lies within the radius (inclusive).
    pub fn contains<L: Located + ?Sized>(&self, item: &L) -> bool {
        self.distance_to(item) <= self.radius_km
    }
}

fn parse_param(param: &'static str, raw: Option<&str>) -> Result<f64, SearchParamsError> {
    let raw = raw.ok_or(SearchParamsError::Missing { param })?;
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(SearchParamsError::NotANumber {
            param,
            value: raw.to_owned(),
        }),
    }
}

/// Keep the items within `query`'s radius, in their original order.
pub fn filter_within_radius<I, L>(items: I, query: &RadiusQuery) -> Vec<L>
where
    I: IntoIterator<Item = L>,
    L: Located,
{
    let mut scanned = 0usize;
    let kept: Vec<L> = items
        .into_iter()
        .inspect(|_| scanned += 1)
        .filter(|item| query.contains(item))
        .collect();

    tracing::debug!(
        scanned,
        matched = kept.len(),
        radius_km = query.radius_km,
        "radius filter applied"
    );
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Pin {
        id: i64,
        at: Coordinate,
    }

    impl Located for Pin {
        fn coordinate(&self) -> Coordinate {
            self.at
        }
    }

    fn pin(id: i64, lat: f64, lon: f64) -> Pin {
        Pin {
            id,
            at: Coordinate::new(lat, lon),
        }
    }

    #[test]
    fn parses_all_three() {
        let q = RadiusQuery::from_raw(Some("10.5"), Some("-20"), Some(" 3 ")).unwrap();
        assert_eq!(q.center, Coordinate::new(10.5, -20.0));
        assert_eq!(q.radius_km, 3.0);
    }

    #[test]
    fn missing_param_named() {
        let err = RadiusQuery::from_raw(Some("1"), Some("2"), None).unwrap_err();
        assert_eq!(err, SearchParamsError::Missing { param: "radius" });
    }

    #[test]
    fn rejects_garbage_and_non_finite() {
        for bad in ["abc", "", "NaN", "inf", "-infinity", "1,5"] {
            let err = RadiusQuery::from_raw(Some(bad), Some("0"), Some("1")).unwrap_err();
            assert_eq!(err.param(), Some("latitude"), "input {bad:?}");
        }
    }

    #[test]
    fn equator_scenario() {
        let a = pin(1, 0.0, 0.0);
        let b = pin(2, 0.0, 1.0);

        let near = filter_within_radius(vec![a.clone(), b.clone()], &RadiusQuery::new(0.0, 0.0, 50.0));
        assert_eq!(near, vec![a.clone()]);

        let far = filter_within_radius(vec![a.clone(), b.clone()], &RadiusQuery::new(0.0, 0.0, 200.0));
        assert_eq!(far, vec![a, b]);
    }

    #[test]
    fn boundary_is_inclusive() {
        let b = pin(2, 0.0, 1.0);
        let exact = RadiusQuery::new(0.0, 0.0, 0.0).distance_to(&b);
        let kept = filter_within_radius([&b], &RadiusQuery::new(0.0, 0.0, exact));
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn zero_radius_keeps_exact_match_only() {
        let items = vec![pin(1, 5.0, 5.0), pin(2, 5.0, 5.0001)];
        let kept = filter_within_radius(items, &RadiusQuery::new(5.0, 5.0, 0.0));
        assert_eq!(kept.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn negative_radius_matches_nothing() {
        let kept = filter_within_radius(vec![pin(1, 0.0, 0.0)], &RadiusQuery::new(0.0, 0.0, -1.0));
        assert!(kept.is_empty());
    }

    #[test]
    fn preserves_input_order() {
        let items = vec![pin(3, 0.0, 0.2), pin(1, 0.0, 0.1), pin(2, 0.0, 0.0)];
        let kept = filter_within_radius(items, &RadiusQuery::new(0.0, 0.0, 100.0));
        assert_eq!(kept.iter().map(|p| p.id).collect::<Vec<_>>(), vec![3, 1, 2]);
    }
}
