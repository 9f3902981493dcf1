//! Point field validation

use geopin_core::Coordinate;

use super::validation::check_max_chars;
use super::ValidationError;

/// Maximum length for point names
const MAX_NAME_LEN: usize = 50;

/// Maximum length for point descriptions
const MAX_DESCRIPTION_LEN: usize = 256;

/// Validated point name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointName(String);

impl PointName {
    /// Create a new point name.
    ///
    /// # Rules
    /// - Non-empty (after trimming whitespace)
    /// - Max 50 characters
    ///
    /// # Example
    /// ```
    /// use geopin_server::models::PointName;
    ///
    /// assert!(PointName::new("Red Square").is_ok());
    /// assert!(PointName::new("   ").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "name" });
        }
        check_max_chars(trimmed, "name", MAX_NAME_LEN)?;

        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Validated point description (may be empty)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PointDescription(String);

impl PointDescription {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        check_max_chars(s, "description", MAX_DESCRIPTION_LEN)?;
        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Fields for inserting a point
#[derive(Debug, Clone, PartialEq)]
pub struct NewPoint {
    pub name: PointName,
    pub description: PointDescription,
    pub coordinate: Coordinate,
}

/// Partial update of a point; `None` leaves the column untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointChanges {
    pub name: Option<PointName>,
    pub description: Option<PointDescription>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl PointChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.latitude.is_none()
            && self.longitude.is_none()
    }
}

impl From<NewPoint> for PointChanges {
    fn from(p: NewPoint) -> Self {
        Self {
            name: Some(p.name),
            description: Some(p.description),
            latitude: Some(p.coordinate.latitude),
            longitude: Some(p.coordinate.longitude),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_name() {
        assert_eq!(PointName::new("  Park  ").unwrap().as_str(), "Park");
    }

    #[test]
    fn name_limits() {
        assert!(PointName::new(&"a".repeat(50)).is_ok());
        let err = PointName::new(&"a".repeat(51)).unwrap_err();
        assert!(matches!(err, ValidationError::TooLong { max: 50, .. }));
        assert!(matches!(
            PointName::new("").unwrap_err(),
            ValidationError::Empty { field: "name" }
        ));
    }

    #[test]
    fn description_may_be_empty() {
        assert_eq!(PointDescription::new("").unwrap().as_str(), "");
        assert!(PointDescription::new(&"d".repeat(256)).is_ok());
        assert!(PointDescription::new(&"d".repeat(257)).is_err());
    }

    #[test]
    fn full_replacement_touches_every_column() {
        let new = NewPoint {
            name: PointName::new("x").unwrap(),
            description: PointDescription::default(),
            coordinate: Coordinate::new(1.0, 2.0),
        };
        let changes = PointChanges::from(new);
        assert!(!changes.is_empty());
        assert_eq!(changes.latitude, Some(1.0));
        assert_eq!(changes.description, Some(PointDescription::default()));
    }
}
