//! geopin-core: geometry and authorization primitives
//!
//! Pure building blocks shared by the HTTP server:
//! - Great-circle distance (haversine)
//! - Ownership guard for mutating requests
//! - Radius filtering over located items

pub mod error;
pub mod geo;
pub mod ownership;
pub mod search;

pub use error::SearchParamsError;
pub use geo::{distance_km, Coordinate, EARTH_RADIUS_KM};
pub use ownership::{is_write_allowed, Access, Ownable, UserId};
pub use search::{filter_within_radius, Located, RadiusQuery};
