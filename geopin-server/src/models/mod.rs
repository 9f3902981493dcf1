//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod account;
pub mod message;
pub mod point;
pub mod validation;

pub use account::{Password, Username};
pub use message::MessageText;
pub use point::{NewPoint, PointChanges, PointDescription, PointName};
pub use validation::{required, Field, ValidationError};
