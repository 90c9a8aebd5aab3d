//! Domain layer types and invariants.

pub mod coaches;
pub mod dates;
pub mod error;
pub mod events;
mod fields;
pub mod gallery;
pub mod spotlights;
pub mod uploads;

pub use error::ValidationError;
