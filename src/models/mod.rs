//! Data models for the WeatherSense query core
//!
//! - Location: place name or coordinate pair
//! - Query: date span, unit system and the assembled query parameters

pub mod location;
pub mod query;

// Re-export all public types for convenient access
pub use location::LocationSpec;
pub use query::{DateSpan, QueryParams, Units};
