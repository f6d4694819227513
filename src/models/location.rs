//! Location model for interpreted queries

use crate::query::error::{CoordinateField, InterpretationError};
use serde::Serialize;
use std::fmt;

/// Where the user asked about: a place name or a coordinate pair
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum LocationSpec {
    /// Place name, capitalized for geocoding
    Named(String),
    /// Latitude and longitude in decimal degrees
    Coordinates { lat: f64, lon: f64 },
}

impl LocationSpec {
    /// Create a named location
    pub fn named<S: Into<String>>(name: S) -> Self {
        Self::Named(name.into())
    }

    /// Create a coordinate location, checking latitude before longitude
    pub fn coordinates(lat: f64, lon: f64) -> Result<Self, InterpretationError> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(InterpretationError::invalid_coordinate(
                CoordinateField::Latitude,
            ));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(InterpretationError::invalid_coordinate(
                CoordinateField::Longitude,
            ));
        }
        Ok(Self::Coordinates { lat, lon })
    }
}

impl fmt::Display for LocationSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::Coordinates { lat, lon } => write!(f, "{lat},{lon}"),
        }
    }
}
