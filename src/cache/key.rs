//! Canonical cache keys
//!
//! Two queries that ask for the same forecast map to the same key even when
//! they were phrased differently: place names are case- and
//! whitespace-folded and coordinates are rounded to two decimals (about a
//! kilometre).

use crate::models::{LocationSpec, QueryParams, Units};
use chrono::NaiveDate;
use std::fmt;

/// Decimal places kept from a coordinate pair
pub const COORDINATE_PRECISION: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum KeyLocation {
    Named(String),
    /// Coordinates in hundredths of a degree
    Coordinates { lat: i64, lon: i64 },
}

/// Normalized lookup key for a weather response
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    location: KeyLocation,
    start: NaiveDate,
    end: NaiveDate,
    units: Units,
}

impl CacheKey {
    #[must_use]
    pub fn from_params(params: &QueryParams) -> Self {
        let location = match params.location() {
            LocationSpec::Named(name) => KeyLocation::Named(
                name.split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" ")
                    .to_lowercase(),
            ),
            LocationSpec::Coordinates { lat, lon } => KeyLocation::Coordinates {
                lat: to_hundredths(*lat),
                lon: to_hundredths(*lon),
            },
        };
        Self {
            location,
            start: params.span().start(),
            end: params.span().end(),
            units: params.units(),
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn to_hundredths(degrees: f64) -> i64 {
    // Bounded to ±180 by LocationSpec, so the cast cannot truncate
    let scale = f64::from(10_u32.pow(COORDINATE_PRECISION));
    (degrees * scale).round() as i64
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "weather:")?;
        match &self.location {
            KeyLocation::Named(name) => write!(f, "{name}")?,
            KeyLocation::Coordinates { lat, lon } => {
                write!(f, "{:.2},{:.2}", *lat as f64 / 100.0, *lon as f64 / 100.0)?;
            }
        }
        write!(f, ":{}:{}:{}", self.start, self.end, self.units)
    }
}
