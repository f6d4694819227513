//! Typed failures produced while interpreting a query
//!
//! Every stage of the interpreter reports exactly one of these. Each variant
//! carries a stable machine-readable kind and a one-line hint that can be
//! shown to the user as is.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Maximum inclusive span a query may request, in calendar days
pub const MAX_SPAN_DAYS: u32 = 31;

/// Why raw input was rejected before any extraction ran
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputRejection {
    Empty,
    TooLong,
    UnsafePattern,
}

impl fmt::Display for InputRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Empty => "empty",
            Self::TooLong => "too_long",
            Self::UnsafePattern => "unsafe_pattern",
        })
    }
}

/// Which half of a coordinate pair was out of range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateField {
    Latitude,
    Longitude,
}

impl CoordinateField {
    /// Absolute bound for this field in decimal degrees
    #[must_use]
    pub fn bound(self) -> f64 {
        match self {
            Self::Latitude => 90.0,
            Self::Longitude => 180.0,
        }
    }
}

impl fmt::Display for CoordinateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Latitude => "lat",
            Self::Longitude => "lon",
        })
    }
}

/// Why a date range could not be produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DateRangeProblem {
    Unparseable,
    Order,
}

impl fmt::Display for DateRangeProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unparseable => "unparseable",
            Self::Order => "order",
        })
    }
}

/// Failure of a single interpretation request
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InterpretationError {
    /// Raw text failed sanitization
    #[error("invalid input: {reason}")]
    InvalidInput { reason: InputRejection },

    /// No place name or coordinate pair could be found
    #[error("no location found in query")]
    LocationNotFound,

    /// A coordinate pair was found but one value is out of range
    #[error("invalid coordinate: {field} must be within ±{bound}")]
    InvalidCoordinate { field: CoordinateField, bound: f64 },

    /// Dates were missing, malformed or in the wrong order
    #[error("invalid date range: {reason}")]
    InvalidDateRange { reason: DateRangeProblem },

    /// The resolved span is longer than allowed
    #[error("date range exceeds {max_days} days")]
    RangeTooLarge { max_days: u32 },
}

impl InterpretationError {
    pub fn invalid_input(reason: InputRejection) -> Self {
        Self::InvalidInput { reason }
    }

    pub fn invalid_coordinate(field: CoordinateField) -> Self {
        Self::InvalidCoordinate {
            field,
            bound: field.bound(),
        }
    }

    pub fn unparseable_dates() -> Self {
        Self::InvalidDateRange {
            reason: DateRangeProblem::Unparseable,
        }
    }

    pub fn date_order() -> Self {
        Self::InvalidDateRange {
            reason: DateRangeProblem::Order,
        }
    }

    pub fn range_too_large() -> Self {
        Self::RangeTooLarge {
            max_days: MAX_SPAN_DAYS,
        }
    }

    /// Stable machine-readable error kind
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => "invalid_input",
            Self::LocationNotFound => "location_not_found",
            Self::InvalidCoordinate { .. } => "invalid_coordinate",
            Self::InvalidDateRange { .. } => "invalid_date_range",
            Self::RangeTooLarge { .. } => "range_too_large",
        }
    }

    /// One-line hint suitable for direct display
    #[must_use]
    pub fn hint(&self) -> String {
        match self {
            Self::InvalidInput {
                reason: InputRejection::Empty,
            } => "Query cannot be empty.".to_string(),
            Self::InvalidInput {
                reason: InputRejection::TooLong,
            } => "Query is too long. Please shorten it.".to_string(),
            Self::InvalidInput {
                reason: InputRejection::UnsafePattern,
            } => "Query contains content that is not allowed.".to_string(),
            Self::LocationNotFound => {
                "Please specify a location (city name or coordinates).".to_string()
            }
            Self::InvalidCoordinate { field, bound } => {
                let name = match field {
                    CoordinateField::Latitude => "Latitude",
                    CoordinateField::Longitude => "Longitude",
                };
                format!("{name} must be between -{bound} and {bound}.")
            }
            Self::InvalidDateRange {
                reason: DateRangeProblem::Unparseable,
            } => "Could not understand the dates in your query.".to_string(),
            Self::InvalidDateRange {
                reason: DateRangeProblem::Order,
            } => "End date must not be before start date.".to_string(),
            Self::RangeTooLarge { max_days } => {
                format!("Date range must be {max_days} days or fewer.")
            }
        }
    }

    /// Wire form `{error, hint}`
    #[must_use]
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.kind(),
            hint: self.hint(),
        }
    }
}

/// Serializable failure body returned to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    pub hint: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_are_stable() {
        assert_eq!(
            InterpretationError::invalid_input(InputRejection::Empty).kind(),
            "invalid_input"
        );
        assert_eq!(InterpretationError::LocationNotFound.kind(), "location_not_found");
        assert_eq!(
            InterpretationError::invalid_coordinate(CoordinateField::Latitude).kind(),
            "invalid_coordinate"
        );
        assert_eq!(InterpretationError::date_order().kind(), "invalid_date_range");
        assert_eq!(InterpretationError::range_too_large().kind(), "range_too_large");
    }

    #[test]
    fn test_coordinate_bounds() {
        assert_eq!(
            InterpretationError::invalid_coordinate(CoordinateField::Latitude),
            InterpretationError::InvalidCoordinate {
                field: CoordinateField::Latitude,
                bound: 90.0
            }
        );
        assert_eq!(CoordinateField::Longitude.bound(), 180.0);
    }

    #[test]
    fn test_response_serialization() {
        let body = InterpretationError::range_too_large().to_response();
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["error"], "range_too_large");
        assert!(json["hint"].as_str().unwrap().contains("31"));
    }

    #[test]
    fn test_hints_are_single_line() {
        let errors = [
            InterpretationError::invalid_input(InputRejection::TooLong),
            InterpretationError::LocationNotFound,
            InterpretationError::invalid_coordinate(CoordinateField::Longitude),
            InterpretationError::unparseable_dates(),
        ];
        for error in errors {
            assert!(!error.hint().is_empty());
            assert!(!error.hint().contains('\n'));
        }
    }
}
