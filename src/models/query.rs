//! Interpreted query parameters

use crate::models::location::LocationSpec;
use crate::query::error::{InterpretationError, MAX_SPAN_DAYS};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Inclusive date range, at most 31 calendar days long
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateSpan {
    #[serde(rename = "start_date")]
    start: NaiveDate,
    #[serde(rename = "end_date")]
    end: NaiveDate,
}

impl DateSpan {
    /// Build a span, rejecting reversed or oversized ranges
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, InterpretationError> {
        if end < start {
            return Err(InterpretationError::date_order());
        }
        if (end - start).num_days() > i64::from(MAX_SPAN_DAYS) - 1 {
            return Err(InterpretationError::range_too_large());
        }
        Ok(Self { start, end })
    }

    /// Span covering a single day
    #[must_use]
    pub fn single(day: NaiveDate) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    #[must_use]
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of calendar days covered, inclusive
    #[must_use]
    pub fn days(&self) -> u32 {
        u32::try_from((self.end - self.start).num_days() + 1).unwrap_or(0)
    }
}

impl fmt::Display for DateSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Unit system for the weather response
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl Units {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::Imperial => "imperial",
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a successful interpretation.
///
/// Serializes as `{location, start_date, end_date, units, confidence}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryParams {
    location: LocationSpec,
    #[serde(flatten)]
    span: DateSpan,
    units: Units,
    confidence: f64,
}

impl QueryParams {
    /// Assemble parameters; confidence is clamped into `[0, 1]`
    #[must_use]
    pub fn new(location: LocationSpec, span: DateSpan, units: Units, confidence: f64) -> Self {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        Self {
            location,
            span,
            units,
            confidence,
        }
    }

    #[must_use]
    pub fn location(&self) -> &LocationSpec {
        &self.location
    }

    #[must_use]
    pub fn span(&self) -> DateSpan {
        self.span
    }

    #[must_use]
    pub fn units(&self) -> Units {
        self.units
    }

    #[must_use]
    pub fn confidence(&self) -> f64 {
        self.confidence
    }
}
