//! End-to-end query interpretation
//!
//! Stages run in a fixed order and the first failure is returned unchanged:
//! sanitize, extract location, extract dates, detect units, score, assemble.

use super::confidence::ConfidenceScorer;
use super::dates::DateRangeExtractor;
use super::error::InterpretationError;
use super::location::LocationExtractor;
use super::sanitizer::InputSanitizer;
use super::units::UnitsDetector;
use crate::config::ParserConfig;
use crate::models::QueryParams;
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

/// Turns free text into validated [`QueryParams`]
#[derive(Debug, Clone, Default)]
pub struct QueryInterpreter {
    sanitizer: InputSanitizer,
    locations: LocationExtractor,
    dates: DateRangeExtractor,
    units: UnitsDetector,
    scorer: ConfidenceScorer,
}

impl QueryInterpreter {
    #[must_use]
    pub fn new(config: &ParserConfig) -> Self {
        Self {
            sanitizer: InputSanitizer::new(config.max_query_length),
            dates: DateRangeExtractor::new(config.date_order),
            ..Self::default()
        }
    }

    /// Interpret `raw` relative to `reference`. Only the UTC calendar date of
    /// `reference` matters, so the same inputs always give the same result.
    #[tracing::instrument(
        name = "interpret",
        level = "debug",
        skip_all,
        fields(reference = %reference.date_naive())
    )]
    pub fn interpret(
        &self,
        raw: &str,
        reference: DateTime<Utc>,
    ) -> Result<QueryParams, InterpretationError> {
        let outcome = self.run_stages(raw, reference);
        match &outcome {
            Ok(params) => info!(
                location = %params.location(),
                span = %params.span(),
                units = %params.units(),
                confidence = params.confidence(),
                "Query interpreted"
            ),
            Err(err) => warn!(kind = err.kind(), error = %err, "Query rejected"),
        }
        outcome
    }

    fn run_stages(
        &self,
        raw: &str,
        reference: DateTime<Utc>,
    ) -> Result<QueryParams, InterpretationError> {
        let text = self.sanitizer.sanitize(raw)?;
        debug!(length = text.chars().count(), "Sanitized query");

        let (location, location_confidence) = self.locations.extract(&text)?;
        debug!(%location, location_confidence, "Extracted location");

        let (span, date_confidence) = self.dates.extract(&text, reference.date_naive())?;
        debug!(%span, days = span.days(), date_confidence, "Extracted dates");

        let (units, units_confidence) = self.units.detect(&text);
        debug!(%units, units_confidence, "Detected units");

        let confidence =
            self.scorer
                .score(location_confidence, date_confidence, units_confidence, &text);

        Ok(QueryParams::new(location, span, units, confidence))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LocationSpec, Units};
    use crate::query::dates::DateOrder;
    use crate::query::error::{CoordinateField, DateRangeProblem, InputRejection};
    use chrono::{NaiveDate, TimeZone};

    fn reference() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 28, 9, 30, 0).unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn interpret(raw: &str) -> Result<QueryParams, InterpretationError> {
        QueryInterpreter::default().interpret(raw, reference())
    }

    #[test]
    fn test_full_query() {
        let params =
            interpret("weather in Tel Aviv from 2025-10-20 to 2025-10-24, metric").unwrap();
        assert_eq!(params.location(), &LocationSpec::named("Tel Aviv"));
        assert_eq!(params.span().start(), date("2025-10-20"));
        assert_eq!(params.span().end(), date("2025-10-24"));
        assert_eq!(params.units(), Units::Metric);
        assert!(params.confidence() >= 0.7);
    }

    #[test]
    fn test_coordinates_with_relative_dates() {
        let params = interpret("forecast near 48.8566,2.3522 next 3 days in fahrenheit").unwrap();
        assert_eq!(
            params.location(),
            &LocationSpec::coordinates(48.8566, 2.3522).unwrap()
        );
        assert_eq!(params.span().start(), date("2025-10-29"));
        assert_eq!(params.span().end(), date("2025-10-31"));
        assert_eq!(params.units(), Units::Imperial);
    }

    #[test]
    fn test_first_failure_short_circuits() {
        // Location fails before the bad dates are looked at
        assert_eq!(
            interpret("forecast from 2025-10-24 to 2025-10-20"),
            Err(InterpretationError::LocationNotFound)
        );
        assert_eq!(
            interpret(""),
            Err(InterpretationError::invalid_input(InputRejection::Empty))
        );
        assert_eq!(
            interpret("weather at 91.0,34.78"),
            Err(InterpretationError::invalid_coordinate(CoordinateField::Latitude))
        );
        assert_eq!(
            interpret("weather in Paris"),
            Err(InterpretationError::InvalidDateRange {
                reason: DateRangeProblem::Unparseable
            })
        );
        assert_eq!(
            interpret("weather in Paris from 2025-10-01 to 2025-12-01"),
            Err(InterpretationError::range_too_large())
        );
    }

    #[test]
    fn test_time_of_day_does_not_matter() {
        let interpreter = QueryInterpreter::default();
        let late = Utc.with_ymd_and_hms(2025, 10, 28, 23, 59, 59).unwrap();
        assert_eq!(
            interpreter.interpret("weather in Oslo tomorrow", reference()),
            interpreter.interpret("weather in Oslo tomorrow", late)
        );
    }

    #[test]
    fn test_configuration_is_applied() {
        let config = ParserConfig {
            max_query_length: 20,
            date_order: DateOrder::DayFirst,
        };
        let interpreter = QueryInterpreter::new(&config);
        assert_eq!(
            interpreter.interpret("weather in Paris on 10/05/2025", reference()),
            Err(InterpretationError::invalid_input(InputRejection::TooLong))
        );

        let config = ParserConfig {
            max_query_length: 100,
            date_order: DateOrder::DayFirst,
        };
        let params = QueryInterpreter::new(&config)
            .interpret("weather in Paris on 10/05/2025", reference())
            .unwrap();
        assert_eq!(params.span().start(), date("2025-05-10"));
    }
}
