//! Location extraction from sanitized query text
//!
//! A coordinate pair always takes precedence. Otherwise the named-location
//! strategies in [`NAMED_STRATEGIES`] are tried in order and the first one
//! that yields a non-empty place name wins. The order matters for ambiguous
//! input; do not reorder.

use super::confidence::WEIGHTS;
use super::error::InterpretationError;
use super::text::{HEDGE_WORDS, capitalize_words, month_from_name, weekday_from_name};
use crate::models::LocationSpec;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Tokens that end a place name in the bounded strategies
const BOUNDARY: &str = concat!(
    r"(?:(?:for|from|during|this|next|last|tomorrow|today|yesterday",
    r"|between|on|until|through|over)\b|\d)",
);

/// Letters, combining marks and the punctuation found inside place names
const PLACE: &str = r"[\p{L}][\p{L}\p{M}\s,.'’-]*?";

/// Whole words only, no digits; used where no boundary follows
const PLACE_WORDS: &str = r"[\p{L}][\p{L}\p{M}.'’-]*(?:[\s,]+[\p{L}][\p{L}\p{M}.'’-]*)*";

/// Longest accepted place name, in characters
pub const MAX_LOCATION_LENGTH: usize = 100;

/// Any magnitude matches so out-of-range pairs are reported, not skipped
static COORDINATES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)(?:^|[^\w.])(?:(?:at|near)\s+)?",
        r"(?P<lat>[-+]?\d+\.\d+)\s*,\s*(?P<lon>[-+]?\d+\.\d+)\b",
    ))
    .expect("coordinate pattern is valid")
});

/// One named-location matcher; the `place` group holds the raw candidate
pub struct NamedStrategy {
    pub name: &'static str,
    pattern: Regex,
}

pub static NAMED_STRATEGIES: LazyLock<Vec<NamedStrategy>> = LazyLock::new(|| {
    [
        (
            "preposition_bounded",
            format!(r"(?i)\b(?:in|for)\s+(?P<place>{PLACE})\s+{BOUNDARY}"),
        ),
        (
            "after_weather",
            format!(
                concat!(
                    r"(?i)\b(?:weather|forecast)",
                    r"(?:\s+(?:weather|forecast|temperature|data|report))*",
                    r"(?:\s+(?:in|for|at|near))?\s+(?P<place>{PLACE})",
                    r"(?:\s+{BOUNDARY}|\s*[?!.]?\s*$)",
                ),
                PLACE = PLACE,
                BOUNDARY = BOUNDARY,
            ),
        ),
        (
            "before_weather",
            format!(r"(?i)\b(?P<place>{PLACE_WORDS}?)\s+(?:weather|forecast)\b"),
        ),
        (
            "preposition_catch_all",
            format!(r"(?i)\b(?:in|for|at|near)\s+(?P<place>{PLACE_WORDS})"),
        ),
    ]
    .into_iter()
    .map(|(name, pattern)| NamedStrategy {
        name,
        pattern: Regex::new(&pattern).expect("location patterns are valid"),
    })
    .collect()
});

/// Terms that are never a place on their own
const GENERIC_TERMS: &[&str] = &["weather", "forecast", "temperature", "data", "climate"];

const PREPOSITIONS: &[&str] = &[
    "in", "for", "at", "near", "on", "from", "to", "during", "around", "of",
];

/// Words that bleed into a match but never belong to a place name
const FILLER_WORDS: &[&str] = &[
    // temporal
    "today", "tonight", "tomorrow", "yesterday", "this", "next", "last", "week", "weekend",
    "weekdays", "day", "days", "morning", "afternoon", "evening", "night", "now", "current",
    // conversational
    "what", "what's", "whats", "how", "how's", "is", "are", "was", "will", "be", "it", "the",
    "a", "an", "me", "my", "show", "get", "give", "tell", "check", "please", "like", "going",
    // units
    "metric", "imperial", "celsius", "fahrenheit", "centigrade", "mph", "units",
    // doubt
    "perhaps", "something", "whatever",
];

/// Single tokens that name no real place
const VAGUE_PLACES: &[&str] = &["somewhere", "anywhere", "unknown", "here", "there"];

/// Outcome of cleaning a raw candidate
#[derive(Debug, PartialEq)]
enum Cleaned {
    Place { name: String, confidence: f64 },
    Empty,
    Generic,
    TooLong,
}

/// Finds a place name or coordinate pair in sanitized text
#[derive(Debug, Clone, Copy, Default)]
pub struct LocationExtractor;

impl LocationExtractor {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Extract a location and its partial confidence
    pub fn extract(&self, text: &str) -> Result<(LocationSpec, f64), InterpretationError> {
        if let Some(location) = extract_coordinates(text)? {
            debug!("Found coordinate pair");
            return Ok((location, WEIGHTS.location_coordinates));
        }

        for strategy in NAMED_STRATEGIES.iter() {
            for captures in strategy.pattern.captures_iter(text) {
                let Some(raw) = captures.name("place") else {
                    continue;
                };
                match clean_place(raw.as_str()) {
                    Cleaned::Empty => continue,
                    Cleaned::TooLong => {
                        debug!(strategy = strategy.name, "Place name exceeds maximum length");
                        return Err(InterpretationError::LocationNotFound);
                    }
                    Cleaned::Generic => {
                        debug!(strategy = strategy.name, "Match collapsed to a generic term");
                        return Err(InterpretationError::LocationNotFound);
                    }
                    Cleaned::Place { name, confidence } => {
                        debug!(strategy = strategy.name, place = %name, "Found named location");
                        return Ok((LocationSpec::Named(name), confidence));
                    }
                }
            }
        }

        Err(InterpretationError::LocationNotFound)
    }
}

/// Parse and bounds-check a coordinate pair, if the text has one
fn extract_coordinates(text: &str) -> Result<Option<LocationSpec>, InterpretationError> {
    let Some(captures) = COORDINATES.captures(text) else {
        return Ok(None);
    };
    let (Ok(lat), Ok(lon)) = (
        captures["lat"].parse::<f64>(),
        captures["lon"].parse::<f64>(),
    ) else {
        return Ok(None);
    };
    LocationSpec::coordinates(lat, lon).map(Some)
}

fn normalized(token: &str) -> String {
    token
        .trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
        .to_lowercase()
}

fn is_filler(token: &str) -> bool {
    let word = normalized(token);
    FILLER_WORDS.contains(&word.as_str())
        || HEDGE_WORDS.contains(&word.as_str())
        || weekday_from_name(&word).is_some_and(|_| word.len() > 3)
        || month_from_name(&word).is_some_and(|_| word.len() > 3)
        || word.is_empty()
}

fn is_preposition(token: &str) -> bool {
    PREPOSITIONS.contains(&normalized(token).as_str())
}

fn is_generic(token: &str) -> bool {
    GENERIC_TERMS.contains(&normalized(token).as_str())
}

fn trim_edges<'a>(mut tokens: &'a [&'a str], strip: impl Fn(&str) -> bool) -> &'a [&'a str] {
    while let [first, rest @ ..] = tokens {
        if !strip(*first) {
            break;
        }
        tokens = rest;
    }
    while let [rest @ .., last] = tokens {
        if !strip(*last) {
            break;
        }
        tokens = rest;
    }
    tokens
}

fn clean_place(raw: &str) -> Cleaned {
    let kept: Vec<&str> = raw.split_whitespace().filter(|t| !is_filler(t)).collect();
    let core = trim_edges(&kept, is_preposition);
    if core.is_empty() {
        return Cleaned::Empty;
    }
    if core.iter().all(|t| is_generic(t)) {
        return Cleaned::Generic;
    }
    let core = trim_edges(core, |t| is_preposition(t) || is_generic(t));
    if core.is_empty() {
        return Cleaned::Empty;
    }

    let joined = core.join(" ");
    let name = joined.trim_matches(|c: char| matches!(c, ',' | '.' | '-' | '\'' | '’'));
    if name.is_empty() {
        return Cleaned::Empty;
    }
    if name.chars().count() > MAX_LOCATION_LENGTH {
        return Cleaned::TooLong;
    }

    Cleaned::Place {
        name: capitalize_words(name),
        confidence: named_confidence(core, name),
    }
}

fn named_confidence(tokens: &[&str], name: &str) -> f64 {
    let w = &WEIGHTS;
    let length = name.chars().count();
    let single = tokens.len() == 1;

    let mut confidence = 0.0;
    if length > 2 {
        confidence += w.location_base;
    }
    // Multi-token names are always emitted capitalized
    if !single
        || tokens
            .iter()
            .any(|t| t.chars().next().is_some_and(char::is_uppercase))
    {
        confidence += w.location_capitalized_bonus;
    }
    if !single {
        confidence += w.location_multi_token_bonus;
    }
    if single && length <= 3 {
        confidence -= w.location_short_penalty;
    }
    if single && VAGUE_PLACES.contains(&normalized(name).as_str()) {
        confidence -= w.location_vague_penalty;
    }
    confidence.clamp(0.0, w.location_max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::error::CoordinateField;
    use rstest::rstest;

    fn extract(text: &str) -> Result<(LocationSpec, f64), InterpretationError> {
        LocationExtractor::new().extract(text)
    }

    fn named(text: &str) -> String {
        match extract(text) {
            Ok((LocationSpec::Named(name), _)) => name,
            other => panic!("expected a named location for {text:?}, got {other:?}"),
        }
    }

    #[test]
    fn test_strategy_order_is_fixed() {
        let names: Vec<&str> = NAMED_STRATEGIES.iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            vec![
                "preposition_bounded",
                "after_weather",
                "before_weather",
                "preposition_catch_all"
            ]
        );
    }

    #[rstest]
    #[case("weather at 48.8566,2.3522", 48.8566, 2.3522)]
    #[case("near -33.87, 151.21 tomorrow", -33.87, 151.21)]
    #[case("forecast for 40.7128,-74.0060 next 3 days", 40.7128, -74.006)]
    fn test_coordinates(#[case] text: &str, #[case] lat: f64, #[case] lon: f64) {
        let (location, confidence) = extract(text).unwrap();
        assert_eq!(location, LocationSpec::Coordinates { lat, lon });
        assert_eq!(confidence, WEIGHTS.location_coordinates);
    }

    #[test]
    fn test_out_of_range_coordinates_do_not_fall_through() {
        assert_eq!(
            extract("weather at 91.0,34.78 in Paris").unwrap_err(),
            InterpretationError::InvalidCoordinate {
                field: CoordinateField::Latitude,
                bound: 90.0
            }
        );
        assert_eq!(
            extract("weather at 45.0,-181.5").unwrap_err(),
            InterpretationError::InvalidCoordinate {
                field: CoordinateField::Longitude,
                bound: 180.0
            }
        );
        assert_eq!(
            extract("weather at 1234.5,3.2 tomorrow").unwrap_err(),
            InterpretationError::InvalidCoordinate {
                field: CoordinateField::Latitude,
                bound: 90.0
            }
        );
    }

    #[test]
    fn test_textual_dates_are_not_coordinates() {
        assert_eq!(named("weather in Rome on October 5, 2025"), "Rome");
    }

    #[rstest]
    #[case("weather in Tel Aviv from 2025-10-20 to 2025-10-24, metric", "Tel Aviv")]
    #[case("weather in Paris tomorrow", "Paris")]
    #[case("forecast for new york next week", "New York")]
    #[case("temperature in Berlin, Germany during the weekend", "Berlin, Germany")]
    #[case("weather in Paris", "Paris")]
    #[case("what is the weather for next week in Berlin", "Berlin")]
    #[case("weather tomorrow in Paris, metric", "Paris")]
    #[case("London weather tomorrow", "London")]
    #[case("show me the Madrid forecast", "Madrid")]
    #[case("how cold is it in Reykjavík?", "Reykjavík")]
    #[case("temperature data for Berlin", "Berlin")]
    #[case("weather in são paulo today", "São Paulo")]
    #[case("weather in Chamonix-Mont-Blanc this weekend", "Chamonix-Mont-Blanc")]
    #[case("weather in Paris for 3 days", "Paris")]
    fn test_named_locations(#[case] text: &str, #[case] expected: &str) {
        assert_eq!(named(text), expected);
    }

    #[test]
    fn test_first_strategy_wins() {
        // Strategy (a) sees "Lyon" before the catch-all could reach "Nice"
        assert_eq!(named("weather in Lyon tomorrow then near Nice"), "Lyon");
    }

    #[rstest]
    #[case("weather forecast")]
    #[case("weather for data")]
    #[case("forecast tomorrow")]
    #[case("tomorrow please")]
    #[case("from 2025-10-01 to 2025-10-03")]
    fn test_not_found(#[case] text: &str) {
        assert_eq!(extract(text).unwrap_err(), InterpretationError::LocationNotFound);
    }

    #[test]
    fn test_overlong_place_names_are_rejected() {
        let place = ["Abcdefghij"; 40].join(" ");
        assert_eq!(
            extract(&format!("weather in {place} tomorrow")).unwrap_err(),
            InterpretationError::LocationNotFound
        );

        let longest = "A".repeat(MAX_LOCATION_LENGTH);
        assert_eq!(named(&format!("weather in {longest} tomorrow")), longest);
    }

    #[test]
    fn test_multi_token_names_score_the_same_in_any_case() {
        let (_, typed) = extract("weather in New York tomorrow").unwrap();
        let (_, lower) = extract("weather in new york tomorrow").unwrap();
        assert_eq!(typed, lower);
        assert_eq!(lower, WEIGHTS.location_max);
    }

    #[test]
    fn test_confidence_prefers_capitalized_multi_token_names() {
        let (_, multi) = extract("weather in Tel Aviv tomorrow").unwrap();
        let (_, single) = extract("weather in Paris tomorrow").unwrap();
        let (_, lower) = extract("weather in paris tomorrow").unwrap();
        let (_, short) = extract("weather in Ulm tomorrow").unwrap();
        let (_, vague) = extract("weather in somewhere tomorrow").unwrap();

        assert_eq!(multi, 0.4);
        assert!(single < multi);
        assert!(lower < single);
        assert!(short < single);
        assert!(vague < lower);
    }
}
