//! Unit system detection

use super::confidence::WEIGHTS;
use crate::models::Units;
use regex::Regex;
use std::sync::LazyLock;

/// Leftmost unit mention; the named group tells which family it belongs to
static UNIT_MENTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)(?P<metric>\b(?:celsius|metric|centigrade)\b|°\s*c\b)",
        r"|(?P<imperial>\b(?:fahrenheit|imperial|mph)\b|°\s*f\b)",
    ))
    .expect("unit pattern is valid")
});

/// Spots explicit unit keywords, defaulting to metric
#[derive(Debug, Clone, Copy, Default)]
pub struct UnitsDetector;

impl UnitsDetector {
    /// Detected units and partial confidence. When both families are
    /// mentioned the first one written wins.
    #[must_use]
    pub fn detect(&self, text: &str) -> (Units, f64) {
        match UNIT_MENTION.captures(text) {
            Some(captures) if captures.name("imperial").is_some() => {
                (Units::Imperial, WEIGHTS.units_explicit)
            }
            Some(_) => (Units::Metric, WEIGHTS.units_explicit),
            None => (Units::Metric, WEIGHTS.units_default),
        }
    }
}
