//! Confidence scoring
//!
//! All weights used by the extractors and the scorer live in [`WEIGHTS`], so
//! the scoring policy can be read and tested in one place.

use super::text::words;

/// Weights and bonuses for every confidence signal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceWeights {
    /// Upper bound of the location contribution
    pub location_max: f64,
    /// Explicit coordinate pair
    pub location_coordinates: f64,
    /// Any place name longer than two characters
    pub location_base: f64,
    /// User capitalized a token, or the name has several
    pub location_capitalized_bonus: f64,
    /// Place name has more than one token
    pub location_multi_token_bonus: f64,
    /// Single token of three characters or fewer
    pub location_short_penalty: f64,
    /// Single token such as "somewhere"
    pub location_vague_penalty: f64,

    /// Upper bound of the date contribution
    pub date_max: f64,
    /// ISO, numeric or textual calendar dates
    pub date_absolute: f64,
    /// today, tomorrow, yesterday and whole-week spans
    pub date_keyword: f64,
    /// "next N days" and similar counted spans
    pub date_counted: f64,
    /// Weekday references such as "last Monday"
    pub date_weekday: f64,
    /// Hedging word anywhere in the text
    pub date_hedge_penalty: f64,

    /// Unit word present
    pub units_explicit: f64,
    /// No unit word, default applied
    pub units_default: f64,

    /// Per occurrence of a clear word
    pub clarity_clear_bonus: f64,
    /// Per occurrence of an ambiguous word
    pub clarity_ambiguous_penalty: f64,
    /// Absolute bound of the clarity adjustment
    pub clarity_max: f64,
}

pub const WEIGHTS: ConfidenceWeights = ConfidenceWeights {
    location_max: 0.4,
    location_coordinates: 0.4,
    location_base: 0.2,
    location_capitalized_bonus: 0.1,
    location_multi_token_bonus: 0.1,
    location_short_penalty: 0.1,
    location_vague_penalty: 0.2,

    date_max: 0.4,
    date_absolute: 0.4,
    date_keyword: 0.35,
    date_counted: 0.3,
    date_weekday: 0.25,
    date_hedge_penalty: 0.05,

    units_explicit: 0.1,
    units_default: 0.05,

    clarity_clear_bonus: 0.025,
    clarity_ambiguous_penalty: 0.05,
    clarity_max: 0.1,
};

/// Words that signal a well-formed weather request
pub const CLEAR_WORDS: &[&str] = &["weather", "forecast", "temperature", "in", "for"];

/// Words that signal an unsure or vague request
pub const AMBIGUOUS_WORDS: &[&str] = &["maybe", "perhaps", "something", "whatever"];

/// Combines partial confidences into one score
#[derive(Debug, Clone, Copy)]
pub struct ConfidenceScorer {
    weights: ConfidenceWeights,
}

impl Default for ConfidenceScorer {
    fn default() -> Self {
        Self { weights: WEIGHTS }
    }
}

impl ConfidenceScorer {
    #[must_use]
    pub fn new(weights: ConfidenceWeights) -> Self {
        Self { weights }
    }

    /// Weighted sum of the partial scores plus a clarity adjustment,
    /// clamped to `[0, 1]` and rounded to two decimals
    #[must_use]
    pub fn score(&self, location: f64, date: f64, units: f64, text: &str) -> f64 {
        let w = &self.weights;
        let total = location.clamp(0.0, w.location_max)
            + date.clamp(0.0, w.date_max)
            + units.clamp(w.units_default, w.units_explicit)
            + self.clarity(text);
        round2(total.clamp(0.0, 1.0))
    }

    /// Clarity adjustment in `[-clarity_max, clarity_max]`
    #[must_use]
    pub fn clarity(&self, text: &str) -> f64 {
        let w = &self.weights;
        let (clear, ambiguous) = words(text).fold((0u32, 0u32), |(c, a), word| {
            if CLEAR_WORDS.contains(&word.as_str()) {
                (c + 1, a)
            } else if AMBIGUOUS_WORDS.contains(&word.as_str()) {
                (c, a + 1)
            } else {
                (c, a)
            }
        });
        let raw = f64::from(clear) * w.clarity_clear_bonus
            - f64::from(ambiguous) * w.clarity_ambiguous_penalty;
        raw.clamp(-w.clarity_max, w.clarity_max)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
