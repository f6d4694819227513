//! Free-text weather query interpretation
//!
//! [`QueryInterpreter`] chains the individual extractors. Each extractor is
//! also usable on its own and returns a partial confidence next to its
//! result, which [`ConfidenceScorer`] folds into the final score.

pub mod confidence;
pub mod dates;
pub mod error;
pub mod interpreter;
pub mod location;
pub mod sanitizer;
mod text;
pub mod units;

pub use confidence::{ConfidenceScorer, ConfidenceWeights, WEIGHTS};
pub use dates::{DateOrder, DateRangeExtractor};
pub use error::{
    CoordinateField, DateRangeProblem, ErrorResponse, InputRejection, InterpretationError,
    MAX_SPAN_DAYS,
};
pub use interpreter::QueryInterpreter;
pub use location::LocationExtractor;
pub use sanitizer::{DEFAULT_MAX_QUERY_LENGTH, InputSanitizer};
pub use units::UnitsDetector;
