//! `WeatherSense` - natural-language weather query interpretation
//!
//! This library turns free text such as "weather in Tel Aviv next 3 days"
//! into validated, normalized query parameters, scores how confident the
//! interpretation is, and caches weather responses by a canonical key.

pub mod cache;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod query;
pub mod service;

// Re-export core types for public API
pub use cache::{CacheKey, Clock, ManualClock, ResponseCache, SystemClock};
pub use config::WeatherSenseConfig;
pub use error::WeatherSenseError;
pub use models::{DateSpan, LocationSpec, QueryParams, Units};
pub use query::{DateOrder, InterpretationError, QueryInterpreter};
pub use service::{Answer, WeatherProvider, WeatherService};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, WeatherSenseError>;
