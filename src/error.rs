//! Error types and handling for `WeatherSense`

use crate::query::InterpretationError;
use thiserror::Error;

/// Main error type for the `WeatherSense` library
#[derive(Error, Debug)]
pub enum WeatherSenseError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// The weather provider failed to answer
    #[error("Provider error: {message}")]
    Provider { message: String },

    /// The query text could not be interpreted
    #[error(transparent)]
    Interpretation(#[from] InterpretationError),
}

impl WeatherSenseError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new provider error
    pub fn provider<S: Into<String>>(message: S) -> Self {
        Self::Provider {
            message: message.into(),
        }
    }
}
