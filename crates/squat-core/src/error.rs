//! Error types for the squat analysis core.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Input shape mismatch for {what}: expected {expected}, got {actual}")]
    InputShape {
        what: String,
        expected: String,
        actual: String,
    },

    #[error("No valid samples to interpolate from in {series} ({len} frames)")]
    InsufficientValidSamples { series: String, len: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    pub fn input_shape(
        what: impl Into<String>,
        expected: impl ToString,
        actual: impl ToString,
    ) -> Self {
        Error::InputShape {
            what: what.into(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<config::ConfigError> for Error {
    fn from(e: config::ConfigError) -> Self {
        Error::Config(e.to_string())
    }
}
