//! Error types for the sales_forecast crate

use forecast_math::MathError;
use thiserror::Error;

/// Custom error types for the sales_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Error related to data validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// A model candidate failed to train or predict
    #[error("Model '{model}' failed: {reason}")]
    ModelError { model: String, reason: String },

    /// Error related to parameter validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error from mathematical operations
    #[error("Math error: {0}")]
    MathError(#[from] MathError),

    /// Error from configuration parsing
    #[error("Configuration error: {0}")]
    ConfigError(#[from] serde_json::Error),
}

impl ForecastError {
    /// Shorthand for a failure attributed to one model candidate
    pub fn model(model: impl Into<String>, reason: impl Into<String>) -> Self {
        ForecastError::ModelError {
            model: model.into(),
            reason: reason.into(),
        }
    }
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;
