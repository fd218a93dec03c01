//! # Forecast Math
//!
//! Numeric building blocks for sales forecasting.
//! This crate provides descriptive statistics and the least-squares trend
//! fit shared by aggregate and per-item analysis.

use thiserror::Error;

pub mod regression;
pub mod statistics;

pub use crate::regression::{LinearTrend, TrendDirection};

/// Errors that can occur in forecasting math
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for forecasting math operations
pub type Result<T> = std::result::Result<T, MathError>;
