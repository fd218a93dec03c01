//! Descriptive statistics over revenue and quantity series
//!
//! Thin, error-checked wrappers over `statrs` so callers get an explicit
//! `InsufficientData` error instead of a silent NaN.

use crate::{MathError, Result};
use statrs::statistics::Statistics;

/// Arithmetic mean of a non-empty series
pub fn mean(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Mean requires at least one value".to_string(),
        ));
    }

    Ok(values.iter().mean())
}

/// Sample variance (n - 1 denominator)
pub fn sample_variance(values: &[f64]) -> Result<f64> {
    if values.len() < 2 {
        return Err(MathError::InsufficientData(format!(
            "Sample variance requires at least 2 values, have {}",
            values.len()
        )));
    }

    Ok(values.iter().variance())
}

/// Sample standard deviation (n - 1 denominator)
pub fn sample_std_dev(values: &[f64]) -> Result<f64> {
    sample_variance(values).map(f64::sqrt)
}

/// Population standard deviation (n denominator)
pub fn population_std_dev(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Standard deviation requires at least one value".to_string(),
        ));
    }

    Ok(values.iter().population_std_dev())
}

/// Pearson correlation coefficient between two equally long series
pub fn pearson_correlation(x: &[f64], y: &[f64]) -> Result<f64> {
    if x.len() != y.len() {
        return Err(MathError::InvalidInput(format!(
            "Series lengths differ: {} vs {}",
            x.len(),
            y.len()
        )));
    }
    if x.len() < 2 {
        return Err(MathError::InsufficientData(
            "Correlation requires at least 2 points".to_string(),
        ));
    }

    let sd_x = sample_std_dev(x)?;
    let sd_y = sample_std_dev(y)?;
    if sd_x == 0.0 || sd_y == 0.0 {
        return Err(MathError::CalculationError(
            "Correlation is undefined for a constant series".to_string(),
        ));
    }

    let covariance = x.iter().covariance(y.iter());
    Ok(covariance / (sd_x * sd_y))
}

/// Index of the largest value; earlier entries win ties. NaN never wins.
pub fn argmax(values: &[f64]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .filter(|(_, v)| !v.is_nan())
        .fold(None, |best: Option<(usize, f64)>, (i, &v)| match best {
            Some((_, b)) if b >= v => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}
