//! Metrics for evaluating candidate models on the held-out split

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Accuracy of one candidate on the test split
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Coefficient of determination
    pub r2_score: f64,
    /// Mean Squared Error
    pub mse: f64,
    /// Mean Absolute Error
    pub mae: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
}

/// Calculate accuracy metrics for predictions vs actual values
pub fn evaluate(predicted: &[f64], actual: &[f64]) -> Result<EvaluationResult> {
    if predicted.len() != actual.len() || predicted.is_empty() {
        return Err(ForecastError::ValidationError(
            "Predicted and actual values must have the same non-zero length".to_string(),
        ));
    }
    if predicted.iter().any(|p| !p.is_finite()) {
        return Err(ForecastError::ValidationError(
            "Predictions must be finite".to_string(),
        ));
    }

    let n = actual.len() as f64;
    let actual_mean = actual.iter().sum::<f64>() / n;

    let errors: Vec<f64> = predicted
        .iter()
        .zip(actual.iter())
        .map(|(&p, &a)| a - p)
        .collect();

    let mae = errors.iter().map(|e| e.abs()).sum::<f64>() / n;
    let ss_residual = errors.iter().map(|e| e.powi(2)).sum::<f64>();
    let mse = ss_residual / n;
    let rmse = mse.sqrt();

    let ss_total = actual.iter().map(|a| (a - actual_mean).powi(2)).sum::<f64>();
    let r2_score = if ss_total == 0.0 {
        if ss_residual == 0.0 {
            1.0
        } else {
            0.0
        }
    } else {
        1.0 - ss_residual / ss_total
    };

    Ok(EvaluationResult {
        r2_score,
        mse,
        mae,
        rmse,
    })
}

impl std::fmt::Display for EvaluationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Model Evaluation Metrics:")?;
        writeln!(f, "  R2:    {:.4}", self.r2_score)?;
        writeln!(f, "  MSE:   {:.4}", self.mse)?;
        writeln!(f, "  MAE:   {:.4}", self.mae)?;
        writeln!(f, "  RMSE:  {:.4}", self.rmse)?;
        Ok(())
    }
}

/// Evaluation of one named candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPerformance {
    pub model: String,
    pub metrics: EvaluationResult,
}

impl ModelPerformance {
    pub fn new(model: impl Into<String>, metrics: EvaluationResult) -> Self {
        Self {
            model: model.into(),
            metrics,
        }
    }
}

/// Ranking order: higher R² first (NaN last), then lower RMSE, then name
pub fn compare_performance(a: &ModelPerformance, b: &ModelPerformance) -> Ordering {
    let r2 = |p: &ModelPerformance| {
        if p.metrics.r2_score.is_nan() {
            f64::NEG_INFINITY
        } else {
            p.metrics.r2_score
        }
    };

    r2(b)
        .total_cmp(&r2(a))
        .then_with(|| a.metrics.rmse.total_cmp(&b.metrics.rmse))
        .then_with(|| a.model.cmp(&b.model))
}

/// Winner of the evaluation table
pub fn select_best(performances: &[ModelPerformance]) -> Option<&ModelPerformance> {
    performances.iter().reduce(|best, candidate| {
        if compare_performance(candidate, best) == Ordering::Less {
            candidate
        } else {
            best
        }
    })
}

/// Sort the table best first
pub fn rank(performances: &mut [ModelPerformance]) {
    performances.sort_by(compare_performance);
}
