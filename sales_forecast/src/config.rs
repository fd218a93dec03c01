//! Analyzer configuration
//!
//! Every threshold the analysis uses lives here. Defaults reproduce the
//! reference behavior; a partial JSON document can override any subset.

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};

/// Hyperparameters of the model candidate pool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelPoolConfig {
    /// L2 penalty of the ridge candidate
    pub ridge_alpha: f64,
    /// L1 penalty of the lasso candidate
    pub lasso_alpha: f64,
    pub lasso_max_iterations: usize,
    pub forest_trees: usize,
    pub forest_max_depth: Option<usize>,
    pub boosting_stages: usize,
    pub boosting_learning_rate: f64,
    pub boosting_max_depth: usize,
    /// Box constraint of the kernel regressor
    pub svr_c: f64,
    /// Width of the insensitive tube of the kernel regressor
    pub svr_epsilon: f64,
    pub mlp_hidden_layers: Vec<usize>,
    pub mlp_epochs: usize,
    pub mlp_learning_rate: f64,
}

impl Default for ModelPoolConfig {
    fn default() -> Self {
        Self {
            ridge_alpha: 1.0,
            lasso_alpha: 0.1,
            lasso_max_iterations: 1000,
            forest_trees: 100,
            forest_max_depth: None,
            boosting_stages: 100,
            boosting_learning_rate: 0.1,
            boosting_max_depth: 3,
            svr_c: 1.0,
            svr_epsilon: 0.1,
            mlp_hidden_layers: vec![100, 50],
            mlp_epochs: 500,
            mlp_learning_rate: 0.001,
        }
    }
}

/// Configuration of a full analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Share of feature rows held out for evaluation
    pub test_ratio: f64,
    /// Seed for the split and every stochastic candidate
    pub seed: u64,
    /// Below this many feature rows the degraded forecast is used
    pub min_feature_rows: usize,
    /// Days projected by the winning model
    pub projection_horizon: usize,
    /// Below this many observations seasonality is not decomposed
    pub seasonal_min_observations: usize,
    /// Anomaly band half-width in standard deviations
    pub anomaly_sigma: f64,
    /// Deviation beyond which an anomaly is high severity
    pub high_severity_sigma: f64,
    /// Observation count at which data-sufficiency risk reaches zero
    pub data_sufficiency_target: usize,
    /// Periods forecast for each item
    pub item_horizon: usize,
    /// Train candidates on the rayon pool
    pub parallel_training: bool,
    pub models: ModelPoolConfig,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            test_ratio: 0.2,
            seed: 42,
            min_feature_rows: 5,
            projection_horizon: 90,
            seasonal_min_observations: 12,
            anomaly_sigma: 2.0,
            high_severity_sigma: 3.0,
            data_sufficiency_target: 30,
            item_horizon: 7,
            parallel_training: true,
            models: ModelPoolConfig::default(),
        }
    }
}

impl AnalyzerConfig {
    /// Parse a JSON document; missing fields keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field for a usable value
    pub fn validate(&self) -> Result<()> {
        if !(self.test_ratio > 0.0 && self.test_ratio < 1.0) {
            return Err(ForecastError::InvalidParameter(
                "test_ratio must be between 0 and 1".to_string(),
            ));
        }
        if self.min_feature_rows < 2 {
            return Err(ForecastError::InvalidParameter(
                "min_feature_rows must be at least 2".to_string(),
            ));
        }
        if self.projection_horizon < 30 {
            return Err(ForecastError::InvalidParameter(
                "projection_horizon must cover the 30-day slice".to_string(),
            ));
        }
        if self.anomaly_sigma <= 0.0 || self.high_severity_sigma < self.anomaly_sigma {
            return Err(ForecastError::InvalidParameter(
                "anomaly thresholds must satisfy 0 < anomaly_sigma <= high_severity_sigma"
                    .to_string(),
            ));
        }
        if self.data_sufficiency_target == 0 {
            return Err(ForecastError::InvalidParameter(
                "data_sufficiency_target must be positive".to_string(),
            ));
        }
        if self.item_horizon == 0 {
            return Err(ForecastError::InvalidParameter(
                "item_horizon must be positive".to_string(),
            ));
        }

        let models = &self.models;
        if models.ridge_alpha < 0.0 || models.lasso_alpha < 0.0 {
            return Err(ForecastError::InvalidParameter(
                "regularization strengths must be non-negative".to_string(),
            ));
        }
        if models.forest_trees == 0 || models.boosting_stages == 0 {
            return Err(ForecastError::InvalidParameter(
                "ensembles need at least one estimator".to_string(),
            ));
        }
        if models.boosting_learning_rate <= 0.0 || models.mlp_learning_rate <= 0.0 {
            return Err(ForecastError::InvalidParameter(
                "learning rates must be positive".to_string(),
            ));
        }
        if models.svr_c <= 0.0 || models.svr_epsilon < 0.0 {
            return Err(ForecastError::InvalidParameter(
                "svr_c must be positive and svr_epsilon non-negative".to_string(),
            ));
        }
        if models.mlp_hidden_layers.is_empty() || models.mlp_hidden_layers.contains(&0) {
            return Err(ForecastError::InvalidParameter(
                "mlp_hidden_layers must list non-empty layers".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = AnalyzerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.seed, 42);
        assert_eq!(config.models.mlp_hidden_layers, vec![100, 50]);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            AnalyzerConfig::from_json_str(r#"{"seed": 7, "models": {"forest_trees": 10}}"#)
                .unwrap();

        assert_eq!(config.seed, 7);
        assert_eq!(config.models.forest_trees, 10);
        assert_eq!(config.models.boosting_stages, 100);
        assert_eq!(config.test_ratio, 0.2);
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(matches!(
            AnalyzerConfig::from_json_str(r#"{"test_ratio": 1.5}"#),
            Err(ForecastError::InvalidParameter(_))
        ));
        assert!(matches!(
            AnalyzerConfig::from_json_str("not json"),
            Err(ForecastError::ConfigError(_))
        ));

        let mut config = AnalyzerConfig::default();
        config.models.mlp_hidden_layers = vec![10, 0];
        assert!(config.validate().is_err());
    }
}
