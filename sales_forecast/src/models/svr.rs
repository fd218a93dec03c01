//! Epsilon-insensitive support vector regression with an RBF kernel
//!
//! Fitted by `linfa-svm` on standardized columns. The kernel width follows
//! the usual `1 / (n_features * Var(X))` heuristic.

use crate::error::{ForecastError, Result};
use crate::models::{check_training_data, Regressor, Standardizer, TrainedRegressor};
use linfa::traits::Fit;
use linfa::Dataset;
use linfa_svm::Svm;
use ndarray::{Array1, ArrayView1, ArrayView2};
use std::fmt;
use tracing::debug;

/// Support vector regression candidate
#[derive(Debug, Clone)]
pub struct KernelSvr {
    name: String,
    c: f64,
    epsilon: f64,
}

/// Trained kernel regressor
pub struct TrainedKernelSvr {
    name: String,
    standardizer: Standardizer,
    model: Svm<f64, f64>,
}

impl fmt::Debug for TrainedKernelSvr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrainedKernelSvr")
            .field("name", &self.name)
            .field("standardizer", &self.standardizer)
            .finish_non_exhaustive()
    }
}

impl KernelSvr {
    pub fn new(c: f64, epsilon: f64) -> Result<Self> {
        if !(c > 0.0) {
            return Err(ForecastError::InvalidParameter(
                "SVR C must be positive".to_string(),
            ));
        }
        if !(epsilon >= 0.0) {
            return Err(ForecastError::InvalidParameter(
                "SVR epsilon must be non-negative".to_string(),
            ));
        }

        Ok(Self {
            name: "SVR".to_string(),
            c,
            epsilon,
        })
    }
}

impl Regressor for KernelSvr {
    fn fit(
        &self,
        x: ArrayView2<'_, f64>,
        y: ArrayView1<'_, f64>,
    ) -> Result<Box<dyn TrainedRegressor>> {
        check_training_data(&self.name, x, y)?;
        let (standardizer, scaled) = Standardizer::fit(&self.name, x, y)?;

        // linfa's Gaussian kernel is exp(-|a - b|² / width)
        let variance = scaled.var(0.0);
        let width = if variance > 0.0 {
            scaled.ncols() as f64 * variance
        } else {
            1.0
        };

        let dataset = Dataset::new(scaled, y.to_owned());
        let model = Svm::<f64, f64>::params()
            .c_svr(self.c, Some(self.epsilon))
            .gaussian_kernel(width)
            .fit(&dataset)
            .map_err(|e| ForecastError::model(&self.name, e.to_string()))?;
        debug!(model = %self.name, width, "svr fitted");

        Ok(Box::new(TrainedKernelSvr {
            name: self.name.clone(),
            standardizer,
            model,
        }))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedRegressor for TrainedKernelSvr {
    fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
        use linfa::traits::Predict;

        let scaled = self.standardizer.transform(x)?;
        let predicted: Array1<f64> = self.model.predict(&scaled);
        Ok(predicted)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
