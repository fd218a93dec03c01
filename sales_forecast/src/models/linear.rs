//! Linear regression candidates: ordinary, L2- and L1-regularized
//!
//! All three fit on standardized columns; the intercept absorbs the target
//! mean and is never penalized. Ordinary least squares comes from
//! `linfa-linear`, both penalized variants from `linfa-elasticnet`.

use crate::error::{ForecastError, Result};
use crate::models::{check_training_data, Regressor, Standardizer, TrainedRegressor};
use linfa::traits::Fit;
use linfa::Dataset;
use linfa_elasticnet::ElasticNet;
use linfa_linear::LinearRegression as OrdinaryLeastSquares;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Ix1};
use tracing::debug;

/// Ordinary least squares
#[derive(Debug, Clone)]
pub struct LinearRegression {
    name: String,
}

/// L2-regularized least squares
#[derive(Debug, Clone)]
pub struct RidgeRegression {
    name: String,
    alpha: f64,
}

/// L1-regularized least squares, fitted by coordinate descent
#[derive(Debug, Clone)]
pub struct LassoRegression {
    name: String,
    alpha: f64,
    max_iterations: u32,
    tolerance: f64,
}

/// Trained linear model shared by the three variants
#[derive(Debug)]
pub struct TrainedLinear {
    name: String,
    standardizer: Standardizer,
    weights: Array1<f64>,
    intercept: f64,
}

impl TrainedLinear {
    /// Coefficients on the standardized, non-constant features
    pub fn weights(&self) -> &Array1<f64> {
        &self.weights
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }
}

impl TrainedRegressor for TrainedLinear {
    fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
        let scaled = self.standardizer.transform(x)?;
        Ok(scaled.dot(&self.weights) + self.intercept)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Standardized training set ready for a linfa estimator
fn prepare(
    name: &str,
    x: ArrayView2<'_, f64>,
    y: ArrayView1<'_, f64>,
) -> Result<(Standardizer, Dataset<f64, f64, Ix1>)> {
    check_training_data(name, x, y)?;
    let (standardizer, scaled): (Standardizer, Array2<f64>) = Standardizer::fit(name, x, y)?;
    Ok((standardizer, Dataset::new(scaled, y.to_owned())))
}

fn penalized(
    name: &str,
    x: ArrayView2<'_, f64>,
    y: ArrayView1<'_, f64>,
    l1_ratio: f64,
    alpha: f64,
    max_iterations: u32,
    tolerance: f64,
) -> Result<Box<dyn TrainedRegressor>> {
    let (standardizer, dataset) = prepare(name, x, y)?;
    let model = ElasticNet::<f64>::params()
        .penalty(alpha)
        .l1_ratio(l1_ratio)
        .max_iterations(max_iterations)
        .tolerance(tolerance)
        .fit(&dataset)
        .map_err(|e| ForecastError::model(name, e.to_string()))?;

    let zeroed = model.hyperplane().iter().filter(|w| **w == 0.0).count();
    debug!(model = name, zeroed, "penalized fit finished");

    Ok(Box::new(TrainedLinear {
        name: name.to_string(),
        standardizer,
        weights: model.hyperplane().clone(),
        intercept: model.intercept(),
    }))
}

impl LinearRegression {
    pub fn new() -> Self {
        Self {
            name: "Linear Regression".to_string(),
        }
    }
}

impl Default for LinearRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl Regressor for LinearRegression {
    /// Fails on a rank-deficient design, e.g. fewer rows than features
    fn fit(
        &self,
        x: ArrayView2<'_, f64>,
        y: ArrayView1<'_, f64>,
    ) -> Result<Box<dyn TrainedRegressor>> {
        let (standardizer, dataset) = prepare(&self.name, x, y)?;
        let model = OrdinaryLeastSquares::default()
            .fit(&dataset)
            .map_err(|e| ForecastError::model(&self.name, e.to_string()))?;

        Ok(Box::new(TrainedLinear {
            name: self.name.clone(),
            standardizer,
            weights: model.params().clone(),
            intercept: model.intercept(),
        }))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl RidgeRegression {
    /// Create a ridge model with penalty `alpha`
    pub fn new(alpha: f64) -> Result<Self> {
        if !(alpha >= 0.0) {
            return Err(ForecastError::InvalidParameter(
                "Ridge alpha must be non-negative".to_string(),
            ));
        }

        Ok(Self {
            name: "Ridge Regression".to_string(),
            alpha,
        })
    }
}

impl Regressor for RidgeRegression {
    fn fit(
        &self,
        x: ArrayView2<'_, f64>,
        y: ArrayView1<'_, f64>,
    ) -> Result<Box<dyn TrainedRegressor>> {
        penalized(&self.name, x, y, 0.0, self.alpha, 1000, 1e-4)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl LassoRegression {
    /// Create a lasso model with penalty `alpha`
    pub fn new(alpha: f64, max_iterations: usize) -> Result<Self> {
        if !(alpha >= 0.0) {
            return Err(ForecastError::InvalidParameter(
                "Lasso alpha must be non-negative".to_string(),
            ));
        }
        if max_iterations == 0 {
            return Err(ForecastError::InvalidParameter(
                "Lasso needs at least one iteration".to_string(),
            ));
        }

        Ok(Self {
            name: "Lasso Regression".to_string(),
            alpha,
            max_iterations: u32::try_from(max_iterations).unwrap_or(u32::MAX),
            tolerance: 1e-4,
        })
    }
}

impl Regressor for LassoRegression {
    fn fit(
        &self,
        x: ArrayView2<'_, f64>,
        y: ArrayView1<'_, f64>,
    ) -> Result<Box<dyn TrainedRegressor>> {
        penalized(
            &self.name,
            x,
            y,
            1.0,
            self.alpha,
            self.max_iterations,
            self.tolerance,
        )
    }

    fn name(&self) -> &str {
        &self.name
    }
}
