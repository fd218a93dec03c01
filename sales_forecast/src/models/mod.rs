//! Regression candidates for the revenue model pool
//!
//! Every candidate follows the same two-step contract: an untrained
//! [`Regressor`] holds hyperparameters and produces a [`TrainedRegressor`]
//! from a design matrix and target; the trained model only predicts.

use crate::error::{ForecastError, Result};
use ndarray::{Array1, ArrayView1, ArrayView2};
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::fmt::Debug;

/// Trained regression model
pub trait TrainedRegressor: Debug + Send + Sync {
    /// Predict one value per row of `x`
    fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Array1<f64>>;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Regression model that can be trained on a feature table
pub trait Regressor: Debug + Send + Sync {
    /// Train the model on a design matrix and target
    fn fit(&self, x: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>)
        -> Result<Box<dyn TrainedRegressor>>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

/// Shape and finiteness checks shared by every candidate
pub(crate) fn check_training_data(
    name: &str,
    x: ArrayView2<'_, f64>,
    y: ArrayView1<'_, f64>,
) -> Result<()> {
    if x.nrows() == 0 {
        return Err(ForecastError::model(name, "empty training set"));
    }
    if x.nrows() != y.len() {
        return Err(ForecastError::model(
            name,
            format!("{} feature rows but {} targets", x.nrows(), y.len()),
        ));
    }
    if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
        return Err(ForecastError::model(name, "training data is not finite"));
    }
    Ok(())
}

/// Reject prediction inputs whose width differs from training
pub(crate) fn check_width(name: &str, x: ArrayView2<'_, f64>, expected: usize) -> Result<()> {
    if x.ncols() != expected {
        return Err(ForecastError::model(
            name,
            format!("expected {} features, got {}", expected, x.ncols()),
        ));
    }
    Ok(())
}

/// Row-major copy of a design for the smartcore estimators
pub(crate) fn dense_matrix(x: ArrayView2<'_, f64>) -> DenseMatrix<f64> {
    let rows: Vec<Vec<f64>> = x.rows().into_iter().map(|row| row.to_vec()).collect();
    let slices: Vec<&[f64]> = rows.iter().map(Vec::as_slice).collect();
    DenseMatrix::from_2d_array(&slices)
}

pub mod boosting;
pub mod forest;
pub mod linear;
pub mod neural;
pub mod pool;
pub mod standardize;
pub mod svr;

pub use self::boosting::GradientBoosting;
pub use self::forest::RandomForest;
pub use self::linear::{LassoRegression, LinearRegression, RidgeRegression};
pub use self::neural::NeuralNetwork;
pub use self::pool::{CandidateOutcome, ModelPool};
pub use self::standardize::Standardizer;
pub use self::svr::KernelSvr;
