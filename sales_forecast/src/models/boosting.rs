//! Gradient-boosted tree ensemble with squared loss
//!
//! Each stage is a depth-limited smartcore regression tree fitted to the
//! residuals of the stages before it.

use crate::error::{ForecastError, Result};
use crate::models::{check_training_data, check_width, dense_matrix, Regressor, TrainedRegressor};
use ndarray::{Array1, ArrayView1, ArrayView2};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::tree::decision_tree_regressor::{
    DecisionTreeRegressor, DecisionTreeRegressorParameters,
};
use std::fmt;

type Stage = DecisionTreeRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// Stagewise additive model of shallow trees fitted to residuals
#[derive(Debug, Clone)]
pub struct GradientBoosting {
    name: String,
    stages: usize,
    learning_rate: f64,
    max_depth: u16,
}

/// Trained gradient boosting model
pub struct TrainedGradientBoosting {
    name: String,
    features: usize,
    initial: f64,
    learning_rate: f64,
    stages: Vec<Stage>,
}

impl fmt::Debug for TrainedGradientBoosting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrainedGradientBoosting")
            .field("name", &self.name)
            .field("features", &self.features)
            .field("initial", &self.initial)
            .field("stages", &self.stages.len())
            .finish()
    }
}

impl GradientBoosting {
    pub fn new(stages: usize, learning_rate: f64, max_depth: usize) -> Result<Self> {
        if stages == 0 {
            return Err(ForecastError::InvalidParameter(
                "Gradient boosting needs at least one stage".to_string(),
            ));
        }
        if !(learning_rate > 0.0 && learning_rate <= 1.0) {
            return Err(ForecastError::InvalidParameter(
                "Learning rate must be in (0, 1]".to_string(),
            ));
        }
        if max_depth == 0 {
            return Err(ForecastError::InvalidParameter(
                "Tree depth must be positive".to_string(),
            ));
        }

        Ok(Self {
            name: "Gradient Boosting".to_string(),
            stages,
            learning_rate,
            max_depth: u16::try_from(max_depth).unwrap_or(u16::MAX),
        })
    }
}

impl Regressor for GradientBoosting {
    fn fit(
        &self,
        x: ArrayView2<'_, f64>,
        y: ArrayView1<'_, f64>,
    ) -> Result<Box<dyn TrainedRegressor>> {
        check_training_data(&self.name, x, y)?;

        let design = dense_matrix(x);
        let initial = y.mean().unwrap_or(0.0);
        let mut fitted = Array1::from_elem(x.nrows(), initial);
        let mut stages = Vec::with_capacity(self.stages);

        for _ in 0..self.stages {
            let residuals = (&y - &fitted).to_vec();
            let params = DecisionTreeRegressorParameters::default().with_max_depth(self.max_depth);
            let tree = Stage::fit(&design, &residuals, params)
                .and_then(|tree| tree.predict(&design).map(|step| (tree, step)));
            let (tree, step) = tree.map_err(|e| ForecastError::model(&self.name, e.to_string()))?;

            fitted.scaled_add(self.learning_rate, &Array1::from(step));
            stages.push(tree);
        }

        Ok(Box::new(TrainedGradientBoosting {
            name: self.name.clone(),
            features: x.ncols(),
            initial,
            learning_rate: self.learning_rate,
            stages,
        }))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedRegressor for TrainedGradientBoosting {
    fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
        check_width(&self.name, x, self.features)?;

        let mut prediction = Array1::from_elem(x.nrows(), self.initial);
        if x.nrows() == 0 {
            return Ok(prediction);
        }

        let design = dense_matrix(x);
        for tree in &self.stages {
            let step = tree
                .predict(&design)
                .map_err(|e| ForecastError::model(&self.name, e.to_string()))?;
            prediction.scaled_add(self.learning_rate, &Array1::from(step));
        }
        Ok(prediction)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
