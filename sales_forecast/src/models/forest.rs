//! Bagged tree ensemble backed by smartcore's random forest

use crate::error::{ForecastError, Result};
use crate::models::{check_training_data, check_width, dense_matrix, Regressor, TrainedRegressor};
use ndarray::{Array1, ArrayView1, ArrayView2};
use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::fmt;

type Forest = RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// Random forest: fully grown trees on bootstrap resamples, averaged
#[derive(Debug, Clone)]
pub struct RandomForest {
    name: String,
    trees: usize,
    max_depth: Option<u16>,
    seed: u64,
}

/// Trained random forest
pub struct TrainedRandomForest {
    name: String,
    features: usize,
    forest: Forest,
}

impl fmt::Debug for TrainedRandomForest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrainedRandomForest")
            .field("name", &self.name)
            .field("features", &self.features)
            .finish_non_exhaustive()
    }
}

impl RandomForest {
    /// Create a forest of `trees` estimators
    pub fn new(trees: usize, max_depth: Option<usize>, seed: u64) -> Result<Self> {
        if trees == 0 {
            return Err(ForecastError::InvalidParameter(
                "Random forest needs at least one tree".to_string(),
            ));
        }
        if max_depth == Some(0) {
            return Err(ForecastError::InvalidParameter(
                "Tree depth must be positive".to_string(),
            ));
        }

        Ok(Self {
            name: "Random Forest".to_string(),
            trees,
            max_depth: max_depth.map(|d| u16::try_from(d).unwrap_or(u16::MAX)),
            seed,
        })
    }
}

impl Regressor for RandomForest {
    fn fit(
        &self,
        x: ArrayView2<'_, f64>,
        y: ArrayView1<'_, f64>,
    ) -> Result<Box<dyn TrainedRegressor>> {
        check_training_data(&self.name, x, y)?;

        // Every split considers every feature
        let mut params = RandomForestRegressorParameters::default()
            .with_n_trees(self.trees)
            .with_m(x.ncols())
            .with_seed(self.seed);
        if let Some(depth) = self.max_depth {
            params = params.with_max_depth(depth);
        }

        let forest = Forest::fit(&dense_matrix(x), &y.to_vec(), params)
            .map_err(|e| ForecastError::model(&self.name, e.to_string()))?;

        Ok(Box::new(TrainedRandomForest {
            name: self.name.clone(),
            features: x.ncols(),
            forest,
        }))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedRegressor for TrainedRandomForest {
    fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
        check_width(&self.name, x, self.features)?;
        if x.nrows() == 0 {
            return Ok(Array1::zeros(0));
        }

        self.forest
            .predict(&dense_matrix(x))
            .map(Array1::from)
            .map_err(|e| ForecastError::model(&self.name, e.to_string()))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
