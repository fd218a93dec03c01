//! The fixed pool of regression candidates trained once per run

use crate::config::AnalyzerConfig;
use crate::error::Result;
use crate::models::{
    GradientBoosting, KernelSvr, LassoRegression, LinearRegression, NeuralNetwork, RandomForest,
    Regressor, RidgeRegression, TrainedRegressor,
};
use ndarray::{ArrayView1, ArrayView2};
use rayon::prelude::*;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::{debug, warn};

/// Result of training one candidate
#[derive(Debug)]
pub enum CandidateOutcome {
    Trained(Box<dyn TrainedRegressor>),
    Failed { name: String, reason: String },
}

impl CandidateOutcome {
    pub fn name(&self) -> &str {
        match self {
            CandidateOutcome::Trained(model) => model.name(),
            CandidateOutcome::Failed { name, .. } => name,
        }
    }

    pub fn is_trained(&self) -> bool {
        matches!(self, CandidateOutcome::Trained(_))
    }

    /// The trained model, if training succeeded
    pub fn into_trained(self) -> Option<Box<dyn TrainedRegressor>> {
        match self {
            CandidateOutcome::Trained(model) => Some(model),
            CandidateOutcome::Failed { .. } => None,
        }
    }
}

/// Independently owned regression candidates
#[derive(Debug)]
pub struct ModelPool {
    candidates: Vec<Box<dyn Regressor>>,
    parallel: bool,
}

impl ModelPool {
    pub fn new(candidates: Vec<Box<dyn Regressor>>, parallel: bool) -> Self {
        Self {
            candidates,
            parallel,
        }
    }

    /// The seven standard candidates configured from `config`
    pub fn standard(config: &AnalyzerConfig) -> Result<Self> {
        let m = &config.models;
        let candidates: Vec<Box<dyn Regressor>> = vec![
            Box::new(LinearRegression::new()),
            Box::new(RidgeRegression::new(m.ridge_alpha)?),
            Box::new(LassoRegression::new(m.lasso_alpha, m.lasso_max_iterations)?),
            Box::new(RandomForest::new(
                m.forest_trees,
                m.forest_max_depth,
                config.seed,
            )?),
            Box::new(GradientBoosting::new(
                m.boosting_stages,
                m.boosting_learning_rate,
                m.boosting_max_depth,
            )?),
            Box::new(KernelSvr::new(m.svr_c, m.svr_epsilon)?),
            Box::new(NeuralNetwork::new(
                m.mlp_hidden_layers.clone(),
                m.mlp_epochs,
                m.mlp_learning_rate,
                config.seed,
            )?),
        ];

        Ok(Self::new(candidates, config.parallel_training))
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.candidates.iter().map(|c| c.name()).collect()
    }

    /// Fit every candidate; one candidate failing never affects the others.
    /// Outcomes come back in pool order regardless of scheduling.
    pub fn train(&self, x: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>) -> Vec<CandidateOutcome> {
        if self.parallel {
            self.candidates
                .par_iter()
                .map(|candidate| train_one(candidate.as_ref(), x, y))
                .collect()
        } else {
            self.candidates
                .iter()
                .map(|candidate| train_one(candidate.as_ref(), x, y))
                .collect()
        }
    }
}

fn train_one(
    candidate: &dyn Regressor,
    x: ArrayView2<'_, f64>,
    y: ArrayView1<'_, f64>,
) -> CandidateOutcome {
    let name = candidate.name().to_string();
    let reason = match catch_unwind(AssertUnwindSafe(|| candidate.fit(x, y))) {
        Ok(Ok(model)) => {
            debug!(model = %name, rows = x.nrows(), "candidate trained");
            return CandidateOutcome::Trained(model);
        }
        Ok(Err(e)) => e.to_string(),
        Err(_) => "training panicked".to_string(),
    };

    warn!(model = %name, error = %reason, "candidate dropped from pool");
    CandidateOutcome::Failed { name, reason }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ForecastError;
    use ndarray::{Array1, Array2};

    #[derive(Debug)]
    struct Broken;

    impl Regressor for Broken {
        fn fit(
            &self,
            _x: ArrayView2<'_, f64>,
            _y: ArrayView1<'_, f64>,
        ) -> Result<Box<dyn TrainedRegressor>> {
            Err(ForecastError::model("Broken", "numerical instability"))
        }

        fn name(&self) -> &str {
            "Broken"
        }
    }

    #[derive(Debug)]
    struct Panicking;

    impl Regressor for Panicking {
        fn fit(
            &self,
            _x: ArrayView2<'_, f64>,
            _y: ArrayView1<'_, f64>,
        ) -> Result<Box<dyn TrainedRegressor>> {
            panic!("boom")
        }

        fn name(&self) -> &str {
            "Panicking"
        }
    }

    fn data() -> (Array2<f64>, Array1<f64>) {
        let x = Array2::from_shape_fn((10, 2), |(i, j)| if j == 0 { i as f64 } else { ((i * 7) % 5) as f64 });
        let y = x.column(0).mapv(|v| v * 2.0);
        (x, y)
    }

    #[test]
    fn test_standard_pool_names() {
        let pool = ModelPool::standard(&AnalyzerConfig::default()).unwrap();
        assert_eq!(
            pool.names(),
            vec![
                "Linear Regression",
                "Ridge Regression",
                "Lasso Regression",
                "Random Forest",
                "Gradient Boosting",
                "SVR",
                "Neural Network",
            ]
        );
    }

    #[test]
    fn test_failures_are_isolated() {
        let (x, y) = data();
        let pool = ModelPool::new(
            vec![
                Box::new(Broken),
                Box::new(LinearRegression::new()),
                Box::new(Panicking),
            ],
            true,
        );
        let outcomes = pool.train(x.view(), y.view());

        assert_eq!(outcomes.len(), 3);
        assert!(!outcomes[0].is_trained());
        assert!(outcomes[1].is_trained());
        assert!(!outcomes[2].is_trained());
        assert_eq!(outcomes[2].name(), "Panicking");
        match &outcomes[0] {
            CandidateOutcome::Failed { reason, .. } => {
                assert!(reason.contains("numerical instability"))
            }
            CandidateOutcome::Trained(_) => panic!("expected failure"),
        }
    }
}
