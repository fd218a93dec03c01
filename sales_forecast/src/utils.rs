//! Utility functions for the sales_forecast crate

use chrono::{Days, NaiveDate};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Row indices of a train/test partition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Shuffle `0..n` with a seeded generator and hold out `ceil(n * test_ratio)` rows.
///
/// Returns `None` when either partition would be empty.
pub fn train_test_split(n: usize, test_ratio: f64, seed: u64) -> Option<Split> {
    if n == 0 || !(test_ratio > 0.0 && test_ratio < 1.0) {
        return None;
    }

    let test_size = (n as f64 * test_ratio).ceil() as usize;
    if test_size == 0 || test_size >= n {
        return None;
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let train = indices.split_off(test_size);
    Some(Split {
        train,
        test: indices,
    })
}

/// The `horizon` calendar days following `last`
pub fn future_dates(last: NaiveDate, horizon: usize) -> Vec<NaiveDate> {
    (1..=horizon as u64)
        .map_while(|offset| last.checked_add_days(Days::new(offset)))
        .collect()
}
