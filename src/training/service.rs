//! Trainer: seeded train/test split, optional scaling, and fitting.

use std::time::Instant;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::common::error::{HireError, HireResult};
use crate::common::log::elapsed_ms;
use crate::features::encoder::EncodedMatrix;
use crate::features::scaler::Standardizer;

use super::domain::{ModelVariant, TrainedModel};
use super::models::Classifier;

/// Output of [`train`]: the fitted model and the held-out split.
#[derive(Clone, Debug)]
pub struct TrainOutcome {
    pub model: TrainedModel,
    pub test_matrix: EncodedMatrix,
    pub test_labels: Vec<bool>,
    pub train_rows: usize,
}

/// Deterministic `(train, test)` row indices; `test_ratio` of the rows go to test.
pub fn split_indices(n: usize, test_ratio: f64, seed: u64) -> HireResult<(Vec<usize>, Vec<usize>)> {
    if !(test_ratio > 0.0 && test_ratio < 1.0) {
        return Err(HireError::malformed(format!(
            "split ratio must lie in (0, 1), got {test_ratio}"
        )));
    }
    let n_test = (n as f64 * test_ratio).round() as usize;
    if n_test == 0 || n_test >= n {
        return Err(HireError::malformed(format!(
            "{n} rows cannot be split into non-empty train and test sets at ratio {test_ratio}"
        )));
    }

    let mut order: Vec<usize> = (0..n).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    order.shuffle(&mut rng);
    let train = order.split_off(n_test);
    Ok((train, order))
}

/// Split, fit `variant` on the train rows, and hand back the test rows.
pub fn train(
    matrix: &EncodedMatrix,
    labels: &[bool],
    variant: ModelVariant,
    split_ratio: f64,
    seed: u64,
) -> HireResult<TrainOutcome> {
    let start = Instant::now();
    if matrix.n_rows() != labels.len() {
        return Err(HireError::malformed(format!(
            "{} rows but {} labels",
            matrix.n_rows(),
            labels.len()
        )));
    }

    let (train_idx, test_idx) = split_indices(matrix.n_rows(), split_ratio, seed)?;
    let train_matrix = matrix.select_rows(&train_idx);
    let train_labels: Vec<bool> = train_idx.iter().map(|&i| labels[i]).collect();
    let test_matrix = matrix.select_rows(&test_idx);
    let test_labels: Vec<bool> = test_idx.iter().map(|&i| labels[i]).collect();

    let scaler = variant
        .uses_scaling()
        .then(|| Standardizer::fit(train_matrix.values()));
    let x = match &scaler {
        Some(s) => s.transform(train_matrix.values()),
        None => train_matrix.values().clone(),
    };

    let mut classifier = variant.classifier(seed);
    classifier.fit(&x, &train_labels)?;

    info!(
        ev = "model_trained",
        variant = %variant,
        train_rows = train_idx.len(),
        test_rows = test_idx.len(),
        columns = matrix.n_cols(),
        dur_ms = elapsed_ms(start),
    );

    Ok(TrainOutcome {
        model: TrainedModel::new(variant, matrix.columns().to_vec(), scaler, classifier),
        test_matrix,
        test_labels,
        train_rows: train_idx.len(),
    })
}
