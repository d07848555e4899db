//! Fairness-aware evaluation of a fitted model on a held-out split.

use std::time::Instant;

use tracing::info;

use crate::common::error::{HireError, HireResult};
use crate::common::log::elapsed_ms;
use crate::features::encoder::EncodedMatrix;
use crate::features::schema::FeatureSchema;
use crate::training::domain::TrainedModel;

use super::domain::{EvaluationResult, FairnessPolicy, OneHotFairnessPolicy};

/// Predicted labels: `probability >= threshold` when the model is probabilistic,
/// its direct labels otherwise.
pub fn decide(model: &TrainedModel, matrix: &EncodedMatrix, threshold: f64) -> HireResult<Vec<bool>> {
    Ok(match model.predict_probability(matrix)? {
        Some(probs) => probs.into_iter().map(|p| p >= threshold).collect(),
        None => model.predict(matrix)?,
    })
}

/// `|rate(A) - rate(B)|` of positive predictions; 0 unless both groups are non-empty.
pub fn fairness_gap(predictions: &[bool], group_a: &[bool]) -> f64 {
    let (mut a_n, mut a_pos, mut b_n, mut b_pos) = (0usize, 0usize, 0usize, 0usize);
    for (&pred, &in_a) in predictions.iter().zip(group_a) {
        if in_a {
            a_n += 1;
            a_pos += pred as usize;
        } else {
            b_n += 1;
            b_pos += pred as usize;
        }
    }
    if a_n == 0 || b_n == 0 {
        return 0.0;
    }
    (a_pos as f64 / a_n as f64 - b_pos as f64 / b_n as f64).abs()
}

/// Evaluate with the canonical one-hot fairness policy.
pub fn evaluate(
    model: &TrainedModel,
    test_matrix: &EncodedMatrix,
    test_labels: &[bool],
    sensitive_key: &str,
    threshold: f64,
) -> HireResult<EvaluationResult> {
    evaluate_with(
        &OneHotFairnessPolicy,
        model,
        test_matrix,
        test_labels,
        sensitive_key,
        threshold,
    )
}

pub fn evaluate_with(
    policy: &dyn FairnessPolicy,
    model: &TrainedModel,
    test_matrix: &EncodedMatrix,
    test_labels: &[bool],
    sensitive_key: &str,
    threshold: f64,
) -> HireResult<EvaluationResult> {
    let start = Instant::now();
    if test_matrix.n_rows() != test_labels.len() {
        return Err(HireError::malformed(format!(
            "{} test rows but {} labels",
            test_matrix.n_rows(),
            test_labels.len()
        )));
    }

    let predictions = decide(model, test_matrix, threshold)?;
    let correct = predictions
        .iter()
        .zip(test_labels)
        .filter(|(p, y)| p == y)
        .count();
    let accuracy = if predictions.is_empty() {
        0.0
    } else {
        correct as f64 / predictions.len() as f64
    };

    let gap = match policy.group_a(&FeatureSchema::canonical(), test_matrix, sensitive_key)? {
        Some(groups) => fairness_gap(&predictions, &groups),
        None => 0.0,
    };

    let result = EvaluationResult::new(accuracy, gap);
    info!(
        ev = "model_evaluated",
        variant = %model.variant(),
        sensitive = sensitive_key,
        accuracy = result.accuracy,
        fairness_gap = result.fairness_gap,
        ethical_score = result.ethical_score,
        dur_ms = elapsed_ms(start),
    );
    Ok(result)
}
