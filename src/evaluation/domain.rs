//! Evaluation metrics and fairness group policies.

use serde::{Deserialize, Serialize};

use crate::common::error::HireResult;
use crate::features::encoder::EncodedMatrix;
use crate::features::schema::{FeatureKind, FeatureSchema};

/// Accuracy and fairness of a model on a held-out split.
///
/// `accuracy` and `fairness_gap` lie in `[0, 1]`, `ethical_score` in `[0, 100]`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub accuracy: f64,
    pub fairness_gap: f64,
    pub ethical_score: f64,
}

impl EvaluationResult {
    /// Derive the ethical score: accuracy scaled down by the gap, on a 0-100 scale.
    pub fn new(accuracy: f64, fairness_gap: f64) -> Self {
        let accuracy = accuracy.clamp(0.0, 1.0);
        let fairness_gap = fairness_gap.clamp(0.0, 1.0);
        Self {
            accuracy,
            fairness_gap,
            ethical_score: (accuracy * (1.0 - fairness_gap) * 100.0).clamp(0.0, 100.0),
        }
    }
}

/// Which test rows belong to sensitive group A; everyone else is group B.
///
/// `None` means the sensitive key is not part of the matrix, so no gap can
/// be measured.
pub trait FairnessPolicy {
    fn group_a(
        &self,
        schema: &FeatureSchema,
        matrix: &EncodedMatrix,
        sensitive_key: &str,
    ) -> HireResult<Option<Vec<bool>>>;
}

/// Groups by one designated indicator column of a one-hot encoded attribute.
///
/// The designated column is the first of the key's encoded columns present in
/// the matrix (`gender_M`, `zone_Center`, ...). Numeric keys split at the
/// median: strictly above is group A.
///
/// The label-encoded "above the ordinal median" strategy is not supported; it
/// assigns groups by an arbitrary category ordering.
#[derive(Copy, Clone, Debug, Default)]
pub struct OneHotFairnessPolicy;

impl FairnessPolicy for OneHotFairnessPolicy {
    fn group_a(
        &self,
        schema: &FeatureSchema,
        matrix: &EncodedMatrix,
        sensitive_key: &str,
    ) -> HireResult<Option<Vec<bool>>> {
        let spec = schema.spec(sensitive_key)?;
        let Some(column) = schema
            .columns_for(spec.key)?
            .into_iter()
            .find_map(|c| matrix.column(&c))
        else {
            return Ok(None);
        };

        let groups = match spec.kind {
            FeatureKind::Categorical(_) => column.iter().map(|&v| v > 0.5).collect(),
            FeatureKind::Numeric => {
                let median = median(column.iter().copied());
                column.iter().map(|&v| v > median).collect()
            }
        };
        Ok(Some(groups))
    }
}

fn median(values: impl Iterator<Item = f64>) -> f64 {
    let mut sorted: Vec<f64> = values.collect();
    if sorted.is_empty() {
        return 0.0;
    }
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::domain::{sample_record, Gender, Zone};
    use crate::features::encode;

    #[test]
    fn ethical_score_never_exceeds_accuracy() {
        let r = EvaluationResult::new(0.8, 0.25);
        assert!((r.ethical_score - 60.0).abs() < 1e-9);
        assert!(r.ethical_score <= r.accuracy * 100.0);
        let clamped = EvaluationResult::new(1.2, -0.1);
        assert_eq!(clamped.accuracy, 1.0);
        assert_eq!(clamped.fairness_gap, 0.0);
        assert_eq!(clamped.ethical_score, 100.0);
    }

    #[test]
    fn one_hot_groups_use_first_indicator() {
        let schema = FeatureSchema::canonical();
        let rows = vec![
            sample_record(Zone::Center, Gender::M, None),
            sample_record(Zone::Suburb, Gender::F, None),
            sample_record(Zone::Periphery, Gender::M, None),
        ];
        let m = encode(&schema, &rows, &["zone".to_string()]).unwrap();
        let groups = OneHotFairnessPolicy
            .group_a(&schema, &m, "zone")
            .unwrap()
            .unwrap();
        assert_eq!(groups, vec![true, false, false]);
    }

    #[test]
    fn unmodelled_key_has_no_groups() {
        let schema = FeatureSchema::canonical();
        let rows = vec![sample_record(Zone::Center, Gender::M, None)];
        let m = encode(&schema, &rows, &["age".to_string()]).unwrap();
        assert_eq!(OneHotFairnessPolicy.group_a(&schema, &m, "gender").unwrap(), None);
        assert!(OneHotFairnessPolicy.group_a(&schema, &m, "religion").is_err());
    }

    #[test]
    fn numeric_key_splits_at_median() {
        let schema = FeatureSchema::canonical();
        let mut rows = Vec::new();
        for age in [20, 30, 40, 50] {
            let mut r = sample_record(Zone::Center, Gender::M, None);
            r.age = age;
            rows.push(r);
        }
        let m = encode(&schema, &rows, &["age".to_string()]).unwrap();
        let groups = OneHotFairnessPolicy.group_a(&schema, &m, "age").unwrap().unwrap();
        assert_eq!(groups, vec![false, false, true, true]);
    }
}
