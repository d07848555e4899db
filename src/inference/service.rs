//! Predictor: single-record inference against a persisted artifact.

use std::time::Instant;

use tracing::info;

use crate::common::error::{HireError, HireResult};
use crate::common::log::elapsed_ms;
use crate::data::domain::RawRecord;
use crate::features::encoder::encode_columns;
use crate::features::schema::FeatureSchema;
use crate::training::domain::ModelArtifact;

use super::domain::Prediction;

/// Encode `record` into the artifact's exact column space and predict.
pub fn predict(record: &RawRecord, artifact: &ModelArtifact) -> HireResult<Prediction> {
    let start = Instant::now();
    artifact.validate()?;

    let matrix = encode_columns(
        &FeatureSchema::canonical(),
        std::slice::from_ref(record),
        &artifact.feature_list,
    )?;

    let probability = artifact
        .model
        .predict_probability(&matrix)?
        .and_then(|p| p.first().copied());
    let label = match probability {
        Some(p) => p >= artifact.manifest.threshold,
        None => *artifact
            .model
            .predict(&matrix)?
            .first()
            .ok_or_else(|| HireError::malformed("model produced no prediction"))?,
    };
    let confidence = probability.map(|p| (p * 1000.0).round() / 10.0);

    info!(
        ev = "prediction",
        variant = %artifact.model.variant(),
        label,
        confidence,
        dur_ms = elapsed_ms(start),
    );

    Ok(Prediction {
        prediction: label as u8,
        confidence,
        features_used: artifact.feature_list.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::domain::{sample_record, Gender, Zone};
    use crate::training::repo_mem::tests::tiny_artifact;

    #[test]
    fn prediction_uses_artifact_columns() {
        let artifact = tiny_artifact();
        let p = predict(&sample_record(Zone::Suburb, Gender::F, None), &artifact).unwrap();
        assert!(p.prediction <= 1);
        let c = p.confidence.unwrap();
        assert!((0.0..=100.0).contains(&c));
        assert_eq!(p.features_used, artifact.feature_list);
    }

    #[test]
    fn width_mismatch_is_reported() {
        let mut artifact = tiny_artifact();
        artifact.feature_list.push("age".to_string());
        let err = predict(&sample_record(Zone::Center, Gender::M, None), &artifact).unwrap_err();
        assert!(matches!(
            err,
            HireError::ModelArtifactMismatch {
                expected: 3,
                actual: 4
            }
        ));
    }
}
