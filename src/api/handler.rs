//! Invocation boundary: JSON request in, JSON response out.
//!
//! Every handler returns a response string, never an error. Failures become
//! `{"error": ..., "code": ...}` so the caller always has something to parse.

use std::path::Path;

use serde::Serialize;
use serde_json::json;
use tracing::warn;

use crate::common::config::AppCfg;
use crate::common::error::{HireError, HireResult};
use crate::data::domain::DataRepo;
use crate::data::{repo_fs, service as data_service, synth};
use crate::evaluation::service as evaluation_service;
use crate::features::{encode, FeatureSchema};
use crate::inference::domain::{PredictRequest, Prediction};
use crate::inference::service as inference_service;
use crate::training::domain::{ArtifactManifest, ModelArtifact, ModelArtifactStore, TrainConfig};
use crate::training::service as training_service;

/// Successful training/evaluation response.
#[derive(Clone, Debug, Serialize)]
pub struct EvaluationResponse {
    pub accuracy: f64,
    pub fairness_gap: f64,
    pub ethical_score: f64,
    pub model_type: String,
    pub features: Vec<String>,
}

/// Successful dataset generation response.
#[derive(Clone, Debug, Serialize)]
pub struct GenerateResponse {
    pub rows: usize,
    pub positive_rate: f64,
    pub path: String,
}

/// Render a result as the JSON line written to stdout.
pub fn respond<T: Serialize>(result: HireResult<T>) -> String {
    let value = match result.and_then(|body| {
        serde_json::to_value(body).map_err(|e| HireError::storage("serialize response", e))
    }) {
        Ok(value) => value,
        Err(err) => {
            warn!(ev = "request_failed", code = err.code().as_str(), error = %err);
            json!({ "error": err.to_string(), "code": err.code().as_str() })
        }
    };
    value.to_string()
}

/// Train on the configured dataset, evaluate, and persist the artifact.
pub fn run_training(
    raw: &str,
    cfg: &AppCfg,
    data: &dyn DataRepo,
    store: &dyn ModelArtifactStore,
) -> HireResult<EvaluationResponse> {
    let request = TrainConfig::parse(raw)?;
    let schema = FeatureSchema::canonical();
    schema.spec(&request.sensitive)?;

    let dataset = data_service::load_training_set(data)?;
    let matrix = encode(&schema, &dataset.records, &request.features)?;
    let labels = dataset.labels();

    let outcome = training_service::train(
        &matrix,
        &labels,
        request.variant,
        cfg.test_ratio,
        cfg.seed,
    )?;
    let evaluation = evaluation_service::evaluate(
        &outcome.model,
        &outcome.test_matrix,
        &outcome.test_labels,
        &request.sensitive,
        request.threshold,
    )?;

    let manifest = ArtifactManifest {
        variant: request.variant,
        threshold: request.threshold,
        trained_at: chrono::Utc::now(),
        train_rows: outcome.train_rows,
        test_rows: outcome.test_labels.len(),
        evaluation: Some(evaluation),
    };
    store.save(&ModelArtifact::new(outcome.model, manifest))?;

    Ok(EvaluationResponse {
        accuracy: evaluation.accuracy,
        fairness_gap: evaluation.fairness_gap,
        ethical_score: evaluation.ethical_score,
        model_type: request.variant.as_str().to_string(),
        features: request.features,
    })
}

/// Load the current artifact and predict for the requested applicant.
pub fn run_prediction(raw: &str, store: &dyn ModelArtifactStore) -> HireResult<Prediction> {
    let record = PredictRequest::parse(raw)?.into_record()?;
    let artifact = store.load()?;
    inference_service::predict(&record, &artifact)
}

/// Write a seeded synthetic dataset to `path`.
pub fn run_generate(path: &Path, rows: usize, seed: u64) -> HireResult<GenerateResponse> {
    if rows < 2 {
        return Err(HireError::malformed("need at least two rows"));
    }
    let records = synth::generate(rows, seed);
    repo_fs::write_csv(path, &records)?;
    let positives = records.iter().filter(|r| r.hired == Some(true)).count();
    Ok(GenerateResponse {
        rows: records.len(),
        positive_rate: positives as f64 / records.len() as f64,
        path: path.display().to_string(),
    })
}

/// Response for a command line that could not be parsed.
pub fn usage_error(message: impl Into<String>) -> String {
    respond::<()>(Err(HireError::malformed(message.into().trim_end())))
}

pub fn handle_train(
    raw: &str,
    cfg: &AppCfg,
    data: &dyn DataRepo,
    store: &dyn ModelArtifactStore,
) -> String {
    respond(run_training(raw, cfg, data, store))
}

pub fn handle_predict(raw: &str, store: &dyn ModelArtifactStore) -> String {
    respond(run_prediction(raw, store))
}

pub fn handle_generate(path: &Path, rows: usize, seed: u64) -> String {
    respond(run_generate(path, rows, seed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::domain::Dataset;
    use crate::training::repo_mem::MemoryModelRepo;
    use serde_json::Value;

    struct SynthRepo(usize);

    impl DataRepo for SynthRepo {
        fn load_dataset(&self) -> HireResult<Dataset> {
            Dataset::new(synth::generate(self.0, 42))
        }
    }

    fn parse(s: &str) -> Value {
        serde_json::from_str(s).unwrap()
    }

    #[test]
    fn train_response_has_metrics_and_saves() {
        let cfg = AppCfg::rooted_at(".");
        let store = MemoryModelRepo::new();
        let out = parse(&handle_train(
            r#"{"features":["age","zone","education"],"model_type":"tree","threshold":0.5}"#,
            &cfg,
            &SynthRepo(300),
            &store,
        ));
        assert!(out.get("error").is_none(), "{out}");
        assert_eq!(out["model_type"], "tree");
        assert_eq!(out["features"], json!(["age", "zone", "education"]));
        let acc = out["accuracy"].as_f64().unwrap();
        assert!((0.0..=1.0).contains(&acc));

        let artifact = store.load().unwrap();
        assert_eq!(artifact.feature_list.len(), 1 + 3 + 4);
        assert!(artifact.manifest.evaluation.is_some());
    }

    #[test]
    fn unknown_model_type_is_structured_error() {
        let cfg = AppCfg::rooted_at(".");
        let store = MemoryModelRepo::new();
        let out = parse(&handle_train(
            r#"{"model_type":"knn"}"#,
            &cfg,
            &SynthRepo(100),
            &store,
        ));
        assert_eq!(out["code"], "unsupported_model_variant");
        assert!(out["error"].as_str().unwrap().contains("knn"));
        assert!(store.load().is_err());
    }

    #[test]
    fn unknown_feature_is_structured_error() {
        let cfg = AppCfg::rooted_at(".");
        let out = parse(&handle_train(
            r#"{"features":["age","shoe_size"]}"#,
            &cfg,
            &SynthRepo(100),
            &MemoryModelRepo::new(),
        ));
        assert_eq!(out["code"], "unknown_feature_key");
    }

    #[test]
    fn usage_error_is_a_structured_payload() {
        let raw = usage_error("error: unexpected argument 'extra' found\n\nUsage: fairhire train [REQUEST]\n");
        let out = parse(&raw);
        assert!(!raw.contains('\n'));
        assert_eq!(out["code"], "malformed_request");
        assert!(out["error"].as_str().unwrap().contains("unexpected argument 'extra'"));
    }

    #[test]
    fn predict_without_model_is_not_found() {
        let out = parse(&handle_predict("{}", &MemoryModelRepo::new()));
        assert_eq!(out["code"], "artifact_not_found");
    }

    #[test]
    fn malformed_predict_request() {
        let out = parse(&handle_predict("{oops", &MemoryModelRepo::new()));
        assert_eq!(out["code"], "malformed_request");
    }

    #[test]
    fn predict_after_train() {
        let cfg = AppCfg::rooted_at(".");
        let store = MemoryModelRepo::new();
        handle_train(r#"{"model_type":"svm"}"#, &cfg, &SynthRepo(300), &store);
        let out = parse(&handle_predict(
            r#"{"age":30,"gender":"M","income":2000,"experience":5,"zone":"Center","education":"HighSchool"}"#,
            &store,
        ));
        let label = out["prediction"].as_u64().unwrap();
        assert!(label <= 1);
        let conf = out["confidence"].as_f64().unwrap();
        assert!((0.0..=100.0).contains(&conf));
        assert_eq!(out["features_used"].as_array().unwrap().len(), 1 + 2 + 1 + 3 + 4);
    }

    #[test]
    fn generate_writes_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dataset.csv");
        let out = parse(&handle_generate(&path, 100, 42));
        assert_eq!(out["rows"], 100);
        assert_eq!(repo_fs::read_csv(&path).unwrap().len(), 100);
    }
}
