//! End-to-end scenarios across dataset, training, persistence and prediction.

use fairhire::common::config::AppCfg;
use fairhire::data::domain::{Education, Gender, RawRecord, Zone};
use fairhire::data::repo_fs::{write_csv, FsDataRepo};
use fairhire::data::synth;
use fairhire::evaluation::service::evaluate;
use fairhire::features::{encode, encode_columns, FeatureSchema};
use fairhire::inference::service::predict;
use fairhire::training::service::train;
use fairhire::training::{FsModelRepo, ModelArtifactStore, ModelVariant};
use fairhire::{handle_predict, handle_train};
use serde_json::Value;

fn keys(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn workspace() -> (tempfile::TempDir, AppCfg) {
    let dir = tempfile::tempdir().unwrap();
    let cfg = AppCfg::rooted_at(dir.path());
    write_csv(&cfg.dataset_path, &synth::generate(2500, 42)).unwrap();
    (dir, cfg)
}

#[test]
fn tree_on_balanced_dataset_beats_chance() {
    let (_dir, cfg) = workspace();
    let out: Value = serde_json::from_str(&handle_train(
        r#"{"features":["age","gender","experience","zone","education"],"model_type":"tree","threshold":0.5}"#,
        &cfg,
        &FsDataRepo::new(&cfg),
        &FsModelRepo::new(&cfg),
    ))
    .unwrap();

    assert!(out.get("error").is_none(), "{out}");
    let accuracy = out["accuracy"].as_f64().unwrap();
    let ethical = out["ethical_score"].as_f64().unwrap();
    assert!(accuracy > 0.5, "accuracy {accuracy}");
    assert!(ethical <= accuracy * 100.0);
    assert!(cfg.models_dir().join("current_model.json").exists());
    assert!(cfg.models_dir().join("current_features.json").exists());
}

#[test]
fn prediction_scenario_after_training() {
    let (_dir, cfg) = workspace();
    let store = FsModelRepo::new(&cfg);
    handle_train(
        r#"{"model_type":"logreg"}"#,
        &cfg,
        &FsDataRepo::new(&cfg),
        &store,
    );

    let out: Value = serde_json::from_str(&handle_predict(
        r#"{"age":30,"gender":"M","income":2000,"experience":5,"zone":"Center","education":"HighSchool"}"#,
        &store,
    ))
    .unwrap();
    let label = out["prediction"].as_u64().unwrap();
    assert!(label == 0 || label == 1);
    let confidence = out["confidence"].as_f64().unwrap();
    assert!((0.0..=100.0).contains(&confidence));
}

#[test]
fn persisted_model_predicts_like_the_original() {
    let (_dir, cfg) = workspace();
    let records = synth::generate(600, 8);
    let schema = FeatureSchema::canonical();
    let matrix = encode(&schema, &records, &keys(&["age", "gender", "income", "zone", "education"]))
        .unwrap();
    let labels: Vec<bool> = records.iter().map(|r| r.hired == Some(true)).collect();

    for variant in [
        ModelVariant::LogisticClassifier,
        ModelVariant::DecisionTree,
        ModelVariant::RandomForest,
        ModelVariant::SupportVectorClassifier,
    ] {
        let out = train(&matrix, &labels, variant, 0.3, 42).unwrap();
        let eval = evaluate(&out.model, &out.test_matrix, &out.test_labels, "gender", 0.5).unwrap();
        let before = out.model.predict(&out.test_matrix).unwrap();

        let store = FsModelRepo::new(&cfg);
        let manifest = fairhire::training::ArtifactManifest {
            variant,
            threshold: 0.5,
            trained_at: chrono::Utc::now(),
            train_rows: out.train_rows,
            test_rows: out.test_labels.len(),
            evaluation: Some(eval),
        };
        store
            .save(&fairhire::training::ModelArtifact::new(out.model.clone(), manifest))
            .unwrap();
        let loaded = store.load().unwrap();

        assert_eq!(loaded.model.predict(&out.test_matrix).unwrap(), before);
        assert_eq!(loaded.feature_list, out.model.features());
    }
}

#[test]
fn single_record_always_fills_the_training_column_space() {
    let schema = FeatureSchema::canonical();
    let training = encode(
        &schema,
        &synth::generate(100, 2),
        &keys(&["education", "age", "zone", "gender"]),
    )
    .unwrap();

    for zone in [Zone::Center, Zone::Periphery, Zone::Suburb] {
        for education in [Education::Nothing, Education::Master] {
            let record = RawRecord {
                age: 41,
                gender: Gender::F,
                income: 3100.0,
                experience: 9,
                zone,
                education,
                hired: None,
            };
            let one = encode_columns(&schema, &[record], training.columns()).unwrap();
            assert_eq!(one.columns(), training.columns());
            assert_eq!(one.n_cols(), training.n_cols());
        }
    }
}

#[test]
fn fairness_gap_is_zero_for_unmodelled_sensitive_key() {
    let (_dir, cfg) = workspace();
    let out: Value = serde_json::from_str(&handle_train(
        r#"{"features":["age","experience","education"],"model_type":"forest","sensitive":"zone"}"#,
        &cfg,
        &FsDataRepo::new(&cfg),
        &FsModelRepo::new(&cfg),
    ))
    .unwrap();
    assert_eq!(out["fairness_gap"].as_f64().unwrap(), 0.0);
}

#[test]
fn unsupported_model_type_never_trains() {
    let (_dir, cfg) = workspace();
    let store = FsModelRepo::new(&cfg);
    let out: Value = serde_json::from_str(&handle_train(
        r#"{"model_type":"gradient_boosting"}"#,
        &cfg,
        &FsDataRepo::new(&cfg),
        &store,
    ))
    .unwrap();
    assert_eq!(out["code"], "unsupported_model_variant");
    assert!(store.load().is_err());
}

#[test]
fn missing_dataset_is_structured_error() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = AppCfg::rooted_at(dir.path());
    let out: Value = serde_json::from_str(&handle_train(
        "{}",
        &cfg,
        &FsDataRepo::new(&cfg),
        &FsModelRepo::new(&cfg),
    ))
    .unwrap();
    assert_eq!(out["code"], "dataset_unavailable");
}

#[test]
fn non_finite_cell_is_rejected_before_training() {
    let (_dir, cfg) = workspace();
    let text = std::fs::read_to_string(&cfg.dataset_path).unwrap();
    let mut lines: Vec<String> = text.lines().map(str::to_string).collect();
    lines[2] = "43,M,NaN,5,Center,None,0".to_string();
    std::fs::write(&cfg.dataset_path, lines.join("\n") + "\n").unwrap();

    let store = FsModelRepo::new(&cfg);
    let out: Value = serde_json::from_str(&handle_train(
        r#"{"model_type":"logreg"}"#,
        &cfg,
        &FsDataRepo::new(&cfg),
        &store,
    ))
    .unwrap();
    assert_eq!(out["code"], "dataset_unavailable");
    assert!(out["error"].as_str().unwrap().contains("line 3"));
    assert!(store.load().is_err());
    assert!(!store.model_path().exists());
}
