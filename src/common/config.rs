//! Runtime configuration loaded from the environment.
//!
//! CLI flags may override individual fields after loading; see `main.rs`.

use std::env;
use std::path::PathBuf;

/// Snapshot of configuration values consumed by the core.
#[derive(Clone, Debug)]
pub struct AppCfg {
    pub data_root: PathBuf,
    pub dataset_path: PathBuf,
    pub model_name: String,
    pub seed: u64,
    pub test_ratio: f64,
    pub log_level: String,
}

impl AppCfg {
    /// Create a configuration snapshot from the process environment.
    pub fn load() -> Self {
        fn env_or(key: &str, default: &str) -> String {
            env::var(key).unwrap_or_else(|_| default.to_string())
        }

        let data_root = PathBuf::from(env_or("FAIRHIRE_DATA_ROOT", "."));
        let dataset_path = data_root.join(env_or("FAIRHIRE_DATASET", "dataset.csv"));

        Self {
            data_root,
            dataset_path,
            model_name: env_or("FAIRHIRE_MODEL_NAME", "current"),
            seed: env_or("FAIRHIRE_SEED", "42").parse().unwrap_or(42),
            test_ratio: env_or("FAIRHIRE_TEST_RATIO", "0.3").parse().unwrap_or(0.3),
            log_level: env_or("FAIRHIRE_LOG_LEVEL", "info"),
        }
    }

    /// Configuration rooted at an explicit directory, ignoring the environment.
    pub fn rooted_at(root: impl Into<PathBuf>) -> Self {
        let data_root = root.into();
        Self {
            dataset_path: data_root.join("dataset.csv"),
            data_root,
            model_name: "current".to_string(),
            seed: 42,
            test_ratio: 0.3,
            log_level: "info".to_string(),
        }
    }

    /// Directory holding persisted model artifacts.
    pub fn models_dir(&self) -> PathBuf {
        self.data_root.join("models")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rooted_config_uses_source_defaults() {
        let cfg = AppCfg::rooted_at("/tmp/fh");
        assert_eq!(cfg.dataset_path, PathBuf::from("/tmp/fh/dataset.csv"));
        assert_eq!(cfg.models_dir(), PathBuf::from("/tmp/fh/models"));
        assert_eq!(cfg.seed, 42);
        assert!((cfg.test_ratio - 0.3).abs() < 1e-12);
    }
}
