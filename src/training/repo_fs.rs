//! Filesystem store for the current model artifact.
//!
//! Layout under `<data_root>/models/`:
//! - `<name>_model.json`: model, feature list and manifest in one blob
//! - `<name>_features.json`: side-car ordered feature list for external readers
//!
//! Both files are replaced via write-to-temp-then-rename. `load` only reads
//! the blob, so a concurrent reader sees either the old or the new artifact.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::common::config::AppCfg;
use crate::common::error::{HireError, HireResult};

use super::domain::{ModelArtifact, ModelArtifactStore};

/// Persist the current model artifact on the local filesystem.
pub struct FsModelRepo {
    root: PathBuf,
    name: String,
}

impl FsModelRepo {
    pub fn new(cfg: &AppCfg) -> Self {
        Self {
            root: cfg.models_dir(),
            name: cfg.model_name.clone(),
        }
    }

    pub fn model_path(&self) -> PathBuf {
        self.root.join(format!("{}_model.json", self.name))
    }

    pub fn features_path(&self) -> PathBuf {
        self.root.join(format!("{}_features.json", self.name))
    }
}

/// Write `bytes` to a uniquely named temp file next to `path`, sync it, then rename over `path`.
fn replace_file(dir: &Path, path: &Path, bytes: &[u8]) -> HireResult<()> {
    let mut tmp =
        NamedTempFile::new_in(dir).map_err(|e| HireError::storage("create temp artifact", e))?;
    tmp.write_all(bytes)
        .map_err(|e| HireError::storage("write temp artifact", e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| HireError::storage("sync temp artifact", e))?;
    tmp.persist(path)
        .map_err(|e| HireError::storage("rename artifact", e.error))?;
    Ok(())
}

impl ModelArtifactStore for FsModelRepo {
    fn save(&self, artifact: &ModelArtifact) -> HireResult<()> {
        artifact.validate()?;
        fs::create_dir_all(&self.root).map_err(|e| HireError::storage("create models dir", e))?;

        let features = serde_json::to_vec_pretty(&artifact.feature_list)
            .map_err(|e| HireError::storage("serialize feature list", e))?;
        let blob =
            serde_json::to_vec(artifact).map_err(|e| HireError::storage("serialize model", e))?;

        replace_file(&self.root, &self.features_path(), &features)?;
        replace_file(&self.root, &self.model_path(), &blob)?;

        debug!(path = %self.model_path().display(), bytes = blob.len(), "artifact saved");
        Ok(())
    }

    fn load(&self) -> HireResult<ModelArtifact> {
        let path = self.model_path();
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(HireError::ArtifactNotFound(path.display().to_string()))
            }
            Err(e) => return Err(HireError::storage("read artifact", e)),
        };
        let artifact: ModelArtifact =
            serde_json::from_slice(&bytes).map_err(|e| HireError::storage("parse artifact", e))?;
        artifact.validate()?;
        Ok(artifact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training::repo_mem::tests::tiny_artifact;

    #[test]
    fn load_before_save_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FsModelRepo::new(&AppCfg::rooted_at(dir.path()));
        assert!(matches!(repo.load(), Err(HireError::ArtifactNotFound(_))));
    }

    #[test]
    fn save_writes_blob_and_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FsModelRepo::new(&AppCfg::rooted_at(dir.path()));
        let artifact = tiny_artifact();
        repo.save(&artifact).unwrap();

        let sidecar: Vec<String> =
            serde_json::from_slice(&fs::read(repo.features_path()).unwrap()).unwrap();
        assert_eq!(sidecar, artifact.feature_list);
        let leftovers: Vec<_> = fs::read_dir(dir.path().join("models"))
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(leftovers.len(), 2, "{leftovers:?}");

        let loaded = repo.load().unwrap();
        assert_eq!(loaded, artifact);
    }

    #[test]
    fn concurrent_saves_leave_a_loadable_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = AppCfg::rooted_at(dir.path());
        let artifact = tiny_artifact();

        std::thread::scope(|s| {
            for threshold in [0.3, 0.7] {
                let cfg = &cfg;
                let mut artifact = artifact.clone();
                artifact.manifest.threshold = threshold;
                s.spawn(move || {
                    let repo = FsModelRepo::new(cfg);
                    for _ in 0..10 {
                        repo.save(&artifact).unwrap();
                    }
                });
            }
        });

        let loaded = FsModelRepo::new(&cfg).load().unwrap();
        assert!([0.3, 0.7].contains(&loaded.manifest.threshold));
        assert_eq!(loaded.model, artifact.model);
    }

    #[test]
    fn non_finite_artifact_is_not_written() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FsModelRepo::new(&AppCfg::rooted_at(dir.path()));
        let mut artifact = tiny_artifact();
        artifact.manifest.threshold = f64::INFINITY;
        assert!(matches!(repo.save(&artifact), Err(HireError::Storage(_))));
        assert!(!repo.model_path().exists());
    }

    #[test]
    fn corrupt_blob_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FsModelRepo::new(&AppCfg::rooted_at(dir.path()));
        fs::create_dir_all(dir.path().join("models")).unwrap();
        fs::write(repo.model_path(), b"{not json").unwrap();
        assert!(matches!(repo.load(), Err(HireError::Storage(_))));
    }

    #[test]
    fn tampered_feature_list_is_a_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FsModelRepo::new(&AppCfg::rooted_at(dir.path()));
        let mut artifact = tiny_artifact();
        repo.save(&artifact).unwrap();

        artifact.feature_list.pop();
        fs::write(repo.model_path(), serde_json::to_vec(&artifact).unwrap()).unwrap();
        assert!(matches!(
            repo.load(),
            Err(HireError::ModelArtifactMismatch { .. })
        ));
    }
}
