//! In-process artifact store, for tests and embedding callers.

use std::sync::Mutex;

use crate::common::error::{HireError, HireResult};

use super::domain::{ModelArtifact, ModelArtifactStore};

#[derive(Default)]
pub struct MemoryModelRepo {
    current: Mutex<Option<ModelArtifact>>,
}

impl MemoryModelRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ModelArtifactStore for MemoryModelRepo {
    fn save(&self, artifact: &ModelArtifact) -> HireResult<()> {
        artifact.validate()?;
        let mut slot = self
            .current
            .lock()
            .map_err(|_| HireError::Storage("artifact slot poisoned".into()))?;
        *slot = Some(artifact.clone());
        Ok(())
    }

    fn load(&self) -> HireResult<ModelArtifact> {
        let slot = self
            .current
            .lock()
            .map_err(|_| HireError::Storage("artifact slot poisoned".into()))?;
        slot.clone()
            .ok_or_else(|| HireError::ArtifactNotFound("memory".into()))
    }
}
