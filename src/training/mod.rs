//! Training domain: classifier variants, the trainer, and artifact persistence.

pub mod domain;
pub mod models;
pub mod repo_fs;
pub mod repo_mem;
pub mod service;

pub use domain::{
    ArtifactManifest, ModelArtifact, ModelArtifactStore, ModelVariant, TrainConfig, TrainedModel,
};
pub use repo_fs::FsModelRepo;
pub use repo_mem::MemoryModelRepo;
