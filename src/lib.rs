// lib.rs - pipeline orchestrator
pub mod common;
pub mod data;
pub mod features;
pub mod training;
pub mod evaluation;
pub mod inference;
pub mod api;

pub use api::handler::{handle_generate, handle_predict, handle_train};
pub use common::{HireCode, HireError, HireResult};
