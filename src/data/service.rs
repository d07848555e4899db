//! Service layer responsible for loading the training dataset.

use std::time::Instant;

use tracing::{info, warn};

use crate::common::error::HireResult;
use crate::common::log::elapsed_ms;

use super::domain::{DataRepo, Dataset};

/// Load and validate the labelled dataset from `repo`.
pub fn load_training_set(repo: &dyn DataRepo) -> HireResult<Dataset> {
    let start = Instant::now();
    let dataset = repo.load_dataset()?;
    let balance = dataset.positive_rate();

    if !(0.45..=0.55).contains(&balance) {
        warn!(ev = "dataset_imbalanced", balance, "label balance outside 45-55%");
    }
    info!(
        ev = "dataset_loaded",
        rows = dataset.len(),
        balance,
        dur_ms = elapsed_ms(start),
    );
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::HireError;
    use crate::data::domain::{sample_record, Gender, Zone};

    struct FixedRepo(Vec<crate::data::domain::RawRecord>);

    impl DataRepo for FixedRepo {
        fn load_dataset(&self) -> HireResult<Dataset> {
            Dataset::new(self.0.clone())
        }
    }

    #[test]
    fn loads_through_repo() {
        let repo = FixedRepo(vec![
            sample_record(Zone::Center, Gender::M, Some(true)),
            sample_record(Zone::Periphery, Gender::F, Some(false)),
        ]);
        let ds = load_training_set(&repo).unwrap();
        assert_eq!(ds.len(), 2);
    }

    #[test]
    fn empty_dataset_fails() {
        let err = load_training_set(&FixedRepo(Vec::new())).unwrap_err();
        assert!(matches!(err, HireError::DatasetUnavailable(_)));
    }
}
