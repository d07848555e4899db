//! Per-column standardisation fitted on the train split only.

use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Zero-mean, unit-variance transform. Constant columns keep scale 1.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Standardizer {
    means: Vec<f64>,
    scales: Vec<f64>,
}

impl Standardizer {
    pub fn fit(x: &Array2<f64>) -> Self {
        let n = x.nrows().max(1) as f64;
        let means: Array1<f64> = x.sum_axis(Axis(0)) / n;
        let scales = x
            .axis_iter(Axis(1))
            .zip(means.iter())
            .map(|(col, mean)| {
                let var = col.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
                let std = var.sqrt();
                if std > 1e-12 {
                    std
                } else {
                    1.0
                }
            })
            .collect();
        Self {
            means: means.to_vec(),
            scales,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.means
            .iter()
            .chain(self.scales.iter())
            .all(|v| v.is_finite())
    }

    pub fn transform(&self, x: &Array2<f64>) -> Array2<f64> {
        let mut out = x.clone();
        for (mut col, (mean, scale)) in out
            .axis_iter_mut(Axis(1))
            .zip(self.means.iter().zip(self.scales.iter()))
        {
            col.mapv_inplace(|v| (v - mean) / scale);
        }
        out
    }
}
