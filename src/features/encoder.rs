//! Feature encoder turning raw records into a named numeric matrix.
//!
//! Batch training and single-record inference go through the same
//! [`encode_columns`] path, so the column space only depends on the target
//! column list and never on the categories present in the rows.

use ndarray::{Array2, ArrayView1, Axis};

use crate::common::error::{HireError, HireResult};
use crate::data::domain::{RawRecord, RawValue};

use super::schema::{ColumnRef, FeatureSchema};

/// Ordered named columns over a row-major value grid.
#[derive(Clone, Debug, PartialEq)]
pub struct EncodedMatrix {
    columns: Vec<String>,
    values: Array2<f64>,
}

impl EncodedMatrix {
    /// Build a matrix, requiring one name per value column.
    pub fn new(columns: Vec<String>, values: Array2<f64>) -> HireResult<Self> {
        if columns.len() != values.ncols() {
            return Err(HireError::malformed(format!(
                "{} column names for {} value columns",
                columns.len(),
                values.ncols()
            )));
        }
        Ok(Self { columns, values })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn n_rows(&self) -> usize {
        self.values.nrows()
    }

    pub fn n_cols(&self) -> usize {
        self.values.ncols()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Values of the named column, if present.
    pub fn column(&self, name: &str) -> Option<ArrayView1<'_, f64>> {
        self.column_index(name).map(|idx| self.values.column(idx))
    }

    /// New matrix holding `rows` in the given order, same columns.
    pub fn select_rows(&self, rows: &[usize]) -> Self {
        Self {
            columns: self.columns.clone(),
            values: self.values.select(Axis(0), rows),
        }
    }
}

/// Encode `rows` for the requested feature keys.
///
/// Fails with `UnknownFeatureKey` for undeclared keys and `NoValidFeatures`
/// when nothing resolves.
pub fn encode(
    schema: &FeatureSchema,
    rows: &[RawRecord],
    requested_keys: &[String],
) -> HireResult<EncodedMatrix> {
    let columns = schema.expand(requested_keys)?;
    encode_columns(schema, rows, &columns)
}

/// Encode `rows` into exactly `columns`, in that order.
///
/// Indicator columns a row does not trigger are zero.
pub fn encode_columns(
    schema: &FeatureSchema,
    rows: &[RawRecord],
    columns: &[String],
) -> HireResult<EncodedMatrix> {
    if columns.is_empty() {
        return Err(HireError::NoValidFeatures);
    }
    let refs = columns
        .iter()
        .map(|c| schema.resolve_column(c))
        .collect::<HireResult<Vec<_>>>()?;

    let mut values = Array2::<f64>::zeros((rows.len(), refs.len()));
    for (r, record) in rows.iter().enumerate() {
        for (c, column) in refs.iter().enumerate() {
            values[[r, c]] = cell(record, column)?;
        }
    }

    EncodedMatrix::new(columns.to_vec(), values)
}

fn cell(record: &RawRecord, column: &ColumnRef) -> HireResult<f64> {
    let raw = record
        .value_of(column.key())
        .ok_or_else(|| HireError::UnknownFeatureKey(column.key().to_string()))?;
    Ok(match (column, raw) {
        (ColumnRef::Numeric { .. }, RawValue::Number(v)) => v,
        (ColumnRef::OneHot { value, .. }, RawValue::Category(actual)) => {
            if *value == actual {
                1.0
            } else {
                0.0
            }
        }
        _ => {
            return Err(HireError::UnknownFeatureKey(format!(
                "{} has mismatched kind",
                column.key()
            )))
        }
    })
}
