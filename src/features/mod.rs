//! Feature schema registry, encoder and scaling.

pub mod encoder;
pub mod scaler;
pub mod schema;

pub use encoder::{encode, encode_columns, EncodedMatrix};
pub use scaler::Standardizer;
pub use schema::{ColumnRef, FeatureKind, FeatureSchema};
