//! Typed errors for the data layer.
//!
//! Loader plumbing uses `anyhow` for context chains; these are the leaf
//! errors that callers may want to match on.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SelectionError {
    #[error("dataset contains no records")]
    EmptyDataset,

    #[error("year {0} is not present in the dataset")]
    UnknownYear(i32),

    #[error("region '{0}' is not present in the dataset")]
    UnknownRegion(String),

    #[error("country '{0}' is not present in the dataset")]
    UnknownCountry(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("missing column '{0}'")]
    MissingColumn(&'static str),

    #[error("row {row}: missing value in column '{column}'")]
    MissingValue { row: usize, column: &'static str },

    #[error("row {row}: '{value}' is not a valid value for column '{column}'")]
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("column '{column}' has type {found}, expected {expected}")]
    UnexpectedType {
        column: &'static str,
        found: String,
        expected: &'static str,
    },
}
