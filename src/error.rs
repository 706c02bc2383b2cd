//! Error types for the gradual pattern mining engine.
//!
//! This module provides a unified error type for every operation in the crate,
//! using the `thiserror` crate for ergonomic error handling.
//!
//! Two variants are *expected outcomes* rather than failures:
//! [`GradualError::NoValidBins`] and [`GradualError::DegenerateSearchSpace`].
//! Search strategies convert them into an empty report. Everything else is a
//! structural problem with the input and is surfaced to the caller.

use thiserror::Error;

/// The main error type for gradual pattern mining.
#[derive(Error, Debug)]
pub enum GradualError {
    /// Fewer than two columns produced a bitmap that clears the support threshold
    #[error("No valid bins: only {valid_columns} column(s) clear the support threshold")]
    NoValidBins {
        /// Number of columns whose bitmaps are valid
        valid_columns: usize,
    },

    /// There are no valid 1-item gradual items to encode a position over
    #[error("Degenerate search space: no valid gradual items to encode")]
    DegenerateSearchSpace,

    /// Search space needs more bits than a position can hold
    #[error("Search space too wide: {width} gradual items, at most {max} supported")]
    SearchSpaceTooWide {
        /// Number of valid 1-item gradual items
        width: usize,
        /// Maximum supported width
        max: usize,
    },

    /// Target column does not exist in the dataset
    #[error("Target column {column} does not exist, select a column between 0 and {last}")]
    TargetColumnOutOfRange {
        /// Requested target column
        column: usize,
        /// Index of the last column
        last: usize,
    },

    /// Target column is a date-time column
    #[error("Target column {0} is a date-time attribute")]
    TargetColumnIsTime(usize),

    /// Temporal mining requested on a dataset without time columns
    #[error("No date-time columns found in dataset")]
    NoTimeColumns,

    /// Dataset has no rows or no columns
    #[error("Dataset is empty")]
    EmptyDataset,

    /// Dataset has too few rows to form a row pair
    #[error("Dataset has {rows} row(s), at least 2 are required")]
    InsufficientRows {
        /// Number of rows received
        rows: usize,
    },

    /// A row does not have the same width as the header
    #[error("Ragged row {row}: expected {expected} values, got {actual}")]
    RaggedRow {
        /// Row index
        row: usize,
        /// Expected number of values
        expected: usize,
        /// Actual number of values
        actual: usize,
    },

    /// A cell holds NaN or an infinite value
    #[error("Non-finite value at row {row}, column {column}")]
    NonFiniteValue {
        /// Row index
        row: usize,
        /// Column index
        column: usize,
    },

    /// Number of titles does not match the number of columns
    #[error("Title count mismatch: {titles} titles for {columns} columns")]
    TitleCountMismatch {
        /// Number of titles
        titles: usize,
        /// Number of columns
        columns: usize,
    },

    /// Column index out of bounds
    #[error("Column out of bounds: index {index}, length {length}")]
    ColumnOutOfRange {
        /// The column that was accessed
        index: usize,
        /// The number of columns
        length: usize,
    },

    /// A gradual pattern already holds an item on this column
    #[error("Column {0} is already present in the pattern")]
    DuplicateColumn(usize),

    /// Bitmaps were requested before the session built them
    #[error("Bitmaps not built - call build_bitmaps() before use")]
    BitmapsNotBuilt,

    /// The session already produced its report
    #[error("Mining session already finalized")]
    SessionFinalized,

    /// Invalid parameter value
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// JSON serialization error occurred
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GradualError {
    /// Whether the error means "nothing to mine" rather than "cannot mine".
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            GradualError::NoValidBins { .. } | GradualError::DegenerateSearchSpace
        )
    }
}

/// A specialized `Result` type for gradual pattern mining.
pub type Result<T> = std::result::Result<T, GradualError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GradualError::NoValidBins { valid_columns: 1 };
        assert_eq!(
            err.to_string(),
            "No valid bins: only 1 column(s) clear the support threshold"
        );

        let err = GradualError::TargetColumnOutOfRange { column: 9, last: 3 };
        assert_eq!(
            err.to_string(),
            "Target column 9 does not exist, select a column between 0 and 3"
        );
    }

    #[test]
    fn test_recoverable() {
        assert!(GradualError::NoValidBins { valid_columns: 0 }.is_recoverable());
        assert!(GradualError::DegenerateSearchSpace.is_recoverable());
        assert!(!GradualError::TargetColumnIsTime(0).is_recoverable());
        assert!(!GradualError::EmptyDataset.is_recoverable());
    }

    #[test]
    fn test_result_type() {
        fn returns_result() -> Result<i32> {
            Ok(42)
        }

        assert_eq!(returns_result().unwrap(), 42);
    }
}
