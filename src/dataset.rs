//! Dataset - Validated numeric matrix handed to the mining engine.
//!
//! Reading files and coercing text into numbers happens before this point.
//! `Dataset` is the boundary where a malformed matrix is rejected: it must be
//! rectangular, finite and hold at least two rows. Bitmap construction assumes
//! all of that and never re-checks.
//!
//! Values are stored column-major because every consumer walks one column at
//! a time.

use crate::error::{GradualError, Result};
use serde::Serialize;

/// Rectangular numeric matrix with column titles.
///
/// # Examples
///
/// ```
/// use gradual::Dataset;
///
/// let data = Dataset::new(
///     vec!["Age".into(), "Salary".into()],
///     vec![vec![30.0, 3.0], vec![35.0, 2.0]],
/// ).unwrap();
/// assert_eq!(data.row_count(), 2);
/// assert_eq!(data.column(1), &[3.0, 2.0]);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Dataset {
    titles: Vec<String>,
    columns: Vec<Vec<f64>>,
    row_count: usize,
    time_cols: Vec<usize>,
}

impl Dataset {
    /// Validate row-major data and store it column-major.
    ///
    /// # Errors
    ///
    /// - [`GradualError::EmptyDataset`] if there are no rows or no titles
    /// - [`GradualError::InsufficientRows`] if there is a single row
    /// - [`GradualError::RaggedRow`] if a row's width differs from the titles
    /// - [`GradualError::NonFiniteValue`] on NaN or infinite cells
    pub fn new(titles: Vec<String>, rows: Vec<Vec<f64>>) -> Result<Self> {
        if rows.is_empty() || titles.is_empty() {
            return Err(GradualError::EmptyDataset);
        }
        if rows.len() < 2 {
            return Err(GradualError::InsufficientRows { rows: rows.len() });
        }

        let width = titles.len();
        let mut columns = vec![Vec::with_capacity(rows.len()); width];
        for (r, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(GradualError::RaggedRow {
                    row: r,
                    expected: width,
                    actual: row.len(),
                });
            }
            for (c, &value) in row.iter().enumerate() {
                if !value.is_finite() {
                    return Err(GradualError::NonFiniteValue { row: r, column: c });
                }
                columns[c].push(value);
            }
        }

        Ok(Self {
            titles,
            row_count: rows.len(),
            columns,
            time_cols: Vec::new(),
        })
    }

    /// Build from columns that are already validated and equally long.
    pub(crate) fn from_columns(
        titles: Vec<String>,
        columns: Vec<Vec<f64>>,
        time_cols: Vec<usize>,
    ) -> Result<Self> {
        let row_count = columns.first().map_or(0, |c| c.len());
        if columns.is_empty() || row_count == 0 {
            return Err(GradualError::EmptyDataset);
        }
        if row_count < 2 {
            return Err(GradualError::InsufficientRows { rows: row_count });
        }
        if titles.len() != columns.len() {
            return Err(GradualError::TitleCountMismatch {
                titles: titles.len(),
                columns: columns.len(),
            });
        }
        Ok(Self {
            titles,
            columns,
            row_count,
            time_cols,
        })
    }

    /// Mark columns holding numeric timestamps (seconds).
    ///
    /// Time columns are excluded from mining and drive the temporal variant.
    pub fn with_time_columns(mut self, cols: Vec<usize>) -> Result<Self> {
        for &c in &cols {
            if c >= self.columns.len() {
                return Err(GradualError::ColumnOutOfRange {
                    index: c,
                    length: self.columns.len(),
                });
            }
        }
        let mut cols = cols;
        cols.sort_unstable();
        cols.dedup();
        self.time_cols = cols;
        Ok(self)
    }

    #[inline]
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    #[inline]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    #[inline]
    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    /// Values of one column.
    ///
    /// # Panics
    ///
    /// Panics if `col` is out of range.
    #[inline]
    pub fn column(&self, col: usize) -> &[f64] {
        &self.columns[col]
    }

    #[inline]
    pub fn time_columns(&self) -> &[usize] {
        &self.time_cols
    }

    pub fn is_time_column(&self, col: usize) -> bool {
        self.time_cols.binary_search(&col).is_ok()
    }

    /// All columns that are not time columns, ascending.
    pub fn attribute_columns(&self) -> Vec<usize> {
        (0..self.columns.len())
            .filter(|c| !self.is_time_column(*c))
            .collect()
    }
}
