//! BitmapIndex - Registry of valid 1-item gradual items and their bitmaps.
//!
//! For every attribute column the index builds the increasing-direction
//! bitmap, tests its support once, and when it clears the threshold stores
//! both that bitmap and its transpose (the decreasing direction). A transpose
//! has the same number of set entries, so one test covers both directions.
//!
//! The index is built once per mining session and never mutated afterwards.
//! Consumers look bitmaps up by gradual item in O(1).
//!
//! # Examples
//!
//! ```
//! use gradual::{BitmapIndex, Dataset, GradualItem};
//!
//! let data = Dataset::new(
//!     vec!["Age".into(), "Expenses".into()],
//!     vec![vec![30.0, 10.0], vec![35.0, 8.0], vec![40.0, 7.0]],
//! ).unwrap();
//! let index = BitmapIndex::build(&data, &[0, 1], 0.5, false).unwrap();
//! assert_eq!(index.len(), 4);
//! assert_eq!(index.bitmap(&GradualItem::increasing(0)), index.bitmap(&GradualItem::decreasing(1)));
//! ```

use crate::bitmap::Bitmap;
use crate::dataset::Dataset;
use crate::error::{GradualError, Result};
use crate::item::GradualItem;
use itertools::Itertools;
use log::debug;
use std::collections::HashMap;

/// A gradual item whose bitmap clears the support threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidBin {
    pub item: GradualItem,
    pub bitmap: Bitmap,
    pub support: f64,
}

/// Registry of valid bins for one dataset and threshold.
#[derive(Debug, Clone)]
pub struct BitmapIndex {
    bins: Vec<ValidBin>,
    lookup: HashMap<GradualItem, usize>,
    row_count: usize,
    min_support: f64,
}

impl BitmapIndex {
    /// Build valid bins for `columns` of `data`.
    ///
    /// A bin is kept when its support is `>= min_support` and it has at least
    /// one set entry, so a threshold of 0 still drops empty bitmaps.
    /// A column listed more than once is indexed once.
    ///
    /// # Errors
    ///
    /// - [`GradualError::InvalidParameter`] if `min_support` is outside `[0, 1]`
    /// - [`GradualError::ColumnOutOfRange`] if a column does not exist
    pub fn build(
        data: &Dataset,
        columns: &[usize],
        min_support: f64,
        allow_equal: bool,
    ) -> Result<Self> {
        if !(0.0..=1.0).contains(&min_support) {
            return Err(GradualError::InvalidParameter(format!(
                "min_support must be in [0, 1], got {}",
                min_support
            )));
        }

        let n = data.row_count();
        let mut bins = Vec::with_capacity(columns.len() * 2);
        for &col in columns.iter().unique() {
            if col >= data.column_count() {
                return Err(GradualError::ColumnOutOfRange {
                    index: col,
                    length: data.column_count(),
                });
            }

            let incr = Bitmap::from_comparison(data.column(col), allow_equal);
            let support = incr.support();
            if incr.count() == 0 || support < min_support {
                debug!("column {} rejected: support {:.3} < {}", col, support, min_support);
                continue;
            }

            let decr = incr.transpose();
            bins.push(ValidBin {
                item: GradualItem::increasing(col),
                bitmap: incr,
                support,
            });
            bins.push(ValidBin {
                item: GradualItem::decreasing(col),
                bitmap: decr,
                support,
            });
        }

        let lookup = bins
            .iter()
            .enumerate()
            .map(|(i, bin)| (bin.item, i))
            .collect();

        debug!(
            "bitmap index: {} valid bins over {} columns, {} rows",
            bins.len(),
            columns.len(),
            n
        );

        Ok(Self {
            bins,
            lookup,
            row_count: n,
            min_support,
        })
    }

    /// Valid bins in build order (input column order, increasing first).
    #[inline]
    pub fn bins(&self) -> &[ValidBin] {
        &self.bins
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Rows the bitmaps were built from.
    #[inline]
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    #[inline]
    pub fn min_support(&self) -> f64 {
        self.min_support
    }

    /// Look up a valid bin by item.
    pub fn get(&self, item: &GradualItem) -> Option<&ValidBin> {
        self.lookup.get(item).map(|&i| &self.bins[i])
    }

    /// Bitmap of a valid item.
    pub fn bitmap(&self, item: &GradualItem) -> Option<&Bitmap> {
        self.get(item).map(|bin| &bin.bitmap)
    }

    /// Position of an item in [`BitmapIndex::keys`].
    pub fn position_of(&self, item: &GradualItem) -> Option<usize> {
        self.lookup.get(item).copied()
    }

    /// Ordered 1-item keys, the axis of the search space.
    pub fn keys(&self) -> Vec<GradualItem> {
        self.bins.iter().map(|bin| bin.item).collect()
    }

    /// Number of distinct columns with valid bins.
    pub fn valid_columns(&self) -> usize {
        // bins come in (increasing, decreasing) pairs per column
        self.bins.len() / 2
    }

    /// Fail with [`GradualError::NoValidBins`] when nothing can be joined.
    ///
    /// Two directions of one column never join, so at least two columns are
    /// needed before candidate generation or search makes sense.
    pub fn ensure_minable(&self) -> Result<()> {
        let valid_columns = self.valid_columns();
        if valid_columns < 2 {
            return Err(GradualError::NoValidBins { valid_columns });
        }
        Ok(())
    }
}
