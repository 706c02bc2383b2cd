//! Bitmap - Pairwise comparison matrix packed into 32-bit words.
//!
//! A `Bitmap` is an n×n boolean matrix over the rows of a dataset. Entry
//! `(i, j)` is set when row `i` relates to row `j` in the direction a gradual
//! item asks for. The support of a gradual item or pattern is the number of
//! set entries divided by the number of unordered row pairs `n(n-1)/2`.
//!
//! # Design
//!
//! - Uses `BitVec<u32, Lsb0>` for storage, row-major (`bit = i * n + j`)
//! - Joining two patterns is an element-wise AND, done on raw words
//! - `count_and` gives the support count of a join without allocating
//!
//! # Examples
//!
//! ```
//! use gradual::Bitmap;
//!
//! let incr = Bitmap::from_comparison(&[1.0, 2.0, 3.0], false);
//! assert_eq!(incr.count(), 3);
//! assert!(incr.get(0, 2));
//! assert!(!incr.get(2, 0));
//!
//! let decr = incr.transpose();
//! assert!(decr.get(2, 0));
//! assert_eq!((&incr & &decr).count(), 0);
//! ```

use crate::utils::pair_count;
use bitvec::prelude::*;
use serde::Serialize;
use std::ops::BitAnd;

/// Word type for bit storage (32-bit unsigned integer)
pub type Word = u32;

/// Number of bits per word
pub const BITS_PER_WORD: usize = 32;

/// Pairwise comparison matrix for `n` rows.
#[derive(Clone, Debug, Serialize)]
pub struct Bitmap {
    /// Number of rows (the matrix is `size × size`)
    size: usize,
    /// Row-major bit storage with u32 words, LSB0 ordering
    bv: BitVec<u32, Lsb0>,
}

impl Bitmap {
    /// Create an empty `n × n` bitmap.
    #[inline]
    pub fn new(n: usize) -> Self {
        Self {
            size: n,
            bv: BitVec::repeat(false, n * n),
        }
    }

    /// Build the increasing-direction bitmap of one column.
    ///
    /// Entry `(i, j)` is set when `values[i] < values[j]`, or
    /// `values[i] <= values[j]` with `allow_equal`. The diagonal is always
    /// cleared, so a row never pairs with itself.
    ///
    /// # Examples
    ///
    /// ```
    /// use gradual::Bitmap;
    ///
    /// let strict = Bitmap::from_comparison(&[1.0, 1.0], false);
    /// assert_eq!(strict.count(), 0);
    ///
    /// let loose = Bitmap::from_comparison(&[1.0, 1.0], true);
    /// assert_eq!(loose.count(), 2);
    /// ```
    pub fn from_comparison(values: &[f64], allow_equal: bool) -> Self {
        let n = values.len();
        let mut bitmap = Self::new(n);

        for (i, &a) in values.iter().enumerate() {
            for (j, &b) in values.iter().enumerate() {
                if i == j {
                    continue;
                }
                let related = if allow_equal { a <= b } else { a < b };
                if related {
                    bitmap.bv.set(i * n + j, true);
                }
            }
        }

        bitmap
    }

    /// Number of rows covered by the matrix.
    #[inline(always)]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of storage words.
    #[inline(always)]
    pub fn num_words(&self) -> usize {
        self.bv.as_raw_slice().len()
    }

    // =========================================================================
    // Entry Access
    // =========================================================================

    /// Get entry `(i, j)`.
    ///
    /// # Panics
    ///
    /// Panics in debug mode if `i` or `j` is out of range.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> bool {
        debug_assert!(i < self.size && j < self.size, "entry ({}, {}) out of bounds (size: {})", i, j, self.size);
        self.bv[i * self.size + j]
    }

    /// Set entry `(i, j)`.
    ///
    /// # Panics
    ///
    /// Panics in debug mode if `i` or `j` is out of range.
    #[inline]
    pub fn set(&mut self, i: usize, j: usize) {
        debug_assert!(i < self.size && j < self.size, "entry ({}, {}) out of bounds (size: {})", i, j, self.size);
        self.bv.set(i * self.size + j, true);
    }

    /// Clear entry `(i, j)`.
    #[inline]
    pub fn clear(&mut self, i: usize, j: usize) {
        debug_assert!(i < self.size && j < self.size, "entry ({}, {}) out of bounds (size: {})", i, j, self.size);
        self.bv.set(i * self.size + j, false);
    }

    // =========================================================================
    // Counting and Support
    // =========================================================================

    /// Count set entries (population count).
    #[inline]
    pub fn count(&self) -> usize {
        self.bv.count_ones()
    }

    /// Count entries set in both bitmaps (AND + popcount).
    ///
    /// Equivalent to `(self & other).count()` without the allocation.
    ///
    /// # Panics
    ///
    /// Panics if the bitmaps cover a different number of rows.
    pub fn count_and(&self, other: &Bitmap) -> usize {
        assert_eq!(self.size, other.size, "Bitmaps must cover the same rows");

        self.bv
            .as_raw_slice()
            .iter()
            .zip(other.bv.as_raw_slice())
            .map(|(a, b)| (a & b).count_ones() as usize)
            .sum()
    }

    /// Support of this bitmap: set entries over unordered row pairs.
    ///
    /// Clamped to `1.0`; with equal values allowed both `(i, j)` and `(j, i)`
    /// can be set for tied rows.
    #[inline]
    pub fn support(&self) -> f64 {
        support_of(self.count(), self.size)
    }

    // =========================================================================
    // Matrix Operations
    // =========================================================================

    /// AND `other` into this bitmap in place.
    ///
    /// # Panics
    ///
    /// Panics if the bitmaps cover a different number of rows.
    pub fn and_assign(&mut self, other: &Bitmap) {
        assert_eq!(self.size, other.size, "Bitmaps must cover the same rows");

        let words = self.bv.as_raw_mut_slice();
        for (a, b) in words.iter_mut().zip(other.bv.as_raw_slice()) {
            *a &= *b;
        }
    }

    /// Transposed copy: entry `(i, j)` of the result is entry `(j, i)` here.
    ///
    /// The decreasing-direction bitmap of a column is the transpose of its
    /// increasing-direction bitmap.
    pub fn transpose(&self) -> Bitmap {
        let n = self.size;
        let mut result = Bitmap::new(n);
        for idx in self.bv.iter_ones() {
            let (i, j) = (idx / n, idx % n);
            result.bv.set(j * n + i, true);
        }
        result
    }

    /// All set entries as `(i, j)` row pairs, in row-major order.
    pub fn pairs(&self) -> Vec<(usize, usize)> {
        let n = self.size;
        self.bv.iter_ones().map(|idx| (idx / n, idx % n)).collect()
    }

    /// Rows that appear in at least one set entry, ascending.
    pub fn rows_involved(&self) -> Vec<usize> {
        let n = self.size;
        let mut seen = vec![false; n];
        for idx in self.bv.iter_ones() {
            seen[idx / n] = true;
            seen[idx % n] = true;
        }
        seen.iter()
            .enumerate()
            .filter_map(|(row, &hit)| if hit { Some(row) } else { None })
            .collect()
    }

    // =========================================================================
    // Word-Level Access
    // =========================================================================

    /// Direct read-only access to word storage.
    #[inline(always)]
    pub fn words(&self) -> &[Word] {
        self.bv.as_raw_slice()
    }

    /// Estimate memory usage in bytes.
    pub fn memory_usage(&self) -> usize {
        std::mem::size_of::<Self>() + self.bv.capacity().div_ceil(8)
    }
}

/// Support of a set-entry count over the `n(n-1)/2` unordered pairs of `n` rows.
///
/// Returns `0.0` when there are fewer than two rows.
#[inline]
pub fn support_of(count: usize, n: usize) -> f64 {
    let pairs = pair_count(n);
    if pairs == 0.0 {
        return 0.0;
    }
    (count as f64 / pairs).min(1.0)
}

// =============================================================================
// Operators
// =============================================================================

impl BitAnd for &Bitmap {
    type Output = Bitmap;

    /// Element-wise AND of two bitmaps (the join of two patterns).
    fn bitand(self, rhs: Self) -> Self::Output {
        let mut result = self.clone();
        result.and_assign(rhs);
        result
    }
}

impl BitAnd for Bitmap {
    type Output = Bitmap;

    fn bitand(self, rhs: Self) -> Self::Output {
        &self & &rhs
    }
}

impl PartialEq for Bitmap {
    /// Word-level comparison.
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && self.bv.as_raw_slice() == other.bv.as_raw_slice()
    }
}

impl Eq for Bitmap {}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_new() {
        let bm = Bitmap::new(5);
        assert_eq!(bm.size(), 5);
        assert_eq!(bm.num_words(), 1);
        assert_eq!(bm.count(), 0);

        let bm = Bitmap::new(10);
        assert_eq!(bm.num_words(), 4); // 100 bits
    }

    #[test]
    fn test_set_get() {
        let mut bm = Bitmap::new(4);
        assert!(!bm.get(1, 3));
        bm.set(1, 3);
        assert!(bm.get(1, 3));
        assert!(!bm.get(3, 1));
        bm.clear(1, 3);
        assert!(!bm.get(1, 3));
    }

    #[test]
    fn test_strict_comparison() {
        let bm = Bitmap::from_comparison(&[3.0, 2.0, 4.0], false);
        assert_eq!(bm.pairs(), vec![(0, 2), (1, 0), (1, 2)]);
        assert_relative_eq!(bm.support(), 1.0);
    }

    #[test]
    fn test_equal_allowed_clears_diagonal() {
        let bm = Bitmap::from_comparison(&[1.0, 1.0, 2.0], true);
        for i in 0..3 {
            assert!(!bm.get(i, i));
        }
        assert!(bm.get(0, 1));
        assert!(bm.get(1, 0));
        assert_eq!(bm.count(), 4);
        assert_relative_eq!(bm.support(), 1.0); // 4 / 3 clamped
    }

    #[test]
    fn test_transpose() {
        let bm = Bitmap::from_comparison(&[5.0, 1.0, 3.0, 2.0], false);
        let t = bm.transpose();
        for i in 0..4 {
            for j in 0..4 {
                assert_eq!(bm.get(i, j), t.get(j, i));
            }
        }
        assert_eq!(t.transpose(), bm);
    }

    #[test]
    fn test_count_and_matches_operator() {
        let a = Bitmap::from_comparison(&[30.0, 35.0, 40.0, 50.0, 52.0], false);
        let b = Bitmap::from_comparison(&[3.0, 2.0, 4.0, 1.0, 7.0], false);
        let joined = &a & &b;
        assert_eq!(a.count_and(&b), joined.count());
        assert_eq!(joined.count(), 6);
    }

    #[test]
    fn test_and_assign() {
        let mut a = Bitmap::from_comparison(&[1.0, 2.0, 3.0], false);
        let b = a.transpose();
        a.and_assign(&b);
        assert_eq!(a.count(), 0);
    }

    #[test]
    fn test_rows_involved() {
        let mut bm = Bitmap::new(6);
        bm.set(0, 4);
        bm.set(2, 4);
        assert_eq!(bm.rows_involved(), vec![0, 2, 4]);
    }

    #[test]
    fn test_support_of_small() {
        assert_eq!(support_of(0, 0), 0.0);
        assert_eq!(support_of(0, 1), 0.0);
        assert_relative_eq!(support_of(1, 2), 1.0);
        assert_relative_eq!(support_of(5, 5), 0.5);
    }

    #[test]
    fn test_memory_usage() {
        let bm = Bitmap::new(64);
        assert!(bm.memory_usage() >= 512); // 4096 bits
    }
}
