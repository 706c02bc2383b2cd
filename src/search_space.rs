//! SearchSpace - Bit-position encoding of gradual item combinations.
//!
//! Every metaheuristic represents a candidate pattern as one non-negative
//! number. With `k` valid 1-item gradual items in a fixed order, a position
//! is truncated to an integer and its binary digits are read
//! most-significant-first: digit `i` set selects `keys[i]`. The binary form
//! has no fixed width, it is the natural bit length of the integer, so for
//! any nonzero position the leading digit is 1 and `keys[0]` is selected.
//!
//! Only the first item per column is kept, which preserves the one direction
//! per column invariant of a gradual pattern.
//!
//! Positions live in `[0, 2^k - 1]`. They are carried as `f64` by the search
//! loops and decoded through `u128`, which bounds `k` at [`MAX_WIDTH`].

use crate::bitmap::Bitmap;
use crate::bitmap_index::BitmapIndex;
use crate::error::{GradualError, Result};
use crate::item::GradualItem;
use crate::pattern::GradualPattern;

/// Widest supported search space.
pub const MAX_WIDTH: usize = 127;

/// Ordered 1-item keys spanning the search space.
///
/// # Examples
///
/// ```
/// use gradual::{GradualItem, SearchSpace};
///
/// let space = SearchSpace::new(vec![
///     GradualItem::increasing(0),
///     GradualItem::decreasing(0),
///     GradualItem::increasing(1),
///     GradualItem::decreasing(1),
/// ]).unwrap();
/// assert_eq!(space.var_max(), 15);
///
/// // 0b1001 selects keys 0 and 3
/// let gp = space.decode(Some(9.0));
/// assert_eq!(gp.items(), &[GradualItem::increasing(0), GradualItem::decreasing(1)]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSpace {
    keys: Vec<GradualItem>,
}

impl SearchSpace {
    /// Create a search space over `keys`.
    ///
    /// # Errors
    ///
    /// - [`GradualError::DegenerateSearchSpace`] if `keys` is empty
    /// - [`GradualError::SearchSpaceTooWide`] if there are more than
    ///   [`MAX_WIDTH`] keys
    pub fn new(keys: Vec<GradualItem>) -> Result<Self> {
        if keys.is_empty() {
            return Err(GradualError::DegenerateSearchSpace);
        }
        if keys.len() > MAX_WIDTH {
            return Err(GradualError::SearchSpaceTooWide {
                width: keys.len(),
                max: MAX_WIDTH,
            });
        }
        Ok(Self { keys })
    }

    /// Search space over the valid bins of an index, in build order.
    pub fn from_index(index: &BitmapIndex) -> Result<Self> {
        Self::new(index.keys())
    }

    #[inline]
    pub fn keys(&self) -> &[GradualItem] {
        &self.keys
    }

    /// Number of keys (bits).
    #[inline]
    pub fn width(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub fn var_min(&self) -> f64 {
        0.0
    }

    /// Largest position: `2^k - 1`.
    #[inline]
    pub fn var_max(&self) -> u128 {
        (1u128 << self.keys.len()) - 1
    }

    /// Largest `f64` not above `2^k - 1`.
    ///
    /// Exact up to 53 keys. Wider spaces round the bound down so that a
    /// bounded position never gains a leading digit.
    pub fn var_max_f64(&self) -> f64 {
        let max = self.var_max();
        let rounded = max as f64;
        if truncate(rounded) > max {
            f64::from_bits(rounded.to_bits() - 1)
        } else {
            rounded
        }
    }

    /// Clamp a position into `[0, 2^k - 1]`. NaN maps to 0.
    pub fn apply_bound(&self, position: f64) -> f64 {
        if position.is_nan() {
            return self.var_min();
        }
        position.clamp(self.var_min(), self.var_max_f64())
    }

    /// Decode a position into a pattern with support 0.
    ///
    /// `None`, NaN and positions below 1 decode to an empty pattern. Any
    /// other position decodes like [`SearchSpace::decode_bits`] on its
    /// integer part, so digits beyond the key list are ignored.
    pub fn decode(&self, position: Option<f64>) -> GradualPattern {
        match position {
            Some(p) if p >= 1.0 => self.decode_bits(truncate(p)),
            _ => GradualPattern::new(),
        }
    }

    /// Decode an integer position.
    ///
    /// Digits beyond the key list are ignored.
    pub fn decode_bits(&self, bits: u128) -> GradualPattern {
        let mut gp = GradualPattern::new();
        let len = (u128::BITS - bits.leading_zeros()) as usize;
        for i in 0..len.min(self.keys.len()) {
            if (bits >> (len - 1 - i)) & 1 == 1 {
                // first item per column wins
                let _ = gp.add_item(self.keys[i]);
            }
        }
        gp
    }

    /// Integer position whose digits select the given key indices.
    ///
    /// The bit string is as wide as the largest index plus one, so it
    /// decodes back to the same indices only when index 0 is among them.
    pub fn encode_indices(&self, indices: &[usize]) -> u128 {
        let Some(&width) = indices.iter().filter(|&&i| i < self.keys.len()).max() else {
            return 0;
        };
        let width = width + 1;
        indices
            .iter()
            .filter(|&&i| i < self.keys.len())
            .fold(0u128, |acc, &i| acc | (1u128 << (width - 1 - i)))
    }

    /// Fitness of a position: `1 / |AND of its item bitmaps|`, 1 when empty.
    ///
    /// Lower is better. Items without a valid bin are ignored.
    pub fn cost(&self, position: f64, index: &BitmapIndex) -> f64 {
        let gp = self.decode(Some(position));
        let mut joined: Option<Bitmap> = None;
        for gi in gp.items() {
            let Some(bitmap) = index.bitmap(gi) else {
                continue;
            };
            match joined.as_mut() {
                None => joined = Some(bitmap.clone()),
                Some(current) => current.and_assign(bitmap),
            }
        }
        match joined.map(|b| b.count()) {
            Some(count) if count > 0 => 1.0 / count as f64,
            _ => 1.0,
        }
    }
}

#[inline]
fn truncate(position: f64) -> u128 {
    // `as` saturates at u128::MAX
    position.trunc() as u128
}
