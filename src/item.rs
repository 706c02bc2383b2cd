//! Gradual items: a column paired with a direction of variation.

use crate::error::{GradualError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Direction of variation of a column.
///
/// Ordered so that `Increasing < Decreasing`, which fixes the order of items
/// on the same column inside sorted keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "+")]
    Increasing,
    #[serde(rename = "-")]
    Decreasing,
}

impl Direction {
    /// The opposite direction.
    #[inline]
    pub fn inverse(self) -> Self {
        match self {
            Direction::Increasing => Direction::Decreasing,
            Direction::Decreasing => Direction::Increasing,
        }
    }

    /// `'+'` or `'-'`.
    #[inline]
    pub fn symbol(self) -> char {
        match self {
            Direction::Increasing => '+',
            Direction::Decreasing => '-',
        }
    }
}

/// A (column, direction) pair, e.g. "Age increasing".
///
/// # Examples
///
/// ```
/// use gradual::{Direction, GradualItem};
///
/// let gi = GradualItem::increasing(2);
/// assert_eq!(gi.inverse(), GradualItem::new(2, Direction::Decreasing));
/// assert_eq!(gi.key(), "2_pos");
/// assert_eq!("2_pos".parse::<GradualItem>().unwrap(), gi);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GradualItem {
    column: usize,
    direction: Direction,
}

impl GradualItem {
    #[inline]
    pub fn new(column: usize, direction: Direction) -> Self {
        Self { column, direction }
    }

    #[inline]
    pub fn increasing(column: usize) -> Self {
        Self::new(column, Direction::Increasing)
    }

    #[inline]
    pub fn decreasing(column: usize) -> Self {
        Self::new(column, Direction::Decreasing)
    }

    #[inline]
    pub fn column(&self) -> usize {
        self.column
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Same column, flipped direction.
    #[inline]
    pub fn inverse(&self) -> Self {
        Self::new(self.column, self.direction.inverse())
    }

    /// Registry key of the item: `"<column>_pos"` or `"<column>_neg"`.
    pub fn key(&self) -> String {
        match self.direction {
            Direction::Increasing => format!("{}_pos", self.column),
            Direction::Decreasing => format!("{}_neg", self.column),
        }
    }

    /// Item label with a column title, e.g. `"Age+"`.
    pub fn label(&self, title: &str) -> String {
        format!("{}{}", title, self.direction.symbol())
    }
}

impl fmt::Display for GradualItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.column, self.direction.symbol())
    }
}

impl FromStr for GradualItem {
    type Err = GradualError;

    /// Parse a registry key (`"3_pos"`, `"3_neg"`).
    fn from_str(s: &str) -> Result<Self> {
        let (col, dir) = s
            .split_once('_')
            .ok_or_else(|| GradualError::InvalidParameter(format!("malformed item key '{}'", s)))?;
        let column = col
            .parse::<usize>()
            .map_err(|_| GradualError::InvalidParameter(format!("malformed item key '{}'", s)))?;
        let direction = match dir {
            "pos" => Direction::Increasing,
            "neg" => Direction::Decreasing,
            _ => {
                return Err(GradualError::InvalidParameter(format!(
                    "unknown direction in item key '{}'",
                    s
                )))
            }
        };
        Ok(Self::new(column, direction))
    }
}
