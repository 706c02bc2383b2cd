//! Gradual patterns: sets of gradual items on distinct columns with a support.
//!
//! A pattern and its component-wise inverse describe the same relationship
//! ("Age+, Salary-" holds exactly when "Age-, Salary+" does), so every
//! duplicate and subset test in this module looks at both the pattern key and
//! the inverse key.

use crate::error::{GradualError, Result};
use crate::item::{Direction, GradualItem};
use crate::utils::round_support;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Unordered set of gradual items used for equality and subset tests.
pub type PatternKey = BTreeSet<GradualItem>;

/// Ordered collection of gradual items on unique columns, plus a support.
///
/// # Examples
///
/// ```
/// use gradual::{GradualItem, GradualPattern};
///
/// let mut gp = GradualPattern::new();
/// gp.add_item(GradualItem::increasing(0)).unwrap();
/// gp.add_item(GradualItem::decreasing(3)).unwrap();
/// assert!(gp.add_item(GradualItem::increasing(3)).is_err());
/// assert_eq!(gp.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PatternFields")]
pub struct GradualPattern {
    items: Vec<GradualItem>,
    support: f64,
}

/// Unchecked serialized form, validated through [`GradualPattern::from_items`].
#[derive(Deserialize)]
struct PatternFields {
    items: Vec<GradualItem>,
    support: f64,
}

impl TryFrom<PatternFields> for GradualPattern {
    type Error = GradualError;

    fn try_from(fields: PatternFields) -> Result<Self> {
        Self::from_items(fields.items, fields.support)
    }
}

impl GradualPattern {
    /// Create an empty pattern with support 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a pattern from items, rejecting repeated columns.
    pub fn from_items<I>(items: I, support: f64) -> Result<Self>
    where
        I: IntoIterator<Item = GradualItem>,
    {
        let mut gp = Self::new();
        for gi in items {
            gp.add_item(gi)?;
        }
        gp.set_support(support);
        Ok(gp)
    }

    /// Append an item.
    ///
    /// Fails with [`GradualError::DuplicateColumn`] when the pattern already
    /// holds an item on the same column, in either direction.
    pub fn add_item(&mut self, gi: GradualItem) -> Result<()> {
        if self.contains_column(gi.column()) {
            return Err(GradualError::DuplicateColumn(gi.column()));
        }
        self.items.push(gi);
        Ok(())
    }

    #[inline]
    pub fn items(&self) -> &[GradualItem] {
        &self.items
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn support(&self) -> f64 {
        self.support
    }

    #[inline]
    pub fn set_support(&mut self, support: f64) {
        self.support = support;
    }

    /// Whether this exact item (column and direction) is present.
    pub fn contains(&self, gi: &GradualItem) -> bool {
        self.items.contains(gi)
    }

    /// Whether any item sits on `column`.
    pub fn contains_column(&self, column: usize) -> bool {
        self.items.iter().any(|gi| gi.column() == column)
    }

    /// Unordered item set.
    pub fn pattern_key(&self) -> PatternKey {
        self.items.iter().copied().collect()
    }

    /// Unordered set of inverted items.
    pub fn inverse_key(&self) -> PatternKey {
        self.items.iter().map(|gi| gi.inverse()).collect()
    }

    /// Same item set as `other`, ignoring order.
    pub fn same_items(&self, other: &GradualPattern) -> bool {
        self.pattern_key() == other.pattern_key()
    }

    // =========================================================================
    // Duplicate and Anti-Monotonicity Checks
    // =========================================================================

    /// True if some listed pattern has this pattern's key or its inverse key.
    pub fn is_duplicate(&self, patterns: &[GradualPattern]) -> bool {
        let key = self.pattern_key();
        let inv = self.inverse_key();
        patterns.iter().any(|p| {
            let other = p.pattern_key();
            other == key || other == inv
        })
    }

    /// True if this pattern (or its inverse) is a subset of a listed pattern.
    ///
    /// A subset of an already accepted pattern adds nothing new.
    pub fn is_subsumed_by(&self, patterns: &[GradualPattern]) -> bool {
        let key = self.pattern_key();
        let inv = self.inverse_key();
        patterns.iter().any(|p| {
            let other = p.pattern_key();
            key.is_subset(&other) || inv.is_subset(&other)
        })
    }

    /// True if this pattern (or its inverse) is a superset of a listed pattern.
    ///
    /// A superset of a pattern that failed the threshold cannot pass it.
    pub fn subsumes_any(&self, patterns: &[GradualPattern]) -> bool {
        let key = self.pattern_key();
        let inv = self.inverse_key();
        patterns.iter().any(|p| {
            let other = p.pattern_key();
            key.is_superset(&other) || inv.is_superset(&other)
        })
    }

    // =========================================================================
    // Presentation
    // =========================================================================

    /// Labelled view of the pattern for reports.
    ///
    /// Columns without a title fall back to their index.
    pub fn describe(&self, titles: &[String]) -> PatternSummary {
        let items = self
            .items
            .iter()
            .map(|gi| {
                let title = titles
                    .get(gi.column())
                    .cloned()
                    .unwrap_or_else(|| gi.column().to_string());
                (title, gi.direction())
            })
            .collect();
        PatternSummary {
            items,
            support: round_support(self.support),
        }
    }
}

impl fmt::Display for GradualPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, gi) in self.items.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", gi)?;
        }
        write!(f, "}} : {}", round_support(self.support))
    }
}

/// Remove every pattern whose key (or inverse key) is a subset of `key`.
///
/// Called before inserting a new, larger pattern into a result list.
pub fn remove_subsets(patterns: &mut Vec<GradualPattern>, key: &PatternKey) {
    patterns.retain(|p| !(p.pattern_key().is_subset(key) || p.inverse_key().is_subset(key)));
}

/// Pattern items labelled with column titles, ready for formatting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternSummary {
    /// `(column title, direction)` pairs
    pub items: Vec<(String, Direction)>,
    /// Support rounded to 3 decimals
    pub support: f64,
}

impl PatternSummary {
    /// Item labels such as `"Age+"`.
    pub fn labels(&self) -> Vec<String> {
        self.items
            .iter()
            .map(|(title, dir)| format!("{}{}", title, dir.symbol()))
            .collect()
    }
}
