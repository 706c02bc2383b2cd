//! CandidateGenerator - Apriori level-wise join of gradual item sets.
//!
//! Level 1 is the list of valid bins. Level `L + 1` is built by joining every
//! unordered pair of level-`L` candidates whose union:
//!
//! 1. holds exactly `L + 1` items,
//! 2. has not been seen at this level, either as itself or as its inverse,
//! 3. touches the target column when one is given,
//! 4. has no two items on the same column.
//!
//! The joined bitmap is the AND of the parents' bitmaps. A join is kept when
//! its support strictly exceeds the threshold and counted as invalid
//! otherwise. Unions rejected by rule 4 are counted separately and never
//! raise an error.
//!
//! The join never removes smaller patterns implied by larger ones; that is
//! the consumer's job (see [`crate::pattern::remove_subsets`]).

use crate::bitmap::{support_of, Bitmap};
use crate::bitmap_index::BitmapIndex;
use crate::item::GradualItem;
use crate::pattern::{GradualPattern, PatternKey};
use itertools::Itertools;
use log::trace;
use std::collections::HashSet;

/// One entry of a candidate level: sorted items, joined bitmap, support.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Items sorted by (column, direction)
    pub items: Vec<GradualItem>,
    pub bitmap: Bitmap,
    pub support: f64,
}

impl Candidate {
    /// Unordered item set.
    pub fn key(&self) -> PatternKey {
        self.items.iter().copied().collect()
    }

    /// Convert into a pattern carrying this candidate's support.
    pub fn to_pattern(&self) -> GradualPattern {
        let mut gp = GradualPattern::new();
        for &gi in &self.items {
            // items of a candidate never repeat a column
            let _ = gp.add_item(gi);
        }
        gp.set_support(self.support);
        gp
    }
}

/// Result of one join round.
#[derive(Debug, Clone, Default)]
pub struct NextLevel {
    /// Candidates whose support exceeds the threshold
    pub candidates: Vec<Candidate>,
    /// Structurally valid joins that failed the support test
    pub invalid_count: usize,
    /// Unions that put two items on the same column
    pub discarded_unions: usize,
}

/// Level-wise Apriori join over one bitmap index.
#[derive(Debug, Clone)]
pub struct CandidateGenerator {
    min_support: f64,
    row_count: usize,
    ignore_support: bool,
}

impl CandidateGenerator {
    /// Create a generator for bitmaps over `row_count` rows.
    pub fn new(min_support: f64, row_count: usize) -> Self {
        Self {
            min_support,
            row_count,
            ignore_support: false,
        }
    }

    /// Generator matching an index's threshold and row count.
    pub fn for_index(index: &BitmapIndex) -> Self {
        Self::new(index.min_support(), index.row_count())
    }

    /// Keep every structurally valid join regardless of support.
    pub fn with_ignore_support(mut self, ignore: bool) -> Self {
        self.ignore_support = ignore;
        self
    }

    /// Level-1 candidates: one per valid bin.
    pub fn seed_level(index: &BitmapIndex) -> Vec<Candidate> {
        index
            .bins()
            .iter()
            .map(|bin| Candidate {
                items: vec![bin.item],
                bitmap: bin.bitmap.clone(),
                support: bin.support,
            })
            .collect()
    }

    /// Join level-`L` candidates into level `L + 1`.
    ///
    /// With `target_col`, only unions containing an item on that column are
    /// considered.
    pub fn generate_next_level(
        &self,
        current: &[Candidate],
        target_col: Option<usize>,
    ) -> NextLevel {
        let mut next = NextLevel::default();
        if current.len() < 2 {
            return next;
        }

        let level = current[0].items.len();
        let mut registry: HashSet<Vec<GradualItem>> = HashSet::new();

        for (i, j) in (0..current.len()).tuple_combinations() {
            let union: Vec<GradualItem> = current[i]
                .items
                .iter()
                .chain(current[j].items.iter())
                .copied()
                .sorted()
                .dedup()
                .collect();

            if union.len() != level + 1 {
                continue;
            }
            if let Some(tgt) = target_col {
                if !union.iter().any(|gi| gi.column() == tgt) {
                    continue;
                }
            }
            let inverse: Vec<GradualItem> = union.iter().map(|gi| gi.inverse()).sorted().collect();
            if registry.contains(&union) || registry.contains(&inverse) {
                continue;
            }

            if has_repeated_column(&union) {
                next.discarded_unions += 1;
            } else {
                let count = current[i].bitmap.count_and(&current[j].bitmap);
                let support = support_of(count, self.row_count);
                if support > self.min_support || self.ignore_support {
                    next.candidates.push(Candidate {
                        items: union.clone(),
                        bitmap: &current[i].bitmap & &current[j].bitmap,
                        support,
                    });
                } else {
                    next.invalid_count += 1;
                }
            }
            registry.insert(union);
        }

        trace!(
            "level {} -> {}: {} kept, {} invalid, {} discarded",
            level,
            level + 1,
            next.candidates.len(),
            next.invalid_count,
            next.discarded_unions
        );
        next
    }
}

/// Whether two items of a column-sorted union share a column.
fn has_repeated_column(sorted_items: &[GradualItem]) -> bool {
    let mut last_column = None;
    for gi in sorted_items {
        if last_column == Some(gi.column()) {
            return true;
        }
        last_column = Some(gi.column());
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;

    fn index(min_support: f64) -> BitmapIndex {
        let data = Dataset::new(
            vec!["Age".into(), "Salary".into(), "Cars".into(), "Expenses".into()],
            vec![
                vec![30.0, 3.0, 1.0, 10.0],
                vec![35.0, 2.0, 2.0, 8.0],
                vec![40.0, 4.0, 2.0, 7.0],
                vec![50.0, 1.0, 1.0, 6.0],
                vec![52.0, 7.0, 1.0, 2.0],
            ],
        )
        .unwrap();
        BitmapIndex::build(&data, &data.attribute_columns(), min_support, false).unwrap()
    }

    #[test]
    fn test_repeated_column() {
        assert!(has_repeated_column(&[
            GradualItem::increasing(1),
            GradualItem::decreasing(1)
        ]));
        assert!(!has_repeated_column(&[
            GradualItem::increasing(1),
            GradualItem::decreasing(2)
        ]));
    }

    #[test]
    fn test_level_two() {
        let idx = index(0.5);
        let generator = CandidateGenerator::for_index(&idx);
        let level1 = CandidateGenerator::seed_level(&idx);
        assert_eq!(level1.len(), 8);

        let next = generator.generate_next_level(&level1, None);
        // 4 same-column unions are discarded, inverse unions are skipped
        assert_eq!(next.discarded_unions, 4);
        assert_eq!(next.candidates.len() + next.invalid_count, 12);

        let age_exp = next
            .candidates
            .iter()
            .find(|c| c.items == vec![GradualItem::increasing(0), GradualItem::decreasing(3)])
            .expect("Age+ Expenses- must be generated");
        assert_eq!(age_exp.support, 1.0);
        for c in &next.candidates {
            assert!(c.support > 0.5);
            assert_eq!(c.bitmap.count(), (c.support * 10.0).round() as usize);
        }
    }

    #[test]
    fn test_no_inverse_duplicates() {
        let idx = index(0.5);
        let generator = CandidateGenerator::for_index(&idx).with_ignore_support(true);
        let next = generator.generate_next_level(&CandidateGenerator::seed_level(&idx), None);
        let keys: Vec<PatternKey> = next.candidates.iter().map(|c| c.key()).collect();
        for (a, b) in keys.iter().tuple_combinations() {
            let inv_b: PatternKey = b.iter().map(|gi| gi.inverse()).collect();
            assert_ne!(a, b);
            assert_ne!(a, &inv_b);
        }
        // C(4, 2) column pairs, each with two non-equivalent direction combos
        assert_eq!(next.candidates.len(), 12);
        assert_eq!(next.invalid_count, 0);
    }

    #[test]
    fn test_target_column() {
        let idx = index(0.5);
        let generator = CandidateGenerator::for_index(&idx).with_ignore_support(true);
        let next = generator.generate_next_level(&CandidateGenerator::seed_level(&idx), Some(1));
        assert!(!next.candidates.is_empty());
        for c in &next.candidates {
            assert!(c.items.iter().any(|gi| gi.column() == 1));
        }
        assert_eq!(next.candidates.len(), 6);
    }

    #[test]
    fn test_single_candidate_level() {
        let idx = index(0.5);
        let generator = CandidateGenerator::for_index(&idx);
        let level1 = CandidateGenerator::seed_level(&idx);
        let next = generator.generate_next_level(&level1[..1], None);
        assert!(next.candidates.is_empty());
        assert_eq!(next.invalid_count, 0);
    }

    #[test]
    fn test_candidate_to_pattern() {
        let idx = index(0.5);
        let level1 = CandidateGenerator::seed_level(&idx);
        let gp = level1[0].to_pattern();
        assert_eq!(gp.items(), &[GradualItem::increasing(0)]);
        assert_eq!(gp.support(), 1.0);
    }
}
