//! PatternValidator - Greedy re-validation of an arbitrary item sequence.
//!
//! Search strategies produce item sets that were never checked against the
//! data. Validation walks the items in order and ANDs each one into a working
//! bitmap, keeping it only while the support stays at or above the
//! threshold. Support can only shrink as bitmaps are ANDed, so an item that
//! breaks the threshold is dropped for good within one call.
//!
//! If at most one item survives, the input candidate is returned unchanged
//! and callers treat it as unconfirmed.

use crate::bitmap::{support_of, Bitmap};
use crate::bitmap_index::BitmapIndex;
use crate::pattern::GradualPattern;
use log::trace;

/// Validate `candidate` against the valid bins in `index`.
///
/// Items without a valid bin are skipped. The registry's bitmaps are only
/// read; the working bitmap is a private copy.
///
/// # Examples
///
/// ```
/// use gradual::{validate, BitmapIndex, Dataset, GradualItem, GradualPattern};
///
/// let data = Dataset::new(
///     vec!["a".into(), "b".into(), "c".into()],
///     vec![vec![1.0, 9.0, 2.0], vec![2.0, 8.0, 1.0], vec![3.0, 7.0, 3.0]],
/// ).unwrap();
/// let index = BitmapIndex::build(&data, &[0, 1, 2], 0.5, false).unwrap();
///
/// let candidate = GradualPattern::from_items(
///     [GradualItem::increasing(0), GradualItem::decreasing(1), GradualItem::decreasing(2)],
///     0.0,
/// ).unwrap();
/// let gp = validate(&candidate, &index, 0.5);
/// assert_eq!(gp.len(), 2); // c- breaks the threshold
/// assert_eq!(gp.support(), 1.0);
/// ```
pub fn validate(candidate: &GradualPattern, index: &BitmapIndex, min_support: f64) -> GradualPattern {
    let n = index.row_count();
    let mut working: Option<Bitmap> = None;
    let mut validated = GradualPattern::new();

    for gi in candidate.items() {
        let Some(bitmap) = index.bitmap(gi) else {
            continue;
        };

        match working.as_mut() {
            None => {
                working = Some(bitmap.clone());
                // items come from a pattern, so columns are already unique
                let _ = validated.add_item(*gi);
            }
            Some(current) => {
                let support = support_of(current.count_and(bitmap), n);
                if support >= min_support {
                    current.and_assign(bitmap);
                    let _ = validated.add_item(*gi);
                    validated.set_support(support);
                } else {
                    trace!("dropping {} from {}: support {:.3}", gi, candidate, support);
                }
            }
        }
    }

    if validated.len() <= 1 {
        candidate.clone()
    } else {
        validated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use crate::item::GradualItem;

    fn index() -> BitmapIndex {
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
        BitmapIndex::build(&data, &data.attribute_columns(), 0.5, false).unwrap()
    }

    fn pattern(items: &[GradualItem]) -> GradualPattern {
        GradualPattern::from_items(items.iter().copied(), 0.0).unwrap()
    }

    #[test]
    fn test_full_support_pair() {
        let gp = validate(
            &pattern(&[GradualItem::increasing(0), GradualItem::decreasing(3)]),
            &index(),
            0.5,
        );
        assert_eq!(gp.len(), 2);
        assert_eq!(gp.support(), 1.0);
    }

    #[test]
    fn test_three_items() {
        let gp = validate(
            &pattern(&[
                GradualItem::increasing(0),
                GradualItem::increasing(1),
                GradualItem::decreasing(3),
            ]),
            &index(),
            0.5,
        );
        assert_eq!(gp.len(), 3);
        assert_eq!(gp.support(), 0.6);
    }

    #[test]
    fn test_drops_breaking_item() {
        // Age+ Salary- keeps 4 of 10 pairs
        let gp = validate(
            &pattern(&[
                GradualItem::increasing(0),
                GradualItem::decreasing(1),
                GradualItem::decreasing(3),
            ]),
            &index(),
            0.5,
        );
        assert_eq!(
            gp.items(),
            &[GradualItem::increasing(0), GradualItem::decreasing(3)]
        );
        assert_eq!(gp.support(), 1.0);
    }

    #[test]
    fn test_unconfirmed_returns_candidate() {
        let candidate = pattern(&[GradualItem::increasing(0), GradualItem::decreasing(1)]);
        let gp = validate(&candidate, &index(), 0.5);
        assert!(gp.same_items(&candidate));
        assert_eq!(gp.support(), 0.0);
    }

    #[test]
    fn test_unknown_items_skipped() {
        let candidate = pattern(&[GradualItem::increasing(9), GradualItem::increasing(0)]);
        let gp = validate(&candidate, &index(), 0.5);
        assert!(gp.same_items(&candidate));
    }

    #[test]
    fn test_registry_untouched() {
        let idx = index();
        let before = idx.bitmap(&GradualItem::increasing(0)).unwrap().clone();
        let _ = validate(
            &pattern(&[GradualItem::increasing(0), GradualItem::increasing(1)]),
            &idx,
            0.5,
        );
        assert_eq!(idx.bitmap(&GradualItem::increasing(0)).unwrap(), &before);
    }
}
