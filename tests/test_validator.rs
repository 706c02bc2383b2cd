//! Tests for greedy re-validation of candidate patterns.

use gradual::{validate, BitmapIndex, Dataset, GradualItem, GradualPattern};

fn dummy() -> Dataset {
    Dataset::new(
        vec!["Age".into(), "Salary".into(), "Cars".into(), "Expenses".into()],
        vec![
            vec![30.0, 3.0, 1.0, 10.0],
            vec![35.0, 2.0, 2.0, 8.0],
            vec![40.0, 4.0, 2.0, 7.0],
            vec![50.0, 1.0, 1.0, 6.0],
            vec![52.0, 7.0, 1.0, 2.0],
        ],
    )
    .unwrap()
}

fn index() -> BitmapIndex {
    let data = dummy();
    BitmapIndex::build(&data, &data.attribute_columns(), 0.5, false).unwrap()
}

fn pattern(items: &[GradualItem]) -> GradualPattern {
    GradualPattern::from_items(items.iter().copied(), 0.0).unwrap()
}

#[test]
fn test_confirmed_pair() {
    let gp = validate(
        &pattern(&[GradualItem::increasing(0), GradualItem::decreasing(3)]),
        &index(),
        0.5,
    );
    assert_eq!(gp.len(), 2);
    assert_eq!(gp.support(), 1.0);
}

#[test]
fn test_drops_breaking_item_and_keeps_order() {
    // Salary- shares only 4 of 10 pairs with Age+
    let candidate = pattern(&[
        GradualItem::increasing(0),
        GradualItem::decreasing(1),
        GradualItem::decreasing(3),
    ]);
    let gp = validate(&candidate, &index(), 0.5);
    assert_eq!(
        gp.items(),
        &[GradualItem::increasing(0), GradualItem::decreasing(3)]
    );
    assert_eq!(gp.support(), 1.0);
}

#[test]
fn test_three_item_pattern() {
    let index = index();
    let candidate = pattern(&[
        GradualItem::increasing(0),
        GradualItem::increasing(1),
        GradualItem::decreasing(3),
    ]);
    let gp = validate(&candidate, &index, 0.5);
    assert_eq!(gp.len(), 3);
    assert!((gp.support() - 0.6).abs() < 1e-12);
}

#[test]
fn test_unconfirmed_returns_candidate() {
    // Age+ and Expenses+ share no pair
    let candidate = pattern(&[GradualItem::increasing(0), GradualItem::increasing(3)]);
    let gp = validate(&candidate, &index(), 0.5);
    assert_eq!(gp, candidate);
    assert_eq!(gp.support(), 0.0);
}

#[test]
fn test_items_without_bins_are_skipped() {
    let data = dummy();
    // Cars is exactly 0.6 so it has no bin at 0.7
    let index = BitmapIndex::build(&data, &data.attribute_columns(), 0.7, false).unwrap();
    assert!(index.get(&GradualItem::increasing(2)).is_none());
    let candidate = pattern(&[
        GradualItem::increasing(0),
        GradualItem::increasing(2),
        GradualItem::decreasing(3),
    ]);
    let gp = validate(&candidate, &index, 0.7);
    assert_eq!(
        gp.items(),
        &[GradualItem::increasing(0), GradualItem::decreasing(3)]
    );
}

#[test]
fn test_empty_candidate() {
    let gp = validate(&GradualPattern::new(), &index(), 0.5);
    assert!(gp.is_empty());
}
