//! GRAANK - Exhaustive level-wise gradual pattern search.
//!
//! Level 1 is seeded from the valid bins. Each round joins the current level
//! into the next with [`CandidateGenerator::generate_next_level`] until a
//! round yields nothing or the configured maximum pattern length is reached.
//! Every surviving candidate is inserted into the result list after all
//! patterns it implies have been removed from it, so the result never holds
//! a pattern together with one of its subsets.

use crate::bitmap_index::BitmapIndex;
use crate::candidate::{Candidate, CandidateGenerator};
use crate::config::MiningConfig;
use crate::dataset::Dataset;
use crate::error::Result;
use crate::pattern::PatternKey;
use crate::search::SearchStrategy;
use crate::session::{MiningReport, MiningSession};
use log::{debug, info};

/// Algorithm name used in reports.
pub const GRAANK_NAME: &str = "GRAANK";

/// Outcome of a level-wise run over one index.
#[derive(Debug, Clone, Default)]
pub struct LevelwiseOutcome {
    /// Maximal candidates, in discovery order
    pub winners: Vec<Candidate>,
    pub invalid_count: usize,
    /// Join rounds executed
    pub levels: usize,
}

/// Run the level-wise search over an index.
///
/// With `target_col`, only patterns containing an item on that column are
/// produced.
pub fn mine_levels(
    index: &BitmapIndex,
    config: &MiningConfig,
    target_col: Option<usize>,
) -> LevelwiseOutcome {
    let generator = CandidateGenerator::for_index(index).with_ignore_support(config.ignore_support);
    let mut outcome = LevelwiseOutcome::default();
    let mut level = CandidateGenerator::seed_level(index);

    while !level.is_empty() {
        if let Some(max) = config.max_level {
            if level[0].items.len() >= max {
                break;
            }
        }

        let next = generator.generate_next_level(&level, target_col);
        outcome.levels += 1;
        outcome.invalid_count += next.invalid_count;
        debug!(
            "level {}: {} candidates",
            outcome.levels + 1,
            next.candidates.len()
        );

        for candidate in &next.candidates {
            drop_subsets(&mut outcome.winners, &candidate.key());
            outcome.winners.push(candidate.clone());
        }
        level = next.candidates;
    }
    outcome
}

fn drop_subsets(winners: &mut Vec<Candidate>, key: &PatternKey) {
    winners.retain(|w| {
        let own: PatternKey = w.items.iter().copied().collect();
        let inv: PatternKey = w.items.iter().map(|gi| gi.inverse()).collect();
        !(own.is_subset(key) || inv.is_subset(key))
    });
}

/// Exhaustive search strategy.
///
/// # Examples
///
/// ```
/// use gradual::{Dataset, Graank, MiningConfig, SearchStrategy};
///
/// let data = Dataset::new(
///     vec!["Age".into(), "Salary".into(), "Cars".into(), "Expenses".into()],
///     vec![
///         vec![30.0, 3.0, 1.0, 10.0],
///         vec![35.0, 2.0, 2.0, 8.0],
///         vec![40.0, 4.0, 2.0, 7.0],
///         vec![50.0, 1.0, 1.0, 6.0],
///         vec![52.0, 7.0, 1.0, 2.0],
///     ],
/// ).unwrap();
/// let report = Graank::new(data, MiningConfig::default()).unwrap().discover().unwrap();
/// assert!(!report.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct Graank {
    data: Dataset,
    config: MiningConfig,
}

impl Graank {
    pub fn new(data: Dataset, config: MiningConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { data, config })
    }

    fn run(&self) -> Result<MiningReport> {
        let mut session = MiningSession::new(self.data.clone(), self.config.clone())?;
        let index = session.build_bitmaps()?;
        index.ensure_minable()?;

        let outcome = mine_levels(index, &self.config, None);
        let patterns = outcome.winners.iter().map(Candidate::to_pattern).collect();
        info!(
            "{}: {} levels, {} invalid candidates",
            GRAANK_NAME, outcome.levels, outcome.invalid_count
        );
        session.finalize(GRAANK_NAME, patterns, outcome.invalid_count, outcome.levels)
    }
}

impl SearchStrategy for Graank {
    fn name(&self) -> &'static str {
        GRAANK_NAME
    }

    fn discover(&self) -> Result<MiningReport> {
        MiningReport::recover(GRAANK_NAME, self.data.titles(), self.run())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::GradualItem;

    fn data() -> Dataset {
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

    #[test]
    fn test_pair_level_contains_age_expenses() {
        let config = MiningConfig {
            max_level: Some(2),
            ..Default::default()
        };
        let report = Graank::new(data(), config).unwrap().discover().unwrap();
        assert_eq!(report.iterations, 1);
        let gp = report.find(&["Age+", "Expenses-"]).unwrap();
        assert_eq!(gp.support(), 1.0);
        assert!(report.patterns.iter().all(|p| p.len() == 2));
    }

    #[test]
    fn test_no_pattern_implies_another() {
        let report = Graank::new(data(), MiningConfig::default())
            .unwrap()
            .discover()
            .unwrap();
        assert!(!report.is_empty());
        for (i, a) in report.patterns.iter().enumerate() {
            for (j, b) in report.patterns.iter().enumerate() {
                if i != j {
                    assert!(!a.is_subsumed_by(std::slice::from_ref(b)), "{} within {}", a, b);
                }
            }
            assert!(a.support() > 0.5);
        }
    }

    #[test]
    fn test_strict_threshold_one_yields_nothing() {
        let report = Graank::new(data(), MiningConfig::with_min_support(1.0))
            .unwrap()
            .discover()
            .unwrap();
        assert!(report.is_empty());
        assert_eq!(report.summaries.len(), 0);
    }

    #[test]
    fn test_no_valid_bins_is_empty_report() {
        let data = Dataset::new(
            vec!["a".into(), "b".into()],
            vec![vec![1.0, 2.0], vec![1.0, 2.0], vec![1.0, 2.0]],
        )
        .unwrap();
        let report = Graank::new(data, MiningConfig::default())
            .unwrap()
            .discover()
            .unwrap();
        assert!(report.is_empty());
        assert_eq!(report.algorithm, GRAANK_NAME);
    }

    #[test]
    fn test_target_column_levels() {
        let data = data();
        let index = BitmapIndex::build(&data, &data.attribute_columns(), 0.5, false).unwrap();
        let outcome = mine_levels(&index, &MiningConfig::default(), Some(3));
        assert!(!outcome.winners.is_empty());
        for w in &outcome.winners {
            assert!(w.items.iter().any(|gi| gi.column() == 3));
        }
        assert!(outcome
            .winners
            .iter()
            .any(|w| w.items.contains(&GradualItem::decreasing(3))));
    }
}
