//! TemporalMiner - Gradual patterns with a time lag (T-GRAANK).
//!
//! For a step `s`, the target column and the time columns keep rows
//! `0..n-s` while every other column keeps rows `s..n`. Row `i` of the
//! shifted data therefore pairs the target at time `t[i]` with the other
//! attributes `s` rows later. The shifted data is mined level-wise with every
//! pattern required to contain the target column.
//!
//! Each pattern carries its step and a time lag: the mean of the time
//! differences `|T(i + s) - T(i)|` over the rows its bitmap involves, where
//! `T` is the sum of all time columns of a row.
//!
//! Steps are independent, so they can run on the rayon thread pool. Results
//! are merged in step order either way.

use crate::config::{MiningConfig, TemporalConfig};
use crate::dataset::Dataset;
use crate::error::{GradualError, Result};
use crate::graank::mine_levels;
use crate::item::GradualItem;
use crate::pattern::{GradualPattern, PatternSummary};
use crate::session::MiningSession;
use log::{debug, info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

pub const TGRAD_NAME: &str = "TGrad";

/// A gradual pattern observed across a row shift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalPattern {
    pub pattern: GradualPattern,
    /// Item on the target column
    pub target: GradualItem,
    /// Row shift the pattern was mined at
    pub step: usize,
    /// Mean time difference, in the unit of the time columns
    pub time_lag: f64,
}

impl TemporalPattern {
    /// Labelled view, e.g. `Age+ | Expenses- ~ 10 after 1 step(s)`.
    pub fn describe(&self, titles: &[String]) -> String {
        let summary: PatternSummary = self.pattern.describe(titles);
        format!(
            "{} : {} ~ {} after {} step(s)",
            summary.labels().join(", "),
            summary.support,
            self.time_lag,
            self.step
        )
    }
}

/// Patterns and bookkeeping of one step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepOutcome {
    pub step: usize,
    pub patterns: Vec<TemporalPattern>,
    pub invalid_count: usize,
}

/// Output of a full temporal sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalReport {
    pub algorithm: String,
    pub titles: Vec<String>,
    pub target_col: usize,
    pub max_step: usize,
    pub steps: Vec<StepOutcome>,
}

impl TemporalReport {
    /// All patterns, in step order.
    pub fn patterns(&self) -> impl Iterator<Item = &TemporalPattern> {
        self.steps.iter().flat_map(|s| s.patterns.iter())
    }

    pub fn pattern_count(&self) -> usize {
        self.steps.iter().map(|s| s.patterns.len()).sum()
    }

    pub fn invalid_count(&self) -> usize {
        self.steps.iter().map(|s| s.invalid_count).sum()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Time-lag aware miner.
///
/// # Examples
///
/// ```
/// use gradual::{Dataset, MiningConfig, TemporalConfig, TemporalMiner};
///
/// let data = Dataset::new(
///     vec!["Day".into(), "Age".into(), "Expenses".into()],
///     vec![
///         vec![0.0, 30.0, 10.0],
///         vec![10.0, 35.0, 8.0],
///         vec![20.0, 40.0, 7.0],
///         vec![30.0, 50.0, 6.0],
///     ],
/// ).unwrap().with_time_columns(vec![0]).unwrap();
///
/// let config = TemporalConfig { target_col: 1, ..Default::default() };
/// let miner = TemporalMiner::new(data, MiningConfig::default(), config).unwrap();
/// assert_eq!(miner.max_step(), 2);
/// let report = miner.discover().unwrap();
/// assert!(report.patterns().all(|tp| tp.time_lag == 10.0 * tp.step as f64));
/// ```
#[derive(Debug, Clone)]
pub struct TemporalMiner {
    data: Dataset,
    mining: MiningConfig,
    config: TemporalConfig,
}

impl TemporalMiner {
    /// Create a miner.
    ///
    /// # Errors
    ///
    /// - [`GradualError::NoTimeColumns`] if the dataset has no time column
    /// - [`GradualError::TargetColumnOutOfRange`] if the target does not exist
    /// - [`GradualError::TargetColumnIsTime`] if the target is a time column
    /// - [`GradualError::InvalidParameter`] for invalid configs
    pub fn new(data: Dataset, mining: MiningConfig, config: TemporalConfig) -> Result<Self> {
        mining.validate()?;
        config.validate()?;
        if data.time_columns().is_empty() {
            return Err(GradualError::NoTimeColumns);
        }
        if config.target_col >= data.column_count() {
            return Err(GradualError::TargetColumnOutOfRange {
                column: config.target_col,
                last: data.column_count() - 1,
            });
        }
        if data.is_time_column(config.target_col) {
            return Err(GradualError::TargetColumnIsTime(config.target_col));
        }
        Ok(Self {
            data,
            mining,
            config,
        })
    }

    /// Largest row shift: `n - floor(min_rep * n)`.
    pub fn max_step(&self) -> usize {
        let n = self.data.row_count();
        n - (self.config.min_rep * n as f64).floor() as usize
    }

    /// Time difference of every row kept by `step`.
    pub fn time_differences(&self, step: usize) -> Vec<f64> {
        let n = self.data.row_count();
        let stamp = |row: usize| -> f64 {
            self.data
                .time_columns()
                .iter()
                .map(|&c| self.data.column(c)[row])
                .sum()
        };
        (0..n.saturating_sub(step))
            .map(|i| (stamp(i + step) - stamp(i)).abs())
            .collect()
    }

    /// Dataset shifted by `step` rows.
    pub fn shift(&self, step: usize) -> Result<Dataset> {
        let n = self.data.row_count();
        if step >= n {
            return Err(GradualError::InsufficientRows { rows: 0 });
        }
        let columns = (0..self.data.column_count())
            .map(|c| {
                let values = self.data.column(c);
                if c == self.config.target_col || self.data.is_time_column(c) {
                    values[..n - step].to_vec()
                } else {
                    values[step..].to_vec()
                }
            })
            .collect();
        Dataset::from_columns(
            self.data.titles().to_vec(),
            columns,
            self.data.time_columns().to_vec(),
        )
    }

    /// Mine one step.
    ///
    /// A step with nothing to mine yields an empty outcome.
    pub fn mine_step(&self, step: usize) -> Result<StepOutcome> {
        let mut outcome = StepOutcome {
            step,
            ..Default::default()
        };
        if self.data.row_count().saturating_sub(step) < 2 {
            debug!("step {} leaves fewer than 2 rows, skipped", step);
            return Ok(outcome);
        }

        let shifted = self.shift(step)?;
        let mut session = MiningSession::new(shifted, self.mining.clone())?;
        let index = match session.build_bitmaps().and_then(|index| {
            index.ensure_minable()?;
            Ok(index)
        }) {
            Ok(index) => index,
            Err(e) if e.is_recoverable() => {
                debug!("step {}: {}", step, e);
                return Ok(outcome);
            }
            Err(e) => return Err(e),
        };

        let diffs = self.time_differences(step);
        let levels = mine_levels(index, &self.mining, Some(self.config.target_col));
        outcome.invalid_count = levels.invalid_count;

        for candidate in levels.winners {
            let rows = candidate.bitmap.rows_involved();
            if rows.is_empty() {
                continue;
            }
            let Some(target) = candidate
                .items
                .iter()
                .copied()
                .find(|gi| gi.column() == self.config.target_col)
            else {
                continue;
            };
            let time_lag = rows.iter().map(|&r| diffs[r]).sum::<f64>() / rows.len() as f64;
            outcome.patterns.push(TemporalPattern {
                pattern: candidate.to_pattern(),
                target,
                step,
                time_lag,
            });
        }

        debug!("step {}: {} temporal patterns", step, outcome.patterns.len());
        Ok(outcome)
    }

    /// Sweep every step from 1 to [`TemporalMiner::max_step`].
    pub fn discover(&self) -> Result<TemporalReport> {
        let max_step = self.max_step();
        let steps: Vec<StepOutcome> = if self.config.parallel {
            (1..=max_step)
                .into_par_iter()
                .map(|step| self.mine_step(step))
                .collect::<Result<Vec<_>>>()?
        } else {
            (1..=max_step)
                .map(|step| self.mine_step(step))
                .collect::<Result<Vec<_>>>()?
        };

        let report = TemporalReport {
            algorithm: TGRAD_NAME.to_string(),
            titles: self.data.titles().to_vec(),
            target_col: self.config.target_col,
            max_step,
            steps,
        };
        if report.pattern_count() == 0 {
            warn!("{}: no temporal patterns over {} steps", TGRAD_NAME, max_step);
        } else {
            info!(
                "{}: {} temporal patterns over {} steps",
                TGRAD_NAME,
                report.pattern_count(),
                max_step
            );
        }
        Ok(report)
    }
}
