//! MiningSession - Lifecycle of one mining run over one dataset.
//!
//! A session moves through three states:
//!
//! 1. **Unbuilt** - dataset and configuration are known, no bitmaps yet
//! 2. **BitmapsBuilt** - the [`BitmapIndex`] exists and is read-only
//! 3. **Finalized** - the report was produced and the bitmaps released
//!
//! [`MiningSession::build_bitmaps`] is idempotent. Asking for the index
//! before it is built fails with [`GradualError::BitmapsNotBuilt`], and any
//! use after finalization fails with [`GradualError::SessionFinalized`].
//!
//! This module also holds the result bookkeeping every strategy shares:
//! [`PatternRegistry`] for accepted and rejected patterns, and
//! [`MiningReport`] for the final output.

use crate::bitmap_index::BitmapIndex;
use crate::config::MiningConfig;
use crate::dataset::Dataset;
use crate::error::{GradualError, Result};
use crate::pattern::{remove_subsets, GradualPattern, PatternSummary};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a [`MiningSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unbuilt,
    BitmapsBuilt,
    Finalized,
}

/// Dataset, settings and bitmap index of one mining run.
#[derive(Debug, Clone)]
pub struct MiningSession {
    data: Dataset,
    config: MiningConfig,
    state: SessionState,
    index: Option<BitmapIndex>,
}

impl MiningSession {
    /// Create an unbuilt session.
    ///
    /// # Errors
    ///
    /// Returns [`GradualError::InvalidParameter`] if `config` is invalid.
    pub fn new(data: Dataset, config: MiningConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            data,
            config,
            state: SessionState::Unbuilt,
            index: None,
        })
    }

    #[inline]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[inline]
    pub fn data(&self) -> &Dataset {
        &self.data
    }

    #[inline]
    pub fn config(&self) -> &MiningConfig {
        &self.config
    }

    /// Build valid bins over the attribute columns.
    ///
    /// Calling it again returns the existing index.
    pub fn build_bitmaps(&mut self) -> Result<&BitmapIndex> {
        match self.state {
            SessionState::Finalized => return Err(GradualError::SessionFinalized),
            SessionState::BitmapsBuilt => {}
            SessionState::Unbuilt => {
                let index = BitmapIndex::build(
                    &self.data,
                    &self.data.attribute_columns(),
                    self.config.min_support,
                    self.config.allow_equal,
                )?;
                self.index = Some(index);
                self.state = SessionState::BitmapsBuilt;
            }
        }
        self.index()
    }

    /// The built index.
    pub fn index(&self) -> Result<&BitmapIndex> {
        match self.state {
            SessionState::Finalized => Err(GradualError::SessionFinalized),
            _ => self.index.as_ref().ok_or(GradualError::BitmapsNotBuilt),
        }
    }

    /// Produce the report and release the bitmaps.
    pub fn finalize(
        &mut self,
        algorithm: &str,
        patterns: Vec<GradualPattern>,
        invalid_count: usize,
        iterations: usize,
    ) -> Result<MiningReport> {
        if self.state == SessionState::Finalized {
            return Err(GradualError::SessionFinalized);
        }
        self.index = None;
        self.state = SessionState::Finalized;

        let summaries = patterns
            .iter()
            .map(|gp| gp.describe(self.data.titles()))
            .collect();
        debug!(
            "{}: {} patterns, {} invalid, {} iterations",
            algorithm,
            patterns.len(),
            invalid_count,
            iterations
        );
        Ok(MiningReport {
            algorithm: algorithm.to_string(),
            titles: self.data.titles().to_vec(),
            patterns,
            summaries,
            invalid_count,
            iterations,
        })
    }
}

// =============================================================================
// Pattern Registry
// =============================================================================

/// What [`PatternRegistry::offer`] did with a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offer {
    Accepted,
    Rejected,
    Ignored,
}

/// Accepted (winner) and rejected (loser) patterns of a search.
///
/// Winners never hold two patterns where one implies the other: accepting a
/// pattern drops every winner it subsumes.
#[derive(Debug, Clone, Default)]
pub struct PatternRegistry {
    winners: Vec<GradualPattern>,
    losers: Vec<GradualPattern>,
}

impl PatternRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn winners(&self) -> &[GradualPattern] {
        &self.winners
    }

    #[inline]
    pub fn losers(&self) -> &[GradualPattern] {
        &self.losers
    }

    /// Whether evaluating `gp` can be skipped.
    ///
    /// True for a duplicate of any known pattern, a subset of a winner, or a
    /// superset of a loser.
    pub fn is_known(&self, gp: &GradualPattern) -> bool {
        gp.is_duplicate(&self.winners)
            || gp.is_duplicate(&self.losers)
            || gp.is_subsumed_by(&self.winners)
            || gp.subsumes_any(&self.losers)
    }

    /// Offer a validated pattern.
    ///
    /// Patterns with fewer than two items, duplicates of winners and subsets
    /// of winners are ignored. Otherwise the pattern becomes a winner when
    /// its support is `>= min_support` and a loser when it is not.
    pub fn offer(&mut self, gp: GradualPattern, min_support: f64) -> Offer {
        if gp.len() < 2 || gp.is_duplicate(&self.winners) || gp.is_subsumed_by(&self.winners) {
            return Offer::Ignored;
        }
        if gp.support() >= min_support {
            remove_subsets(&mut self.winners, &gp.pattern_key());
            self.winners.push(gp);
            Offer::Accepted
        } else {
            self.reject(gp);
            Offer::Rejected
        }
    }

    /// Record a pattern known to fail the threshold.
    pub fn reject(&mut self, gp: GradualPattern) {
        if !gp.is_duplicate(&self.losers) {
            self.losers.push(gp);
        }
    }

    /// Winners, consuming the registry.
    pub fn into_winners(self) -> Vec<GradualPattern> {
        self.winners
    }
}

// =============================================================================
// Report
// =============================================================================

/// Output of one mining run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MiningReport {
    pub algorithm: String,
    /// Column titles of the mined dataset
    pub titles: Vec<String>,
    pub patterns: Vec<GradualPattern>,
    /// Labelled patterns, in the same order as `patterns`
    pub summaries: Vec<PatternSummary>,
    /// Candidates that failed the support test
    pub invalid_count: usize,
    /// Levels for the exhaustive search, iterations for metaheuristics
    pub iterations: usize,
}

impl MiningReport {
    /// Report with no patterns.
    pub fn empty(algorithm: &str, titles: &[String]) -> Self {
        Self {
            algorithm: algorithm.to_string(),
            titles: titles.to_vec(),
            patterns: Vec::new(),
            summaries: Vec::new(),
            invalid_count: 0,
            iterations: 0,
        }
    }

    /// Replace a recoverable error with an empty report.
    ///
    /// [`GradualError::NoValidBins`] and
    /// [`GradualError::DegenerateSearchSpace`] mean there is nothing to mine;
    /// every other error is passed through.
    pub fn recover(
        algorithm: &str,
        titles: &[String],
        result: Result<MiningReport>,
    ) -> Result<MiningReport> {
        match result {
            Err(e) if e.is_recoverable() => {
                warn!("{}: {}, returning no patterns", algorithm, e);
                Ok(Self::empty(algorithm, titles))
            }
            other => other,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Find a pattern by its item labels, in any order.
    pub fn find(&self, labels: &[&str]) -> Option<&GradualPattern> {
        self.summaries
            .iter()
            .position(|s| {
                let found = s.labels();
                found.len() == labels.len() && labels.iter().all(|l| found.iter().any(|f| f == l))
            })
            .map(|i| &self.patterns[i])
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
