//! Search strategies built on the shared mining engine.
//!
//! Every strategy owns its dataset and configuration and implements
//! [`SearchStrategy`]. A call to [`SearchStrategy::discover`] opens a fresh
//! [`MiningSession`], so repeated calls with the same seed give the same
//! report.
//!
//! The numeric strategies (genetic, particle swarm, hill climbing, random)
//! move [`SearchAgent`]s through the position space of a [`SearchSpace`]
//! and, after every iteration, validate the best position's pattern and
//! offer it to a [`PatternRegistry`]. The ant colony builds patterns item by
//! item from a pheromone matrix instead.

mod aco;
mod genetic;
mod hill_climbing;
mod particle;
mod random;

pub use aco::AntColony;
pub use genetic::Genetic;
pub use hill_climbing::HillClimbing;
pub use particle::ParticleSwarm;
pub use random::RandomSearch;

use crate::bitmap_index::BitmapIndex;
use crate::config::{MiningConfig, StrategyConfig};
use crate::dataset::Dataset;
use crate::error::Result;
use crate::graank::Graank;
use crate::search_space::SearchSpace;
use crate::session::{MiningReport, MiningSession, Offer, PatternRegistry};
use crate::validator::validate;
use log::trace;

/// Common interface of every mining algorithm.
pub trait SearchStrategy {
    /// Algorithm name used in reports.
    fn name(&self) -> &'static str;

    /// Run the search and report the accepted patterns.
    ///
    /// "Nothing to mine" conditions produce an empty report; structural
    /// problems with the input are returned as errors.
    fn discover(&self) -> Result<MiningReport>;
}

/// A position in the search space and its cost (lower is better).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchAgent {
    pub position: f64,
    pub cost: f64,
}

impl SearchAgent {
    pub fn new(position: f64, cost: f64) -> Self {
        Self { position, cost }
    }

    /// Agent at `position` with the worst possible cost.
    pub fn unevaluated(position: f64) -> Self {
        Self::new(position, 1.0)
    }

    /// Agent at `position` with its cost computed.
    pub fn evaluated(position: f64, space: &SearchSpace, index: &BitmapIndex) -> Self {
        Self::new(position, space.cost(position, index))
    }

    /// Cost 1 means the decoded items share no row pair.
    #[inline]
    pub fn is_invalid(&self) -> bool {
        self.cost >= 1.0
    }
}

/// Instantiate the strategy described by `strategy`.
///
/// # Errors
///
/// Returns [`crate::GradualError::InvalidParameter`] if either config is
/// invalid.
pub fn build_strategy(
    data: Dataset,
    mining: MiningConfig,
    strategy: &StrategyConfig,
) -> Result<Box<dyn SearchStrategy>> {
    strategy.validate()?;
    Ok(match strategy {
        StrategyConfig::Graank => Box::new(Graank::new(data, mining)?),
        StrategyConfig::AntColony(c) => Box::new(AntColony::new(data, mining, c.clone())?),
        StrategyConfig::Genetic(c) => Box::new(Genetic::new(data, mining, c.clone())?),
        StrategyConfig::ParticleSwarm(c) => Box::new(ParticleSwarm::new(data, mining, c.clone())?),
        StrategyConfig::HillClimbing(c) => Box::new(HillClimbing::new(data, mining, c.clone())?),
        StrategyConfig::RandomSearch(c) => Box::new(RandomSearch::new(data, mining, c.clone())?),
    })
}

/// Open a session and build its bitmaps, failing when nothing can be mined.
pub(crate) fn open_session(data: &Dataset, mining: &MiningConfig) -> Result<MiningSession> {
    let mut session = MiningSession::new(data.clone(), mining.clone())?;
    session.build_bitmaps()?.ensure_minable()?;
    Ok(session)
}

/// Validate the pattern at `position` and offer it to the registry.
pub(crate) fn record_best(
    registry: &mut PatternRegistry,
    space: &SearchSpace,
    index: &BitmapIndex,
    position: f64,
) -> Offer {
    let min_support = index.min_support();
    let gp = validate(&space.decode(Some(position)), index, min_support);
    let offer = registry.offer(gp, min_support);
    trace!("best position {} -> {:?}", position, offer);
    offer
}

/// Index of the lowest-cost agent.
pub(crate) fn best_of(agents: &[SearchAgent]) -> Option<usize> {
    agents
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.cost.total_cmp(&b.1.cost))
        .map(|(i, _)| i)
}
