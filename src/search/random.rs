//! RandomSearch - Uniformly sampled positions, keeping the best.

use crate::config::{MiningConfig, RandomSearchConfig};
use crate::dataset::Dataset;
use crate::error::Result;
use crate::search::{open_session, record_best, SearchAgent, SearchStrategy};
use crate::search_space::SearchSpace;
use crate::session::{MiningReport, PatternRegistry};
use crate::utils::uniform_position;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

pub const RS_NAME: &str = "RS-GRAANK";

/// Random search over the position space.
#[derive(Debug, Clone)]
pub struct RandomSearch {
    data: Dataset,
    mining: MiningConfig,
    config: RandomSearchConfig,
}

impl RandomSearch {
    pub fn new(data: Dataset, mining: MiningConfig, config: RandomSearchConfig) -> Result<Self> {
        mining.validate()?;
        config.validate()?;
        Ok(Self {
            data,
            mining,
            config,
        })
    }

    fn run(&self) -> Result<MiningReport> {
        let mut session = open_session(&self.data, &self.mining)?;
        let index = session.index()?;
        let space = SearchSpace::from_index(index)?;
        let mut rng = StdRng::seed_from_u64(self.config.seed);

        let start = uniform_position(&mut rng, space.var_min(), space.var_max_f64());
        let mut best = SearchAgent::evaluated(start, &space, index);
        let mut registry = PatternRegistry::new();
        let mut invalid_count = 0;

        for iteration in 0..self.config.max_iterations {
            let position =
                space.apply_bound(uniform_position(&mut rng, space.var_min(), space.var_max_f64()));
            let candidate = SearchAgent::evaluated(position, &space, index);
            if candidate.is_invalid() {
                invalid_count += 1;
            }
            if candidate.cost < best.cost {
                best = candidate;
            }

            record_best(&mut registry, &space, index, best.position);
            debug!("{} iteration {}: best cost {}", RS_NAME, iteration, best.cost);
        }

        info!(
            "{}: {} patterns after {} iterations",
            RS_NAME,
            registry.winners().len(),
            self.config.max_iterations
        );
        session.finalize(
            RS_NAME,
            registry.into_winners(),
            invalid_count,
            self.config.max_iterations,
        )
    }
}

impl SearchStrategy for RandomSearch {
    fn name(&self) -> &'static str {
        RS_NAME
    }

    fn discover(&self) -> Result<MiningReport> {
        MiningReport::recover(RS_NAME, self.data.titles(), self.run())
    }
}
