//! HillClimbing - Local search stepping away from the best position.
//!
//! Each step proposes `best + U{0..2^k - 1} * step_size`, clamps it into the
//! position space and moves there when the cost improves.

use crate::config::{HillClimbingConfig, MiningConfig};
use crate::dataset::Dataset;
use crate::error::Result;
use crate::search::{open_session, record_best, SearchAgent, SearchStrategy};
use crate::search_space::SearchSpace;
use crate::session::{MiningReport, PatternRegistry};
use crate::utils::{random_position, uniform_position};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

pub const HC_NAME: &str = "LS-GRAANK";

/// Hill climbing over the position space.
#[derive(Debug, Clone)]
pub struct HillClimbing {
    data: Dataset,
    mining: MiningConfig,
    config: HillClimbingConfig,
}

impl HillClimbing {
    pub fn new(data: Dataset, mining: MiningConfig, config: HillClimbingConfig) -> Result<Self> {
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

        let start = space.apply_bound(uniform_position(
            &mut rng,
            space.var_min(),
            space.var_max_f64(),
        ));
        let mut best = SearchAgent::evaluated(start, &space, index);
        let mut registry = PatternRegistry::new();
        let mut invalid_count = 0;

        for iteration in 0..self.config.max_iterations {
            let step = random_position(&mut rng, space.var_max()) * self.config.step_size;
            let candidate = SearchAgent::evaluated(space.apply_bound(best.position + step), &space, index);
            if candidate.is_invalid() {
                invalid_count += 1;
            }
            if candidate.cost < best.cost {
                best = candidate;
            }

            record_best(&mut registry, &space, index, best.position);
            debug!("{} iteration {}: best cost {}", HC_NAME, iteration, best.cost);
        }

        info!(
            "{}: {} patterns after {} iterations",
            HC_NAME,
            registry.winners().len(),
            self.config.max_iterations
        );
        session.finalize(
            HC_NAME,
            registry.into_winners(),
            invalid_count,
            self.config.max_iterations,
        )
    }
}

impl SearchStrategy for HillClimbing {
    fn name(&self) -> &'static str {
        HC_NAME
    }

    fn discover(&self) -> Result<MiningReport> {
        MiningReport::recover(HC_NAME, self.data.titles(), self.run())
    }
}
