//! ParticleSwarm - Swarm search over pattern positions.
//!
//! Every particle keeps a velocity and its personal best. After all
//! particles are evaluated the velocities are updated with
//!
//! ```text
//! v = w * v + cp * r1 * (pbest - x) + cg * r2 * (gbest - x)
//! ```
//!
//! and added to the positions. Particles outside `[0, 2^k - 1]` are not
//! evaluated and get the worst cost.

use crate::config::{MiningConfig, ParticleSwarmConfig};
use crate::dataset::Dataset;
use crate::error::Result;
use crate::search::{open_session, record_best, SearchAgent, SearchStrategy};
use crate::search_space::SearchSpace;
use crate::session::{MiningReport, PatternRegistry};
use crate::utils::random_position;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const PSO_NAME: &str = "PSO-GRAANK";

/// Particle swarm optimisation over the position space.
#[derive(Debug, Clone)]
pub struct ParticleSwarm {
    data: Dataset,
    mining: MiningConfig,
    config: ParticleSwarmConfig,
}

impl ParticleSwarm {
    pub fn new(data: Dataset, mining: MiningConfig, config: ParticleSwarmConfig) -> Result<Self> {
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

        let mut swarm: Vec<SearchAgent> = (0..self.config.particles)
            .map(|_| SearchAgent::unevaluated(random_position(&mut rng, space.var_max())))
            .collect();
        let mut velocities = vec![1.0f64; swarm.len()];
        let mut personal = swarm.clone();
        let mut global = personal[0];
        let mut best = SearchAgent::evaluated(global.position, &space, index);

        let mut registry = PatternRegistry::new();
        let mut invalid_count = 0;

        for iteration in 0..self.config.max_iterations {
            for (particle, pbest) in swarm.iter_mut().zip(personal.iter_mut()) {
                let in_bounds =
                    particle.position >= space.var_min() && particle.position <= space.var_max_f64();
                *particle = if in_bounds {
                    let evaluated = SearchAgent::evaluated(particle.position, &space, index);
                    if evaluated.is_invalid() {
                        invalid_count += 1;
                    }
                    evaluated
                } else {
                    SearchAgent::unevaluated(particle.position)
                };

                if particle.cost < pbest.cost {
                    *pbest = *particle;
                }
                if particle.cost < global.cost {
                    global = *particle;
                }
            }
            if global.cost < best.cost {
                best = global;
            }

            for ((particle, pbest), v) in swarm.iter_mut().zip(&personal).zip(velocities.iter_mut()) {
                let r1: f64 = rng.gen();
                let r2: f64 = rng.gen();
                *v = self.config.velocity * *v
                    + self.config.coeff_personal * r1 * (pbest.position - particle.position)
                    + self.config.coeff_global * r2 * (global.position - particle.position);
                particle.position += *v;
            }

            record_best(&mut registry, &space, index, best.position);
            debug!("{} iteration {}: best cost {}", PSO_NAME, iteration, best.cost);
        }

        info!(
            "{}: {} patterns after {} iterations",
            PSO_NAME,
            registry.winners().len(),
            self.config.max_iterations
        );
        session.finalize(
            PSO_NAME,
            registry.into_winners(),
            invalid_count,
            self.config.max_iterations,
        )
    }
}

impl SearchStrategy for ParticleSwarm {
    fn name(&self) -> &'static str {
        PSO_NAME
    }

    fn discover(&self) -> Result<MiningReport> {
        MiningReport::recover(PSO_NAME, self.data.titles(), self.run())
    }
}
