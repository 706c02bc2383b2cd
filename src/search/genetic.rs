//! Genetic - Evolutionary search over pattern positions.
//!
//! Each generation pairs random parents, blends their positions with a
//! factor `alpha ~ U(0, gamma)`, mutates the children bit by bit, merges
//! them into the population and keeps the fittest `population` individuals.
//! Children are evaluated after crossover and again after mutation.

use crate::config::{GeneticConfig, MiningConfig};
use crate::dataset::Dataset;
use crate::error::Result;
use crate::search::{best_of, open_session, record_best, SearchAgent, SearchStrategy};
use crate::search_space::SearchSpace;
use crate::session::{MiningReport, PatternRegistry};
use crate::utils::{random_position, uniform_position};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};

pub const GA_NAME: &str = "GA-GRAANK";

/// Genetic algorithm over the position space.
#[derive(Debug, Clone)]
pub struct Genetic {
    data: Dataset,
    mining: MiningConfig,
    config: GeneticConfig,
}

impl Genetic {
    pub fn new(data: Dataset, mining: MiningConfig, config: GeneticConfig) -> Result<Self> {
        mining.validate()?;
        config.validate()?;
        Ok(Self {
            data,
            mining,
            config,
        })
    }

    /// Children produced per generation, always even.
    fn child_count(&self) -> usize {
        ((self.config.pc * self.config.population as f64 / 2.0).round() as usize) * 2
    }

    fn run(&self) -> Result<MiningReport> {
        let mut session = open_session(&self.data, &self.mining)?;
        let index = session.index()?;
        let space = SearchSpace::from_index(index)?;
        let mut rng = StdRng::seed_from_u64(self.config.seed);

        let mut population: Vec<SearchAgent> = (0..self.config.population)
            .map(|_| SearchAgent::evaluated(random_position(&mut rng, space.var_max()), &space, index))
            .collect();
        let mut best = best_of(&population)
            .map(|i| population[i])
            .unwrap_or_else(|| SearchAgent::unevaluated(space.var_min()));

        let mut registry = PatternRegistry::new();
        let mut invalid_count = 0;
        let pairs = self.child_count() / 2;

        for iteration in 0..self.config.max_iterations {
            let mut children = Vec::with_capacity(pairs * 2);
            for _ in 0..pairs {
                let (i, j) = pick_parents(population.len(), &mut rng);
                let (p1, p2) = (population[i], population[j]);

                let (x1, x2) = self.crossover(p1.position, p2.position, &mut rng);
                let mut offspring = [x1, x2].map(|x| SearchAgent::unevaluated(space.apply_bound(x)));
                for child in offspring.iter_mut() {
                    *child = SearchAgent::evaluated(child.position, &space, index);
                    if child.is_invalid() {
                        invalid_count += 1;
                    }
                    if child.cost < best.cost {
                        best = *child;
                    }
                }

                for child in offspring.iter_mut() {
                    let mutated = space.apply_bound(self.mutate(child.position, &space, &mut rng));
                    *child = SearchAgent::evaluated(mutated, &space, index);
                    if child.is_invalid() {
                        invalid_count += 1;
                    }
                    if child.cost < best.cost {
                        best = *child;
                    }
                }
                children.extend(offspring);
            }

            population.extend(children);
            population.sort_by(|a, b| a.cost.total_cmp(&b.cost));
            population.truncate(self.config.population);

            record_best(&mut registry, &space, index, best.position);
            debug!("{} iteration {}: best cost {}", GA_NAME, iteration, best.cost);
        }

        info!(
            "{}: {} patterns after {} iterations",
            GA_NAME,
            registry.winners().len(),
            self.config.max_iterations
        );
        session.finalize(
            GA_NAME,
            registry.into_winners(),
            invalid_count,
            self.config.max_iterations,
        )
    }

    /// Blend two parent positions.
    fn crossover(&self, p1: f64, p2: f64, rng: &mut StdRng) -> (f64, f64) {
        let alpha = uniform_position(rng, 0.0, self.config.gamma);
        (
            alpha * p1 + (1.0 - alpha) * p2,
            alpha * p2 + (1.0 - alpha) * p1,
        )
    }

    /// Flip bits of the truncated position.
    ///
    /// Each of the `k` bits is considered with probability `mu` and a
    /// considered bit is flipped with probability `sigma`.
    fn mutate(&self, position: f64, space: &SearchSpace, rng: &mut StdRng) -> f64 {
        let mut bits = space.apply_bound(position).trunc() as u128;
        for bit in 0..space.width() {
            if rng.gen::<f64>() < self.config.mu && rng.gen::<f64>() < self.config.sigma {
                bits ^= 1u128 << bit;
            }
        }
        bits as f64
    }
}

/// Two distinct population indices, uniformly at random.
///
/// `len` is at least 2 (population size is validated).
fn pick_parents(len: usize, rng: &mut StdRng) -> (usize, usize) {
    let picked = sample(rng, len, 2);
    (picked.index(0), picked.index(1))
}

impl SearchStrategy for Genetic {
    fn name(&self) -> &'static str {
        GA_NAME
    }

    fn discover(&self) -> Result<MiningReport> {
        MiningReport::recover(GA_NAME, self.data.titles(), self.run())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_MAX_ITERATIONS;
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

    fn space() -> SearchSpace {
        SearchSpace::new(vec![
            GradualItem::increasing(0),
            GradualItem::decreasing(0),
            GradualItem::increasing(1),
            GradualItem::decreasing(1),
        ])
        .unwrap()
    }

    #[test]
    fn test_child_count_even() {
        let ga = Genetic::new(data(), MiningConfig::default(), GeneticConfig::default()).unwrap();
        // round(0.5 * 5 / 2) * 2
        assert_eq!(ga.child_count(), 2);
        let ga = Genetic::new(
            data(),
            MiningConfig::default(),
            GeneticConfig {
                pc: 1.0,
                population: 6,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(ga.child_count(), 6);
    }

    #[test]
    fn test_crossover_blends() {
        let ga = Genetic::new(
            data(),
            MiningConfig::default(),
            GeneticConfig {
                gamma: 0.0,
                ..Default::default()
            },
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        // alpha is 0: the children swap parents
        assert_eq!(ga.crossover(3.0, 12.0, &mut rng), (12.0, 3.0));
    }

    #[test]
    fn test_mutation_extremes() {
        let space = space();
        let mut rng = StdRng::seed_from_u64(0);
        let never = Genetic::new(
            data(),
            MiningConfig::default(),
            GeneticConfig {
                mu: 0.0,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(never.mutate(9.7, &space, &mut rng), 9.0);

        let always = Genetic::new(
            data(),
            MiningConfig::default(),
            GeneticConfig {
                mu: 1.0,
                sigma: 1.0,
                ..Default::default()
            },
        )
        .unwrap();
        // 0b1001 -> 0b0110
        assert_eq!(always.mutate(9.0, &space, &mut rng), 6.0);
    }

    #[test]
    fn test_discover_deterministic() {
        let config = GeneticConfig {
            seed: 11,
            ..Default::default()
        };
        let ga = Genetic::new(data(), MiningConfig::default(), config).unwrap();
        let first = ga.discover().unwrap();
        let second = ga.discover().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.iterations, DEFAULT_MAX_ITERATIONS);
        for gp in &first.patterns {
            assert!(gp.support() >= 0.5);
        }
    }

    #[test]
    fn test_pick_parents_distinct() {
        let mut rng = StdRng::seed_from_u64(11);
        for len in [2, 3, 10] {
            for _ in 0..50 {
                let (i, j) = pick_parents(len, &mut rng);
                assert_ne!(i, j);
                assert!(i < len && j < len);
            }
        }
    }
}
