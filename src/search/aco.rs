//! AntColony - Pheromone-guided construction of gradual patterns.
//!
//! The distance matrix holds, for every pair of valid items on different
//! columns, the number of row pairs both items agree on. Entries below the
//! support threshold's pair count are zeroed. Each ant walks the rows of the
//! matrix and picks one item per row by roulette wheel over
//! `distance * pheromone`, keeping only the first item per column.
//!
//! Pheromones start at 1, evaporate by `(1 - e)` after every ant and gain
//! `+1` on every item pair of an accepted pattern.

use crate::bitmap_index::BitmapIndex;
use crate::config::{AntColonyConfig, MiningConfig};
use crate::dataset::Dataset;
use crate::error::Result;
use crate::pattern::GradualPattern;
use crate::search::{open_session, SearchStrategy};
use crate::session::{MiningReport, Offer, PatternRegistry};
use crate::utils::pair_count;
use crate::validator::validate;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const ACO_NAME: &str = "ACO-GRAANK";

/// Ant colony optimisation over the valid bins.
#[derive(Debug, Clone)]
pub struct AntColony {
    data: Dataset,
    mining: MiningConfig,
    config: AntColonyConfig,
}

impl AntColony {
    pub fn new(data: Dataset, mining: MiningConfig, config: AntColonyConfig) -> Result<Self> {
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
        let mut rng = StdRng::seed_from_u64(self.config.seed);

        let distance = distance_matrix(index);
        let k = distance.len();
        let mut pheromones = vec![vec![1.0f64; k]; k];
        let mut registry = PatternRegistry::new();
        let mut invalid_count = 0;

        for iteration in 0..self.config.max_iterations {
            let candidate = construct(index, &distance, &pheromones, &mut rng);
            evaporate(&mut pheromones, self.config.evaporation_factor);

            if candidate.len() < 2 {
                invalid_count += 1;
                continue;
            }
            if registry.is_known(&candidate) {
                continue;
            }

            let validated = validate(&candidate, index, index.min_support());
            let changed = !validated.same_items(&candidate);
            match registry.offer(validated.clone(), index.min_support()) {
                Offer::Accepted => reinforce(&mut pheromones, index, &validated),
                Offer::Rejected => invalid_count += 1,
                Offer::Ignored => {}
            }
            if changed {
                registry.reject(candidate);
            }
            debug!(
                "{} iteration {}: {} winners",
                ACO_NAME,
                iteration,
                registry.winners().len()
            );
        }

        info!(
            "{}: {} patterns after {} iterations",
            ACO_NAME,
            registry.winners().len(),
            self.config.max_iterations
        );
        session.finalize(
            ACO_NAME,
            registry.into_winners(),
            invalid_count,
            self.config.max_iterations,
        )
    }
}

impl SearchStrategy for AntColony {
    fn name(&self) -> &'static str {
        ACO_NAME
    }

    fn discover(&self) -> Result<MiningReport> {
        MiningReport::recover(ACO_NAME, self.data.titles(), self.run())
    }
}

/// Shared row-pair counts of item pairs on different columns.
///
/// Counts below `min_support * n(n-1)/2` are zeroed.
pub fn distance_matrix(index: &BitmapIndex) -> Vec<Vec<usize>> {
    let bins = index.bins();
    let floor = index.min_support() * pair_count(index.row_count());
    let mut d = vec![vec![0usize; bins.len()]; bins.len()];
    for (i, a) in bins.iter().enumerate() {
        for (j, b) in bins.iter().enumerate() {
            if a.item.column() == b.item.column() {
                continue;
            }
            let count = a.bitmap.count_and(&b.bitmap);
            if count as f64 >= floor {
                d[i][j] = count;
            }
        }
    }
    d
}

/// One ant's pattern: roulette-wheel pick per matrix row.
fn construct(
    index: &BitmapIndex,
    distance: &[Vec<usize>],
    pheromones: &[Vec<f64>],
    rng: &mut StdRng,
) -> GradualPattern {
    let keys = index.bins();
    let mut gp = GradualPattern::new();
    for (d_row, p_row) in distance.iter().zip(pheromones) {
        let weights: Vec<f64> = d_row
            .iter()
            .zip(p_row)
            .map(|(&d, &p)| d as f64 * p)
            .collect();
        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            continue;
        }

        let r: f64 = rng.gen();
        let mut cumulative = 0.0;
        let picked = weights.iter().position(|w| {
            cumulative += w / total;
            cumulative > r
        });
        if let Some(j) = picked {
            let gi = keys[j].item;
            if !gp.contains_column(gi.column()) {
                let _ = gp.add_item(gi);
            }
        }
    }
    gp
}

fn evaporate(pheromones: &mut [Vec<f64>], factor: f64) {
    for row in pheromones.iter_mut() {
        for p in row.iter_mut() {
            *p *= 1.0 - factor;
        }
    }
}

fn reinforce(pheromones: &mut [Vec<f64>], index: &BitmapIndex, gp: &GradualPattern) {
    let positions: Vec<usize> = gp
        .items()
        .iter()
        .filter_map(|gi| index.position_of(gi))
        .collect();
    for (n, &i) in positions.iter().enumerate() {
        for &j in &positions[n + 1..] {
            pheromones[i][j] += 1.0;
            pheromones[j][i] += 1.0;
        }
    }
}
