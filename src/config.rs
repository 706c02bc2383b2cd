//! Mining and search configuration.
//!
//! Every tunable of the engine lives in an explicit, serde-serializable
//! struct handed to the constructor that uses it. There is no process-wide
//! state: two strategies with different settings can run side by side.
//!
//! # Architecture
//!
//! 1. **MiningConfig** - Threshold and comparison settings shared by every
//!    algorithm
//! 2. **Per-strategy configs** - Hyperparameters of one search strategy
//! 3. **StrategyConfig** - Enum selecting a strategy together with its config
//!
//! # Example
//!
//! ```
//! use gradual::config::{GeneticConfig, StrategyConfig};
//!
//! let config = StrategyConfig::Genetic(GeneticConfig {
//!     population: 8,
//!     ..Default::default()
//! });
//! let json = config.to_json().unwrap();
//! assert_eq!(StrategyConfig::from_json(&json).unwrap(), config);
//! ```

use crate::error::{GradualError, Result};
use serde::{Deserialize, Serialize};

/// Iterations run by a search strategy unless configured otherwise.
pub const DEFAULT_MAX_ITERATIONS: usize = 20;

fn default_max_iterations() -> usize {
    DEFAULT_MAX_ITERATIONS
}

fn check_unit(name: &str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(GradualError::InvalidParameter(format!(
            "{} must be in [0, 1], got {}",
            name, value
        )));
    }
    Ok(())
}

fn check_non_negative(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(GradualError::InvalidParameter(format!(
            "{} must be a finite non-negative number, got {}",
            name, value
        )));
    }
    Ok(())
}

fn check_positive(name: &str, value: usize) -> Result<()> {
    if value == 0 {
        return Err(GradualError::InvalidParameter(format!(
            "{} must be at least 1",
            name
        )));
    }
    Ok(())
}

// =============================================================================
// Shared Mining Settings
// =============================================================================

/// Settings shared by every mining algorithm.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MiningConfig {
    /// Minimum support in `[0, 1]`
    pub min_support: f64,
    /// Count equal values as both increasing and decreasing
    pub allow_equal: bool,
    /// Maximum pattern length for the exhaustive search
    pub max_level: Option<usize>,
    /// Keep every structurally valid Apriori join
    pub ignore_support: bool,
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            min_support: 0.5,
            allow_equal: false,
            max_level: None,
            ignore_support: false,
        }
    }
}

impl MiningConfig {
    /// Config with the given threshold and defaults elsewhere.
    pub fn with_min_support(min_support: f64) -> Self {
        Self {
            min_support,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_unit("min_support", self.min_support)?;
        if let Some(level) = self.max_level {
            if level < 2 {
                return Err(GradualError::InvalidParameter(format!(
                    "max_level must be at least 2, got {}",
                    level
                )));
            }
        }
        Ok(())
    }
}

// =============================================================================
// Strategy Hyperparameters
// =============================================================================

/// Ant colony optimisation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AntColonyConfig {
    pub max_iterations: usize,
    /// Fraction of pheromone lost per iteration
    pub evaporation_factor: f64,
    pub seed: u64,
}

impl Default for AntColonyConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            evaporation_factor: 0.5,
            seed: 0,
        }
    }
}

impl AntColonyConfig {
    pub fn validate(&self) -> Result<()> {
        check_positive("max_iterations", self.max_iterations)?;
        check_unit("evaporation_factor", self.evaporation_factor)
    }
}

/// Genetic algorithm.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneticConfig {
    pub max_iterations: usize,
    /// Individuals kept after every generation
    pub population: usize,
    /// Share of the population paired for crossover
    pub pc: f64,
    /// Upper bound of the blend factor
    pub gamma: f64,
    /// Probability that a bit is considered for mutation
    pub mu: f64,
    /// Probability that a considered bit is flipped
    pub sigma: f64,
    pub seed: u64,
}

impl Default for GeneticConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            population: 5,
            pc: 0.5,
            gamma: 1.0,
            mu: 0.9,
            sigma: 0.9,
            seed: 0,
        }
    }
}

impl GeneticConfig {
    pub fn validate(&self) -> Result<()> {
        check_positive("max_iterations", self.max_iterations)?;
        if self.population < 2 {
            return Err(GradualError::InvalidParameter(format!(
                "population must be at least 2 to pick parents, got {}",
                self.population
            )));
        }
        check_unit("pc", self.pc)?;
        check_non_negative("gamma", self.gamma)?;
        check_unit("mu", self.mu)?;
        check_unit("sigma", self.sigma)
    }
}

/// Particle swarm optimisation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ParticleSwarmConfig {
    pub max_iterations: usize,
    pub particles: usize,
    /// Inertia weight applied to the previous velocity
    pub velocity: f64,
    /// Pull towards the particle's own best
    pub coeff_personal: f64,
    /// Pull towards the swarm's best
    pub coeff_global: f64,
    pub seed: u64,
}

impl Default for ParticleSwarmConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            particles: 5,
            velocity: 0.9,
            coeff_personal: 0.01,
            coeff_global: 0.9,
            seed: 0,
        }
    }
}

impl ParticleSwarmConfig {
    pub fn validate(&self) -> Result<()> {
        check_positive("max_iterations", self.max_iterations)?;
        check_positive("particles", self.particles)?;
        check_non_negative("velocity", self.velocity)?;
        check_non_negative("coeff_personal", self.coeff_personal)?;
        check_non_negative("coeff_global", self.coeff_global)
    }
}

/// Hill climbing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HillClimbingConfig {
    pub max_iterations: usize,
    pub step_size: f64,
    pub seed: u64,
}

impl Default for HillClimbingConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            step_size: 0.5,
            seed: 0,
        }
    }
}

impl HillClimbingConfig {
    pub fn validate(&self) -> Result<()> {
        check_positive("max_iterations", self.max_iterations)?;
        check_non_negative("step_size", self.step_size)
    }
}

/// Pure random search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RandomSearchConfig {
    pub max_iterations: usize,
    pub seed: u64,
}

impl Default for RandomSearchConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            seed: 0,
        }
    }
}

impl RandomSearchConfig {
    pub fn validate(&self) -> Result<()> {
        check_positive("max_iterations", self.max_iterations)
    }
}

/// Time-lag aware mining.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TemporalConfig {
    /// Column every temporal pattern must contain
    pub target_col: usize,
    /// Minimum share of rows kept by a shift, in `(0, 1]`
    pub min_rep: f64,
    /// Sweep steps on the rayon thread pool
    pub parallel: bool,
}

impl Default for TemporalConfig {
    fn default() -> Self {
        Self {
            target_col: 0,
            min_rep: 0.5,
            parallel: false,
        }
    }
}

impl TemporalConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.min_rep > 0.0 && self.min_rep <= 1.0) {
            return Err(GradualError::InvalidParameter(format!(
                "min_rep must be in (0, 1], got {}",
                self.min_rep
            )));
        }
        Ok(())
    }
}

// =============================================================================
// Strategy Selection
// =============================================================================

/// Search strategy together with its hyperparameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum StrategyConfig {
    /// Exhaustive level-wise search
    Graank,
    AntColony(AntColonyConfig),
    Genetic(GeneticConfig),
    ParticleSwarm(ParticleSwarmConfig),
    HillClimbing(HillClimbingConfig),
    RandomSearch(RandomSearchConfig),
}

impl StrategyConfig {
    /// Short algorithm name used in reports.
    pub fn algorithm_name(&self) -> &'static str {
        match self {
            StrategyConfig::Graank => "GRAANK",
            StrategyConfig::AntColony(_) => "ACO-GRAANK",
            StrategyConfig::Genetic(_) => "GA-GRAANK",
            StrategyConfig::ParticleSwarm(_) => "PSO-GRAANK",
            StrategyConfig::HillClimbing(_) => "LS-GRAANK",
            StrategyConfig::RandomSearch(_) => "RS-GRAANK",
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            StrategyConfig::Graank => Ok(()),
            StrategyConfig::AntColony(c) => c.validate(),
            StrategyConfig::Genetic(c) => c.validate(),
            StrategyConfig::ParticleSwarm(c) => c.validate(),
            StrategyConfig::HillClimbing(c) => c.validate(),
            StrategyConfig::RandomSearch(c) => c.validate(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let mining = MiningConfig::default();
        assert_eq!(mining.min_support, 0.5);
        assert!(!mining.allow_equal);
        assert!(mining.validate().is_ok());

        let ga = GeneticConfig::default();
        assert_eq!(ga.population, 5);
        assert_eq!(ga.max_iterations, DEFAULT_MAX_ITERATIONS);
        assert!(ga.validate().is_ok());

        assert_eq!(AntColonyConfig::default().evaporation_factor, 0.5);
        assert_eq!(ParticleSwarmConfig::default().coeff_personal, 0.01);
        assert_eq!(HillClimbingConfig::default().step_size, 0.5);
        assert_eq!(TemporalConfig::default().min_rep, 0.5);
    }

    #[test]
    fn test_validation_errors() {
        assert!(MiningConfig::with_min_support(1.2).validate().is_err());
        let mining = MiningConfig {
            max_level: Some(1),
            ..Default::default()
        };
        assert!(mining.validate().is_err());

        let aco = AntColonyConfig {
            evaporation_factor: 2.0,
            ..Default::default()
        };
        assert!(aco.validate().is_err());

        let pso = ParticleSwarmConfig {
            particles: 0,
            ..Default::default()
        };
        assert!(matches!(
            pso.validate(),
            Err(GradualError::InvalidParameter(_))
        ));

        let temporal = TemporalConfig {
            min_rep: 0.0,
            ..Default::default()
        };
        assert!(temporal.validate().is_err());
    }

    #[test]
    fn test_strategy_config_json() {
        let config = StrategyConfig::AntColony(AntColonyConfig {
            seed: 7,
            ..Default::default()
        });
        let json = config.to_json().unwrap();
        assert!(json.contains("AntColony"));
        assert_eq!(StrategyConfig::from_json(&json).unwrap(), config);

        let graank = StrategyConfig::from_json("\"Graank\"").unwrap();
        assert_eq!(graank, StrategyConfig::Graank);
        assert_eq!(graank.algorithm_name(), "GRAANK");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = StrategyConfig::from_json(r#"{"Genetic": {"population": 9}}"#).unwrap();
        match config {
            StrategyConfig::Genetic(c) => {
                assert_eq!(c.population, 9);
                assert_eq!(c.pc, 0.5);
            }
            other => panic!("unexpected config {:?}", other),
        }
        assert!(matches!(
            StrategyConfig::from_json("{not json"),
            Err(GradualError::Serialization(_))
        ));
    }
}
