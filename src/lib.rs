//! Gradual - Gradual Pattern Mining Engine
//!
//! Gradual mines **gradual patterns** from numeric tables: sets of
//! column/direction pairs such as "the older, the lower the expenses" whose
//! co-variation holds over a large enough share of row pairs.
//!
//! # Key Characteristics
//!
//! - Pairwise comparison bitmaps packed into machine words
//! - Support computed with hardware popcount
//! - One shared engine for exhaustive and metaheuristic search
//! - Seeded, reproducible search strategies
//!
//! # Architecture
//!
//! The engine is built around several core components:
//!
//! - **Bitmap / BitmapIndex**: Row-pair bitmaps and the registry of valid items
//! - **CandidateGenerator**: Apriori level-wise joins with duplicate pruning
//! - **SearchSpace**: Encoding of item combinations as a single position
//! - **validate**: Greedy re-validation of arbitrary candidates
//! - **Strategies**: GRAANK, ant colony, genetic, particle swarm, hill
//!   climbing and random search, plus the time-lag aware [`TemporalMiner`]
//!
//! # Examples
//!
//! ## Exhaustive Search
//!
//! ```
//! use gradual::{Dataset, Graank, MiningConfig, SearchStrategy};
//!
//! let data = Dataset::new(
//!     vec!["Age".into(), "Salary".into(), "Cars".into(), "Expenses".into()],
//!     vec![
//!         vec![30.0, 3.0, 1.0, 10.0],
//!         vec![35.0, 2.0, 2.0, 8.0],
//!         vec![40.0, 4.0, 2.0, 7.0],
//!         vec![50.0, 1.0, 1.0, 6.0],
//!         vec![52.0, 7.0, 1.0, 2.0],
//!     ],
//! ).unwrap();
//!
//! let report = Graank::new(data, MiningConfig::default()).unwrap().discover().unwrap();
//! for summary in &report.summaries {
//!     println!("{:?} : {}", summary.labels(), summary.support);
//! }
//! ```
//!
//! ## Metaheuristic Search
//!
//! ```
//! use gradual::config::{GeneticConfig, StrategyConfig};
//! use gradual::{build_strategy, Dataset, MiningConfig};
//!
//! let data = Dataset::new(
//!     vec!["a".into(), "b".into(), "c".into()],
//!     vec![vec![1.0, 9.0, 2.0], vec![2.0, 8.0, 1.0], vec![3.0, 7.0, 3.0]],
//! ).unwrap();
//!
//! let config = StrategyConfig::Genetic(GeneticConfig { seed: 42, ..Default::default() });
//! let strategy = build_strategy(data, MiningConfig::default(), &config).unwrap();
//! let report = strategy.discover().unwrap();
//! assert_eq!(report.algorithm, "GA-GRAANK");
//! ```
//!
//! # Logging
//!
//! The crate logs through the `log` facade and never installs a logger.
//! Bitmap builds and per-step summaries are logged at `debug`, per-level
//! join counts at `trace`, run summaries at `info`.

// Module declarations
pub mod bitmap;
pub mod error;
pub mod utils;

// Data model
pub mod dataset;
pub mod item;
pub mod pattern;

// Mining engine
pub mod bitmap_index;
pub mod candidate;
pub mod search_space;
pub mod validator;

// Runs and strategies
pub mod config;
pub mod graank;
pub mod search;
pub mod session;
pub mod temporal;

// Re-exports for convenient access
pub use bitmap::{support_of, Bitmap, Word, BITS_PER_WORD};
pub use error::{GradualError, Result};

pub use dataset::Dataset;
pub use item::{Direction, GradualItem};
pub use pattern::{remove_subsets, GradualPattern, PatternKey, PatternSummary};

pub use bitmap_index::{BitmapIndex, ValidBin};
pub use candidate::{Candidate, CandidateGenerator, NextLevel};
pub use search_space::{SearchSpace, MAX_WIDTH};
pub use validator::validate;

pub use config::{
    AntColonyConfig, GeneticConfig, HillClimbingConfig, MiningConfig, ParticleSwarmConfig,
    RandomSearchConfig, StrategyConfig, TemporalConfig,
};
pub use graank::{mine_levels, Graank, LevelwiseOutcome};
pub use search::{
    build_strategy, AntColony, Genetic, HillClimbing, ParticleSwarm, RandomSearch, SearchAgent,
    SearchStrategy,
};
pub use session::{MiningReport, MiningSession, Offer, PatternRegistry, SessionState};
pub use temporal::{StepOutcome, TemporalMiner, TemporalPattern, TemporalReport};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = "Gradual";

/// Get version string
pub fn version() -> String {
    format!("{} v{}", NAME, VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let ver = version();
        assert!(ver.contains("Gradual"));
        assert!(ver.contains("1.0.0"));
    }

    #[test]
    fn test_re_exports() {
        let _bitmap = Bitmap::new(4);
        let _result: Result<()> = Ok(());
        assert_eq!(BITS_PER_WORD, 32);
        assert_eq!(GradualItem::increasing(0).key(), "0_pos");
    }
}
