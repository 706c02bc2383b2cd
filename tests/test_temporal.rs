//! Integration tests for time-lag aware mining.
//!
//! These tests validate:
//! - Step range derived from the representativity threshold
//! - Time lags on regular and irregular time stamps
//! - Target column membership of every pattern
//! - Parallel and sequential sweeps agree

use gradual::config::TemporalConfig;
use gradual::{Dataset, GradualError, MiningConfig, TemporalMiner, TemporalReport};

fn rows() -> Vec<Vec<f64>> {
    vec![
        vec![0.0, 30.0, 3.0, 1.0, 10.0],
        vec![10.0, 35.0, 2.0, 2.0, 8.0],
        vec![20.0, 40.0, 4.0, 2.0, 7.0],
        vec![30.0, 50.0, 1.0, 1.0, 6.0],
        vec![40.0, 52.0, 7.0, 1.0, 2.0],
    ]
}

fn titles() -> Vec<String> {
    ["Day", "Age", "Salary", "Cars", "Expenses"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn data() -> Dataset {
    Dataset::new(titles(), rows())
        .unwrap()
        .with_time_columns(vec![0])
        .unwrap()
}

fn miner(data: Dataset, config: TemporalConfig) -> TemporalMiner {
    TemporalMiner::new(data, MiningConfig::default(), config).unwrap()
}

fn target(target_col: usize) -> TemporalConfig {
    TemporalConfig {
        target_col,
        ..Default::default()
    }
}

// =============================================================================
// Step Range
// =============================================================================

#[test]
fn test_step_range_follows_min_rep() {
    let full = TemporalConfig {
        min_rep: 1.0,
        ..target(1)
    };
    let m = miner(data(), full);
    assert_eq!(m.max_step(), 0);
    let report = m.discover().unwrap();
    assert!(report.steps.is_empty());
    assert_eq!(report.pattern_count(), 0);

    let loose = TemporalConfig {
        min_rep: 0.2,
        ..target(1)
    };
    // 5 - floor(1.0)
    assert_eq!(miner(data(), loose).max_step(), 4);
}

#[test]
fn test_steps_reported_in_order() {
    let report = miner(data(), target(1)).discover().unwrap();
    assert_eq!(report.max_step, 3);
    let steps: Vec<usize> = report.steps.iter().map(|s| s.step).collect();
    assert_eq!(steps, vec![1, 2, 3]);
    assert!(report.patterns().all(|tp| tp.step >= 1 && tp.step <= 3));
}

#[test]
fn test_step_with_single_row_is_empty() {
    let loose = TemporalConfig {
        min_rep: 0.2,
        ..target(1)
    };
    let outcome = miner(data(), loose).mine_step(4).unwrap();
    assert!(outcome.patterns.is_empty());
    assert_eq!(outcome.invalid_count, 0);
}

// =============================================================================
// Patterns and Lags
// =============================================================================

#[test]
fn test_patterns_contain_target() {
    for target_col in 1..5 {
        let report = miner(data(), target(target_col)).discover().unwrap();
        for tp in report.patterns() {
            assert_eq!(tp.target.column(), target_col);
            assert!(tp.pattern.contains(&tp.target));
            assert!(!tp.pattern.contains_column(0));
            assert!(tp.pattern.len() >= 2);
            assert!(tp.pattern.support() > 0.5);
        }
    }
}

#[test]
fn test_regular_stamps_give_proportional_lags() {
    let report = miner(data(), target(1)).discover().unwrap();
    assert!(report.pattern_count() > 0);
    for tp in report.patterns() {
        assert_eq!(tp.time_lag, 10.0 * tp.step as f64);
    }
    // Age+ Salary+ Expenses- and Age+ Cars- Expenses- after one row
    let step1 = &report.steps[0];
    assert_eq!(step1.patterns.len(), 2);
    assert!(step1.patterns.iter().all(|tp| tp.pattern.len() == 3));
}

#[test]
fn test_irregular_stamps() {
    let mut rows = rows();
    for (row, day) in rows.iter_mut().zip([0.0, 1.0, 3.0, 6.0, 10.0]) {
        row[0] = day;
    }
    let data = Dataset::new(titles(), rows)
        .unwrap()
        .with_time_columns(vec![0])
        .unwrap();
    let m = miner(data, target(1));
    assert_eq!(m.time_differences(1), vec![1.0, 2.0, 3.0, 4.0]);
    assert_eq!(m.time_differences(2), vec![3.0, 5.0, 7.0]);

    let outcome = m.mine_step(1).unwrap();
    for tp in &outcome.patterns {
        assert!(tp.time_lag >= 1.0 && tp.time_lag <= 4.0);
    }
}

#[test]
fn test_time_columns_are_summed() {
    let mut rows = rows();
    for row in rows.iter_mut() {
        let day = row[0];
        row.push(day / 10.0);
    }
    let mut titles = titles();
    titles.push("Hour".into());
    let data = Dataset::new(titles, rows)
        .unwrap()
        .with_time_columns(vec![0, 5])
        .unwrap();
    let m = miner(data, target(1));
    assert_eq!(m.time_differences(1), vec![11.0; 4]);
    for tp in m.discover().unwrap().patterns() {
        assert!(!tp.pattern.contains_column(5));
    }
}

#[test]
fn test_parallel_sweep_matches_sequential() {
    for target_col in [1, 4] {
        let sequential = miner(data(), target(target_col)).discover().unwrap();
        let parallel = miner(
            data(),
            TemporalConfig {
                parallel: true,
                ..target(target_col)
            },
        )
        .discover()
        .unwrap();
        assert_eq!(sequential, parallel);
    }
}

// =============================================================================
// Errors and Output
// =============================================================================

#[test]
fn test_invalid_min_rep() {
    for min_rep in [0.0, -0.5, 1.5] {
        let config = TemporalConfig {
            min_rep,
            ..target(1)
        };
        assert!(matches!(
            TemporalMiner::new(data(), MiningConfig::default(), config),
            Err(GradualError::InvalidParameter(_))
        ));
    }
}

#[test]
fn test_report_json() -> anyhow::Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();
    let report: TemporalReport = miner(data(), target(1)).discover()?;
    let json = report.to_json()?;
    assert!(json.contains("\"target_col\": 1"));
    let back: TemporalReport = serde_json::from_str(&json)?;
    assert_eq!(back, report);

    let first = report
        .patterns()
        .next()
        .ok_or_else(|| anyhow::anyhow!("no temporal pattern"))?;
    assert!(first.describe(&report.titles).ends_with("after 1 step(s)"));
    Ok(())
}
