//! Walk simulation engine: plays N independent trials of the floor-climbing game.
//!
//! Each trial gets its own `SmallRng` seeded with `seed + trial_index`
//! (wrapping), so the result depends only on `(trial_count, step_count, seed)`
//! and never on thread count or scheduling. [`run`] spreads trials over the
//! rayon pool; [`run_sequential`] plays them on the calling thread and yields
//! an identical result.

use rand::rngs::SmallRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::ExperimentConfig;
use crate::error::{Result, SimulationError};
use crate::walk::{simulate_trial, Trial};

use super::statistics::{frequency_table, modes, reach_count, reach_percentage};

/// All trials of one run plus the terminal position of each.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SimulationResult {
    trial_count: usize,
    step_count: usize,
    seed: u64,
    #[serde(skip)]
    trials: Vec<Trial>,
    terminal_positions: Vec<u32>,
}

impl SimulationResult {
    fn from_trials(trials: Vec<Trial>, step_count: usize, seed: u64) -> Self {
        let terminal_positions = trials.iter().map(Trial::terminal).collect();
        SimulationResult {
            trial_count: trials.len(),
            step_count,
            seed,
            trials,
            terminal_positions,
        }
    }

    pub fn trial_count(&self) -> usize {
        self.trial_count
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn trials(&self) -> &[Trial] {
        &self.trials
    }

    /// Terminal position of every trial, in trial order.
    pub fn terminal_positions(&self) -> &[u32] {
        &self.terminal_positions
    }

    /// Percentage of trials ending on `threshold` or above, out of `trial_count`.
    pub fn reach_percentage(&self, threshold: u32) -> f64 {
        // trial_count >= 1 is enforced by `run`.
        reach_count(&self.terminal_positions, threshold) as f64 / self.trial_count as f64 * 100.0
    }

    /// Like [`reach_percentage`](Self::reach_percentage) with an explicit divisor.
    /// A divisor other than `trial_count` can push the value past 100.
    pub fn reach_percentage_with_divisor(&self, threshold: u32, divisor: usize) -> Result<f64> {
        reach_percentage(&self.terminal_positions, threshold, divisor)
    }

    /// Terminal position -> number of trials ending there.
    pub fn frequency_table(&self) -> BTreeMap<u32, usize> {
        frequency_table(&self.terminal_positions)
    }

    /// Most frequent terminal position(s), ascending.
    pub fn modes(&self) -> Vec<u32> {
        modes(&self.terminal_positions)
    }

    /// Position of every trial after `step` steps (a column of the step × trial grid).
    pub fn positions_at_step(&self, step: usize) -> Result<Vec<u32>> {
        if step > self.step_count {
            return Err(SimulationError::invalid(
                "step",
                format!("must be at most {}, got {}", self.step_count, step),
            ));
        }
        Ok(self
            .trials
            .iter()
            .map(|t| t.positions()[step])
            .collect())
    }
}

fn validate_counts(trial_count: usize, step_count: usize) -> Result<()> {
    if trial_count < 1 {
        return Err(SimulationError::invalid(
            "trial_count",
            format!("must be at least 1, got {}", trial_count),
        ));
    }
    if step_count < 1 {
        return Err(SimulationError::invalid(
            "step_count",
            format!("must be at least 1, got {}", step_count),
        ));
    }
    Ok(())
}

/// Play trial `index` of a run seeded with `seed`.
#[inline]
pub fn play_trial(seed: u64, index: usize, step_count: usize) -> Trial {
    let mut rng = SmallRng::seed_from_u64(seed.wrapping_add(index as u64));
    simulate_trial(step_count, &mut rng)
}

/// Simulate `trial_count` walks of `step_count` steps in parallel.
pub fn run(trial_count: usize, step_count: usize, seed: u64) -> Result<SimulationResult> {
    validate_counts(trial_count, step_count)?;
    log::debug!(
        "Simulating {} trials x {} steps (seed {}, parallel)",
        trial_count,
        step_count,
        seed
    );

    let trials: Vec<Trial> = (0..trial_count)
        .into_par_iter()
        .map(|i| play_trial(seed, i, step_count))
        .collect();

    Ok(SimulationResult::from_trials(trials, step_count, seed))
}

/// Single-threaded [`run`]. Same trials, same order.
pub fn run_sequential(trial_count: usize, step_count: usize, seed: u64) -> Result<SimulationResult> {
    validate_counts(trial_count, step_count)?;
    log::debug!(
        "Simulating {} trials x {} steps (seed {}, sequential)",
        trial_count,
        step_count,
        seed
    );

    let trials: Vec<Trial> = (0..trial_count)
        .map(|i| play_trial(seed, i, step_count))
        .collect();

    Ok(SimulationResult::from_trials(trials, step_count, seed))
}

/// How the trials of a run are scheduled. Both produce the same result.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Execution {
    #[default]
    Parallel,
    Sequential,
}

/// A run together with the answers the experiment asks for.
#[derive(Clone, Debug, Serialize)]
pub struct Experiment {
    pub config: ExperimentConfig,
    pub threshold: u32,
    pub reach_percentage: f64,
    pub modes: Vec<u32>,
    pub result: SimulationResult,
}

/// Validate `config`, run it, and compute the reach percentage and modes.
///
/// The reach percentage divides by `config.divisor` when set, otherwise by
/// the trial count. Nothing is simulated if any parameter is invalid.
/// `config.bins` is validated here but only read by
/// [`aggregate_statistics`](super::statistics::aggregate_statistics).
pub fn simulate(config: &ExperimentConfig) -> Result<Experiment> {
    simulate_with(config, Execution::Parallel)
}

/// [`simulate`] with an explicit scheduling mode.
pub fn simulate_with(config: &ExperimentConfig, execution: Execution) -> Result<Experiment> {
    config.validate()?;
    let threshold = config.threshold_floor()?;

    let result = match execution {
        Execution::Parallel => run(config.trial_count, config.step_count, config.seed)?,
        Execution::Sequential => {
            run_sequential(config.trial_count, config.step_count, config.seed)?
        }
    };
    let reach_percentage = match config.divisor {
        Some(divisor) => result.reach_percentage_with_divisor(threshold, divisor)?,
        None => result.reach_percentage(threshold),
    };
    let modes = result.modes();

    log::info!(
        "Experiment done: {} trials, reach >= {}: {}%, modes {:?}",
        result.trial_count(),
        threshold,
        reach_percentage,
        modes
    );

    Ok(Experiment {
        config: config.clone(),
        threshold,
        reach_percentage,
        modes,
        result,
    })
}

/// [`simulate`] from bare parameters, dividing by the trial count.
///
/// The histogram bucket count keeps its default; it only matters to
/// [`aggregate_statistics`](super::statistics::aggregate_statistics).
pub fn simulate_walks(
    trial_count: usize,
    step_count: usize,
    seed: u64,
    threshold: i64,
) -> Result<Experiment> {
    simulate(&ExperimentConfig {
        trial_count,
        step_count,
        seed,
        threshold,
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_shape() {
        let result = run(50, 20, 9).unwrap();
        assert_eq!(result.trial_count(), 50);
        assert_eq!(result.step_count(), 20);
        assert_eq!(result.seed(), 9);
        assert_eq!(result.trials().len(), 50);
        assert_eq!(result.terminal_positions().len(), 50);
        for (trial, &terminal) in result.trials().iter().zip(result.terminal_positions()) {
            assert_eq!(trial.len(), 21);
            assert_eq!(trial.positions()[0], 0);
            assert_eq!(trial.terminal(), terminal);
        }
    }

    #[test]
    fn test_run_rejects_zero_counts() {
        assert!(run(0, 10, 1).unwrap_err().is_invalid_parameter());
        assert!(run(10, 0, 1).unwrap_err().is_invalid_parameter());
        assert!(run_sequential(0, 10, 1).unwrap_err().is_invalid_parameter());
        assert!(run_sequential(1, 0, 0).unwrap_err().is_invalid_parameter());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let par = run(300, 60, 77).unwrap();
        let seq = run_sequential(300, 60, 77).unwrap();
        assert_eq!(par, seq);
    }

    #[test]
    fn test_trial_independent_of_batch_size() {
        // Trial i only depends on seed + i.
        let small = run(10, 40, 5).unwrap();
        let large = run(100, 40, 5).unwrap();
        assert_eq!(small.trials(), &large.trials()[..10]);
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = run(200, 100, 1).unwrap();
        let b = run(200, 100, 1_000_000).unwrap();
        assert_ne!(a.terminal_positions(), b.terminal_positions());
    }

    #[test]
    fn test_seed_wraps() {
        let result = run(3, 5, u64::MAX).unwrap();
        assert_eq!(result.trials()[1], play_trial(0, 0, 5));
    }

    #[test]
    fn test_positions_at_step() {
        let result = run(20, 10, 3).unwrap();
        assert_eq!(result.positions_at_step(0).unwrap(), vec![0; 20]);
        assert_eq!(
            result.positions_at_step(10).unwrap(),
            result.terminal_positions()
        );
        assert!(result.positions_at_step(11).unwrap_err().is_invalid_parameter());
    }

    #[test]
    fn test_reach_percentage_divides_by_trial_count() {
        let result = run(500, 100, 123).unwrap();
        let count = result
            .terminal_positions()
            .iter()
            .filter(|&&p| p >= 60)
            .count();
        assert_eq!(result.reach_percentage(60), count as f64 / 500.0 * 100.0);
        assert_eq!(
            result.reach_percentage_with_divisor(60, 5).unwrap(),
            count as f64 / 5.0 * 100.0
        );
        assert!(result.reach_percentage_with_divisor(60, 0).is_err());
    }

    #[test]
    fn test_reach_percentage_matches_count_formula() {
        let result = run(37, 50, 4).unwrap();
        for threshold in [0u32, 10, 30, 45, 1000] {
            let count = reach_count(result.terminal_positions(), threshold);
            assert_eq!(
                result.reach_percentage(threshold),
                count as f64 / 37.0 * 100.0,
                "threshold={threshold}"
            );
            assert_eq!(
                result.reach_percentage(threshold),
                result.reach_percentage_with_divisor(threshold, 37).unwrap()
            );
        }
    }

    #[test]
    fn test_simulate_walks_keeps_default_bins() {
        let exp = simulate_walks(5, 5, 1, 3).unwrap();
        assert_eq!(exp.config.bins, crate::constants::DEFAULT_BINS);
        assert_eq!(exp.config.divisor, None);
    }

    #[test]
    fn test_reach_percentage_bounds() {
        let result = run(100, 30, 8).unwrap();
        assert_eq!(result.reach_percentage(0), 100.0);
        assert_eq!(result.reach_percentage(u32::MAX), 0.0);
    }

    #[test]
    fn test_simulate_uses_divisor() {
        let config = ExperimentConfig {
            trial_count: 200,
            step_count: 100,
            seed: 11,
            threshold: 40,
            divisor: Some(5),
            ..Default::default()
        };
        let exp = simulate(&config).unwrap();
        let expected = exp.result.reach_percentage_with_divisor(40, 5).unwrap();
        assert_eq!(exp.reach_percentage, expected);
        assert_eq!(exp.threshold, 40);
        assert_eq!(exp.modes, exp.result.modes());
    }

    #[test]
    fn test_simulate_execution_modes_agree() {
        let config = ExperimentConfig {
            trial_count: 120,
            ..Default::default()
        };
        let par = simulate_with(&config, Execution::Parallel).unwrap();
        let seq = simulate_with(&config, Execution::Sequential).unwrap();
        assert_eq!(par.result, seq.result);
        assert_eq!(par.reach_percentage, seq.reach_percentage);
        assert_eq!(par.modes, seq.modes);
    }

    #[test]
    fn test_simulate_walks_rejects_negative_threshold() {
        let err = simulate_walks(10, 10, 0, -5).unwrap_err();
        assert!(matches!(
            err,
            SimulationError::InvalidParameter {
                name: "threshold",
                ..
            }
        ));
    }

    #[test]
    fn test_terminal_positions_serialize_without_trials() {
        let result = run(2, 3, 4).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["trial_count"], 2);
        assert_eq!(json["terminal_positions"].as_array().unwrap().len(), 2);
        assert!(json.get("trials").is_none());
    }
}
