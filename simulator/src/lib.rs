//! # Fate Tower: floor-climbing random walk
//!
//! Monte Carlo simulation of a dice game played on a tower: every step rolls a
//! die, and the walker slips down a floor, climbs a floor, or rides the
//! elevator up by a second roll. After a fixed number of steps the final floor
//! is recorded. Repeating this over many independent walks answers two
//! questions: how likely is it to end at or above a given floor, and which
//! final floor is the most common.
//!
//! | Roll | Move | Probability |
//! |------|------|-------------|
//! | 1-2  | down one floor, never below 0 | 2/6 |
//! | 3-5  | up one floor | 3/6 |
//! | 6    | up by a second roll (1-6) | 1/6 |
//!
//! ## Modules
//!
//! - [`walk`]: transition rule and single-trial walker
//! - [`simulation`]: seeded batch runs and aggregate statistics
//! - [`report`]: text output for the reach percentage, modes and histogram
//! - [`config`]: experiment parameters and JSON config loading
//!
//! ## Reproducibility
//!
//! Trial `i` of a run with seed `s` draws from its own generator seeded with
//! `s + i`, so a run is a pure function of `(trial_count, step_count, seed)`
//! regardless of how trials are scheduled across threads.

pub mod config;
pub mod constants;
pub mod env_config;
pub mod error;
pub mod report;
pub mod simulation;
pub mod walk;

pub use error::{Result, SimulationError};
