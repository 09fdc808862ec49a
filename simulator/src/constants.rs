//! Game constants and experiment defaults.
//!
//! The die is a fair six-sided die. A roll maps to one of three moves:
//! - 1..=[`SLIP_MAX_ROLL`]: slip down one floor (never below [`START_POSITION`])
//! - ..=[`CLIMB_MAX_ROLL`]: climb one floor
//! - [`ELEVATOR_ROLL`]: take the elevator up by a second roll of the die

/// Lowest face of the die.
pub const DIE_MIN: u32 = 1;

/// Highest face of the die.
pub const DIE_MAX: u32 = 6;

/// Rolls up to and including this value slip down one floor.
pub const SLIP_MAX_ROLL: u32 = 2;

/// Rolls above [`SLIP_MAX_ROLL`] up to and including this value climb one floor.
pub const CLIMB_MAX_ROLL: u32 = 5;

/// The roll that triggers a bonus roll.
pub const ELEVATOR_ROLL: u32 = DIE_MAX;

/// Every trial starts on the ground floor.
pub const START_POSITION: u32 = 0;

/// Number of trials in the classic experiment.
pub const DEFAULT_TRIAL_COUNT: usize = 500;

/// Steps per trial in the classic experiment.
pub const DEFAULT_STEP_COUNT: usize = 100;

/// Seed of the classic experiment.
pub const DEFAULT_SEED: u64 = 123;

/// Floor the classic experiment asks about.
pub const DEFAULT_THRESHOLD: i64 = 60;

/// Histogram bucket count of the classic experiment.
pub const DEFAULT_BINS: usize = 40;

/// Divisor used by the older copy of the experiment when turning the reach
/// count into a percentage. Only reachable through an explicit divisor.
pub const LEGACY_REACH_DIVISOR: usize = 5;

/// Spacing of the cumulative reach curve, in floors.
pub const CUMULATIVE_STEP: u32 = 10;
