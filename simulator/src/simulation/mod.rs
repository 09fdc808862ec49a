//! Walk simulation and statistics.
//!
//! - [`engine`]: Core simulation (play N independent walks from a seed)
//! - [`statistics`]: Aggregate statistics over terminal positions, JSON export

pub mod engine;
pub mod statistics;

// Re-export commonly used items
pub use engine::{
    play_trial, run, run_sequential, simulate, simulate_walks, simulate_with, Execution, Experiment,
    SimulationResult,
};
pub use statistics::{
    aggregate_statistics, frequency_table, histogram, modes, reach_count, reach_percentage,
    save_statistics, HistogramBin, WalkStatistics,
};
