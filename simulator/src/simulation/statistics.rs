//! Statistics aggregation over terminal positions.
//!
//! Computes the reach percentage, the mode set, summary moments, percentiles,
//! an equal-width histogram and a cumulative reach curve from a finished run.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::constants::CUMULATIVE_STEP;
use crate::error::{Result, SimulationError};

use super::engine::SimulationResult;

// ── Top-level statistics ────────────────────────────────────────────

#[derive(Clone, Debug, Serialize)]
pub struct WalkStatistics {
    pub trial_count: usize,
    pub step_count: usize,
    pub seed: u64,
    pub threshold: u32,
    /// Divisor used for `reach_percentage` (the trial count unless overridden).
    pub reach_divisor: usize,
    pub reach_count: usize,
    pub reach_percentage: f64,
    pub modes: Vec<u32>,
    pub mode_count: usize,
    pub terminal: TerminalDistribution,
}

#[derive(Clone, Debug, Serialize)]
pub struct TerminalDistribution {
    pub mean: f64,
    pub std_dev: f64,
    pub min: u32,
    pub max: u32,
    pub median: u32,
    pub percentiles: Percentiles,
    pub histogram: Vec<HistogramBin>,
    /// P(terminal >= x) every [`CUMULATIVE_STEP`] floors.
    pub cumulative: Vec<CumulativeEntry>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Percentiles {
    pub p5: u32,
    pub p10: u32,
    pub p25: u32,
    pub p50: u32,
    pub p75: u32,
    pub p90: u32,
    pub p95: u32,
    pub p99: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CumulativeEntry {
    pub floor: u32,
    pub probability: f64,
}

// ── Building blocks ─────────────────────────────────────────────────

/// Number of values at or above `threshold`.
pub fn reach_count(values: &[u32], threshold: u32) -> usize {
    values.iter().filter(|&&v| v >= threshold).count()
}

/// `reach_count / divisor * 100`. The divisor must be at least 1.
pub fn reach_percentage(values: &[u32], threshold: u32, divisor: usize) -> Result<f64> {
    if divisor < 1 {
        return Err(SimulationError::invalid("divisor", "must be at least 1"));
    }
    Ok(reach_count(values, threshold) as f64 / divisor as f64 * 100.0)
}

/// Value -> occurrence count.
pub fn frequency_table(values: &[u32]) -> BTreeMap<u32, usize> {
    let mut counts = BTreeMap::new();
    for &v in values {
        *counts.entry(v).or_insert(0) += 1;
    }
    counts
}

/// Every value that reaches the maximum count, ascending. Empty input gives
/// an empty set.
pub fn modes(values: &[u32]) -> Vec<u32> {
    let counts = frequency_table(values);
    let max_count = counts.values().copied().max().unwrap_or(0);
    counts
        .into_iter()
        .filter(|&(_, c)| c == max_count)
        .map(|(v, _)| v)
        .collect()
}

/// Nearest-rank percentile on an ascending slice (rounded index).
fn percentile(sorted: &[u32], p: f64) -> u32 {
    let idx = ((p / 100.0) * (sorted.len() - 1) as f64).round() as usize;
    sorted[idx.min(sorted.len() - 1)]
}

/// Equal-width histogram with `bins` buckets spanning `[min, max]`.
///
/// Buckets are half-open except the last, which also holds `max`. A sample
/// with a single distinct value is spread over `[v - 0.5, v + 0.5]`.
pub fn histogram(values: &[u32], bins: usize) -> Result<Vec<HistogramBin>> {
    if bins < 1 {
        return Err(SimulationError::invalid(
            "bins",
            format!("must be at least 1, got {}", bins),
        ));
    }
    let (Some(&min), Some(&max)) = (values.iter().min(), values.iter().max()) else {
        return Ok(Vec::new());
    };

    let (lo, hi) = if min == max {
        (min as f64 - 0.5, max as f64 + 0.5)
    } else {
        (min as f64, max as f64)
    };
    let width = (hi - lo) / bins as f64;

    // Bin index in integers so values on an edge land in the upper bin.
    let range = (max - min) as u64;
    let mut counts = vec![0usize; bins];
    for &v in values {
        let bin = if range == 0 {
            bins / 2
        } else {
            (((v - min) as u64 * bins as u64 / range) as usize).min(bins - 1)
        };
        counts[bin] += 1;
    }

    Ok(counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: lo + i as f64 * width,
            upper: if i + 1 == bins {
                hi
            } else {
                lo + (i + 1) as f64 * width
            },
            count,
        })
        .collect())
}

/// P(value >= x) for x = 0, step, 2*step, ... up to the largest value.
fn cumulative(values: &[u32], max: u32) -> Vec<CumulativeEntry> {
    let n = values.len() as f64;
    (0..=max)
        .step_by(CUMULATIVE_STEP as usize)
        .map(|floor| CumulativeEntry {
            floor,
            probability: reach_count(values, floor) as f64 / n,
        })
        .collect()
}

// ── Aggregation ─────────────────────────────────────────────────────

/// Aggregate statistics from a finished run.
///
/// `divisor` overrides the trial count as the reach-percentage denominator.
pub fn aggregate_statistics(
    result: &SimulationResult,
    threshold: u32,
    bins: usize,
    divisor: Option<usize>,
) -> Result<WalkStatistics> {
    let terminals = result.terminal_positions();
    let n = terminals.len() as f64;

    let mut sorted: Vec<u32> = terminals.to_vec();
    sorted.sort_unstable();

    let sum: f64 = sorted.iter().map(|&s| s as f64).sum();
    let mean = sum / n;
    let variance: f64 = sorted
        .iter()
        .map(|&s| (s as f64 - mean).powi(2))
        .sum::<f64>()
        / n;

    let percentiles = Percentiles {
        p5: percentile(&sorted, 5.0),
        p10: percentile(&sorted, 10.0),
        p25: percentile(&sorted, 25.0),
        p50: percentile(&sorted, 50.0),
        p75: percentile(&sorted, 75.0),
        p90: percentile(&sorted, 90.0),
        p95: percentile(&sorted, 95.0),
        p99: percentile(&sorted, 99.0),
    };

    let min = sorted[0];
    let max = sorted[sorted.len() - 1];

    let terminal = TerminalDistribution {
        mean,
        std_dev: variance.sqrt(),
        min,
        max,
        median: percentiles.p50,
        percentiles,
        histogram: histogram(terminals, bins)?,
        cumulative: cumulative(terminals, max),
    };

    let reach_divisor = divisor.unwrap_or(result.trial_count());
    let modes = result.modes();
    let mode_count = modes
        .first()
        .and_then(|m| result.frequency_table().get(m).copied())
        .unwrap_or(0);

    Ok(WalkStatistics {
        trial_count: result.trial_count(),
        step_count: result.step_count(),
        seed: result.seed(),
        threshold,
        reach_divisor,
        reach_count: reach_count(terminals, threshold),
        reach_percentage: reach_percentage(terminals, threshold, reach_divisor)?,
        modes,
        mode_count,
        terminal,
    })
}

/// Write statistics as pretty JSON, creating parent directories.
pub fn save_statistics(stats: &WalkStatistics, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| SimulationError::io(parent, e))?;
    }
    let json = serde_json::to_string_pretty(stats)?;
    std::fs::write(path, json).map_err(|e| SimulationError::io(path, e))?;
    log::info!("Wrote statistics to {}", path.display());
    Ok(())
}
