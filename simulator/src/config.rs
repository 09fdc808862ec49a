//! Experiment configuration.
//!
//! Defaults reproduce the classic experiment: 500 walks of 100 steps, seed 123,
//! asking how often the walker ends on floor 60 or above. A JSON file may
//! override any subset of fields.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{Result, SimulationError};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub trial_count: usize,
    pub step_count: usize,
    pub seed: u64,
    /// Floor to reach. Signed so a negative value from a file or the command
    /// line is reported as an invalid parameter rather than a parse error.
    pub threshold: i64,
    /// Histogram bucket count. Not used by the walk itself, only by the
    /// statistics aggregation.
    pub bins: usize,
    /// Divisor for the reach percentage. `None` divides by the trial count.
    pub divisor: Option<usize>,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        ExperimentConfig {
            trial_count: DEFAULT_TRIAL_COUNT,
            step_count: DEFAULT_STEP_COUNT,
            seed: DEFAULT_SEED,
            threshold: DEFAULT_THRESHOLD,
            bins: DEFAULT_BINS,
            divisor: None,
        }
    }
}

impl ExperimentConfig {
    /// Check every field against its domain. Runs before any trial is played.
    pub fn validate(&self) -> Result<()> {
        if self.trial_count < 1 {
            return Err(SimulationError::invalid(
                "trial_count",
                format!("must be at least 1, got {}", self.trial_count),
            ));
        }
        if self.step_count < 1 {
            return Err(SimulationError::invalid(
                "step_count",
                format!("must be at least 1, got {}", self.step_count),
            ));
        }
        self.threshold_floor()?;
        if self.bins < 1 {
            return Err(SimulationError::invalid(
                "bins",
                format!("must be at least 1, got {}", self.bins),
            ));
        }
        if self.divisor == Some(0) {
            return Err(SimulationError::invalid("divisor", "must be at least 1"));
        }
        Ok(())
    }

    /// The threshold as a floor number.
    pub fn threshold_floor(&self) -> Result<u32> {
        threshold_floor(self.threshold)
    }
}

/// Per-field overrides, typically from command-line flags. `None` keeps the
/// value already in the config.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub trial_count: Option<usize>,
    pub step_count: Option<usize>,
    pub seed: Option<u64>,
    pub threshold: Option<i64>,
    pub bins: Option<usize>,
    pub divisor: Option<usize>,
}

impl ExperimentConfig {
    /// Replace every field that has an override. An unset divisor override
    /// keeps the configured divisor; it never clears it.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(v) = overrides.trial_count {
            self.trial_count = v;
        }
        if let Some(v) = overrides.step_count {
            self.step_count = v;
        }
        if let Some(v) = overrides.seed {
            self.seed = v;
        }
        if let Some(v) = overrides.threshold {
            self.threshold = v;
        }
        if let Some(v) = overrides.bins {
            self.bins = v;
        }
        if overrides.divisor.is_some() {
            self.divisor = overrides.divisor;
        }
    }
}

/// Load `path` (or start from the defaults), apply `overrides`, and validate.
pub fn resolve_config(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<ExperimentConfig> {
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => ExperimentConfig::default(),
    };
    config.apply_overrides(overrides);
    config.validate()?;
    Ok(config)
}

/// Convert a signed threshold into a floor number, rejecting negatives.
pub fn threshold_floor(threshold: i64) -> Result<u32> {
    if threshold < 0 {
        return Err(SimulationError::invalid(
            "threshold",
            format!("must be non-negative, got {}", threshold),
        ));
    }
    u32::try_from(threshold).map_err(|_| {
        SimulationError::invalid("threshold", format!("too large, got {}", threshold))
    })
}

/// Load a config from a JSON file. Missing fields take their defaults.
pub fn load_config(path: &Path) -> Result<ExperimentConfig> {
    let text = std::fs::read_to_string(path).map_err(|e| SimulationError::io(path, e))?;
    let config: ExperimentConfig = serde_json::from_str(&text)?;
    log::debug!("Loaded config from {}: {:?}", path.display(), config);
    Ok(config)
}
