use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_CONCURRENCY: usize = 6;
pub const DEFAULT_WEIGHT_TOLERANCE_PCT: f64 = 0.0;

/// Run parameters, passed explicitly into the orchestrator and writer
/// at call time. No ambient singletons; the host resolves these from
/// flags, environment, or a config file and hands them in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ReconcileConfig {
    /// Upper bound on simultaneous fetches.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Allowed relative weight deviation in percent. Zero means exact
    /// match required.
    #[serde(default = "default_tolerance")]
    pub weight_tolerance_pct: f64,
}

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

fn default_tolerance() -> f64 {
    DEFAULT_WEIGHT_TOLERANCE_PCT
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            weight_tolerance_pct: DEFAULT_WEIGHT_TOLERANCE_PCT,
        }
    }
}

impl ReconcileConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency == 0 {
            return Err(ConfigError::InvalidConcurrency(self.concurrency));
        }
        if !self.weight_tolerance_pct.is_finite() || self.weight_tolerance_pct < 0.0 {
            return Err(ConfigError::InvalidTolerance(self.weight_tolerance_pct));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
