// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Draw configuration.

use serde::{Deserialize, Serialize};

/// Tuning knobs for a draw.
///
/// None of these change the verdict on an input. They only bound how much
/// work the search attempts may do and make a draw reproducible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawConfig {
    /// Random-order attempts after the most-constrained-first attempt.
    pub max_retries: usize,

    /// Bindings one attempt may try before it is abandoned (None for unbounded).
    ///
    /// If every attempt is abandoned, the draw falls back to a shuffled
    /// matching instead of giving up.
    pub node_budget: Option<u64>,

    /// Base seed (None for entropy). Every attempt's seed is derived from it.
    pub seed: Option<u64>,

    /// Race all attempts on the rayon pool instead of running them in turn.
    ///
    /// With a seed, each attempt is still reproducible, but which attempt wins
    /// the race is not, so parallel draws are not reproducible.
    pub parallel: bool,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            node_budget: Some(250_000),
            seed: None,
            parallel: false,
        }
    }
}

impl DrawConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_node_budget(mut self, node_budget: Option<u64>) -> Self {
        self.node_budget = node_budget;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Total attempts a draw makes before giving up.
    pub fn attempts(&self) -> usize {
        self.max_retries.saturating_add(1)
    }
}
