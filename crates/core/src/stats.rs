//! Prediction statistics collection and reporting.
//!
//! This module tracks accuracy metrics for a trace replay. It provides:
//! 1. **Branch counts:** All events, conditional branches, and their directions.
//! 2. **Branch prediction:** Mispredictions, accuracy, and misprediction rate.
//! 3. **Throughput:** Host time and branches simulated per second.

use std::time::Instant;

use serde::Serialize;

use crate::common::Outcome;

/// Prediction statistics structure.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionStats {
    #[serde(skip)]
    start_time: Instant,
    /// Every branch event seen, conditional or not.
    pub branches: u64,
    /// Conditional branches predicted and trained.
    pub conditional_branches: u64,
    /// Conditional branches that resolved taken.
    pub taken: u64,
    /// Conditional branches whose prediction was wrong.
    pub mispredictions: u64,
}

impl Default for PredictionStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            branches: 0,
            conditional_branches: 0,
            taken: 0,
            mispredictions: 0,
        }
    }
}

impl PredictionStats {
    /// Records a predicted conditional branch and its resolution.
    pub fn record(&mut self, predicted: Outcome, actual: Outcome) {
        self.branches += 1;
        self.conditional_branches += 1;
        if actual.is_taken() {
            self.taken += 1;
        }
        if predicted != actual {
            self.mispredictions += 1;
        }
    }

    /// Records a branch that is not subject to direction prediction.
    pub const fn record_unconditional(&mut self) {
        self.branches += 1;
    }

    /// Fraction of conditional branches predicted correctly, in percent.
    ///
    /// Returns 0 when no conditional branch was seen.
    pub fn accuracy(&self) -> f64 {
        if self.conditional_branches == 0 {
            return 0.0;
        }
        100.0 - self.misprediction_rate()
    }

    /// Fraction of conditional branches mispredicted, in percent.
    pub fn misprediction_rate(&self) -> f64 {
        if self.conditional_branches == 0 {
            return 0.0;
        }
        100.0 * (self.mispredictions as f64 / self.conditional_branches as f64)
    }

    /// Seconds elapsed since the statistics were created.
    pub fn host_seconds(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }

    /// Prints all statistics to stdout.
    pub fn print(&self) {
        let seconds = self.host_seconds();
        let rate = if seconds > 0.0 {
            self.branches as f64 / seconds
        } else {
            0.0
        };
        println!("==========================================================");
        println!("BRANCH PREDICTION STATISTICS");
        println!("==========================================================");
        println!("host_seconds             {seconds:.4} s");
        println!("host_branch_rate         {rate:.0} /s");
        println!("----------------------------------------------------------");
        println!("  branches               {}", self.branches);
        println!("  branches.conditional   {}", self.conditional_branches);
        println!("  branches.taken         {}", self.taken);
        println!("  bp.mispredicts         {}", self.mispredictions);
        println!("  bp.accuracy            {:.2}%", self.accuracy());
        println!("  bp.mispredict_rate     {:.3}%", self.misprediction_rate());
        println!("==========================================================");
    }
}
