//! GShare Branch Predictor.
//!
//! GShare correlates global branch history with the program counter using an XOR
//! hash. This allows the predictor to distinguish the same branch instruction
//! in different execution contexts.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `predict()`: O(1)
//!   - `train()`: O(1)
//! - **Space Complexity:** O(2^N) where N is the history length (15 bits = 32K 2-bit counters)
//! - **Best Case:** Correlated branches where outcome depends on recent history
//! - **Worst Case:** Uncorrelated branches or history length too short/long for pattern

use tracing::info;

use super::BranchPredictor;
use super::counter::Counter2;
use super::history::{HistoryRegister, low_mask};
use crate::common::{ConfigError, Outcome};
use crate::config::GShareConfig;

/// GShare Predictor structure.
#[derive(Debug, Clone)]
pub struct GSharePredictor {
    /// Global History Register. Never masked itself; only indexing masks it.
    ghr: HistoryRegister,
    /// Branch History Table of 2-bit saturating counters.
    bht: Vec<Counter2>,
    /// Index mask (`2^history_bits - 1`).
    mask: u64,
}

impl GSharePredictor {
    /// Creates a new GShare Predictor with every counter weakly not-taken.
    pub fn new(config: &GShareConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let entries = 1usize << config.history_bits;
        info!(history_bits = config.history_bits, entries, "gshare configured");

        Ok(Self {
            ghr: HistoryRegister::new(u64::BITS as usize),
            bht: vec![Counter2::weakly_not_taken(); entries],
            mask: low_mask(config.history_bits),
        })
    }

    /// Calculates the index into the Branch History Table.
    ///
    /// XORs the low PC bits with the low history bits.
    #[inline(always)]
    const fn index(&self, pc: u32) -> usize {
        let pc_part = pc as u64 & self.mask;
        let ghr_part = self.ghr.value() & self.mask;
        (pc_part ^ ghr_part) as usize
    }

    /// Raw global history register contents.
    pub const fn history(&self) -> u64 {
        self.ghr.value()
    }

    /// Counter that would provide the prediction for `pc` right now.
    pub fn counter(&self, pc: u32) -> Counter2 {
        self.bht[self.index(pc)]
    }
}

impl BranchPredictor for GSharePredictor {
    /// Returns taken if the 2-bit counter at the hashed index is 2 or 3.
    fn predict(&self, pc: u32) -> Outcome {
        self.bht[self.index(pc)].predict()
    }

    /// Updates the counter at the hashed index and shifts the outcome into
    /// the Global History Register.
    fn train(&mut self, pc: u32, outcome: Outcome) {
        let idx = self.index(pc);
        self.bht[idx].update(outcome);
        self.ghr.shift(outcome);
    }

    /// BHT counters plus the whole GHR, which keeps 64 outcomes.
    fn storage_bits(&self) -> usize {
        self.bht.len() * 2 + self.ghr.width()
    }
}
