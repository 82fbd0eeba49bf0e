//! Tournament Branch Predictor.
//!
//! A hybrid predictor that employs a meta-predictor (choice table) to select
//! between a Global predictor and a Local predictor (per-branch history feeding
//! a shared pattern table). This allows the predictor to adapt to different
//! types of branch behaviors.
//!
//! The choice table only learns when the two components disagree: credit moves
//! towards whichever component was right, and nothing moves when both were
//! right or both were wrong.

use tracing::info;

use super::BranchPredictor;
use super::counter::{Counter2, Counter3};
use super::history::{HistoryRegister, low_mask, shift_in};
use crate::common::{ConfigError, Outcome};
use crate::config::TournamentConfig;

/// Table indices derived from a PC and the current history state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Indices {
    /// Local history table slot.
    pc: usize,
    /// Local pattern table slot.
    local_pattern: usize,
    /// Global table slot.
    global: usize,
    /// Choice table slot.
    choice: usize,
}

/// Component predictions for one branch, read before any update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TournamentLookup {
    /// Local component prediction (3-bit counter).
    pub local: Outcome,
    /// Global component prediction (2-bit counter).
    pub global: Outcome,
    /// Choice counter; taken-state selects the local component.
    pub choice: Counter2,
}

impl TournamentLookup {
    /// Final prediction after arbitration.
    pub const fn prediction(&self) -> Outcome {
        match self.choice.predict() {
            Outcome::Taken => self.local,
            Outcome::NotTaken => self.global,
        }
    }
}

/// Tournament Predictor structure.
#[derive(Debug, Clone)]
pub struct TournamentPredictor {
    /// Global History Register, `global_history_bits` wide.
    ghr: HistoryRegister,

    /// Global pattern table (2-bit counters) indexed by global history.
    global_pht: Vec<Counter2>,
    /// Mask for global and choice indexing.
    global_mask: u64,

    /// Per-PC local histories, all masked by `local_mask`.
    local_history_table: Vec<u64>,
    /// Mask selecting the local history slot from the PC.
    pc_mask: u64,

    /// Local pattern table (3-bit counters) indexed by local history.
    local_pht: Vec<Counter3>,
    /// Mask for local pattern indexing.
    local_mask: u64,

    /// Choice table. Taken-states (2,3) prefer local, (0,1) prefer global.
    choice_pht: Vec<Counter2>,

    config: TournamentConfig,
}

impl TournamentPredictor {
    /// Creates a new Tournament Predictor based on the provided configuration.
    pub fn new(config: &TournamentConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let global_size = 1usize << config.global_history_bits;
        let local_hist_size = 1usize << config.pc_index_bits;
        let local_pred_size = 1usize << config.local_history_bits;
        info!(
            global_entries = global_size,
            local_histories = local_hist_size,
            local_patterns = local_pred_size,
            "tournament configured"
        );

        Ok(Self {
            ghr: HistoryRegister::new(config.global_history_bits),

            global_pht: vec![Counter2::weakly_not_taken(); global_size],
            global_mask: low_mask(config.global_history_bits),

            local_history_table: vec![0; local_hist_size],
            pc_mask: low_mask(config.pc_index_bits),

            local_pht: vec![Counter3::weakly_not_taken(); local_pred_size],
            local_mask: low_mask(config.local_history_bits),

            choice_pht: vec![Counter2::weakly_not_taken(); global_size],

            config: config.clone(),
        })
    }

    /// Computes every table index for `pc` from the current history state.
    ///
    /// Shared by `predict` and `train` so both always address the same slots.
    #[inline(always)]
    fn indices(&self, pc: u32) -> Indices {
        let pc_idx = pc as u64 & self.pc_mask;
        let ghist = self.ghr.value();
        let local_hist = self.local_history_table[pc_idx as usize];
        Indices {
            pc: pc_idx as usize,
            local_pattern: (local_hist & self.local_mask) as usize,
            global: (ghist & self.global_mask) as usize,
            choice: ((pc_idx ^ ghist) & self.global_mask) as usize,
        }
    }

    #[inline(always)]
    fn read(&self, idx: Indices) -> TournamentLookup {
        TournamentLookup {
            local: self.local_pht[idx.local_pattern].predict(),
            global: self.global_pht[idx.global].predict(),
            choice: self.choice_pht[idx.choice],
        }
    }

    /// Component predictions and choice state for `pc`.
    pub fn lookup(&self, pc: u32) -> TournamentLookup {
        self.read(self.indices(pc))
    }

    /// Global history register contents.
    pub const fn global_history(&self) -> u64 {
        self.ghr.value()
    }

    /// Local history register selected by `pc`.
    pub fn local_history(&self, pc: u32) -> u64 {
        self.local_history_table[self.indices(pc).pc]
    }
}

impl BranchPredictor for TournamentPredictor {
    /// Queries both components and lets the choice counter pick one.
    fn predict(&self, pc: u32) -> Outcome {
        self.lookup(pc).prediction()
    }

    /// Trains both components, the choice counter on disagreement, then both
    /// histories.
    fn train(&mut self, pc: u32, outcome: Outcome) {
        let idx = self.indices(pc);
        let lookup = self.read(idx);

        self.local_pht[idx.local_pattern].update(outcome);
        self.global_pht[idx.global].update(outcome);

        let local_correct = lookup.local == outcome;
        let global_correct = lookup.global == outcome;
        if local_correct != global_correct {
            let choice = &mut self.choice_pht[idx.choice];
            if local_correct {
                choice.increment();
            } else {
                choice.decrement();
            }
        }

        let local = &mut self.local_history_table[idx.pc];
        *local = shift_in(*local, outcome, self.local_mask);
        self.ghr.shift(outcome);
    }

    fn storage_bits(&self) -> usize {
        self.local_history_table.len() * self.config.local_history_bits
            + self.local_pht.len() * 3
            + self.global_pht.len() * 2
            + self.choice_pht.len() * 2
            + self.config.global_history_bits
    }
}
