//! TAGE (Tagged Geometric History Length) Branch Predictor.
//!
//! TAGE uses a base bimodal-style table and multiple tagged tables indexed with
//! increasing history lengths. The longest matching table provides the
//! prediction; shorter histories and finally the base table act as fallbacks.
//!
//! Each tagged table folds its slice of the global history into an index and
//! a tag. On a misprediction a fresh entry is allocated in a longer-history
//! table, skipping slots whose usefulness counter is non-zero (the longest
//! table is always eligible).
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `predict()`: O(N) where N is the number of tagged tables
//!   - `train()`: O(N)
//! - **Space Complexity:** O(Σ T_i) where T_i is the size of tagged table i
//! - **Best Case:** Complex history-correlated patterns with varying lengths
//! - **Worst Case:** Random or completely uncorrelated branches (~50% accuracy)

use tracing::{info, trace};

use super::BranchPredictor;
use super::counter::Counter2;
use super::history::{HistoryRegister, low_mask};
use crate::common::{ConfigError, Outcome};
use crate::config::TageConfig;

/// An entry in a tagged table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct TageEntry {
    /// Tag for matching the history/PC hash.
    tag: u16,
    /// 2-bit prediction counter.
    ctr: Counter2,
    /// Set once the slot has been allocated; tag 0 alone does not mean empty.
    valid: bool,
}

/// One tagged component.
#[derive(Debug, Clone)]
struct TaggedTable {
    entries: Vec<TageEntry>,
    /// log2 of the entry count.
    index_bits: usize,
    index_mask: u64,
    tag_width: usize,
    tag_mask: u64,
    /// Number of most recent outcomes folded into index and tag.
    history_length: usize,
}

/// Index and tag of one tagged table for a given PC and history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Slot {
    index: usize,
    tag: u16,
}

/// Provider and alternate provider found for a branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TageLookup {
    /// Longest-history tagged table whose tag matched.
    pub provider: Option<usize>,
    /// Next-longest matching table after the provider.
    pub alternate: Option<usize>,
    /// Final prediction (provider counter, or base table when no tag matched).
    pub prediction: Outcome,
    /// Prediction of the alternate provider, when one matched.
    pub alternate_prediction: Option<Outcome>,
}

/// TAGE Predictor structure.
#[derive(Debug, Clone)]
pub struct TagePredictor {
    /// Global History Register, `history_bits` wide.
    ghr: HistoryRegister,

    /// Base table indexed by PC XOR global history.
    base: Vec<Counter2>,
    base_mask: u64,

    /// Tagged tables, shortest history first.
    tables: Vec<TaggedTable>,

    /// 2-bit usefulness counters shared by all tables, sized to the largest one.
    useful: Vec<Counter2>,

    history_bits: usize,
}

impl TagePredictor {
    /// Creates a new TAGE Predictor based on configuration.
    ///
    /// All counters start weakly not-taken, every tagged slot starts invalid
    /// and every usefulness counter starts at 0.
    pub fn new(config: &TageConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let history_lengths = config.resolved_history_lengths();

        let tables: Vec<TaggedTable> = config
            .table_sizes
            .iter()
            .zip(&config.tag_widths)
            .zip(&history_lengths)
            .map(|((&size, &tag_width), &history_length)| {
                let index_bits = size.trailing_zeros() as usize;
                TaggedTable {
                    entries: vec![TageEntry::default(); size],
                    index_bits,
                    index_mask: low_mask(index_bits),
                    tag_width,
                    tag_mask: low_mask(tag_width),
                    history_length,
                }
            })
            .collect();

        let useful_size = config.table_sizes.iter().copied().max().unwrap_or(1);
        let base_size = 1usize << config.base_size_bits;
        info!(
            base_entries = base_size,
            tables = tables.len(),
            ?history_lengths,
            tag_widths = ?config.tag_widths,
            "tage configured"
        );

        Ok(Self {
            ghr: HistoryRegister::new(config.history_bits),
            base: vec![Counter2::weakly_not_taken(); base_size],
            base_mask: low_mask(config.base_size_bits),
            tables,
            useful: vec![Counter2::strongly_not_taken(); useful_size],
            history_bits: config.history_bits,
        })
    }

    /// Base table index for `pc`.
    #[inline(always)]
    const fn base_index(&self, pc: u32) -> usize {
        ((pc as u64 ^ self.ghr.value()) & self.base_mask) as usize
    }

    /// Computes index and tag of table `table` for `pc`.
    ///
    /// The table's history slice is folded down to the index width for the
    /// index and to the tag width for the tag.
    #[inline(always)]
    fn slot(&self, table: usize, pc: u32) -> Slot {
        let t = &self.tables[table];
        let pc = pc as u64;
        let index_hist = self.ghr.folded(t.history_length, t.index_bits);
        let tag_hist = self.ghr.folded(t.history_length, t.tag_width);
        Slot {
            index: ((pc ^ index_hist) & t.index_mask) as usize,
            tag: (((pc >> 2) ^ tag_hist) & t.tag_mask) as u16,
        }
    }

    /// Whether table `table` holds a valid entry for `slot`.
    #[inline(always)]
    fn hit(&self, table: usize, slot: Slot) -> bool {
        let e = &self.tables[table].entries[slot.index];
        e.valid && e.tag == slot.tag
    }

    /// Scans from the longest history down for the provider and alternate.
    fn find_providers(&self, pc: u32) -> (Option<(usize, Slot)>, Option<(usize, Slot)>) {
        let mut provider = None;
        for i in (0..self.tables.len()).rev() {
            let slot = self.slot(i, pc);
            if self.hit(i, slot) {
                if provider.is_none() {
                    provider = Some((i, slot));
                } else {
                    return (provider, Some((i, slot)));
                }
            }
        }
        (provider, None)
    }

    #[inline(always)]
    fn entry_prediction(&self, table: usize, slot: Slot) -> Outcome {
        self.tables[table].entries[slot.index].ctr.predict()
    }

    /// Provider, alternate provider and prediction for `pc`.
    pub fn lookup(&self, pc: u32) -> TageLookup {
        let (provider, alternate) = self.find_providers(pc);
        let prediction = provider.map_or_else(
            || self.base[self.base_index(pc)].predict(),
            |(i, slot)| self.entry_prediction(i, slot),
        );
        TageLookup {
            provider: provider.map(|(i, _)| i),
            alternate: alternate.map(|(i, _)| i),
            prediction,
            alternate_prediction: alternate.map(|(i, slot)| self.entry_prediction(i, slot)),
        }
    }

    /// Global history register contents.
    pub const fn global_history(&self) -> u64 {
        self.ghr.value()
    }

    /// Number of tagged tables.
    pub fn num_tables(&self) -> usize {
        self.tables.len()
    }

    /// Effective history length of each tagged table.
    pub fn history_lengths(&self) -> Vec<usize> {
        self.tables.iter().map(|t| t.history_length).collect()
    }

    /// Allocates an entry for `pc` in the first eligible table in `start..`.
    ///
    /// A slot is eligible when its usefulness counter is 0; the longest table
    /// is always eligible. Returns the table written, if any.
    fn allocate(&mut self, pc: u32, start: usize, outcome: Outcome) -> Option<usize> {
        let last = self.tables.len().checked_sub(1)?;
        for i in start..self.tables.len() {
            let slot = self.slot(i, pc);
            if i != last && self.useful[slot.index].value() != 0 {
                continue;
            }
            self.tables[i].entries[slot.index] = TageEntry {
                tag: slot.tag,
                ctr: Counter2::weak(outcome),
                valid: true,
            };
            self.useful[slot.index] = Counter2::strongly_not_taken();
            trace!(pc, table = i, index = slot.index, tag = slot.tag, "tage allocate");
            return Some(i);
        }
        None
    }
}

impl BranchPredictor for TagePredictor {
    /// Returns the longest matching table's prediction, or the base table's
    /// when no tag matches.
    fn predict(&self, pc: u32) -> Outcome {
        self.lookup(pc).prediction
    }

    /// Updates the provider, allocates on misprediction, adjusts usefulness
    /// when provider and alternate disagree, then shifts the history.
    fn train(&mut self, pc: u32, outcome: Outcome) {
        let (provider, alternate) = self.find_providers(pc);
        let base_idx = self.base_index(pc);

        let predicted = match provider {
            Some((i, slot)) => {
                let p = self.entry_prediction(i, slot);
                self.tables[i].entries[slot.index].ctr.update(outcome);
                p
            }
            None => {
                let p = self.base[base_idx].predict();
                self.base[base_idx].update(outcome);
                p
            }
        };

        if predicted != outcome {
            let start = provider.map_or(0, |(i, _)| i + 1);
            if self.allocate(pc, start, outcome).is_none() {
                trace!(pc, provider = start.saturating_sub(1), "tage no longer table to allocate");
            }
        }

        if let (Some((_, slot)), Some((alt, alt_slot))) = (provider, alternate) {
            let alt_predicted = self.entry_prediction(alt, alt_slot);
            if alt_predicted != predicted {
                let u = &mut self.useful[slot.index];
                if predicted == outcome {
                    u.increment();
                } else {
                    u.decrement();
                }
                trace!(pc, index = slot.index, useful = u.value(), "tage usefulness");
            }
        }

        self.ghr.shift(outcome);
    }

    fn storage_bits(&self) -> usize {
        let tagged: usize = self
            .tables
            .iter()
            .map(|t| t.entries.len() * (t.tag_width + 2 + 1))
            .sum();
        self.base.len() * 2 + tagged + self.useful.len() * 2 + self.history_bits
    }
}
