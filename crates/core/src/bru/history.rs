//! Branch history registers.
//!
//! A history register is a shift register of resolved outcomes with the most
//! recent outcome in bit 0. Only the low `width` bits are ever retained.
//! Training is the only operation that shifts a register.

use crate::common::Outcome;

/// Mask selecting the low `bits` bits of a `u64`.
#[inline(always)]
pub const fn low_mask(bits: usize) -> u64 {
    if bits >= u64::BITS as usize {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

/// XOR-folds the low `len` bits of `history` into `width` bits.
///
/// The history is cut into `width`-bit chunks starting at bit 0 and all chunks
/// are XORed together, so any history length maps onto a fixed-width index or
/// tag.
pub fn fold(history: u64, len: usize, width: usize) -> u64 {
    if width == 0 {
        return 0;
    }
    let mut remaining = history & low_mask(len);
    let chunk_mask = low_mask(width);
    let mut folded = 0;
    while remaining != 0 {
        folded ^= remaining & chunk_mask;
        remaining = remaining.checked_shr(width as u32).unwrap_or(0);
    }
    folded
}

/// Shifts `outcome` into bit 0 of `history`, keeping only the bits in `mask`.
///
/// Tables of same-width histories store bare `u64`s and share one mask.
#[inline(always)]
pub const fn shift_in(history: u64, outcome: Outcome, mask: u64) -> u64 {
    ((history << 1) | outcome.bit()) & mask
}

/// Fixed-width shift register of outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HistoryRegister {
    value: u64,
    mask: u64,
}

impl HistoryRegister {
    /// Creates an all-zero register retaining `width` bits (capped at 64).
    pub const fn new(width: usize) -> Self {
        Self {
            value: 0,
            mask: low_mask(width),
        }
    }

    /// Current contents.
    #[inline(always)]
    pub const fn value(&self) -> u64 {
        self.value
    }

    /// Number of retained bits.
    pub const fn width(&self) -> usize {
        self.mask.count_ones() as usize
    }

    /// Shifts `outcome` in at bit 0, dropping bits beyond the register width.
    #[inline(always)]
    pub const fn shift(&mut self, outcome: Outcome) {
        self.value = shift_in(self.value, outcome, self.mask);
    }

    /// Folded view of the most recent `len` outcomes, `width` bits wide.
    #[inline]
    pub fn folded(&self, len: usize, width: usize) -> u64 {
        fold(self.value, len, width)
    }
}
