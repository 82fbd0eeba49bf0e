//! Saturating counters.
//!
//! A `BITS`-wide unsigned counter clamped to `[0, 2^BITS - 1]`. It predicts
//! taken once its value reaches the upper half of the range (2 for 2-bit
//! counters, 4 for 3-bit counters). All prediction tables store these.

use crate::common::Outcome;

/// Fixed-width saturating counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SaturatingCounter<const BITS: u8> {
    value: u8,
}

/// 2-bit counter used by BHTs, choice tables and TAGE entries.
pub type Counter2 = SaturatingCounter<2>;

/// 3-bit counter used by the tournament local pattern table.
pub type Counter3 = SaturatingCounter<3>;

impl<const BITS: u8> SaturatingCounter<BITS> {
    /// Largest representable value.
    pub const MAX: u8 = {
        assert!(BITS >= 1 && BITS <= 7, "counter width must be 1..=7 bits");
        (1 << BITS) - 1
    };

    /// Smallest value that predicts taken.
    pub const THRESHOLD: u8 = 1 << (BITS - 1);

    /// Creates a counter, clamping `value` into range.
    #[inline]
    pub const fn new(value: u8) -> Self {
        let value = if value > Self::MAX { Self::MAX } else { value };
        Self { value }
    }

    /// Strongest not-taken state.
    pub const fn strongly_not_taken() -> Self {
        Self { value: 0 }
    }

    /// Weakest not-taken state, the neutral initial value of every table.
    pub const fn weakly_not_taken() -> Self {
        Self {
            value: Self::THRESHOLD - 1,
        }
    }

    /// Weakest taken state.
    pub const fn weakly_taken() -> Self {
        Self {
            value: Self::THRESHOLD,
        }
    }

    /// Strongest taken state.
    pub const fn strongly_taken() -> Self {
        Self { value: Self::MAX }
    }

    /// Weakest state that predicts `outcome`.
    pub const fn weak(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Taken => Self::weakly_taken(),
            Outcome::NotTaken => Self::weakly_not_taken(),
        }
    }

    /// Raw counter value.
    #[inline(always)]
    pub const fn value(self) -> u8 {
        self.value
    }

    /// Raises the value by one unless saturated at [`Self::MAX`].
    #[inline(always)]
    pub const fn increment(&mut self) {
        if self.value < Self::MAX {
            self.value += 1;
        }
    }

    /// Lowers the value by one unless already 0.
    #[inline(always)]
    pub const fn decrement(&mut self) {
        if self.value > 0 {
            self.value -= 1;
        }
    }

    /// Moves the counter one step towards `outcome`.
    #[inline(always)]
    pub const fn update(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Taken => self.increment(),
            Outcome::NotTaken => self.decrement(),
        }
    }

    /// `Taken` iff the value is at or above [`Self::THRESHOLD`].
    #[inline(always)]
    pub const fn predict(self) -> Outcome {
        if self.value >= Self::THRESHOLD {
            Outcome::Taken
        } else {
            Outcome::NotTaken
        }
    }
}

impl<const BITS: u8> Default for SaturatingCounter<BITS> {
    fn default() -> Self {
        Self::weakly_not_taken()
    }
}
