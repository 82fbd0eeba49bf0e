//! History register and folding tests.

use bpsim_core::Outcome;
use bpsim_core::bru::history::{HistoryRegister, fold, low_mask, shift_in};
use proptest::prelude::*;

#[test]
fn shift_puts_newest_outcome_in_bit_zero() {
    let mut h = HistoryRegister::new(4);
    h.shift(Outcome::Taken);
    h.shift(Outcome::NotTaken);
    h.shift(Outcome::Taken);
    assert_eq!(h.value(), 0b101);
    h.shift(Outcome::Taken);
    h.shift(Outcome::Taken);
    // The first outcome (taken) is now the fifth newest and falls off the
    // 4-bit register, leaving N,T,T,T from oldest to newest.
    assert_eq!(h.value(), 0b0111);
    assert_eq!(h.width(), 4);
}

#[test]
fn full_width_register_keeps_64_outcomes() {
    let mut h = HistoryRegister::new(64);
    for _ in 0..70 {
        h.shift(Outcome::Taken);
    }
    assert_eq!(h.value(), u64::MAX);
    assert_eq!(h.width(), 64);
}

#[test]
fn shift_in_masks_bare_history() {
    let mask = low_mask(3);
    let mut h = 0;
    for outcome in [Outcome::Taken, Outcome::Taken, Outcome::NotTaken, Outcome::Taken] {
        h = shift_in(h, outcome, mask);
    }
    assert_eq!(h, 0b101);
}

#[test]
fn low_mask_edges() {
    assert_eq!(low_mask(0), 0);
    assert_eq!(low_mask(1), 1);
    assert_eq!(low_mask(12), 0xFFF);
    assert_eq!(low_mask(64), u64::MAX);
    assert_eq!(low_mask(80), u64::MAX);
}

#[test]
fn fold_xors_chunks() {
    assert_eq!(fold(0b1011_0110, 8, 4), 0b1011 ^ 0b0110);
    // Bits above `len` are ignored.
    assert_eq!(fold(0xFF_0F, 8, 4), 0x0 ^ 0xF);
    assert_eq!(fold(0xABCD, 16, 0), 0);
    assert_eq!(fold(u64::MAX, 64, 16), 0);
    assert_eq!(fold(u64::MAX, 48, 16), 0xFFFF);
}

#[test]
fn folded_matches_free_function() {
    let mut h = HistoryRegister::new(32);
    for bit in [1, 0, 1, 1, 0, 0, 1, 0, 1, 1, 1] {
        h.shift(Outcome::from(bit == 1));
    }
    assert_eq!(h.folded(11, 5), fold(h.value(), 11, 5));
}

proptest! {
    /// Register contents equal the last `width` outcomes, newest in bit 0.
    #[test]
    fn register_holds_recent_outcomes(
        width in 1usize..=64,
        outcomes in prop::collection::vec(any::<bool>(), 0..100),
    ) {
        let mut h = HistoryRegister::new(width);
        for &taken in &outcomes {
            h.shift(Outcome::from(taken));
        }
        let mut expected = 0u64;
        for (age, &taken) in outcomes.iter().rev().take(width).enumerate() {
            if taken {
                expected |= 1 << age;
            }
        }
        prop_assert_eq!(h.value(), expected);
    }

    /// A bare history shifted with a shared mask tracks a register of the same width.
    #[test]
    fn shift_in_matches_register(
        width in 1usize..=64,
        outcomes in prop::collection::vec(any::<bool>(), 0..100),
    ) {
        let mut reg = HistoryRegister::new(width);
        let mut bare = 0;
        for taken in outcomes {
            reg.shift(Outcome::from(taken));
            bare = shift_in(bare, Outcome::from(taken), low_mask(width));
        }
        prop_assert_eq!(reg.value(), bare);
    }

    #[test]
    fn fold_fits_width(history in any::<u64>(), len in 0usize..=64, width in 1usize..=16) {
        prop_assert!(fold(history, len, width) <= low_mask(width));
    }

    #[test]
    fn short_history_folds_to_itself(history in any::<u64>(), len in 0usize..=16, extra in 0usize..=8) {
        let width = len + extra;
        prop_assume!(width > 0);
        prop_assert_eq!(fold(history, len, width), history & low_mask(len));
    }
}
