//! Prediction scheme behavioural tests.
//!
//! Drives each scheme through short outcome sequences using only the public
//! API and checks the resulting predictions and history state.

use bpsim_core::Outcome::{self, NotTaken as N, Taken as T};
use bpsim_core::bru::BranchPredictor;
use bpsim_core::bru::counter::Counter2;
use bpsim_core::bru::static_bp::StaticPredictor;
use proptest::prelude::*;
use rstest::rstest;

use crate::common::{correct, default_tage, gshare, periodic, replay, small_tage, tournament, train_n};

// ══════════════════════════════════════════════════════════
// 1. Static
// ══════════════════════════════════════════════════════════

#[rstest]
#[case(0x0)]
#[case(0x1000)]
#[case(u32::MAX)]
fn static_always_taken(#[case] pc: u32) {
    let mut bp = StaticPredictor::new();
    assert_eq!(bp.predict(pc), T);
    train_n(&mut bp, pc, N, 10);
    assert_eq!(bp.predict(pc), T);
    assert_eq!(bp.storage_bits(), 0);
}

// ══════════════════════════════════════════════════════════
// 2. Gshare
// ══════════════════════════════════════════════════════════

#[test]
fn gshare_fresh_predicts_not_taken() {
    let bp = gshare(10);
    assert_eq!(bp.predict(0x400), N);
    assert_eq!(bp.counter(0x400), Counter2::weakly_not_taken());
}

/// With 4 history bits and a single always-taken branch, the history walks
/// through 0, 1, 3, 7 and 15, so each of the first five predictions reads a
/// fresh counter. The sixth reuses index 15, trained once.
#[test]
fn gshare_single_branch_always_taken() {
    let mut bp = gshare(4);
    let events = periodic(0x10, &[T], 7);
    let predictions = replay(&mut bp, &events);
    assert_eq!(predictions, vec![N, N, N, N, N, T, T]);
    assert_eq!(bp.history(), 0x7F);
}

#[test]
fn gshare_history_is_not_masked() {
    let mut bp = gshare(4);
    train_n(&mut bp, 0x10, T, 70);
    assert_eq!(bp.history(), u64::MAX);
}

#[test]
fn gshare_training_moves_the_indexed_counter() {
    let mut bp = gshare(8);
    let pc = 0x3C;
    bp.train(pc, T);
    // History is now 1, so the same PC maps to a different, untouched slot.
    assert_eq!(bp.counter(pc), Counter2::weakly_not_taken());
    assert_eq!(bp.counter(pc ^ 1), Counter2::weakly_taken());
}

#[test]
fn gshare_learns_alternating_branch() {
    let mut bp = gshare(8);
    let events = periodic(0x2000, &[T, N], 100);
    let predictions = replay(&mut bp, &events);
    let tail = events.len() - 20;
    assert_eq!(correct(&predictions[tail..], &events[tail..]), 20);
}

/// The GHR is counted at its stored 64 bits, not the indexed 4.
#[test]
fn gshare_storage_bits() {
    assert_eq!(gshare(4).storage_bits(), 16 * 2 + 64);
}

proptest! {
    /// Identical streams into fresh predictors give identical predictions.
    #[test]
    fn gshare_is_deterministic(events in prop::collection::vec((any::<u32>(), any::<bool>()), 1..200)) {
        let events: Vec<(u32, Outcome)> = events.into_iter().map(|(pc, t)| (pc, Outcome::from(t))).collect();
        let mut a = gshare(6);
        let mut b = gshare(6);
        prop_assert_eq!(replay(&mut a, &events), replay(&mut b, &events));
        prop_assert_eq!(a.history(), b.history());
    }
}

// ══════════════════════════════════════════════════════════
// 3. Tournament
// ══════════════════════════════════════════════════════════

#[test]
fn tournament_fresh_prefers_global() {
    let bp = tournament(8, 8, 8);
    let lookup = bp.lookup(0x44);
    assert_eq!(lookup.choice, Counter2::weakly_not_taken());
    assert_eq!(lookup.prediction(), lookup.global);
    assert_eq!(bp.predict(0x44), N);
}

#[test]
fn tournament_learns_always_taken() {
    let mut bp = tournament(6, 6, 6);
    let events = periodic(0x80, &[T], 40);
    let predictions = replay(&mut bp, &events);
    assert_eq!(predictions[39], T);
}

#[test]
fn tournament_learns_alternating_branch() {
    let mut bp = tournament(8, 8, 8);
    let events = periodic(0x1234, &[T, N], 200);
    let predictions = replay(&mut bp, &events);
    let tail = events.len() - 20;
    assert_eq!(correct(&predictions[tail..], &events[tail..]), 20);
}

#[test]
fn tournament_histories_are_masked() {
    let mut bp = tournament(6, 5, 4);
    train_n(&mut bp, 0x7, T, 20);
    assert_eq!(bp.global_history(), 0x3F);
    assert_eq!(bp.local_history(0x7), 0x1F);
    // Another PC slot keeps its own empty local history.
    assert_eq!(bp.local_history(0x8), 0);
}

#[test]
fn tournament_predict_matches_lookup() {
    let mut bp = tournament(6, 6, 6);
    let events = periodic(0x50, &[T, T, N], 30);
    for (pc, outcome) in events {
        assert_eq!(bp.predict(pc), bp.lookup(pc).prediction());
        bp.train(pc, outcome);
    }
}

#[test]
fn tournament_storage_bits() {
    let bp = tournament(4, 3, 2);
    // 4 local histories of 3 bits, 8 local 3-bit counters, 16 global and 16
    // choice 2-bit counters, 4-bit global history.
    assert_eq!(bp.storage_bits(), 4 * 3 + 8 * 3 + 16 * 2 + 16 * 2 + 4);
}

// ══════════════════════════════════════════════════════════
// 4. TAGE
// ══════════════════════════════════════════════════════════

#[test]
fn tage_fresh_uses_base_table() {
    let bp = default_tage();
    let lookup = bp.lookup(0x400);
    assert_eq!(lookup.provider, None);
    assert_eq!(lookup.alternate, None);
    assert_eq!(lookup.prediction, N);
    assert_eq!(bp.num_tables(), 4);
    assert_eq!(bp.history_lengths(), vec![4, 8, 16, 32]);
}

#[test]
fn tage_learns_always_taken() {
    let mut bp = small_tage();
    let events = periodic(0x400, &[T], 40);
    let predictions = replay(&mut bp, &events);
    let tail = events.len() - 10;
    assert_eq!(correct(&predictions[tail..], &events[tail..]), 10);
}

#[test]
fn tage_learns_period_three_pattern() {
    let mut bp = small_tage();
    let events = periodic(0x400, &[T, T, N], 100);
    let predictions = replay(&mut bp, &events);
    let tail = events.len() - 30;
    assert_eq!(correct(&predictions[tail..], &events[tail..]), 30);
    assert!(bp.lookup(0x400).provider.is_some());
}

#[test]
fn tage_predict_matches_lookup() {
    let mut bp = small_tage();
    let events = periodic(0x80, &[T, N, N, T, T], 20);
    for (pc, outcome) in events {
        assert_eq!(bp.predict(pc), bp.lookup(pc).prediction);
        bp.train(pc, outcome);
    }
}

#[test]
fn tage_history_is_masked() {
    let mut bp = small_tage();
    train_n(&mut bp, 0x400, T, 20);
    assert_eq!(bp.global_history(), 0xFF);
}
