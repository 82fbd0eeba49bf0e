//! Branch Predictor Interface.
//!
//! This module defines the `BranchPredictor` trait that all direction
//! prediction schemes implement. A scheme is asked for a guess before the
//! branch resolves and is trained with the real outcome afterwards.

use crate::common::Outcome;

/// Trait for branch direction prediction algorithms.
///
/// For a given branch, `predict` and `train` must be called in program order:
/// history state read by `predict` is only advanced by `train`.
pub trait BranchPredictor {
    /// Predicts the direction of the conditional branch at `pc`.
    ///
    /// This is a pure read of the predictor state.
    ///
    /// # Arguments
    ///
    /// * `pc` - Program counter of the branch instruction
    fn predict(&self, pc: u32) -> Outcome;

    /// Trains the predictor with the resolved direction of the branch at `pc`.
    ///
    /// Recomputes the same table indices as [`BranchPredictor::predict`] from
    /// the state before this call, updates counters, then shifts histories.
    ///
    /// # Arguments
    ///
    /// * `pc` - Program counter of the branch instruction
    /// * `outcome` - Whether the branch was actually taken
    fn train(&mut self, pc: u32, outcome: Outcome);

    /// Total predictor storage in bits (counters, histories, tags).
    fn storage_bits(&self) -> usize;
}
