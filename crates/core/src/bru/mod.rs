//! Branch prediction unit (BRU) implementations.
//!
//! This module contains the direction prediction schemes (static, gshare,
//! tournament and TAGE) and the saturating counters and history registers they
//! are built from.

pub use self::branch_predictor::BranchPredictor;

/// Branch predictor trait.
pub mod branch_predictor;

/// Fixed-width saturating counters.
pub mod counter;

/// Global history branch predictor (gshare algorithm).
pub mod gshare;

/// Outcome shift registers and history folding.
pub mod history;

/// Static branch predictor (always taken).
pub mod static_bp;

/// Tagged Geometric History Length branch predictor.
pub mod tage;

/// Tournament branch predictor (combines local and global predictors).
pub mod tournament;

use self::{
    gshare::GSharePredictor, static_bp::StaticPredictor, tage::TagePredictor,
    tournament::TournamentPredictor,
};
use crate::common::{ConfigError, Outcome};
use crate::config::{Config, PredictorKind};

/// Enum wrapper for static dispatch of Branch Predictors.
/// This avoids vtable lookups in the per-branch replay loop.
#[derive(Debug, Clone)]
pub enum BranchPredictorWrapper {
    /// Always-taken baseline.
    Static(StaticPredictor),
    /// Gshare.
    GShare(GSharePredictor),
    /// Tournament.
    Tournament(TournamentPredictor),
    /// TAGE.
    Tage(TagePredictor),
}

impl BranchPredictorWrapper {
    /// Creates a new branch predictor wrapper based on configuration.
    ///
    /// Only the selected scheme's tables are allocated.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        Ok(match config.predictor {
            PredictorKind::Static => Self::Static(StaticPredictor::new()),
            PredictorKind::GShare => Self::GShare(GSharePredictor::new(&config.gshare)?),
            PredictorKind::Tournament => {
                Self::Tournament(TournamentPredictor::new(&config.tournament)?)
            }
            PredictorKind::Tage => Self::Tage(TagePredictor::new(&config.tage)?),
        })
    }

    /// Scheme held by this wrapper.
    pub const fn kind(&self) -> PredictorKind {
        match self {
            Self::Static(_) => PredictorKind::Static,
            Self::GShare(_) => PredictorKind::GShare,
            Self::Tournament(_) => PredictorKind::Tournament,
            Self::Tage(_) => PredictorKind::Tage,
        }
    }
}

impl BranchPredictor for BranchPredictorWrapper {
    #[inline(always)]
    fn predict(&self, pc: u32) -> Outcome {
        match self {
            Self::Static(bp) => bp.predict(pc),
            Self::GShare(bp) => bp.predict(pc),
            Self::Tournament(bp) => bp.predict(pc),
            Self::Tage(bp) => bp.predict(pc),
        }
    }

    #[inline(always)]
    fn train(&mut self, pc: u32, outcome: Outcome) {
        match self {
            Self::Static(bp) => bp.train(pc, outcome),
            Self::GShare(bp) => bp.train(pc, outcome),
            Self::Tournament(bp) => bp.train(pc, outcome),
            Self::Tage(bp) => bp.train(pc, outcome),
        }
    }

    fn storage_bits(&self) -> usize {
        match self {
            Self::Static(bp) => bp.storage_bits(),
            Self::GShare(bp) => bp.storage_bits(),
            Self::Tournament(bp) => bp.storage_bits(),
            Self::Tage(bp) => bp.storage_bits(),
        }
    }
}
