//! Predictor facade.
//!
//! The facade is the only surface a trace-replay harness needs: configure a
//! scheme once, then alternate `predict` and `train` for every branch in
//! program order. Unconditional control flow is passed to `train` as
//! non-conditional and never touches direction state.

use tracing::info;

use crate::bru::{BranchPredictor, BranchPredictorWrapper};
use crate::common::{ConfigError, Outcome};
use crate::config::{Config, PredictorKind};

/// A configured direction predictor owning its scheme's tables.
#[derive(Debug, Clone)]
pub struct Predictor {
    scheme: BranchPredictorWrapper,
}

impl Predictor {
    /// Validates `config` and allocates the tables of the selected scheme.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the selected scheme's geometry is invalid;
    /// nothing is allocated in that case.
    pub fn configure(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let scheme = BranchPredictorWrapper::new(config)?;
        info!(
            predictor = %scheme.kind(),
            storage_bits = scheme.storage_bits(),
            "predictor configured"
        );
        Ok(Self { scheme })
    }

    /// Active scheme.
    pub const fn kind(&self) -> PredictorKind {
        self.scheme.kind()
    }

    /// Underlying scheme, for inspection.
    pub const fn scheme(&self) -> &BranchPredictorWrapper {
        &self.scheme
    }

    /// Predicts the direction of the conditional branch at `pc`.
    #[inline]
    pub fn predict(&self, pc: u32) -> Outcome {
        self.scheme.predict(pc)
    }

    /// Trains the active scheme; a no-op unless `is_conditional`.
    #[inline]
    pub fn train(&mut self, pc: u32, outcome: Outcome, is_conditional: bool) {
        if is_conditional {
            self.scheme.train(pc, outcome);
        }
    }

    /// Total storage of the active scheme in bits.
    pub fn storage_bits(&self) -> usize {
        self.scheme.storage_bits()
    }

    /// Releases every table owned by the active scheme.
    pub fn teardown(self) {
        info!(predictor = %self.kind(), "predictor torn down");
    }
}
