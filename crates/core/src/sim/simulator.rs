//! Simulator: owns the predictor and the statistics side-by-side.
//!
//! Each conditional event is predicted and then immediately trained, which
//! keeps history updates in program order.

use tracing::debug;

use super::trace::BranchEvent;
use crate::common::{ConfigError, Outcome, TraceError};
use crate::config::Config;
use crate::predictor::Predictor;
use crate::stats::PredictionStats;

/// Top-level trace replay driver.
#[derive(Debug)]
pub struct Simulator {
    /// Configured predictor.
    pub predictor: Predictor,
    /// Accuracy counters.
    pub stats: PredictionStats,
}

impl Simulator {
    /// Creates a new simulator with the given configuration.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self::with_predictor(Predictor::configure(config)?))
    }

    /// Creates a simulator around an already configured predictor.
    pub fn with_predictor(predictor: Predictor) -> Self {
        Self {
            predictor,
            stats: PredictionStats::default(),
        }
    }

    /// Replays one event.
    ///
    /// Returns the prediction made for a conditional branch, `None` for
    /// events that are not direction-predicted.
    pub fn step(&mut self, event: &BranchEvent) -> Option<Outcome> {
        if !event.conditional {
            self.predictor.train(event.pc, event.outcome, false);
            self.stats.record_unconditional();
            return None;
        }
        let predicted = self.predictor.predict(event.pc);
        self.predictor.train(event.pc, event.outcome, true);
        self.stats.record(predicted, event.outcome);
        Some(predicted)
    }

    /// Replays a whole trace, stopping at the first decoding error.
    pub fn run<I>(&mut self, events: I) -> Result<(), TraceError>
    where
        I: IntoIterator<Item = Result<BranchEvent, TraceError>>,
    {
        for event in events {
            let _ = self.step(&event?);
        }
        debug!(
            branches = self.stats.branches,
            mispredictions = self.stats.mispredictions,
            "trace replay finished"
        );
        Ok(())
    }

    /// Tears the predictor down and returns the collected statistics.
    pub fn finish(self) -> PredictionStats {
        self.predictor.teardown();
        self.stats
    }
}
