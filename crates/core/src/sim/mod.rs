//! Trace replay.
//!
//! Provides decoding of branch traces and the loop that feeds decoded events
//! to a configured predictor while collecting statistics.

/// Trace replay driver.
pub mod simulator;

/// Branch trace decoding.
pub mod trace;

pub use simulator::Simulator;
pub use trace::{BranchEvent, TraceReader};
