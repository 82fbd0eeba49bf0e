//! Trace-driven branch direction predictor simulator library.
//!
//! This crate implements a set of interchangeable conditional-branch direction
//! predictors with the following:
//! 1. **Schemes:** Static (always taken), gshare, tournament, and TAGE.
//! 2. **Building blocks:** Saturating counters and history registers.
//! 3. **Facade:** One-time configuration, then `predict`/`train` per branch.
//! 4. **Simulation:** Trace decoding, replay loop, and accuracy statistics.

/// Common types (branch outcomes, errors).
pub mod common;
/// Predictor configuration (defaults, scheme selection, validation).
pub mod config;
/// Branch prediction schemes, counters, and history registers.
pub mod bru;
/// Configured predictor facade.
pub mod predictor;
/// Trace decoding and replay.
pub mod sim;
/// Prediction statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Branch direction type.
pub use crate::common::Outcome;
/// Configured predictor; construct with `Predictor::configure`.
pub use crate::predictor::Predictor;
