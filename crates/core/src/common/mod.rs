//! Common types used throughout the predictor simulator.
//!
//! This module provides the building blocks shared by every component:
//! 1. **Outcome:** The resolved or predicted direction of a branch.
//! 2. **Error Handling:** Configuration and trace decoding errors.

/// Error types for configuration and trace decoding.
pub mod error;

/// Branch direction type.
pub mod outcome;

pub use error::{ConfigError, TraceError};
pub use outcome::Outcome;
