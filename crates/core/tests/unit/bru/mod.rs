//! Branch prediction unit tests.


/// History register and folding tests.
pub mod history;

/// Behavioural tests for every prediction scheme.
pub mod predictors;
