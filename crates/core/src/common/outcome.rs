//! Resolved branch direction.
//!
//! Every scheme consumes outcomes during training and packs them into
//! history registers as single bits (`Taken` = 1, `NotTaken` = 0).

use std::fmt;
use std::ops::Not;

use serde::{Deserialize, Serialize};

/// Direction of a conditional branch, either predicted or resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Outcome {
    /// Fall-through.
    #[default]
    NotTaken,
    /// Branch redirects to its target.
    Taken,
}

impl Outcome {
    /// Returns `true` for [`Outcome::Taken`].
    #[inline(always)]
    pub const fn is_taken(self) -> bool {
        matches!(self, Self::Taken)
    }

    /// History bit shifted into history registers.
    #[inline(always)]
    pub const fn bit(self) -> u64 {
        self.is_taken() as u64
    }
}

impl From<bool> for Outcome {
    #[inline(always)]
    fn from(taken: bool) -> Self {
        if taken { Self::Taken } else { Self::NotTaken }
    }
}

impl From<Outcome> for bool {
    #[inline(always)]
    fn from(outcome: Outcome) -> Self {
        outcome.is_taken()
    }
}

impl Not for Outcome {
    type Output = Self;

    fn not(self) -> Self {
        match self {
            Self::Taken => Self::NotTaken,
            Self::NotTaken => Self::Taken,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Taken => write!(f, "T"),
            Self::NotTaken => write!(f, "N"),
        }
    }
}
