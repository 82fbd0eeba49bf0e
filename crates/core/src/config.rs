//! Configuration system for the branch predictor simulator.
//!
//! This module defines all configuration structures and enums used to size the
//! prediction schemes. It provides:
//! 1. **Defaults:** Baseline table geometry for every scheme.
//! 2. **Structures:** One config block per scheme, grouped under [`Config`].
//! 3. **Validation:** Rejection of geometry that cannot be built, before any
//!    table is allocated.
//!
//! Configuration is supplied as JSON or built from `Config::default()` and
//! field overrides (the CLI does the latter).

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::common::ConfigError;

/// Default configuration constants for the simulator.
mod defaults {
    /// Default gshare global history length (32K-entry BHT).
    pub const GSHARE_HISTORY_BITS: usize = 15;

    /// Default tournament global history length (4096-entry global and choice tables).
    pub const TOURNAMENT_GLOBAL_BITS: usize = 12;

    /// Default tournament local history length (1024-entry local pattern table).
    pub const TOURNAMENT_LOCAL_BITS: usize = 10;

    /// Default tournament PC index width (1024 local history registers).
    pub const TOURNAMENT_PC_INDEX_BITS: usize = 10;

    /// Default TAGE global history width.
    pub const TAGE_HISTORY_BITS: usize = 32;

    /// Default TAGE base table size (log2, 4096 entries).
    pub const TAGE_BASE_SIZE_BITS: usize = 12;

    /// Default number of entries per tagged table.
    pub const TAGE_TABLE_SIZES: [usize; 4] = [1024; 4];

    /// Default tag widths; longer histories get wider tags.
    pub const TAGE_TAG_WIDTHS: [usize; 4] = [8, 9, 10, 11];
}

/// Largest accepted table index width (log2 of entry count).
pub const MAX_INDEX_BITS: usize = 28;

/// Largest accepted TAGE global history width.
pub const MAX_TAGE_HISTORY_BITS: usize = 64;

/// Largest accepted TAGE tag width.
pub const MAX_TAG_WIDTH: usize = 16;

/// Branch prediction scheme selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum PredictorKind {
    /// Always predicts taken and never trains.
    #[default]
    #[serde(alias = "static")]
    Static,
    /// Global history XOR PC indexed table of 2-bit counters.
    #[serde(alias = "gshare", alias = "Gshare")]
    GShare,
    /// Local/global hybrid arbitrated by a choice table.
    #[serde(alias = "tournament")]
    Tournament,
    /// Tagged geometric history length predictor.
    #[serde(alias = "tage", alias = "TAGE")]
    Tage,
}

impl fmt::Display for PredictorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Static => "Static",
            Self::GShare => "Gshare",
            Self::Tournament => "Tournament",
            Self::Tage => "TAGE",
        };
        write!(f, "{name}")
    }
}

/// Root configuration structure containing all predictor settings.
///
/// Only the block matching [`Config::predictor`] is validated and used; the
/// others keep their defaults.
///
/// # Examples
///
/// ```
/// use bpsim_core::config::{Config, PredictorKind};
///
/// let config = Config::from_json(r#"{
///     "predictor": "Tournament",
///     "tournament": { "global_history_bits": 9, "local_history_bits": 10, "pc_index_bits": 10 }
/// }"#).unwrap();
/// assert_eq!(config.predictor, PredictorKind::Tournament);
/// assert_eq!(config.tournament.global_history_bits, 9);
/// assert_eq!(config.gshare.history_bits, 15);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Active prediction scheme.
    #[serde(default)]
    pub predictor: PredictorKind,

    /// Gshare geometry.
    #[serde(default)]
    pub gshare: GShareConfig,

    /// Tournament geometry.
    #[serde(default)]
    pub tournament: TournamentConfig,

    /// TAGE geometry.
    #[serde(default)]
    pub tage: TageConfig,
}

impl Config {
    /// Parses a JSON configuration document and validates the active scheme.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the geometry of the active scheme.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let result = match self.predictor {
            PredictorKind::Static => Ok(()),
            PredictorKind::GShare => self.gshare.validate(),
            PredictorKind::Tournament => self.tournament.validate(),
            PredictorKind::Tage => self.tage.validate(),
        };
        if let Err(e) = &result {
            debug!(predictor = %self.predictor, error = %e, "rejected configuration");
        }
        result
    }
}

/// Checks a table index width against the supported range.
fn check_index_bits(scheme: &'static str, field: &'static str, bits: usize) -> Result<(), ConfigError> {
    if bits == 0 {
        return Err(ConfigError::ZeroBits { scheme, field });
    }
    if bits > MAX_INDEX_BITS {
        return Err(ConfigError::TooWide {
            scheme,
            field,
            bits,
            max: MAX_INDEX_BITS,
        });
    }
    Ok(())
}

/// Gshare predictor configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GShareConfig {
    /// Global history bits used for indexing; the BHT has `2^history_bits` entries.
    #[serde(default = "GShareConfig::default_history_bits")]
    pub history_bits: usize,
}

impl GShareConfig {
    /// Returns the default gshare history length.
    fn default_history_bits() -> usize {
        defaults::GSHARE_HISTORY_BITS
    }

    /// Validates the BHT geometry.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_index_bits("gshare", "history_bits", self.history_bits)
    }
}

impl Default for GShareConfig {
    fn default() -> Self {
        Self {
            history_bits: defaults::GSHARE_HISTORY_BITS,
        }
    }
}

/// Tournament predictor configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentConfig {
    /// Global history length; sizes the global and choice tables (log2).
    #[serde(default = "TournamentConfig::default_global")]
    pub global_history_bits: usize,

    /// Local history length; sizes the local pattern table (log2).
    #[serde(default = "TournamentConfig::default_local")]
    pub local_history_bits: usize,

    /// Low PC bits selecting a local history register (log2 of table size).
    #[serde(default = "TournamentConfig::default_pc_index")]
    pub pc_index_bits: usize,
}

impl TournamentConfig {
    /// Returns the default tournament global history length.
    fn default_global() -> usize {
        defaults::TOURNAMENT_GLOBAL_BITS
    }

    /// Returns the default tournament local history length.
    fn default_local() -> usize {
        defaults::TOURNAMENT_LOCAL_BITS
    }

    /// Returns the default tournament PC index width.
    fn default_pc_index() -> usize {
        defaults::TOURNAMENT_PC_INDEX_BITS
    }

    /// Validates all three table geometries.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_index_bits("tournament", "global_history_bits", self.global_history_bits)?;
        check_index_bits("tournament", "local_history_bits", self.local_history_bits)?;
        check_index_bits("tournament", "pc_index_bits", self.pc_index_bits)
    }
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            global_history_bits: defaults::TOURNAMENT_GLOBAL_BITS,
            local_history_bits: defaults::TOURNAMENT_LOCAL_BITS,
            pc_index_bits: defaults::TOURNAMENT_PC_INDEX_BITS,
        }
    }
}

/// TAGE (Tagged Geometric) predictor configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TageConfig {
    /// Width of the shared global history register.
    #[serde(default = "TageConfig::default_history_bits")]
    pub history_bits: usize,

    /// Base table size (log2).
    #[serde(default = "TageConfig::default_base_size_bits")]
    pub base_size_bits: usize,

    /// Entry count of each tagged table, shortest history first.
    #[serde(default = "TageConfig::default_table_sizes")]
    pub table_sizes: Vec<usize>,

    /// Tag width of each tagged table, shortest history first.
    #[serde(default = "TageConfig::default_tag_widths")]
    pub tag_widths: Vec<usize>,

    /// Explicit history length per tagged table. Empty derives a geometric
    /// series ending at `history_bits`.
    #[serde(default)]
    pub history_lengths: Vec<usize>,
}

impl TageConfig {
    /// Returns the default TAGE global history width.
    fn default_history_bits() -> usize {
        defaults::TAGE_HISTORY_BITS
    }

    /// Returns the default TAGE base table size (log2).
    fn default_base_size_bits() -> usize {
        defaults::TAGE_BASE_SIZE_BITS
    }

    /// Returns the default tagged table sizes.
    fn default_table_sizes() -> Vec<usize> {
        defaults::TAGE_TABLE_SIZES.to_vec()
    }

    /// Returns the default tag widths.
    fn default_tag_widths() -> Vec<usize> {
        defaults::TAGE_TAG_WIDTHS.to_vec()
    }

    /// Effective history length of every tagged table.
    ///
    /// Without explicit lengths, table `i` of `N` sees `history_bits >> (N-1-i)`
    /// bits (at least one), so the last table uses the whole register and each
    /// shorter table halves it.
    pub fn resolved_history_lengths(&self) -> Vec<usize> {
        if !self.history_lengths.is_empty() {
            return self.history_lengths.clone();
        }
        let n = self.table_sizes.len();
        (0..n)
            .map(|i| {
                let shift = n - 1 - i;
                let len = if shift >= usize::BITS as usize {
                    0
                } else {
                    self.history_bits >> shift
                };
                len.max(1)
            })
            .collect()
    }

    /// Validates history width, table sizes, tag widths and history lengths.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_bits == 0 {
            return Err(ConfigError::ZeroBits {
                scheme: "tage",
                field: "history_bits",
            });
        }
        if self.history_bits > MAX_TAGE_HISTORY_BITS {
            return Err(ConfigError::TooWide {
                scheme: "tage",
                field: "history_bits",
                bits: self.history_bits,
                max: MAX_TAGE_HISTORY_BITS,
            });
        }
        check_index_bits("tage", "base_size_bits", self.base_size_bits)?;

        let n = self.table_sizes.len();
        if n == 0 {
            return Err(ConfigError::NoTaggedTables);
        }
        if self.tag_widths.len() != n {
            return Err(ConfigError::LengthMismatch {
                field: "tag_widths",
                expected: n,
                found: self.tag_widths.len(),
            });
        }
        if !self.history_lengths.is_empty() && self.history_lengths.len() != n {
            return Err(ConfigError::LengthMismatch {
                field: "history_lengths",
                expected: n,
                found: self.history_lengths.len(),
            });
        }

        for (table, &size) in self.table_sizes.iter().enumerate() {
            if !size.is_power_of_two() || size.trailing_zeros() as usize > MAX_INDEX_BITS {
                return Err(ConfigError::TableSize { table, size });
            }
        }
        for (table, &width) in self.tag_widths.iter().enumerate() {
            if width == 0 || width > MAX_TAG_WIDTH {
                return Err(ConfigError::TagWidth {
                    table,
                    width,
                    max: MAX_TAG_WIDTH,
                });
            }
        }

        let lengths = self.resolved_history_lengths();
        for (table, &length) in lengths.iter().enumerate() {
            if length == 0 || length > self.history_bits {
                return Err(ConfigError::HistoryLength {
                    table,
                    length,
                    max: self.history_bits,
                });
            }
            if table > 0 && length < lengths[table - 1] {
                return Err(ConfigError::HistoryOrder {
                    table,
                    previous: table - 1,
                });
            }
        }
        Ok(())
    }
}

impl Default for TageConfig {
    fn default() -> Self {
        Self {
            history_bits: defaults::TAGE_HISTORY_BITS,
            base_size_bits: defaults::TAGE_BASE_SIZE_BITS,
            table_sizes: defaults::TAGE_TABLE_SIZES.to_vec(),
            tag_widths: defaults::TAGE_TAG_WIDTHS.to_vec(),
            history_lengths: Vec::new(),
        }
    }
}
