//! Error definitions.
//!
//! This module defines the two failure classes of the simulator:
//! 1. **Configuration errors:** Invalid or inconsistent table geometry. These are
//!    fatal and surface from [`Predictor::configure`](crate::Predictor::configure)
//!    before any table is allocated.
//! 2. **Trace errors:** I/O failures or malformed lines while decoding a branch
//!    trace. The predictor engine itself never fails at run time.

use thiserror::Error;

/// Invalid predictor sizing parameters.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A scheme that needs indexing bits was configured with none.
    #[error("{scheme}: `{field}` must be at least 1 bit")]
    ZeroBits {
        /// Scheme whose configuration was rejected.
        scheme: &'static str,
        /// Offending field.
        field: &'static str,
    },

    /// A width exceeds what the scheme can represent.
    #[error("{scheme}: `{field}` is {bits} bits, at most {max} are supported")]
    TooWide {
        /// Scheme whose configuration was rejected.
        scheme: &'static str,
        /// Offending field.
        field: &'static str,
        /// Configured width.
        bits: usize,
        /// Largest accepted width.
        max: usize,
    },

    /// TAGE was configured without any tagged table.
    #[error("tage: at least one tagged table is required")]
    NoTaggedTables,

    /// Per-table arrays disagree on the number of tagged tables.
    #[error("tage: `{field}` has {found} entries, expected {expected}")]
    LengthMismatch {
        /// Array whose length disagrees with `table_sizes`.
        field: &'static str,
        /// Number of tagged tables (length of `table_sizes`).
        expected: usize,
        /// Length of the offending array.
        found: usize,
    },

    /// A tagged table size is zero or not a power of two.
    #[error("tage: table {table} has {size} entries, expected a non-zero power of two")]
    TableSize {
        /// Tagged table index.
        table: usize,
        /// Configured entry count.
        size: usize,
    },

    /// A tag width is zero or does not fit the stored tag.
    #[error("tage: table {table} tag width {width} is outside 1..={max}")]
    TagWidth {
        /// Tagged table index.
        table: usize,
        /// Configured tag width.
        width: usize,
        /// Largest accepted width.
        max: usize,
    },

    /// An explicit history length is zero or longer than the global history.
    #[error("tage: table {table} history length {length} is outside 1..={max}")]
    HistoryLength {
        /// Tagged table index.
        table: usize,
        /// Configured history length.
        length: usize,
        /// Global history width.
        max: usize,
    },

    /// Explicit history lengths must not shrink towards longer tables.
    #[error("tage: history length of table {table} is shorter than table {previous}")]
    HistoryOrder {
        /// Tagged table index.
        table: usize,
        /// The preceding (shorter-history) table.
        previous: usize,
    },

    /// The configuration document could not be parsed.
    #[error("invalid configuration document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failure while reading or decoding a branch trace.
#[derive(Debug, Error)]
pub enum TraceError {
    /// Underlying reader failed.
    #[error("trace I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A line has neither the short (2 field) nor the long (7 field) layout.
    #[error("line {line}: expected 2 or 7 fields, found {found}")]
    FieldCount {
        /// 1-based line number.
        line: usize,
        /// Number of fields on the line.
        found: usize,
    },

    /// A field could not be decoded.
    #[error("line {line}: invalid {field} `{value}`")]
    InvalidField {
        /// 1-based line number.
        line: usize,
        /// Field name.
        field: &'static str,
        /// Raw field text.
        value: String,
    },
}
