//! Conversion errors

use std::io;

/// Error returned by conversion functions
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Unknown unit family name
    #[error("Invalid family: {name:?}. Valid options: {valid}")]
    InvalidFamily {
        /// Name that failed to parse
        name: String,
        /// Comma separated list of valid names
        valid: String,
    },

    /// NaN or infinite input
    #[error("Value must be a finite number, got {0}")]
    NotFinite(f64),

    /// Nothing to parse
    #[error("Empty input string")]
    EmptyInput,

    /// Numeral part of a string could not be parsed
    #[error("Malformed number in string {0:?}")]
    MalformedNumber(String),

    /// Integer value does not fit
    #[error("Value {0:?} does not fit in a 128 bit integer")]
    OutOfRange(String),

    /// Suffix not present in magnitude table
    #[error("Invalid string suffix: {suffix:?}. Valid options: {valid}")]
    UnknownSuffix {
        /// Suffix as found in the input
        suffix: String,
        /// Comma separated list of valid suffixes
        valid: String,
    },

    /// No color to paint with
    #[error("Color list is empty")]
    EmptyColorList,

    /// Color name not recognized
    #[error("Unknown color: {0:?}")]
    UnknownColor(String),

    /// Custom magnitude table rejected
    #[error("Invalid magnitude table: {0}")]
    InvalidTable(String),

    /// Column name not in table
    #[error("Column {0:?} not present in table")]
    MissingColumn(String),

    /// Unknown table transform name
    #[error("Invalid transform type: {0:?}. Valid options: human, num, color")]
    InvalidTransform(String),

    /// Row cell count does not match header
    #[error("Row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        /// Row index, header excluded
        row: usize,
        /// Cell count found
        found: usize,
        /// Column count
        expected: usize,
    },

    /// Read/write failure
    #[error(transparent)]
    Io(#[from] io::Error),
}
