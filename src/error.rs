// src/error.rs

use thiserror::Error;

/// Structural violations in pages, parts or merged files.
///
/// These abort the whole run: unlike a missing input or an existing output,
/// they mean the data on disk does not have the shape the pipeline relies on.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("empty file")]
    Empty,

    #[error("header does not start with {expected:?}: {found:?}")]
    MissingDateHeader { expected: &'static str, found: String },

    #[error("header has no period columns")]
    NoPeriods,

    #[error("invalid period label {0:?} (expected YYYY/MM)")]
    BadPeriod(String),

    #[error("periods not strictly increasing: {prev} then {next}")]
    NonIncreasingPeriods { prev: String, next: String },

    #[error("row {row} has {found} fields, header has {expected}")]
    FieldCountMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("part has {found} rows, first part has {expected}")]
    RowCountMismatch { expected: usize, found: usize },

    #[error("row {row}: label {label:?} does not match accumulated label {accumulated:?}")]
    LabelMismatch {
        row: usize,
        label: String,
        accumulated: String,
    },

    #[error("row {row} has no delimiter")]
    MissingDelimiter { row: usize },

    #[error("row {row} does not end with the terminal suffix {suffix:?}")]
    MissingSuffix { row: usize, suffix: String },

    #[error("part {0} follows a terminal part")]
    PartAfterTerminal(String),

    #[error("page-start options are not a contiguous 0-based sequence: {0:?}")]
    NonContiguousOptions(Vec<u32>),

    #[error("page-start selector has no period options")]
    NoOptions,
}
