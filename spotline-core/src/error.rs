use crate::types::ColumnRole;
use thiserror::Error;

/// Row-level failures. These are always recovered locally: the row is
/// skipped, the skip is counted in [`crate::types::OrderDiagnostics`], and
/// processing continues with the next row.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RowError {
    /// A cell artifact no catalogued repair rule could fix.
    #[error("malformed {role:?} cell: {text:?}")]
    MalformedRow { role: ColumnRole, text: String },

    /// Day-pattern token that doesn't match any known format.
    #[error("unrecognized day pattern: {0:?}")]
    InvalidDayPattern(String),

    /// Time-range token that is unparseable or empty after normalization.
    #[error("invalid time range: {0:?}")]
    InvalidTimeRange(String),
}

/// Order-level failures. Unlike [`RowError`], these stop the whole order:
/// no partial line output is produced.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    /// A language on this order needs an explicit sub-choice before its
    /// block prefixes can be finalized. Not a failure — the caller collects
    /// the choice and resubmits.
    #[error("language {language:?} requires a disambiguation choice before processing")]
    PendingDisambiguation { language: String },

    /// No recognizable schedule table at all.
    #[error("order structure failure: {0}")]
    OrderStructureFailure(String),
}
