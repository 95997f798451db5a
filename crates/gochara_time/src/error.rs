//! Error types for instant and calendar conversions.

use thiserror::Error;

/// Errors from calendar validation, instant construction, or date parsing.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum TimeError {
    /// Calendar components or a Julian Date were non-finite or out of range.
    #[error("invalid time: {0}")]
    InvalidTime(&'static str),
    /// A textual date/time could not be parsed.
    #[error("cannot parse date/time: {0}")]
    Parse(String),
}
