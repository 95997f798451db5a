//! Error types for the transit search engine.

use gochara_time::TimeError;
use thiserror::Error;

/// Errors that fail a year computation.
///
/// Oracle failures never appear here: the sampler drops the affected body
/// for that instant and the refiner falls back to the unrefined instant.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum SearchError {
    /// A configuration value or request parameter was rejected.
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
    /// The year could not be mapped onto the time coordinate.
    #[error(transparent)]
    InvalidTime(#[from] TimeError),
    /// The oracle answered no query over the whole year.
    #[error("no position samples could be obtained for year {year}")]
    NoSamples { year: i32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_error_converts() {
        let err: SearchError = TimeError::InvalidTime("year out of supported range").into();
        assert!(matches!(err, SearchError::InvalidTime(_)));
        assert_eq!(err.to_string(), "invalid time: year out of supported range");
    }

    #[test]
    fn no_samples_message_names_year() {
        let err = SearchError::NoSamples { year: 2024 };
        assert!(err.to_string().contains("2024"));
    }
}
