//! Error types surfaced by the library.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while turning a city's trip source into a record store.
///
/// All of these are fatal for the session that triggered the load.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The city name is not one of the supported cities.
    #[error("unknown city '{0}' (expected chicago, new york city or washington)")]
    UnknownCity(String),

    /// The source file could not be opened or read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source is not well-formed CSV, or a cell has the wrong type.
    #[error("malformed trip data in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The header row lacks a column every city provides.
    #[error("{} is missing required column '{column}'", path.display())]
    MissingColumn { path: PathBuf, column: &'static str },

    /// A `Start Time` or `End Time` cell is not a recognizable timestamp.
    #[error("row {row}: cannot parse timestamp '{value}'")]
    InvalidTimestamp { row: usize, value: String },
}

/// Errors raised while turning user text into a filter.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterParseError {
    #[error("unknown month '{0}' (expected a month name or 'all')")]
    UnknownMonth(String),

    #[error("unknown day '{0}' (expected a weekday name or 'all')")]
    UnknownWeekday(String),
}
