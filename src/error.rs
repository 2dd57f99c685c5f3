//! Error types for dataset loading, aggregation and rendering.

use std::io;
use std::path::PathBuf;

/// Errors raised while producing AQI reports.
///
/// Line numbers are 1-based file lines (the header is line 1), column
/// indices are 0-based positions in the comma-separated row.
#[derive(Debug, thiserror::Error)]
pub enum AqiError {
    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed CSV at line {line}: {source}")]
    Csv {
        line: u64,
        #[source]
        source: csv::Error,
    },

    #[error("header has {columns} columns, expected at least {required}")]
    Schema { columns: usize, required: usize },

    #[error("line {line}: missing column {column} (row has {found} fields)")]
    MissingField {
        line: u64,
        column: usize,
        found: usize,
    },

    #[error("line {line}, column {column}: '{value}' is not an integer")]
    ParseInt {
        line: u64,
        column: usize,
        value: String,
    },

    #[error("line {line}, column {column}: '{value}' is not a number")]
    ParseFloat {
        line: u64,
        column: usize,
        value: String,
    },

    #[error("no AQI readings recorded for state '{0}'")]
    UnknownState(String),
}

impl AqiError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        AqiError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, AqiError>;
