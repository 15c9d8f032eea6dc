//! Error types for table encoding and decoding.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when reading or writing a table.
#[derive(Debug, Error)]
pub enum CodecError {
    /// File could not be opened, created or moved into place.
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Low-level delimited-text failure.
    #[error("{table} table, line {line}: {source}")]
    Csv {
        table: &'static str,
        line: u64,
        #[source]
        source: csv::Error,
    },

    /// Row has the wrong number of fields.
    #[error("{table} table, line {line}: expected {expected} fields, found {found}")]
    FieldCount {
        table: &'static str,
        line: u64,
        expected: usize,
        found: usize,
    },

    /// A field could not be parsed into its column type.
    #[error("{table} table, line {line}, column {column}: invalid value '{value}': {reason}")]
    InvalidField {
        table: &'static str,
        line: u64,
        column: &'static str,
        value: String,
        reason: String,
    },

    /// A field holds a delimiter or line break and cannot be written unquoted.
    #[error("{table} table, line {line}, column {column}: cannot encode '{value}': contains a delimiter or line break")]
    UnencodableField {
        table: &'static str,
        line: u64,
        column: &'static str,
        value: String,
    },

    /// Encoding a row failed.
    #[error("write {table} table: {source}")]
    Write {
        table: &'static str,
        #[source]
        source: csv::Error,
    },
}

impl CodecError {
    /// 1-based line of the offending row, when the error is row-specific.
    pub fn line(&self) -> Option<u64> {
        match self {
            CodecError::Csv { line, .. }
            | CodecError::FieldCount { line, .. }
            | CodecError::InvalidField { line, .. }
            | CodecError::UnencodableField { line, .. } => Some(*line),
            CodecError::Io { .. } | CodecError::Write { .. } => None,
        }
    }

    /// Column name of the offending field, when known.
    pub fn column(&self) -> Option<&'static str> {
        match self {
            CodecError::InvalidField { column, .. }
            | CodecError::UnencodableField { column, .. } => Some(column),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CodecError>;
