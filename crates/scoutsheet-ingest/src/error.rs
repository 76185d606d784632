//! Ingestion error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading team record files.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The file could not be read.
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file could not be parsed as JSON or TOML.
    #[error("failed to parse {path}: {message}")]
    Unparseable { path: PathBuf, message: String },

    /// The file parsed but does not hold a record or an array of records.
    #[error("{path}: expected a record or an array of records")]
    UnsupportedShape { path: PathBuf },

    /// A record has no value under the configured team number key.
    #[error("{path}: record {index} has no `{key}` value")]
    MissingTeamNumber {
        path: PathBuf,
        index: usize,
        key: String,
    },
}
