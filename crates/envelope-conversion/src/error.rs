//! Error types for the conversion crate.
//!
//! Conversion itself is total; only configuration loading can fail.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Config(String),
}

/// Convenience result type for fallible setup around the converter.
pub type ConvertResult<T> = Result<T, ConvertError>;
