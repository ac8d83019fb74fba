//! # UI Error Types
//!
//! Widget interaction never fails: bad input is ignored or restored. The
//! fallible surface is configuration loading and explicit number parsing.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while configuring the UI.
#[derive(Error, Debug)]
pub enum UiError {
    /// Configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// The file that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML for the expected schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Configuration parsed but holds unusable values.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Text could not be read as a number.
    #[error("invalid number: {0:?}")]
    InvalidNumber(String),
}

/// Result type for UI operations.
pub type UiResult<T> = Result<T, UiError>;
