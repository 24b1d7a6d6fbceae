//! Error types for I/O operations

use thiserror::Error;
use wardrobe_core::{AssetLoadFailure, Error};

/// Errors that can occur while fetching or decoding catalog data and assets
#[derive(Error, Debug)]
pub enum IoError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid file format: {format}")]
    InvalidFormat { format: String },

    #[error("Parse error: {message}")]
    ParseError { message: String },

    #[error("HTTP error: {message}")]
    Http { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IoError {
    /// Classify for the asset cache: transport problems versus bad content
    pub fn as_load_failure(&self) -> AssetLoadFailure {
        match self {
            IoError::InvalidFormat { .. } | IoError::ParseError { .. } => {
                AssetLoadFailure::Decode(self.to_string())
            }
            _ => AssetLoadFailure::Fetch(self.to_string()),
        }
    }
}

impl From<reqwest::Error> for IoError {
    fn from(e: reqwest::Error) -> Self {
        IoError::Http { message: e.to_string() }
    }
}

impl From<serde_json::Error> for IoError {
    fn from(e: serde_json::Error) -> Self {
        IoError::ParseError { message: e.to_string() }
    }
}

impl From<IoError> for Error {
    fn from(e: IoError) -> Self {
        match e {
            IoError::Io(inner) => Error::Io(inner),
            IoError::InvalidFormat { format } => Error::UnsupportedFormat(format),
            other => Error::InvalidData(other.to_string()),
        }
    }
}
