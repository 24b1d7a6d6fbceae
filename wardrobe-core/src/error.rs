//! Error types for wardrobe

use thiserror::Error;

/// Main error type for wardrobe operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("GPU error: {0}")]
    Gpu(String),

    #[error("Visualization error: {0}")]
    Visualization(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error(transparent)]
    AssetLoad(#[from] AssetLoadError),

    #[error("Catalog fetch failed: {0}")]
    CatalogFetch(String),

    /// Internal invariant violation, e.g. two occupants for one slot.
    #[error("Invalid window state: {0}")]
    InvalidWindowState(String),
}

/// Why a single asset failed to load
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetLoadFailure {
    Fetch(String),
    Decode(String),
    EmptyGeometry,
    TimedOut,
}

impl std::fmt::Display for AssetLoadFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetLoadFailure::Fetch(reason) => write!(f, "fetch failed: {}", reason),
            AssetLoadFailure::Decode(reason) => write!(f, "decode failed: {}", reason),
            AssetLoadFailure::EmptyGeometry => write!(f, "asset has no usable geometry"),
            AssetLoadFailure::TimedOut => write!(f, "load timed out"),
        }
    }
}

/// A specific asset failed to load. Callers treat this as "slot empty".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Asset load error for '{key}': {kind}")]
pub struct AssetLoadError {
    pub key: String,
    pub kind: AssetLoadFailure,
}

impl AssetLoadError {
    pub fn new(key: impl Into<String>, kind: AssetLoadFailure) -> Self {
        Self { key: key.into(), kind }
    }
}

/// Result type alias for wardrobe operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_load_error_display_names_key() {
        let err = AssetLoadError::new("shirt_01", AssetLoadFailure::TimedOut);
        assert_eq!(err.to_string(), "Asset load error for 'shirt_01': load timed out");

        let wrapped: Error = err.into();
        assert!(matches!(wrapped, Error::AssetLoad(_)));
    }
}
