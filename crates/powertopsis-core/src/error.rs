//! Error types for powertopsis

use thiserror::Error;

/// Main error type for powertopsis
///
/// The ranking engine itself never fails; these errors only surface at the
/// edges where files are read and decoded.
#[derive(Error, Debug)]
pub enum TopsisError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed resource quantity
    #[error("Invalid quantity: {0}")]
    Quantity(String),

    /// Malformed cluster snapshot
    #[error("Snapshot error: {0}")]
    Snapshot(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for powertopsis operations
pub type TopsisResult<T> = Result<T, TopsisError>;

impl From<serde_json::Error> for TopsisError {
    fn from(err: serde_json::Error) -> Self {
        TopsisError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for TopsisError {
    fn from(err: toml::de::Error) -> Self {
        TopsisError::Config(err.to_string())
    }
}
