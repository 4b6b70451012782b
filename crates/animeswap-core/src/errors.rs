//! Error types for AnimeSwap

use thiserror::Error;

/// Errors raised while loading application settings
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Ledger connection and query errors
#[derive(Debug, Error)]
pub enum NodeError {
    #[error("Node unreachable at {url}")]
    Unreachable { url: String },

    #[error("Node returned error: {message}")]
    ApiError { message: String },

    #[error("Node request timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

/// Protocol-specific errors
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Resource not found: {resource_type}")]
    ResourceNotFound { resource_type: String },

    #[error("Invalid amount: {message}")]
    InvalidAmount { message: String },

    #[error("Slippage must be strictly between 0 and 1, got {value}")]
    InvalidSlippage { value: String },

    #[error("Route must have between 1 and {max} hops, got {hops}")]
    InvalidHopCount { hops: usize, max: usize },
}

/// Payload and type-string errors
#[derive(Debug, Error)]
pub enum TxError {
    #[error("Invalid address: {address}")]
    InvalidAddress { address: String },

    #[error("Invalid type string: {type_string}")]
    InvalidType { type_string: String },
}

/// Result type alias for configuration loading
pub type Result<T> = std::result::Result<T, Error>;

impl ProtocolError {
    /// Get a stable machine-readable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ResourceNotFound { .. } => "resource_not_found",
            Self::InvalidAmount { .. } => "invalid_amount",
            Self::InvalidSlippage { .. } => "invalid_slippage",
            Self::InvalidHopCount { .. } => "invalid_hop_count",
        }
    }

    /// Whether the caller supplied a bad argument (never worth retrying)
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Self::InvalidAmount { .. } | Self::InvalidSlippage { .. } | Self::InvalidHopCount { .. }
        )
    }
}
