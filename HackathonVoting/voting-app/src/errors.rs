use crate::types::ResourceId;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("address must start with 0x: {0}")]
    MissingPrefix(String),

    #[error("address must have 40 hex digits, got {0}")]
    InvalidLength(usize),

    #[error("invalid hex digit in address: {0}")]
    InvalidHex(String),
}

/// Failures reported by the chain client
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("{function} rejected: {reason}")]
    Rejected { function: String, reason: String },

    #[error("unknown system {0}")]
    UnknownSystem(ResourceId),

    #[error("ledger unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("wallet not connected")]
    NotConnected,

    #[error("read-only session")]
    ReadOnly,

    #[error("no submission to edit")]
    NoSubmission,

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Address(#[from] AddressError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("{field} is {len} bytes, at most {max} fit in a resource id")]
    TooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },
}
