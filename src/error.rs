//! Error types for ipagg.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IpaggError {
    #[error("No usage records to aggregate")]
    EmptyInput,

    #[error("Mixed IP versions: expected IPv{expected}, found IPv{found} ({address})")]
    MixedVersions {
        expected: u8,
        found: u8,
        address: String,
    },

    #[error("Expected a single address, got range: {0}")]
    RangeNotAddress(String),

    #[error("Invalid IP address or range: {0}")]
    InvalidAddress(String),

    #[error("Invalid prefix length /{prefix} for IPv{version}")]
    InvalidPrefix { prefix: u8, version: u8 },

    #[error("Configuration error: {0}")]
    Config(String),
}
