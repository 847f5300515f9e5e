//! Errors for building domain values.

use thiserror::Error;

/// A raw identifier or platform name could not be turned into a domain value.
///
/// Sheet, resolution and store failures have their own error types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// Not one of Amazon, Flipkart, Meesho.
    #[error("unknown platform '{0}'")]
    UnknownPlatform(String),
}

impl DomainError {
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn unknown_platform(name: impl Into<String>) -> Self {
        Self::UnknownPlatform(name.into())
    }
}
