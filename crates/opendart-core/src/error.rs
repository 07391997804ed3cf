//! Error types for disclosure data operations.
//!
//! This module defines [`DartError`] which covers all error cases that can
//! occur when resolving, fetching, persisting, or caching disclosure data.

use thiserror::Error;

/// Errors that can occur during disclosure data operations.
#[derive(Error, Debug)]
pub enum DartError {
    /// Network failure or timeout calling the remote provider.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Error parsing provider responses or tagged financial content.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Error interacting with the persistent store.
    #[error("Store error: {0}")]
    Store(String),

    /// Error interacting with the response cache.
    #[error("Cache error: {0}")]
    Cache(String),

    /// An invalid parameter was provided.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type alias using [`DartError`].
pub type Result<T> = std::result::Result<T, DartError>;
