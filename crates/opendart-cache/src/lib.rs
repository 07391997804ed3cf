#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/opendart-rs/opendart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Response cache fingerprinting and storage.
//!
//! This crate provides implementations of the
//! [`ResponseCache`] trait from `opendart-core`:
//!
//! - [`SqliteCache`] - persistent SQLite-backed cache (default, requires
//!   the `sqlite` feature)
//! - [`InMemoryCache`] - in-memory cache for testing
//!
//! plus [`fingerprint`](fingerprint::fingerprint), the deterministic cache
//! key derivation shared by all implementations.

/// Deterministic cache key derivation.
pub mod fingerprint;
/// In-memory cache implementation.
pub mod memory;

/// SQLite-based cache implementation.
#[cfg(feature = "sqlite")]
pub mod sqlite;

// Re-export the trait for convenience
pub use opendart_core::ResponseCache;

pub use fingerprint::fingerprint;
pub use memory::InMemoryCache;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteCache;
