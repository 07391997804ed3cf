#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/opendart-rs/opendart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core traits and types for the OpenDART disclosure data engine.
//!
//! This crate provides the foundational abstractions shared by the rest of
//! the workspace:
//!
//! - [`DisclosureStore`](store::DisclosureStore) - persistent local store
//! - [`ResponseCache`](cache::ResponseCache) - time-bounded response cache
//! - [`DisclosureProvider`](provider::DisclosureProvider) - remote provider
//! - [`Clock`](clock::Clock) - injectable time source

/// Time-bounded response cache trait.
pub mod cache;
/// Injectable time source.
pub mod clock;
/// Envelope types shared by local and remote resolution.
pub mod envelope;
/// Error types for disclosure data operations.
pub mod error;
/// Remote provider trait and request parameter handling.
pub mod provider;
/// Persistent store trait for disclosures and financial statements.
pub mod store;
/// Core domain types (CorpCode, Disclosure, FinancialLine, etc.).
pub mod types;

// Re-export commonly used items at crate root
pub use cache::ResponseCache;
pub use clock::{Clock, FixedClock, SystemClock};
pub use envelope::{
    DisclosureEnvelope, FinancialEnvelope, STATUS_NO_DATA, STATUS_OK, total_page,
};
pub use error::{DartError, Result};
pub use provider::{CREDENTIAL_PARAM, DisclosureProvider, Endpoint, RemoteOutcome};
pub use store::{DisclosureStore, PagedDisclosures};
pub use types::{
    CorpCode, Disclosure, DisclosureQuery, FinancialLine, IngestReport, MarketClass, Page,
    StatementKey,
};
