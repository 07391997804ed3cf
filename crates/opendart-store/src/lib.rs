#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/opendart-rs/opendart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! SQLite-backed local store for disclosure and financial statement data.
//!
//! [`SqliteStore`] implements the
//! [`DisclosureStore`](opendart_core::DisclosureStore) trait: it is the
//! first stop of every query (local resolution) and the destination remote
//! results are reconciled into (company upserts, insert-once disclosures,
//! wholesale financial replaces, popularity counters).

/// SQLite implementation of the disclosure store.
pub mod sqlite;

// Re-export the trait for convenience
pub use opendart_core::DisclosureStore;

pub use sqlite::SqliteStore;
