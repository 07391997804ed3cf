#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/opendart-rs/opendart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Tiered corporate disclosure query engine.
//!
//! This crate ties the engine together: it re-exports the core types, the
//! store/cache/client implementations, and provides [`DartService`], the
//! facade that runs every query through the local → cache → remote
//! resolution chain.
//!
//! # Features
//!
//! - `client` - the OpenDART HTTP provider client
//! - `cache-sqlite` - SQLite-backed response cache
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use opendart::{
//!     DartService, DisclosureQuery, InMemoryCache, OpenDartClient, SqliteStore, SystemClock,
//! };
//!
//! #[tokio::main]
//! async fn main() -> opendart::Result<()> {
//!     let clock = Arc::new(SystemClock);
//!     let service = DartService::new(
//!         Arc::new(SqliteStore::new("dart.db", clock.clone())?),
//!         Arc::new(InMemoryCache::new(clock.clone())),
//!         Arc::new(OpenDartClient::from_env()),
//!         clock,
//!     )?;
//!
//!     let query = DisclosureQuery {
//!         corp_name: Some("삼성전자".to_string()),
//!         ..DisclosureQuery::new()
//!     };
//!     let envelope = service.search_disclosures(&query).await?;
//!     println!("{} filings", envelope.total_count);
//!     Ok(())
//! }
//! ```

// Core types and traits
pub use opendart_core::*;

// Cache implementations
pub use opendart_cache::InMemoryCache;
#[cfg(feature = "cache-sqlite")]
pub use opendart_cache::SqliteCache;

// Local store
pub use opendart_store::SqliteStore;

// Remote provider
#[cfg(feature = "client")]
pub use opendart_client::OpenDartClient;

// Hierarchy pipeline
pub use opendart_xbrl::{HierarchyBuilder, HierarchyNode, Taxonomy};

mod service;
pub use service::DartService;
