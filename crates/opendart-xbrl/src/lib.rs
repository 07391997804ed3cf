#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/opendart-rs/opendart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Tagged financial content parsing and hierarchy building.
//!
//! The pipeline has three stages:
//!
//! 1. [`Taxonomy`] - the account structure (category → subcategory →
//!    leaves), loadable from JSON with the standard Korean balance-sheet
//!    taxonomy as the built-in default;
//! 2. [`XbrlParser`] - walks tagged XML content and extracts a flat
//!    account/period/amount table;
//! 3. [`HierarchyBuilder`] - rolls the flat table up into
//!    [`HierarchyNode`] trees, always emitting the full taxonomy shape.

pub mod hierarchy;
pub mod parser;
pub mod taxonomy;

pub use hierarchy::{HierarchyBuilder, HierarchyNode};
pub use parser::{FlatTable, XbrlParser};
pub use taxonomy::{AccountMapping, Category, MappingEntry, Subcategory, Taxonomy};
