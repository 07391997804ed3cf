//! Hierarchy builder.
//!
//! Rolls a flat account/period/amount table up into the taxonomy's
//! three-level structure. The full taxonomy shape is always emitted, with
//! empty amount maps for absent accounts, so consumers render a stable
//! structure regardless of how sparse a filing is.

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::instrument;

use opendart_core::Result;

use crate::parser::{FlatTable, XbrlParser};
use crate::taxonomy::{AccountMapping, Subcategory, Taxonomy};

/// Per-period amounts keyed by year string.
pub type PeriodAmounts = BTreeMap<String, f64>;

/// One node of the rolled-up account hierarchy.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HierarchyNode {
    /// Account name.
    pub name: String,
    /// Amount per period.
    pub amounts: PeriodAmounts,
    /// True when this node's amount is derived from declared children.
    pub has_details: bool,
    /// Child nodes, in taxonomy order.
    pub children: Vec<HierarchyNode>,
}

/// Builds account hierarchies from tagged content.
#[derive(Clone, Debug)]
pub struct HierarchyBuilder {
    taxonomy: Taxonomy,
    parser: XbrlParser,
}

impl HierarchyBuilder {
    /// Creates a builder over the given taxonomy and parser.
    #[must_use]
    pub fn new(taxonomy: Taxonomy, parser: XbrlParser) -> Self {
        Self { taxonomy, parser }
    }

    /// Creates a builder over the standard taxonomy and keyword mapping.
    ///
    /// # Errors
    /// Propagates mapping validation failure.
    pub fn standard() -> Result<Self> {
        let taxonomy = Taxonomy::standard();
        let mapping = AccountMapping::standard(&taxonomy)?;
        Ok(Self::new(taxonomy, XbrlParser::new(mapping)))
    }

    /// Parses tagged content into the flat table.
    #[must_use]
    pub fn parse(&self, raw: &str) -> FlatTable {
        self.parser.parse(raw)
    }

    /// Rolls a flat table up into the full taxonomy structure.
    #[instrument(skip(self, flat), fields(accounts = flat.len()))]
    #[must_use]
    pub fn build(&self, flat: &FlatTable) -> Vec<HierarchyNode> {
        self.taxonomy
            .categories
            .iter()
            .map(|category| {
                let children: Vec<HierarchyNode> = category
                    .subcategories
                    .iter()
                    .map(|sub| build_subcategory(sub, flat))
                    .collect();
                HierarchyNode {
                    name: category.name.clone(),
                    amounts: sum_children(&children),
                    has_details: true,
                    children,
                }
            })
            .collect()
    }

    /// Parses tagged content and rolls it up in one step.
    #[must_use]
    pub fn from_content(&self, raw: &str) -> Vec<HierarchyNode> {
        self.build(&self.parse(raw))
    }
}

fn build_subcategory(sub: &Subcategory, flat: &FlatTable) -> HierarchyNode {
    if sub.leaves.is_empty() {
        return HierarchyNode {
            name: sub.name.clone(),
            amounts: flat.get(&sub.name).cloned().unwrap_or_default(),
            has_details: false,
            children: Vec::new(),
        };
    }

    let children: Vec<HierarchyNode> = sub
        .leaves
        .iter()
        .map(|leaf| HierarchyNode {
            name: leaf.clone(),
            amounts: flat.get(leaf).cloned().unwrap_or_default(),
            has_details: false,
            children: Vec::new(),
        })
        .collect();

    HierarchyNode {
        name: sub.name.clone(),
        amounts: sum_children(&children),
        has_details: true,
        children,
    }
}

fn sum_children(children: &[HierarchyNode]) -> PeriodAmounts {
    let mut totals = PeriodAmounts::new();
    for child in children {
        for (period, amount) in &child.amounts {
            *totals.entry(period.clone()).or_insert(0.0) += amount;
        }
    }
    totals
}
