//! Tagged-content parser.
//!
//! Walks XBRL-style XML and extracts a flat account/period/amount table.
//! Element-level problems (non-numeric text, missing context) skip the
//! element; a malformed document yields an empty table rather than an
//! error, since partial filings are common in practice.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;
use tracing::debug;

use crate::taxonomy::AccountMapping;

/// Flat extraction result: account name → period → amount.
pub type FlatTable = BTreeMap<String, BTreeMap<String, f64>>;

/// Tag name stems marking an element as financial. Matching is
/// case-sensitive substring on the local tag name.
const FINANCIAL_STEMS: &[&str] = &[
    "Assets",
    "Liabilities",
    "Equity",
    "Revenue",
    "Expenses",
    "Cash",
    "Receivables",
    "Inventory",
    "Debt",
    "Capital",
];

/// Period used when no four-digit year can be found in `contextRef`.
const UNKNOWN_PERIOD: &str = "unknown";

fn year_pattern() -> &'static Regex {
    static YEAR: OnceLock<Regex> = OnceLock::new();
    YEAR.get_or_init(|| Regex::new(r"\d{4}").expect("literal pattern"))
}

/// Parser for XBRL-style tagged financial content.
#[derive(Clone, Debug)]
pub struct XbrlParser {
    mapping: AccountMapping,
}

impl XbrlParser {
    /// Creates a parser using `mapping` to normalize tag names.
    #[must_use]
    pub fn new(mapping: AccountMapping) -> Self {
        Self { mapping }
    }

    /// Parses tagged content into a flat account/period/amount table.
    ///
    /// Malformed XML yields an empty table.
    #[must_use]
    pub fn parse(&self, raw: &str) -> FlatTable {
        let doc = match roxmltree::Document::parse(raw) {
            Ok(doc) => doc,
            Err(e) => {
                debug!(error = %e, "Malformed tagged content, yielding empty table");
                return FlatTable::new();
            }
        };

        let mut table = FlatTable::new();
        for node in doc.descendants().filter(roxmltree::Node::is_element) {
            let tag = node.tag_name().name();
            if !is_financial_tag(tag) {
                continue;
            }
            let Some(amount) = extract_amount(node.text()) else {
                continue;
            };

            let account = self.mapping.resolve(tag).unwrap_or(tag).to_string();
            let period = extract_period(node.attribute("contextRef"));
            *table
                .entry(account)
                .or_default()
                .entry(period)
                .or_insert(0.0) = amount;
        }

        debug!(accounts = table.len(), "Extracted flat financial table");
        table
    }
}

fn is_financial_tag(tag: &str) -> bool {
    FINANCIAL_STEMS.iter().any(|stem| tag.contains(stem))
}

fn extract_amount(text: Option<&str>) -> Option<f64> {
    let trimmed = text?.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.replace(',', "").parse().ok()
}

fn extract_period(context_ref: Option<&str>) -> String {
    context_ref
        .and_then(|cr| year_pattern().find(cr))
        .map_or_else(|| UNKNOWN_PERIOD.to_string(), |m| m.as_str().to_string())
}
