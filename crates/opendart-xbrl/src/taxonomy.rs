//! Account taxonomy and tag keyword mapping.
//!
//! The taxonomy is configuration data, not code: it (de)serializes with
//! serde so deployments can load an alternative structure from JSON. The
//! built-in default is the standard Korean balance-sheet taxonomy.

use opendart_core::{DartError, Result};
use serde::{Deserialize, Serialize};

/// One subcategory: a display name plus the leaf account names that roll
/// up into it. An empty leaf list means the subcategory takes its amount
/// directly from the flat table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subcategory {
    /// Subcategory account name.
    pub name: String,
    /// Leaf account names summed into this subcategory.
    #[serde(default)]
    pub leaves: Vec<String>,
}

/// One top-level category with its subcategories.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category account name.
    pub name: String,
    /// Subcategories summed into this category.
    pub subcategories: Vec<Subcategory>,
}

/// A three-level account taxonomy (category → subcategory → leaves).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Taxonomy {
    /// Categories in display order.
    pub categories: Vec<Category>,
}

fn sub(name: &str, leaves: &[&str]) -> Subcategory {
    Subcategory {
        name: name.to_string(),
        leaves: leaves.iter().map(|l| (*l).to_string()).collect(),
    }
}

fn cat(name: &str, subcategories: Vec<Subcategory>) -> Category {
    Category {
        name: name.to_string(),
        subcategories,
    }
}

impl Taxonomy {
    /// The standard Korean balance-sheet taxonomy.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            categories: vec![
                cat(
                    "유동자산",
                    vec![
                        sub("현금및현금성자산", &[]),
                        sub("단기금융상품", &[]),
                        sub("매출채권", &["매출채권", "미수금", "대손충당금"]),
                        sub("재고자산", &["제품", "상품", "원재료", "재공품"]),
                        sub("선급금", &["선급비용", "선급금"]),
                        sub("기타유동자산", &["단기대여금", "미수수익", "부가세대급금"]),
                    ],
                ),
                cat(
                    "비유동자산",
                    vec![
                        sub(
                            "유형자산",
                            &["토지", "건물", "기계장치", "차량운반구", "감가상각누계액"],
                        ),
                        sub("무형자산", &["영업권", "특허권", "상표권", "소프트웨어"]),
                        sub("투자자산", &["장기금융상품", "관계기업투자", "기타투자자산"]),
                        sub("기타비유동자산", &["장기대여금", "보증금", "기타"]),
                    ],
                ),
                cat(
                    "유동부채",
                    vec![
                        sub("매입채무", &["매입채무", "미지급금"]),
                        sub("단기차입금", &["단기차입금", "유동성장기부채"]),
                        sub("기타유동부채", &["선수금", "예수금", "미지급비용", "충당부채"]),
                    ],
                ),
                cat(
                    "비유동부채",
                    vec![
                        sub("장기차입금", &["장기차입금", "사채"]),
                        sub(
                            "기타비유동부채",
                            &["퇴직급여부채", "장기성충당부채", "기타장기부채"],
                        ),
                    ],
                ),
                cat(
                    "자본",
                    vec![
                        sub("자본금", &["보통주자본금", "우선주자본금"]),
                        sub("자본잉여금", &["주식발행초과금", "기타자본잉여금"]),
                        sub("이익잉여금", &["이익준비금", "미처분이익잉여금"]),
                        sub("기타자본구성요소", &["자기주식", "기타포괄손익누계액"]),
                    ],
                ),
            ],
        }
    }

    /// Loads a taxonomy from its JSON representation.
    ///
    /// # Errors
    /// Returns [`DartError::Parse`] when the JSON does not describe a
    /// valid taxonomy.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| DartError::Parse(e.to_string()))
    }

    /// True iff `name` appears anywhere in the taxonomy (category,
    /// subcategory, or leaf).
    #[must_use]
    pub fn knows_account(&self, name: &str) -> bool {
        self.categories.iter().any(|c| {
            c.name == name
                || c.subcategories
                    .iter()
                    .any(|s| s.name == name || s.leaves.iter().any(|l| l == name))
        })
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::standard()
    }
}

/// One mapping entry: a tag keyword and the taxonomy account it resolves
/// to. Matching is case-insensitive substring on the element's local tag
/// name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEntry {
    /// Keyword matched against the tag name.
    pub keyword: String,
    /// Taxonomy account name the tag resolves to.
    pub account: String,
}

impl MappingEntry {
    fn new(keyword: &str, account: &str) -> Self {
        Self {
            keyword: keyword.to_string(),
            account: account.to_string(),
        }
    }
}

/// Ordered tag-to-account mapping table, validated against a taxonomy.
///
/// Entries are tried in order; the first keyword that is a
/// case-insensitive substring of the tag name wins. Tags with no match
/// keep their raw name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountMapping {
    entries: Vec<MappingEntry>,
}

impl AccountMapping {
    /// Builds a mapping, validating that every target account exists in
    /// `taxonomy`.
    ///
    /// # Errors
    /// Returns [`DartError::InvalidParameter`] naming the first entry
    /// whose target account the taxonomy does not know.
    pub fn new(entries: Vec<MappingEntry>, taxonomy: &Taxonomy) -> Result<Self> {
        for entry in &entries {
            if !taxonomy.knows_account(&entry.account) {
                return Err(DartError::InvalidParameter(format!(
                    "mapping keyword '{}' targets unknown account '{}'",
                    entry.keyword, entry.account
                )));
            }
        }
        Ok(Self { entries })
    }

    /// The standard keyword table for the given taxonomy.
    ///
    /// # Errors
    /// Returns an error when `taxonomy` does not contain the standard
    /// target accounts (i.e. a custom taxonomy needs a custom mapping).
    pub fn standard(taxonomy: &Taxonomy) -> Result<Self> {
        Self::new(
            vec![
                MappingEntry::new("PrepaidExpenses", "선급금"),
                MappingEntry::new("ShortTermInvestments", "단기금융상품"),
                MappingEntry::new("AccountsReceivable", "매출채권"),
                MappingEntry::new("Inventory", "재고자산"),
                MappingEntry::new("OtherCurrentAssets", "기타유동자산"),
                MappingEntry::new("PropertyPlantAndEquipment", "유형자산"),
                MappingEntry::new("Land", "토지"),
                MappingEntry::new("Buildings", "건물"),
                MappingEntry::new("MachineryAndEquipment", "기계장치"),
                MappingEntry::new("IntangibleAssets", "무형자산"),
                MappingEntry::new("Goodwill", "영업권"),
                MappingEntry::new("Patents", "특허권"),
                MappingEntry::new("Trademarks", "상표권"),
                MappingEntry::new("LongTermInvestments", "투자자산"),
                MappingEntry::new("OtherNonCurrentAssets", "기타비유동자산"),
                MappingEntry::new("AccountsPayable", "매입채무"),
                MappingEntry::new("ShortTermDebt", "단기차입금"),
                MappingEntry::new("AccruedExpenses", "미지급금"),
                MappingEntry::new("AdvancePayments", "선수금"),
                MappingEntry::new("OtherCurrentLiabilities", "기타유동부채"),
                MappingEntry::new("LongTermDebt", "장기차입금"),
                MappingEntry::new("Bonds", "사채"),
                MappingEntry::new("RetirementBenefitLiabilities", "퇴직급여부채"),
                MappingEntry::new("OtherNonCurrentLiabilities", "기타비유동부채"),
                MappingEntry::new("ShareCapital", "자본금"),
                MappingEntry::new("SharePremium", "주식발행초과금"),
                MappingEntry::new("RetainedEarnings", "이익잉여금"),
                MappingEntry::new("OtherEquityComponents", "기타자본구성요소"),
            ],
            taxonomy,
        )
    }

    /// Resolves a tag name to its taxonomy account, if any entry matches.
    #[must_use]
    pub fn resolve(&self, tag_name: &str) -> Option<&str> {
        let lowered = tag_name.to_lowercase();
        self.entries
            .iter()
            .find(|e| lowered.contains(&e.keyword.to_lowercase()))
            .map(|e| e.account.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_mapping_validates_against_standard_taxonomy() {
        let taxonomy = Taxonomy::standard();
        let mapping = AccountMapping::standard(&taxonomy).unwrap();
        assert_eq!(mapping.resolve("Inventory"), Some("재고자산"));
    }

    #[test]
    fn mapping_rejects_unknown_target() {
        let taxonomy = Taxonomy::standard();
        let err = AccountMapping::new(
            vec![MappingEntry::new("Widgets", "존재하지않는계정")],
            &taxonomy,
        )
        .unwrap_err();
        assert!(matches!(err, DartError::InvalidParameter(_)));
    }

    #[test]
    fn resolve_is_case_insensitive_substring_in_order() {
        let taxonomy = Taxonomy::standard();
        let mapping = AccountMapping::standard(&taxonomy).unwrap();

        assert_eq!(mapping.resolve("dart_InventoryNet"), Some("재고자산"));
        assert_eq!(mapping.resolve("GOODWILL"), Some("영업권"));
        // No keyword is a substring of the bare roll-up tag.
        assert_eq!(mapping.resolve("Assets"), None);
    }

    #[test]
    fn taxonomy_knows_all_three_levels() {
        let taxonomy = Taxonomy::standard();
        assert!(taxonomy.knows_account("유동자산"));
        assert!(taxonomy.knows_account("재고자산"));
        assert!(taxonomy.knows_account("원재료"));
        assert!(!taxonomy.knows_account("없는계정"));
    }

    #[test]
    fn taxonomy_round_trips_through_json() {
        let taxonomy = Taxonomy::standard();
        let json = serde_json::to_string(&taxonomy).unwrap();
        let loaded = Taxonomy::from_json(&json).unwrap();
        assert_eq!(loaded, taxonomy);
    }

    #[test]
    fn custom_taxonomy_loads_from_json() {
        let json = r#"{
            "categories": [
                {
                    "name": "Assets",
                    "subcategories": [
                        {"name": "Current", "leaves": ["Cash", "Receivables"]},
                        {"name": "Fixed"}
                    ]
                }
            ]
        }"#;
        let taxonomy = Taxonomy::from_json(json).unwrap();
        assert!(taxonomy.knows_account("Receivables"));
        assert!(taxonomy.knows_account("Fixed"));
    }
}
