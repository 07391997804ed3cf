//! Core domain types for corporate disclosure data.
//!
//! This module defines the fundamental data structures:
//!
//! - [`CorpCode`] - unique company identifier assigned by the provider
//! - [`MarketClass`] - market classification (KOSPI, KOSDAQ, ...)
//! - [`Disclosure`] - one filed disclosure document
//! - [`FinancialLine`] - one financial statement line item
//! - [`StatementKey`] - composite key for a financial statement set
//! - [`DisclosureQuery`] / [`Page`] - query and pagination parameters

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A company's unique code as assigned by the disclosure provider.
///
/// Codes are 8-digit strings; surrounding whitespace is trimmed on creation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CorpCode(String);

impl CorpCode {
    /// Creates a new corp code from a string, trimming whitespace.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into().trim().to_string())
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CorpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CorpCode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for CorpCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CorpCode {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Market classification of a listed company.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarketClass {
    /// KOSPI main board (`"Y"`).
    Kospi,
    /// KOSDAQ (`"K"`).
    Kosdaq,
    /// KONEX (`"N"`).
    Konex,
    /// Everything else, including unlisted filers (`"E"`).
    Other,
}

impl MarketClass {
    /// Returns the single-letter wire code used by the provider.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Kospi => "Y",
            Self::Kosdaq => "K",
            Self::Konex => "N",
            Self::Other => "E",
        }
    }

    /// Parses a wire code; returns `None` for unknown codes.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "Y" => Some(Self::Kospi),
            "K" => Some(Self::Kosdaq),
            "N" => Some(Self::Konex),
            "E" => Some(Self::Other),
            _ => None,
        }
    }
}

/// One filed disclosure document.
///
/// Field names follow the provider's wire format so the same struct
/// round-trips through remote envelopes, the cache, and the local store.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Disclosure {
    /// Receipt number - unique, immutable identifier of the filing.
    pub rcept_no: String,
    /// Code of the filing company.
    pub corp_code: CorpCode,
    /// Name of the filing company at filing time.
    pub corp_name: String,
    /// Market classification wire code.
    #[serde(default)]
    pub corp_cls: Option<String>,
    /// Report name/title.
    pub report_nm: String,
    /// Receipt date, `YYYYMMDD`.
    pub rcept_dt: String,
    /// Filer name.
    pub flr_nm: String,
    /// Disclosure type code.
    #[serde(default)]
    pub pblntf_ty: Option<String>,
    /// Detailed disclosure type code.
    #[serde(default)]
    pub pblntf_detail_ty: Option<String>,
    /// Remark.
    #[serde(default)]
    pub rm: Option<String>,
}

/// One financial statement line item.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialLine {
    /// Statement division code (`BS`, `IS`, ...).
    #[serde(default)]
    pub sj_div: Option<String>,
    /// Statement name.
    #[serde(default)]
    pub sj_nm: Option<String>,
    /// Standard account identifier, when tagged.
    #[serde(default)]
    pub account_id: Option<String>,
    /// Account name.
    pub account_nm: String,
    /// Account detail.
    #[serde(default)]
    pub account_detail: Option<String>,
    /// Current period name.
    #[serde(default)]
    pub thstrm_nm: Option<String>,
    /// Current period amount (raw string, may contain separators).
    #[serde(default)]
    pub thstrm_amount: Option<String>,
    /// Prior period name.
    #[serde(default)]
    pub frmtrm_nm: Option<String>,
    /// Prior period amount.
    #[serde(default)]
    pub frmtrm_amount: Option<String>,
    /// Before-prior period name.
    #[serde(default)]
    pub bfefrmtrm_nm: Option<String>,
    /// Before-prior period amount.
    #[serde(default)]
    pub bfefrmtrm_amount: Option<String>,
    /// Declared display ordinal (numeric string on the wire).
    #[serde(default)]
    pub ord: Option<String>,
    /// Currency unit.
    #[serde(default)]
    pub currency: Option<String>,
}

/// Composite key identifying one financial statement set.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StatementKey {
    /// Company code.
    pub corp_code: CorpCode,
    /// Business year, `YYYY`.
    pub bsns_year: String,
    /// Report type code (e.g. `"11011"` for the annual report).
    pub reprt_code: String,
}

impl StatementKey {
    /// Creates a new statement key.
    #[must_use]
    pub fn new(
        corp_code: impl Into<CorpCode>,
        bsns_year: impl Into<String>,
        reprt_code: impl Into<String>,
    ) -> Self {
        Self {
            corp_code: corp_code.into(),
            bsns_year: bsns_year.into(),
            reprt_code: reprt_code.into(),
        }
    }
}

/// Pagination parameters. `page_no` is 1-indexed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// 1-indexed page number.
    pub page_no: u32,
    /// Rows per page.
    pub page_count: u32,
}

impl Page {
    /// Creates a page, clamping `page_no` to at least 1 and `page_count`
    /// to at least 1.
    #[must_use]
    pub fn new(page_no: u32, page_count: u32) -> Self {
        Self {
            page_no: page_no.max(1),
            page_count: page_count.max(1),
        }
    }

    /// Row offset of the first row on this page.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page_no as u64 - 1) * self.page_count as u64
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(1, 20)
    }
}

/// Query parameters for a disclosure search.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DisclosureQuery {
    /// Exact company code filter.
    pub corp_code: Option<CorpCode>,
    /// Company name substring filter.
    pub corp_name: Option<String>,
    /// Search window start, `YYYYMMDD`.
    pub bgn_de: Option<String>,
    /// Search window end, `YYYYMMDD`.
    pub end_de: Option<String>,
    /// Disclosure type filter.
    pub pblntf_ty: Option<String>,
    /// Market classification filter.
    pub corp_cls: Option<MarketClass>,
    /// Pagination.
    pub page: Page,
}

impl DisclosureQuery {
    /// Creates an empty query with default pagination.
    #[must_use]
    pub fn new() -> Self {
        Self {
            page: Page::default(),
            ..Self::default()
        }
    }

    /// Builds the outgoing parameter set for the remote disclosure-list
    /// endpoint. Absent filters are omitted; the credential is injected by
    /// the provider client, never here.
    #[must_use]
    pub fn remote_params(&self) -> BTreeMap<String, String> {
        let mut params = BTreeMap::new();
        if let Some(corp_code) = &self.corp_code {
            params.insert("corp_code".to_string(), corp_code.to_string());
        }
        if let Some(bgn_de) = &self.bgn_de {
            params.insert("bgn_de".to_string(), bgn_de.clone());
        }
        if let Some(end_de) = &self.end_de {
            params.insert("end_de".to_string(), end_de.clone());
        }
        if let Some(pblntf_ty) = &self.pblntf_ty {
            params.insert("pblntf_ty".to_string(), pblntf_ty.clone());
        }
        if let Some(corp_cls) = &self.corp_cls {
            params.insert("corp_cls".to_string(), corp_cls.code().to_string());
        }
        params.insert("page_no".to_string(), self.page.page_no.to_string());
        params.insert("page_count".to_string(), self.page.page_count.to_string());
        params
    }
}

/// Outcome of one disclosure ingestion batch.
///
/// Per-row failures are skipped rather than aborting the batch, so callers
/// can see how much of the batch actually landed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Rows newly inserted.
    pub inserted: usize,
    /// Rows skipped because the receipt number already existed.
    pub skipped: usize,
    /// Rows that failed to persist.
    pub failed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_offsets_are_one_indexed() {
        assert_eq!(Page::new(1, 20).offset(), 0);
        assert_eq!(Page::new(3, 20).offset(), 40);
        // page 0 clamps to page 1
        assert_eq!(Page::new(0, 20).offset(), 0);
    }

    #[test]
    fn market_class_codes_round_trip() {
        for cls in [
            MarketClass::Kospi,
            MarketClass::Kosdaq,
            MarketClass::Konex,
            MarketClass::Other,
        ] {
            assert_eq!(MarketClass::from_code(cls.code()), Some(cls));
        }
        assert_eq!(MarketClass::from_code("Z"), None);
    }

    #[test]
    fn remote_params_omit_absent_filters() {
        let query = DisclosureQuery {
            corp_code: Some(CorpCode::new("00126380")),
            corp_cls: Some(MarketClass::Kospi),
            ..DisclosureQuery::new()
        };
        let params = query.remote_params();
        assert_eq!(params.get("corp_code").map(String::as_str), Some("00126380"));
        assert_eq!(params.get("corp_cls").map(String::as_str), Some("Y"));
        assert_eq!(params.get("page_no").map(String::as_str), Some("1"));
        assert!(!params.contains_key("bgn_de"));
        assert!(!params.contains_key("crtfc_key"));
    }

    #[test]
    fn disclosure_deserializes_with_missing_optionals() {
        let json = r#"{
            "rcept_no": "20230101000123",
            "corp_code": "00126380",
            "corp_name": "Samsung Electronics",
            "report_nm": "Annual Report",
            "rcept_dt": "20230101",
            "flr_nm": "Samsung Electronics"
        }"#;
        let doc: Disclosure = serde_json::from_str(json).unwrap();
        assert_eq!(doc.rcept_no, "20230101000123");
        assert_eq!(doc.corp_cls, None);
        assert_eq!(doc.rm, None);
    }
}
