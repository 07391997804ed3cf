//! Envelope types shared by local and remote resolution.
//!
//! Every operation exposed by the engine answers with the provider's
//! status/message/list convention, regardless of whether the data came
//! from the local store, the response cache, or the remote provider.
//! Keeping one shape lets responses round-trip through the cache as JSON.

use serde::{Deserialize, Serialize};

use crate::types::{Disclosure, FinancialLine, Page};

/// Status code denoting success.
pub const STATUS_OK: &str = "000";

/// Status code denoting "no data found" (also used by the provider for a
/// missing credential).
pub const STATUS_NO_DATA: &str = "013";

/// Computes the total page count for a paginated result.
#[must_use]
pub const fn total_page(total_count: u64, page_count: u32) -> u64 {
    if page_count == 0 {
        return 0;
    }
    total_count.div_ceil(page_count as u64)
}

/// Envelope for disclosure search results.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DisclosureEnvelope {
    /// Status code; `"000"` denotes success.
    pub status: String,
    /// Human-readable status message.
    pub message: String,
    /// 1-indexed page number.
    #[serde(default)]
    pub page_no: u32,
    /// Rows per page.
    #[serde(default)]
    pub page_count: u32,
    /// Total matching rows across all pages.
    #[serde(default)]
    pub total_count: u64,
    /// Total page count.
    #[serde(default)]
    pub total_page: u64,
    /// Disclosure rows for this page.
    #[serde(default)]
    pub list: Vec<Disclosure>,
}

impl DisclosureEnvelope {
    /// Builds a success envelope from a locally resolved page.
    #[must_use]
    pub fn local(page: Page, total_count: u64, list: Vec<Disclosure>) -> Self {
        Self {
            status: STATUS_OK.to_string(),
            message: "OK (local store)".to_string(),
            page_no: page.page_no,
            page_count: page.page_count,
            total_count,
            total_page: total_page(total_count, page.page_count),
            list,
        }
    }

    /// True iff the envelope carries a success status.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == STATUS_OK
    }
}

/// Envelope for financial statement results.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialEnvelope {
    /// Status code; `"000"` denotes success.
    pub status: String,
    /// Human-readable status message.
    pub message: String,
    /// Financial statement line items.
    #[serde(default)]
    pub list: Vec<FinancialLine>,
}

impl FinancialEnvelope {
    /// Builds an envelope from locally resolved line items: success when
    /// non-empty, "no data" when empty.
    #[must_use]
    pub fn local(list: Vec<FinancialLine>) -> Self {
        if list.is_empty() {
            Self::no_data()
        } else {
            Self {
                status: STATUS_OK.to_string(),
                message: "OK (local store)".to_string(),
                list,
            }
        }
    }

    /// Builds an empty "no data" envelope.
    #[must_use]
    pub fn no_data() -> Self {
        Self {
            status: STATUS_NO_DATA.to_string(),
            message: "no data found".to_string(),
            list: Vec::new(),
        }
    }

    /// True iff the envelope carries a success status.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == STATUS_OK
    }
}
