//! Persistent store trait for disclosures and financial statements.
//!
//! The store is both the first stop of the resolution chain (local
//! resolution) and the destination remote results are reconciled into
//! (persistence reconciliation).

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{
    Disclosure, FinancialLine, IngestReport, MarketClass, Page, StatementKey,
};

/// One page of locally resolved disclosures plus the unpaged total.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PagedDisclosures {
    /// Total matching rows across all pages.
    pub total_count: u64,
    /// Rows on the requested page, receipt date descending.
    pub rows: Vec<Disclosure>,
}

/// Trait for the persistent local store.
///
/// Query methods never fail on empty results - an empty page is the signal
/// that drives fallthrough to cache/remote resolution. Write methods use
/// atomic upsert primitives so concurrent ingestions of the same logical
/// key degrade to last-writer-wins instead of corrupting rows.
#[async_trait]
pub trait DisclosureStore: Send + Sync {
    /// Substring search on the stored disclosure company name, optionally
    /// narrowed by market classification, receipt date descending.
    async fn search_by_name(
        &self,
        corp_name: &str,
        corp_cls: Option<MarketClass>,
        page: Page,
    ) -> Result<PagedDisclosures>;

    /// Exact match on the company code, receipt date descending.
    async fn search_by_corp_code(&self, corp_code: &str, page: Page) -> Result<PagedDisclosures>;

    /// Most recent disclosures, optionally narrowed by market
    /// classification.
    async fn recent_disclosures(
        &self,
        corp_cls: Option<MarketClass>,
        page: Page,
    ) -> Result<PagedDisclosures>;

    /// Stored line items for one statement key, display ordinal ascending.
    async fn financial_lines(&self, key: &StatementKey) -> Result<Vec<FinancialLine>>;

    /// Ingests a batch of disclosures: upserts each company by corp code,
    /// then inserts the document only if its receipt number is new.
    /// Per-row failures are skipped and counted; the batch continues.
    async fn ingest_disclosures(&self, rows: &[Disclosure]) -> Result<IngestReport>;

    /// Replaces the entire line-item set for a statement key in one
    /// transaction. No row of the previous set survives.
    async fn replace_financial_lines(
        &self,
        key: &StatementKey,
        lines: &[FinancialLine],
    ) -> Result<()>;

    /// Increments the usage counter for each distinct account name,
    /// creating missing counters at 1.
    async fn bump_account_usage(&self, names: &[String]) -> Result<()>;

    /// Account names by usage count descending, then recency.
    async fn popular_accounts(&self, limit: u32) -> Result<Vec<String>>;

    /// Account names containing `query`, usage count descending.
    async fn search_accounts(&self, query: &str, limit: u32) -> Result<Vec<String>>;
}
