//! Tiered resolution service.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, instrument, warn};

use opendart_cache::fingerprint;
use opendart_core::{
    Clock, DisclosureEnvelope, DisclosureProvider, DisclosureQuery, DisclosureStore, Endpoint,
    FinancialEnvelope, PagedDisclosures, RemoteOutcome, ResponseCache, Result, StatementKey,
};
use opendart_xbrl::{HierarchyBuilder, HierarchyNode};

/// Cache lifetime for disclosure search responses.
const SEARCH_TTL: Duration = Duration::from_secs(2 * 60 * 60);

/// Cache lifetime for financial statement responses.
const FINANCIAL_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Default lookback window for remote recent-disclosure searches.
const RECENT_WINDOW_DAYS: i64 = 30;

/// Facade running every query through the local → cache → remote chain.
///
/// All collaborators are constructor-injected trait objects, so tests swap
/// in fixed clocks and scripted providers and deployments pick their own
/// store and cache backends.
pub struct DartService {
    store: Arc<dyn DisclosureStore>,
    cache: Arc<dyn ResponseCache>,
    provider: Arc<dyn DisclosureProvider>,
    clock: Arc<dyn Clock>,
    hierarchy: HierarchyBuilder,
}

impl std::fmt::Debug for DartService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DartService")
            .field("provider", &self.provider.name())
            .finish_non_exhaustive()
    }
}

impl DartService {
    /// Creates a service over the given collaborators, using the standard
    /// taxonomy for hierarchy building.
    ///
    /// # Errors
    /// Propagates standard taxonomy/mapping construction failure.
    pub fn new(
        store: Arc<dyn DisclosureStore>,
        cache: Arc<dyn ResponseCache>,
        provider: Arc<dyn DisclosureProvider>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        Ok(Self {
            store,
            cache,
            provider,
            clock,
            hierarchy: HierarchyBuilder::standard()?,
        })
    }

    /// Replaces the hierarchy builder, e.g. with one over a custom taxonomy.
    #[must_use]
    pub fn with_hierarchy(mut self, hierarchy: HierarchyBuilder) -> Self {
        self.hierarchy = hierarchy;
        self
    }

    /// Searches disclosure documents.
    ///
    /// Resolution order: local store branches, then the response cache,
    /// then the remote provider. A non-empty local result is authoritative
    /// and short-circuits the rest of the chain. Successful remote results
    /// are ingested into the store and cached before being returned;
    /// non-success remote envelopes pass through unchanged. With no remote
    /// credential configured the empty local result is returned as a
    /// success envelope.
    #[instrument(skip(self, query))]
    pub async fn search_disclosures(&self, query: &DisclosureQuery) -> Result<DisclosureEnvelope> {
        let page = query.page;
        let local = self.resolve_local(query).await?;
        if !local.rows.is_empty() {
            debug!(rows = local.rows.len(), "Local store satisfied search");
            return Ok(DisclosureEnvelope::local(page, local.total_count, local.rows));
        }

        let params = self.remote_search_params(query);
        let fp = fingerprint(Endpoint::DisclosureList, &params);
        if let Some(payload) = self.cache.get(&fp).await? {
            match serde_json::from_str(&payload) {
                Ok(envelope) => {
                    debug!("Response cache satisfied search");
                    return Ok(envelope);
                }
                Err(e) => warn!(error = %e, "Discarding undecodable cached search payload"),
            }
        }

        match self.provider.fetch_disclosures(&params).await? {
            RemoteOutcome::Unconfigured => {
                debug!("No remote credential, returning empty local result");
                Ok(DisclosureEnvelope::local(page, 0, Vec::new()))
            }
            RemoteOutcome::Envelope(envelope) => {
                if envelope.is_success() && !envelope.list.is_empty() {
                    match self.store.ingest_disclosures(&envelope.list).await {
                        Ok(report) => debug!(?report, "Reconciled remote search into store"),
                        Err(e) => warn!(error = %e, "Failed to ingest remote disclosures"),
                    }
                    self.cache_envelope(&fp, &envelope, SEARCH_TTL).await;
                }
                Ok(envelope)
            }
        }
    }

    /// Fetches the financial statement line items for one statement key.
    ///
    /// Local lines are authoritative; otherwise the cache and then the
    /// remote provider are consulted. A successful remote result replaces
    /// the stored line set wholesale, bumps account popularity, and is
    /// cached. With no remote credential configured a "no data" envelope
    /// is returned.
    #[instrument(skip(self), fields(corp_code = %key.corp_code))]
    pub async fn financial_statements(&self, key: &StatementKey) -> Result<FinancialEnvelope> {
        let local = self.store.financial_lines(key).await?;
        if !local.is_empty() {
            debug!(rows = local.len(), "Local store satisfied financial lookup");
            return Ok(FinancialEnvelope::local(local));
        }

        let mut params = BTreeMap::new();
        params.insert("corp_code".to_string(), key.corp_code.to_string());
        params.insert("bsns_year".to_string(), key.bsns_year.clone());
        params.insert("reprt_code".to_string(), key.reprt_code.clone());
        let fp = fingerprint(Endpoint::FinancialAccounts, &params);

        if let Some(payload) = self.cache.get(&fp).await? {
            match serde_json::from_str(&payload) {
                Ok(envelope) => {
                    debug!("Response cache satisfied financial lookup");
                    return Ok(envelope);
                }
                Err(e) => warn!(error = %e, "Discarding undecodable cached financial payload"),
            }
        }

        match self.provider.fetch_financials(key).await? {
            RemoteOutcome::Unconfigured => {
                debug!("No remote credential, reporting no data");
                Ok(FinancialEnvelope::no_data())
            }
            RemoteOutcome::Envelope(envelope) => {
                if envelope.is_success() && !envelope.list.is_empty() {
                    if let Err(e) = self.store.replace_financial_lines(key, &envelope.list).await {
                        warn!(error = %e, "Failed to persist remote financial lines");
                    }
                    let names: Vec<String> = envelope
                        .list
                        .iter()
                        .map(|line| line.account_nm.clone())
                        .collect();
                    if let Err(e) = self.store.bump_account_usage(&names).await {
                        warn!(error = %e, "Failed to bump account usage");
                    }
                    self.cache_envelope(&fp, &envelope, FINANCIAL_TTL).await;
                }
                Ok(envelope)
            }
        }
    }

    /// Returns the most frequently requested account names.
    pub async fn popular_accounts(&self, limit: u32) -> Result<Vec<String>> {
        self.store.popular_accounts(limit).await
    }

    /// Searches previously seen account names by substring.
    pub async fn search_accounts(&self, query: &str, limit: u32) -> Result<Vec<String>> {
        self.store.search_accounts(query, limit).await
    }

    /// Rolls tagged financial content up into the account hierarchy.
    ///
    /// Stateless; does not touch the resolution chain.
    #[must_use]
    pub fn financial_hierarchy(&self, raw_content: &str) -> Vec<HierarchyNode> {
        self.hierarchy.from_content(raw_content)
    }

    /// Drops expired response cache entries, returning how many were
    /// removed.
    pub async fn purge_expired_cache(&self) -> Result<usize> {
        self.cache.purge_expired().await
    }

    async fn resolve_local(&self, query: &DisclosureQuery) -> Result<PagedDisclosures> {
        if let Some(corp_name) = query.corp_name.as_deref().filter(|n| !n.is_empty()) {
            return self
                .store
                .search_by_name(corp_name, query.corp_cls, query.page)
                .await;
        }
        if let Some(corp_code) = &query.corp_code {
            return self
                .store
                .search_by_corp_code(corp_code.as_str(), query.page)
                .await;
        }
        self.store
            .recent_disclosures(query.corp_cls, query.page)
            .await
    }

    /// Outgoing parameters for the remote disclosure search. Recent-filing
    /// queries with no explicit window default to the last
    /// [`RECENT_WINDOW_DAYS`] days, since the remote endpoint requires a
    /// date range to mean "recent".
    fn remote_search_params(&self, query: &DisclosureQuery) -> BTreeMap<String, String> {
        let mut params = query.remote_params();
        if query.corp_code.is_none()
            && query.corp_name.is_none()
            && query.bgn_de.is_none()
            && query.end_de.is_none()
        {
            let today = self.clock.now().date_naive();
            let start = today - chrono::Duration::days(RECENT_WINDOW_DAYS);
            params.insert("bgn_de".to_string(), start.format("%Y%m%d").to_string());
            params.insert("end_de".to_string(), today.format("%Y%m%d").to_string());
        }
        params
    }

    async fn cache_envelope<T: serde::Serialize>(&self, fp: &str, envelope: &T, ttl: Duration) {
        match serde_json::to_string(envelope) {
            Ok(payload) => {
                if let Err(e) = self.cache.put(fp, &payload, ttl).await {
                    warn!(error = %e, "Failed to cache response payload");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize response for caching"),
        }
    }
}
