//! Remote provider trait and request parameter handling.
//!
//! The provider is the last resort in the resolution chain: it is only
//! consulted after both the local store and the response cache failed to
//! satisfy a query.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::fmt::Debug;

use crate::envelope::{DisclosureEnvelope, FinancialEnvelope};
use crate::error::Result;
use crate::types::StatementKey;

/// Name of the credential parameter injected into outgoing requests.
///
/// This key is stripped before cache fingerprints are derived, so two
/// requests differing only by credential share a fingerprint.
pub const CREDENTIAL_PARAM: &str = "crtfc_key";

/// Logical remote endpoints served by the provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Disclosure document search.
    DisclosureList,
    /// Single-company financial accounts.
    FinancialAccounts,
}

impl Endpoint {
    /// Returns the endpoint path on the provider API.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DisclosureList => "list.json",
            Self::FinancialAccounts => "fnlttSinglAcnt.json",
        }
    }
}

/// Outcome of a remote fetch.
///
/// A missing credential is modeled as a distinct variant rather than a
/// synthesized domain envelope, so callers can tell "remote configuration
/// absent" apart from "remote reported zero results".
#[derive(Clone, Debug, PartialEq)]
pub enum RemoteOutcome<T> {
    /// No credential is configured; no network call was made.
    Unconfigured,
    /// The provider answered with an envelope (success or domain error).
    Envelope(T),
}

/// Trait for the remote disclosure/financial data provider.
///
/// Implementations inject the credential into outgoing parameters, carry
/// one bounded timeout per request, and surface transport failures as
/// [`DartError::Transport`](crate::DartError::Transport) without retrying.
#[async_trait]
pub trait DisclosureProvider: Send + Sync + Debug {
    /// Returns the name of this provider (e.g. "OpenDART").
    fn name(&self) -> &str;

    /// Fetches a page of disclosure documents.
    ///
    /// `params` is the non-credential parameter set (the same map the
    /// cache fingerprint is derived from).
    async fn fetch_disclosures(
        &self,
        params: &BTreeMap<String, String>,
    ) -> Result<RemoteOutcome<DisclosureEnvelope>>;

    /// Fetches the financial statement line items for one statement key.
    async fn fetch_financials(&self, key: &StatementKey)
    -> Result<RemoteOutcome<FinancialEnvelope>>;
}
