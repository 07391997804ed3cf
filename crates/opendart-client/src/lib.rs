#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/opendart-rs/opendart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! OpenDART remote provider.
//!
//! This crate implements the opendart-core [`DisclosureProvider`] trait
//! against the public [OpenDART](https://opendart.fss.or.kr/) API.
//!
//! # Usage
//!
//! ```rust,ignore
//! use opendart_client::OpenDartClient;
//! use opendart_core::{DisclosureProvider, DisclosureQuery, RemoteOutcome};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = OpenDartClient::from_env();
//!
//!     let query = DisclosureQuery {
//!         corp_name: Some("Samsung".to_string()),
//!         ..DisclosureQuery::new()
//!     };
//!     match client.fetch_disclosures(&query.remote_params()).await? {
//!         RemoteOutcome::Envelope(env) => println!("{} rows", env.list.len()),
//!         RemoteOutcome::Unconfigured => println!("no API key configured"),
//!     }
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use opendart_core::{
    CREDENTIAL_PARAM, DartError, DisclosureEnvelope, DisclosureProvider, Endpoint,
    FinancialEnvelope, RemoteOutcome, Result, StatementKey,
};
use reqwest::Client;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Base URL for the OpenDART API.
const DART_BASE_URL: &str = "https://opendart.fss.or.kr/api";

/// Environment variable consulted by [`OpenDartClient::from_env`].
const API_KEY_ENV: &str = "OPENDART_API_KEY";

/// Per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// OpenDART data provider client.
///
/// The credential is optional: an unconfigured client answers every fetch
/// with [`RemoteOutcome::Unconfigured`] and never touches the network, so
/// the engine can run in local-only mode.
#[derive(Clone)]
pub struct OpenDartClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl fmt::Debug for OpenDartClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenDartClient")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl OpenDartClient {
    /// Create a new client with the given API key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: DART_BASE_URL.to_string(),
            api_key: Some(api_key.into()),
        }
    }

    /// Create a client without a credential.
    ///
    /// All fetches return [`RemoteOutcome::Unconfigured`].
    #[must_use]
    pub fn unconfigured() -> Self {
        Self {
            client: Client::new(),
            base_url: DART_BASE_URL.to_string(),
            api_key: None,
        }
    }

    /// Create a client from the `OPENDART_API_KEY` environment variable,
    /// falling back to an unconfigured client when it is absent or empty.
    #[must_use]
    pub fn from_env() -> Self {
        match std::env::var(API_KEY_ENV) {
            Ok(key) if !key.trim().is_empty() => Self::new(key.trim()),
            _ => Self::unconfigured(),
        }
    }

    /// Create a client with a custom HTTP client and base URL.
    ///
    /// Intended for tests pointing at a local stub server.
    #[must_use]
    pub fn with_client(
        client: Client,
        base_url: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key,
        }
    }

    /// True iff a credential is configured.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Make a GET request with the credential injected and parse the JSON
    /// response, or short-circuit when no credential is configured.
    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        params: &BTreeMap<String, String>,
    ) -> Result<RemoteOutcome<T>> {
        let Some(api_key) = &self.api_key else {
            tracing::debug!(endpoint = endpoint.as_str(), "No API key, skipping remote fetch");
            return Ok(RemoteOutcome::Unconfigured);
        };

        let url = format!("{}/{}", self.base_url, endpoint.as_str());
        let mut query: Vec<(&str, &str)> = params
            .iter()
            .filter(|(k, _)| k.as_str() != CREDENTIAL_PARAM)
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        query.push((CREDENTIAL_PARAM, api_key.as_str()));

        tracing::debug!(endpoint = endpoint.as_str(), "OpenDART request");
        let response = self
            .client
            .get(&url)
            .query(&query)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| DartError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(DartError::Transport(format!("HTTP {status}: {text}")));
        }

        let text = response
            .text()
            .await
            .map_err(|e| DartError::Transport(e.to_string()))?;

        let envelope =
            serde_json::from_str(&text).map_err(|e| DartError::Parse(format!("{e}: {text}")))?;
        Ok(RemoteOutcome::Envelope(envelope))
    }
}

#[async_trait]
impl DisclosureProvider for OpenDartClient {
    fn name(&self) -> &str {
        "OpenDART"
    }

    async fn fetch_disclosures(
        &self,
        params: &BTreeMap<String, String>,
    ) -> Result<RemoteOutcome<DisclosureEnvelope>> {
        self.get(Endpoint::DisclosureList, params).await
    }

    async fn fetch_financials(
        &self,
        key: &StatementKey,
    ) -> Result<RemoteOutcome<FinancialEnvelope>> {
        let mut params = BTreeMap::new();
        params.insert("corp_code".to_string(), key.corp_code.to_string());
        params.insert("bsns_year".to_string(), key.bsns_year.clone());
        params.insert("reprt_code".to_string(), key.reprt_code.clone());
        self.get(Endpoint::FinancialAccounts, &params).await
    }
}
