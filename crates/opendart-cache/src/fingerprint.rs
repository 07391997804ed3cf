//! Deterministic cache key derivation.
//!
//! Fingerprints are SHA-256 hashes over the endpoint path and the
//! canonicalized, credential-free parameter set. Sorting happens through
//! the `BTreeMap` key order, so two semantically identical parameter sets
//! yield the same fingerprint regardless of construction order.

use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

use opendart_core::{CREDENTIAL_PARAM, Endpoint};

/// Derives the cache fingerprint for an (endpoint, parameters) pair.
///
/// The credential parameter is excluded before derivation, and the hash
/// bounds the fingerprint to a fixed 64-character hex string independent
/// of parameter volume. Pure function, no side effects.
#[must_use]
pub fn fingerprint(endpoint: Endpoint, params: &BTreeMap<String, String>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(endpoint.as_str().as_bytes());
    hasher.update(b":");
    for (key, value) in params {
        if key == CREDENTIAL_PARAM {
            continue;
        }
        hasher.update(key.as_bytes());
        hasher.update(b"=");
        hasher.update(value.as_bytes());
        hasher.update(b"&");
    }
    hex::encode(hasher.finalize())
}
