//! Trait describing the address store capability and shared helper types.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Error as ReqwestError;
use reqwest::StatusCode;

use crate::model::{AddressRecord, StreetKey};
use crate::policy::MatchMode;

#[derive(thiserror::Error, Debug)]
/// Errors that can occur while talking to the address store.
pub enum StoreError {
    /// Network layer or response decoding failed.
    #[error("Network error: {0}")]
    Network(#[from] ReqwestError),
    /// Store answered with a non-success status.
    #[error("Store rejected query with {status}: {body}")]
    Rejected {
        /// HTTP status returned by the store.
        status: StatusCode,
        /// Raw response body, kept for operator logs.
        body: String,
    },
    /// Lookup did not complete in time.
    #[error("Lookup timed out after {0:?}")]
    TimedOut(Duration),
    /// Store answered, but its rows lack the expected columns.
    #[error("Malformed store response: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone)]
/// Read-only query against the stored street field.
pub struct StreetQuery {
    /// Normalized key to compare with.
    pub key: StreetKey,
    /// Comparison mode, always case-insensitive.
    pub mode: MatchMode,
    /// Also project the region column.
    pub include_region: bool,
}

impl StreetQuery {
    /// Construct a new street query.
    #[must_use]
    pub fn new(key: StreetKey, mode: MatchMode, include_region: bool) -> Self {
        Self {
            key,
            mode,
            include_region,
        }
    }

    /// Check whether a stored street satisfies this query, ignoring case.
    ///
    /// Stores that cannot push the comparison down can filter with this.
    #[must_use]
    pub fn accepts(&self, stored_street: &str) -> bool {
        let stored = stored_street.to_uppercase();
        let key = self.key.as_str().to_uppercase();
        match self.mode {
            MatchMode::Exact => stored == key,
            MatchMode::Prefix => stored.starts_with(&key),
            MatchMode::Contains => stored.contains(&key),
        }
    }
}

#[async_trait]
/// Backend holding the allow-listed street addresses.
pub trait AddressStore: Send + Sync {
    /// Fetch at most `limit` records whose street field satisfies the query.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the backend cannot be queried.
    async fn lookup(
        &self,
        query: &StreetQuery,
        limit: usize,
    ) -> Result<Vec<AddressRecord>, StoreError>;
}
