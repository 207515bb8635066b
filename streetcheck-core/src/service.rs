//! Address matcher: validates, gates, normalizes, and performs the single store lookup.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::model::MatchResult;
use crate::normalize::normalize;
use crate::policy::MatchPolicy;
use crate::ports::{AddressStore, StoreError, StreetQuery};

/// Upper bound on a store lookup unless configured otherwise.
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(thiserror::Error, Debug)]
/// Failures of a single address check.
pub enum MatchError {
    /// Address is missing, blank, or has no street name. No lookup was issued.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// Store lookup failed or timed out. Never reported as a non-match.
    #[error("Lookup failed: {0}")]
    LookupFailed(#[from] StoreError),
}

/// Matches geocoded addresses against the allow-listed streets of a store.
pub struct AddressMatcher {
    store: Arc<dyn AddressStore>,
    policy: MatchPolicy,
    lookup_timeout: Duration,
}

impl AddressMatcher {
    /// Create a matcher bound to the provided store and policy.
    #[must_use]
    pub fn new(store: Arc<dyn AddressStore>, policy: MatchPolicy) -> Self {
        Self {
            store,
            policy,
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }

    /// Override the lookup timeout.
    #[must_use]
    pub fn with_lookup_timeout(mut self, lookup_timeout: Duration) -> Self {
        self.lookup_timeout = lookup_timeout;
        self
    }

    /// Check a raw geocoder address against the store.
    ///
    /// At most one lookup is issued, and none when the input is invalid or
    /// falls outside the configured service area.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::InvalidInput`] for blank addresses, addresses without a
    /// street line, or street lines that reduce to a bare house number, and [`MatchError::LookupFailed`] when the store errors or times out.
    pub async fn check(&self, raw_address: &str) -> Result<MatchResult, MatchError> {
        if raw_address.trim().is_empty() {
            return Err(MatchError::InvalidInput("address is empty".into()));
        }

        let Some(key) = normalize(raw_address, self.policy.strategy) else {
            return Err(MatchError::InvalidInput("address has no street name".into()));
        };
        debug!(%key, strategy = %self.policy.strategy, "normalized street line");

        if let Some(gate) = &self.policy.service_area
            && !gate.admits(raw_address)
        {
            info!(%key, "address outside service area");
            return Ok(MatchResult::outside_service_area(key));
        }

        let query = StreetQuery::new(key, self.policy.mode, self.policy.include_region);

        let rows = match timeout(self.lookup_timeout, self.store.lookup(&query, 1)).await {
            Ok(Ok(rows)) => rows,
            Ok(Err(err)) => {
                warn!(key = %query.key, error = %err, "address lookup failed");
                return Err(err.into());
            }
            Err(_elapsed) => {
                warn!(key = %query.key, timeout = ?self.lookup_timeout, "address lookup timed out");
                return Err(StoreError::TimedOut(self.lookup_timeout).into());
            }
        };

        let matched = !rows.is_empty();
        let region = if self.policy.include_region {
            rows.into_iter().next().and_then(|record| record.village)
        } else {
            None
        };
        info!(key = %query.key, mode = %query.mode, matched, "address checked");

        Ok(MatchResult {
            matched,
            normalized_key: query.key,
            reason: None,
            region,
        })
    }
}
