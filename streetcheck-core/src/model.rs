//! Domain data structures for street keys, stored addresses, and verdicts.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Reason reported when the service-area gate rejects an address.
pub const OUTSIDE_SERVICE_AREA: &str = "outside service area";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
/// Normalized street key used to query the address store.
pub struct StreetKey(pub String);

impl StreetKey {
    /// Borrow the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StreetKey {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Row of the hosted address table. Owned by the store; only ever read.
pub struct AddressRecord {
    /// Street line as stored, e.g. `6308 MELLOW TWILIGHT CT`.
    pub street_address: String,
    /// Village or region the street belongs to, when projected.
    #[serde(rename = "Village", default, skip_serializing_if = "Option::is_none")]
    pub village: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Verdict for a single address check.
pub struct MatchResult {
    /// Whether the store holds at least one row for the key.
    pub matched: bool,
    /// Key the store was (or would have been) queried with.
    pub normalized_key: StreetKey,
    /// Why the address was rejected without a lookup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Region of the first matching row.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl MatchResult {
    /// Verdict for an address the service-area gate turned away.
    #[must_use]
    pub fn outside_service_area(normalized_key: StreetKey) -> Self {
        Self {
            matched: false,
            normalized_key,
            reason: Some(OUTSIDE_SERVICE_AREA.to_owned()),
            region: None,
        }
    }
}
