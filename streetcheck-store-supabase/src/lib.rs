//! Address store implementation for a Supabase project using its PostgREST API.

mod config;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use streetcheck_core::{
    model::{AddressRecord, StreetKey},
    policy::MatchMode,
    ports::{AddressStore, StoreError, StreetQuery},
};

pub use config::{ConfigError, SupabaseConfig};

type Row = Map<String, Value>;

/// Read-only view of the hosted address table.
pub struct SupabaseStore {
    client: Client,
    config: SupabaseConfig,
    endpoint: Url,
}

impl SupabaseStore {
    /// Create a store bound to the given HTTP client.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the table endpoint cannot be derived from the config.
    pub fn new(client: Client, config: SupabaseConfig) -> Result<Self, ConfigError> {
        let endpoint = config.table_endpoint()?;
        Ok(Self {
            client,
            config,
            endpoint,
        })
    }

    fn select_columns(&self, include_region: bool) -> String {
        if include_region {
            format!("{},{}", self.config.street_column, self.config.region_column)
        } else {
            self.config.street_column.clone()
        }
    }

    // A row without a string street column means the configured column does not
    // match the table; treating it as a miss would hide that.
    fn record_from_row(&self, row: &Row) -> Result<AddressRecord, StoreError> {
        let street_address = row
            .get(&self.config.street_column)
            .and_then(Value::as_str)
            .ok_or_else(|| {
                StoreError::Malformed(format!(
                    "row has no text column {:?}",
                    self.config.street_column
                ))
            })?
            .to_owned();
        let village = row
            .get(&self.config.region_column)
            .and_then(Value::as_str)
            .map(str::to_owned);

        Ok(AddressRecord {
            street_address,
            village,
        })
    }
}

#[async_trait]
impl AddressStore for SupabaseStore {
    async fn lookup(
        &self,
        query: &StreetQuery,
        limit: usize,
    ) -> Result<Vec<AddressRecord>, StoreError> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let select = self.select_columns(query.include_region);
        let filter = format!("ilike.{}", like_pattern(&query.key, query.mode));
        let limit_param = limit.to_string();

        debug!(table = %self.config.table, %filter, "querying address table");

        let req = self
            .client
            .get(self.endpoint.clone())
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
            .query(&[
                ("select", select.as_str()),
                (self.config.street_column.as_str(), filter.as_str()),
                ("limit", limit_param.as_str()),
            ]);

        let rows = fetch_json::<Vec<Row>>(req).await?;

        rows.iter()
            .take(limit)
            .map(|row| self.record_from_row(row))
            .collect()
    }
}

/// Build the `ilike` pattern for a key. `*` is the PostgREST wildcard, so a
/// literal `*` is escaped along with the SQL ones.
fn like_pattern(key: &StreetKey, mode: MatchMode) -> String {
    let mut escaped = String::with_capacity(key.as_str().len());
    for ch in key.as_str().chars() {
        if matches!(ch, '\\' | '%' | '_' | '*') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }

    match mode {
        MatchMode::Exact => escaped,
        MatchMode::Prefix => format!("{escaped}*"),
        MatchMode::Contains => format!("*{escaped}*"),
    }
}

// Decode JSON, keeping the body of rejected requests for the operator log.
async fn fetch_json<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, StoreError> {
    let resp = req.send().await.map_err(StoreError::from)?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(StoreError::Rejected { status, body });
    }

    resp.json().await.map_err(StoreError::from)
}
