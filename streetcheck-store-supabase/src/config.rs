//! Connection settings for the hosted address table.
//!
//! Loaded from the process environment in production; tests build them
//! directly or through [`SupabaseConfig::from_lookup`].

use std::env;
use std::fmt;

use reqwest::Url;

const DEFAULT_TABLE: &str = "addresses";
const DEFAULT_STREET_COLUMN: &str = "street_address";
const DEFAULT_REGION_COLUMN: &str = "Village";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required variable is unset or blank.
    #[error("{0} environment variable is required")]
    MissingVar(&'static str),
    /// A URL could not be parsed.
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    /// A numeric variable could not be parsed.
    #[error("invalid number for {0}: {1}")]
    InvalidNumber(&'static str, String),
}

/// Where and how to reach the address table.
///
/// `Debug` redacts the API key so the config can be logged.
#[derive(Clone)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://abc.supabase.co`.
    pub url: Url,
    /// Anon or service key sent as `apikey` and bearer token.
    pub api_key: String,
    /// Table holding the allow-listed streets.
    pub table: String,
    /// Column compared against the normalized key.
    pub street_column: String,
    /// Column echoed back as the region.
    pub region_column: String,
    /// Per-request HTTP timeout in seconds.
    pub timeout_secs: u64,
}

impl fmt::Debug for SupabaseConfig {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("SupabaseConfig")
            .field("url", &self.url)
            .field("api_key", &"[REDACTED]")
            .field("table", &self.table)
            .field("street_column", &self.street_column)
            .field("region_column", &self.region_column)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl SupabaseConfig {
    /// Configuration with the default table layout.
    #[must_use]
    pub fn new<K: Into<String>>(url: Url, api_key: K) -> Self {
        Self {
            url,
            api_key: api_key.into(),
            table: DEFAULT_TABLE.to_owned(),
            street_column: DEFAULT_STREET_COLUMN.to_owned(),
            region_column: DEFAULT_REGION_COLUMN.to_owned(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `SUPABASE_URL` (required)
    /// - `SUPABASE_ANON_KEY` (required)
    /// - `STREETCHECK_TABLE` (default: `addresses`)
    /// - `STREETCHECK_STREET_COLUMN` (default: `street_address`)
    /// - `STREETCHECK_REGION_COLUMN` (default: `Village`)
    /// - `SUPABASE_TIMEOUT_SECS` (default: 10)
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a required variable is missing or a value is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a required variable is missing or a value is malformed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let raw_url = var("SUPABASE_URL").ok_or(ConfigError::MissingVar("SUPABASE_URL"))?;
        let url = Url::parse(&raw_url)
            .map_err(|err| ConfigError::InvalidUrl("SUPABASE_URL".to_owned(), err.to_string()))?;
        let api_key =
            var("SUPABASE_ANON_KEY").ok_or(ConfigError::MissingVar("SUPABASE_ANON_KEY"))?;

        let mut config = Self::new(url, api_key);
        if let Some(table) = var("STREETCHECK_TABLE") {
            config.table = table;
        }
        if let Some(column) = var("STREETCHECK_STREET_COLUMN") {
            config.street_column = column;
        }
        if let Some(column) = var("STREETCHECK_REGION_COLUMN") {
            config.region_column = column;
        }
        if let Some(raw) = var("SUPABASE_TIMEOUT_SECS") {
            config.timeout_secs = raw
                .parse()
                .map_err(|_err| ConfigError::InvalidNumber("SUPABASE_TIMEOUT_SECS", raw))?;
        }

        Ok(config)
    }

    /// REST endpoint of the configured table.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] when the table name does not form a valid path.
    pub fn table_endpoint(&self) -> Result<Url, ConfigError> {
        let mut base = self.url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.join(&format!("rest/v1/{}", self.table))
            .map_err(|err| ConfigError::InvalidUrl(self.table.clone(), err.to_string()))
    }
}
