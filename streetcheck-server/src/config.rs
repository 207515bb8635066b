//! Server settings and matching policy, read from the environment.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use streetcheck_core::{
    policy::{MatchPolicy, ParsePolicyError, ServiceAreaGate},
    service::DEFAULT_LOOKUP_TIMEOUT,
};

const DEFAULT_BIND: &str = "0.0.0.0:3000";

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Listen address could not be parsed.
    #[error("invalid listen address `{0}`")]
    InvalidBind(String),
    /// A numeric variable could not be parsed.
    #[error("invalid number for {0}: {1}")]
    InvalidNumber(&'static str, String),
    /// A boolean variable could not be parsed.
    #[error("invalid boolean for {0}: {1}")]
    InvalidBool(&'static str, String),
    /// Strategy or match mode is unknown.
    #[error(transparent)]
    Policy(#[from] ParsePolicyError),
}

#[derive(Debug, Clone)]
/// Everything the server needs besides the store connection.
pub struct ServerConfig {
    /// Socket to listen on.
    pub bind: SocketAddr,
    /// Upper bound on a single store lookup.
    pub lookup_timeout: Duration,
    /// Matching stages applied to every request.
    pub policy: MatchPolicy,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `STREETCHECK_BIND` (default: `0.0.0.0:3000`, or `0.0.0.0:$PORT` when `PORT` is set)
    /// - `STREETCHECK_LOOKUP_TIMEOUT_MS` (default: 5000)
    /// - `STREETCHECK_STRATEGY`: `full-line`, `suffix-stripped` (default) or `token-pair`
    /// - `STREETCHECK_MATCH_MODE`: `exact`, `prefix` (default) or `contains`
    /// - `STREETCHECK_SERVICE_ZIPS`: comma-separated ZIP codes
    /// - `STREETCHECK_SERVICE_STATES`: comma-separated state tokens, e.g. `MD,MARYLAND`
    /// - `STREETCHECK_INCLUDE_REGION` (default: true)
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a value is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a value is malformed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let bind_raw = match (var("STREETCHECK_BIND"), var("PORT")) {
            (Some(bind), _) => bind,
            (None, Some(port)) => format!("0.0.0.0:{port}"),
            (None, None) => DEFAULT_BIND.to_owned(),
        };
        let bind: SocketAddr = bind_raw
            .parse()
            .map_err(|_err| ConfigError::InvalidBind(bind_raw.clone()))?;

        let lookup_timeout = match var("STREETCHECK_LOOKUP_TIMEOUT_MS") {
            Some(raw) => Duration::from_millis(raw.parse().map_err(|_err| {
                ConfigError::InvalidNumber("STREETCHECK_LOOKUP_TIMEOUT_MS", raw.clone())
            })?),
            None => DEFAULT_LOOKUP_TIMEOUT,
        };

        let mut policy = MatchPolicy::default();
        if let Some(raw) = var("STREETCHECK_STRATEGY") {
            policy.strategy = raw.parse()?;
        }
        if let Some(raw) = var("STREETCHECK_MATCH_MODE") {
            policy.mode = raw.parse()?;
        }
        if let Some(raw) = var("STREETCHECK_INCLUDE_REGION") {
            policy.include_region = parse_bool("STREETCHECK_INCLUDE_REGION", &raw)?;
        }

        let zips = var("STREETCHECK_SERVICE_ZIPS");
        let states = var("STREETCHECK_SERVICE_STATES");
        let policy = policy.with_service_area(ServiceAreaGate::new(
            split_list(zips.as_deref()),
            split_list(states.as_deref()),
        ));

        Ok(Self {
            bind,
            lookup_timeout,
            policy,
        })
    }
}

fn split_list(raw: Option<&str>) -> Vec<&str> {
    raw.map(|list| {
        list.split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

fn parse_bool(name: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool(name, raw.to_owned())),
    }
}
