//! Route handlers.

use axum::body::Bytes;
use axum::extract::State;
use axum::extract::rejection::BytesRejection;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::Value;
use streetcheck_core::model::MatchResult;

use crate::AppState;
use crate::error::ApiError;

/// Successful verdict echoed back to the caller.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckAddressResponse {
    /// Matcher verdict, flattened into the top-level object.
    #[serde(flatten)]
    pub result: MatchResult,
    /// Address exactly as submitted, for front-end debugging.
    pub full_address: String,
}

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/check-address",
            post(check_address).fallback(method_not_allowed),
        )
        .route("/health", get(health))
}

async fn check_address(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<CheckAddressResponse>, ApiError> {
    let address = extract_address(&body?)?;
    let result = state.matcher.check(&address).await?;

    Ok(Json(CheckAddressResponse {
        result,
        full_address: address,
    }))
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

async fn health() -> &'static str {
    "ok"
}

/// Pull a non-blank string `address` out of a JSON body.
fn extract_address(body: &[u8]) -> Result<String, ApiError> {
    let payload: Value = serde_json::from_slice(body)
        .map_err(|err| ApiError::InvalidAddress(format!("body is not JSON: {err}")))?;

    match payload.get("address") {
        Some(Value::String(address)) if !address.trim().is_empty() => Ok(address.clone()),
        Some(Value::String(_)) => Err(ApiError::InvalidAddress("address is empty".into())),
        Some(_) => Err(ApiError::InvalidAddress("address must be a string".into())),
        None => Err(ApiError::InvalidAddress("address is missing".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_string_address() {
        let address = extract_address(br#"{"address":"1 Main St, Columbia, MD"}"#)
            .expect("valid body");
        assert_eq!(address, "1 Main St, Columbia, MD", "address");
    }

    #[test]
    fn rejects_unusable_bodies() {
        let bodies: [&[u8]; 6] = [
            b"",
            b"not json",
            br#"{"addr":"1 Main St"}"#,
            br#"{"address":42}"#,
            br#"{"address":null}"#,
            br#"{"address":"   "}"#,
        ];
        for body in bodies {
            assert!(
                matches!(extract_address(body), Err(ApiError::InvalidAddress(_))),
                "{:?} should be rejected",
                String::from_utf8_lossy(body)
            );
        }
    }
}
