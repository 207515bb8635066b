//! Integration tests for the address check endpoint.
//!
//! Exercises the status table of `/api/check-address` against an in-memory
//! store that counts lookups.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use streetcheck_core::{
    model::AddressRecord,
    policy::{MatchPolicy, ServiceAreaGate},
    ports::{AddressStore, StoreError, StreetQuery},
    service::AddressMatcher,
};
use streetcheck_server::{AppState, MAX_BODY_BYTES};

const COLUMBIA: &str = "6308 Mellow Twilight Court, Columbia, MD 21044, USA";

struct MemoryStore {
    records: Vec<AddressRecord>,
    fail: bool,
    calls: AtomicUsize,
}

impl MemoryStore {
    fn new(records: Vec<AddressRecord>) -> Arc<Self> {
        Arc::new(Self {
            records,
            fail: false,
            calls: AtomicUsize::new(0),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            records: Vec::new(),
            fail: true,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AddressStore for MemoryStore {
    async fn lookup(
        &self,
        query: &StreetQuery,
        limit: usize,
    ) -> Result<Vec<AddressRecord>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(StoreError::Rejected {
                status: StatusCode::SERVICE_UNAVAILABLE,
                body: "connection to db.internal:5432 refused".into(),
            });
        }
        Ok(self
            .records
            .iter()
            .filter(|record| query.accepts(&record.street_address))
            .take(limit)
            .cloned()
            .collect())
    }
}

fn columbia_store() -> Arc<MemoryStore> {
    MemoryStore::new(vec![AddressRecord {
        street_address: "6308 MELLOW TWILIGHT CT".into(),
        village: Some("Owen Brown".into()),
    }])
}

/// Helper: build the app with a Maryland service area around the given store.
fn test_app(store: &Arc<MemoryStore>) -> axum::Router {
    let policy =
        MatchPolicy::default().with_service_area(ServiceAreaGate::new(["21044"], ["MD"]));
    let matcher = AddressMatcher::new(Arc::<MemoryStore>::clone(store), policy);
    streetcheck_server::app(AppState::new(matcher))
}

fn post_json(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/check-address")
        .header("content-type", "application/json")
        .body(Body::from(body.to_owned()))
        .unwrap()
}

/// Helper: read response body as JSON.
async fn body_json(response: axum::http::Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// -- Method handling ------------------------------------------------------------

#[tokio::test]
async fn test_get_is_method_not_allowed() {
    let store = columbia_store();
    let response = test_app(&store)
        .oneshot(
            Request::builder()
                .uri("/api/check-address")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED, "GET is refused");
    assert_eq!(
        body_json(response).await,
        json!({ "error": "Method not allowed" }),
        "405 body"
    );
    assert_eq!(store.calls(), 0, "no lookup for a refused method");
}

// -- Input validation -----------------------------------------------------------

#[tokio::test]
async fn test_invalid_bodies_are_bad_requests() {
    let store = columbia_store();
    for body in [
        "",
        "{}",
        r#"{"address": 12}"#,
        r#"{"address": ["6308 Mellow Twilight Court"]}"#,
        r#"{"address": ""}"#,
        r#"{"address": " , Columbia, MD 21044"}"#,
        r#"{"address": "6308, Columbia, MD 21044"}"#,
    ] {
        let response = test_app(&store).oneshot(post_json(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body:?}");
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Missing or invalid address" }),
            "400 body for {body:?}"
        );
    }
    assert_eq!(store.calls(), 0, "no lookup for invalid input");
}

#[tokio::test]
async fn test_oversize_body_keeps_json_error_shape() {
    let store = columbia_store();
    let padding = "x".repeat(MAX_BODY_BYTES);
    let body = json!({ "address": COLUMBIA, "padding": padding }).to_string();
    let response = test_app(&store).oneshot(post_json(&body)).await.unwrap();

    assert_eq!(
        response.status(),
        StatusCode::PAYLOAD_TOO_LARGE,
        "body over the limit"
    );
    assert_eq!(
        body_json(response).await,
        json!({ "error": "Request body too large" }),
        "413 body is JSON"
    );
    assert_eq!(store.calls(), 0, "no lookup for an oversize body");
}

// -- Verdicts -------------------------------------------------------------------

#[tokio::test]
async fn test_outside_service_area_is_a_non_match() {
    let store = columbia_store();
    let response = test_app(&store)
        .oneshot(post_json(r#"{"address": "500 Elm, Chicago, IL 60601"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK, "gate verdict is a success");
    assert_eq!(
        body_json(response).await,
        json!({
            "matched": false,
            "normalizedKey": "500 ELM",
            "reason": "outside service area",
            "fullAddress": "500 Elm, Chicago, IL 60601",
        }),
        "outside-area body"
    );
    assert_eq!(store.calls(), 0, "gate must skip the lookup");
}

#[tokio::test]
async fn test_matched_address_echoes_region() {
    let store = columbia_store();
    let body = json!({ "address": COLUMBIA }).to_string();
    let response = test_app(&store).oneshot(post_json(&body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK, "matched status");
    assert_eq!(
        body_json(response).await,
        json!({
            "matched": true,
            "normalizedKey": "6308 MELLOW TWILIGHT",
            "region": "Owen Brown",
            "fullAddress": COLUMBIA,
        }),
        "matched body"
    );
    assert_eq!(store.calls(), 1, "exactly one lookup");
}

#[tokio::test]
async fn test_unknown_street_is_a_plain_non_match() {
    let store = columbia_store();
    let response = test_app(&store)
        .oneshot(post_json(
            r#"{"address": "10 Little Patuxent Pkwy, Columbia, MD 21044, USA"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK, "a miss is still a success");
    let body = body_json(response).await;
    assert_eq!(body["matched"], json!(false), "not on the allow-list");
    assert_eq!(
        body["normalizedKey"],
        json!("10 LITTLE PATUXENT PKWY"),
        "PKWY is not a stripped suffix"
    );
    assert!(body.get("reason").is_none(), "no reason for a plain miss");
    assert_eq!(store.calls(), 1, "exactly one lookup");
}

// -- Store failures -------------------------------------------------------------

#[tokio::test]
async fn test_store_failure_is_generic_internal_error() {
    let store = MemoryStore::failing();
    let body = json!({ "address": COLUMBIA }).to_string();
    let response = test_app(&store).oneshot(post_json(&body)).await.unwrap();

    assert_eq!(
        response.status(),
        StatusCode::INTERNAL_SERVER_ERROR,
        "store failure is a 500"
    );
    let body = body_json(response).await;
    assert_eq!(body, json!({ "error": "Database error" }), "generic 500 body");
    assert!(
        !body.to_string().contains("db.internal"),
        "internal detail must not leak"
    );
}

// -- Health ---------------------------------------------------------------------

#[tokio::test]
async fn test_health_returns_ok() {
    let store = columbia_store();
    let response = test_app(&store)
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK, "health status");
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"ok", "health body");
}
