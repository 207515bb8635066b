//! HTTP surface for the streetcheck address matcher.
//!
//! | Route                     | Method | Purpose                               |
//! |---------------------------|--------|---------------------------------------|
//! | `/api/check-address`      | POST   | Check `{ "address": "..." }`           |
//! | `/health`                 | GET    | Liveness probe                        |

/// Server settings read from the environment.
pub mod config;
/// HTTP error mapping.
pub mod error;
/// Route handlers.
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use streetcheck_core::service::AddressMatcher;
use tower_http::trace::TraceLayer;

/// Request bodies carry a single address; anything larger is refused with 413.
pub const MAX_BODY_BYTES: usize = 16 * 1024;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Matcher with its injected store and policy.
    pub matcher: Arc<AddressMatcher>,
}

impl AppState {
    /// Wrap a matcher for sharing across requests.
    #[must_use]
    pub fn new(matcher: AddressMatcher) -> Self {
        Self {
            matcher: Arc::new(matcher),
        }
    }
}

/// Assemble the application router.
pub fn app(state: AppState) -> Router {
    routes::router()
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
