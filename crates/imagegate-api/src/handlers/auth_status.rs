//! Sign-in state for the front end.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use http::HeaderMap;
use imagegate_auth::AuthDecision;

use crate::AppState;

/// `GET /api/auth/status`
///
/// Read-only and safe to poll. Always answers 200; denial is expressed in
/// the body.
pub async fn auth_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Json<AuthDecision> {
    let header_name = state.config.auth.principal_header.as_str();

    if state.config.auth.log_headers {
        log_observed_headers(&headers, header_name);
    }

    Json(state.status_policy.evaluate_headers(&headers, header_name))
}

// Names only; values may carry credentials.
fn log_observed_headers(headers: &HeaderMap, principal_header: &str) {
    tracing::debug!(
        count = headers.len(),
        principal_present = headers.contains_key(principal_header),
        "Auth status request headers"
    );
    for name in headers.keys() {
        tracing::debug!(header = %name, "Observed header");
    }
}
