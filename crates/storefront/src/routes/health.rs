//! Health check handlers.

use axum::{extract::State, http::StatusCode};

use crate::state::AppState;
use crate::stores::cart::CART_KEY;

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies local storage is readable before returning OK.
/// Returns 503 Service Unavailable otherwise.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.persistence().storage().get_item(CART_KEY) {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "local storage not readable");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
