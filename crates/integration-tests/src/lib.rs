//! Integration tests for the C¥BRD storefront.
//!
//! Tests drive the full router (middleware included) in process with
//! `tower::ServiceExt::oneshot`, so no server or network is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p cybrd-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `catalog` - Listing, filters, product detail, health checks
//! - `cart_wishlist` - Cart and wishlist flows, persistence across restarts
//! - `auth_checkout` - Sign-in and the checkout flow

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use serde_json::Value;
use tower::ServiceExt;

use cybrd_storefront::routes;
use cybrd_storefront::state::AppState;

/// Response bodies larger than this fail the test.
const MAX_BODY: usize = 1024 * 1024;

/// A router over fresh application state.
#[derive(Clone)]
pub struct TestContext {
    pub state: AppState,
    app: Router,
}

/// A decoded response. Non-JSON bodies come back as a JSON string.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestContext {
    /// Built-in catalog over in-memory storage.
    #[must_use]
    pub fn new() -> Self {
        Self::with_state(AppState::in_memory())
    }

    /// Serve an explicit application state.
    #[must_use]
    pub fn with_state(state: AppState) -> Self {
        Self {
            app: routes::router(state.clone()),
            state,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str) -> TestResponse {
        self.send(Method::POST, uri, None).await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str) -> TestResponse {
        self.send(Method::PUT, uri, None).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.send(Method::DELETE, uri, None).await
    }

    /// Sign in as `email`.
    pub async fn login(&self, email: &str) -> TestResponse {
        self.post_json(
            "/api/auth/login",
            serde_json::json!({ "email": email, "password": "correct horse" }),
        )
        .await
    }

    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .unwrap_or_else(|never| match never {});

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), MAX_BODY)
            .await
            .expect("Failed to read response body");
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
