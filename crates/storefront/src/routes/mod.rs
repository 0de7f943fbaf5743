//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                  - Liveness check
//! GET  /health/ready            - Readiness check (local storage readable)
//! GET  /products/*              - Product imagery (static files)
//!
//! # Products
//! GET  /api/products            - Shop listing (?q=&color=&sort=)
//! GET  /api/products/recent     - Recently viewed products
//! GET  /api/products/{id}       - Product detail (records recently viewed)
//!
//! # Cart
//! GET  /api/cart                - Cart with count and subtotal
//! GET  /api/cart/count          - Cart badge count
//! POST /api/cart/add            - Add a product in a size and color
//! POST /api/cart/update         - Set a line's quantity (clamped to >= 1)
//! POST /api/cart/remove         - Remove a line
//! POST /api/cart/clear          - Empty the cart
//!
//! # Wishlist
//! GET    /api/wishlist              - Saved products
//! POST   /api/wishlist/clear        - Empty the wishlist
//! POST   /api/wishlist/{id}/toggle  - Flip membership
//! PUT    /api/wishlist/{id}         - Save
//! DELETE /api/wishlist/{id}         - Unsave
//!
//! # Auth (rate limited)
//! POST /api/auth/login          - Sign in
//! POST /api/auth/signup         - Create account and sign in
//! POST /api/auth/logout         - Sign out
//! GET  /api/auth/session        - Current session (user or null)
//! GET  /api/auth/me             - Signed-in shopper (401 if signed out)
//!
//! # Checkout
//! GET  /api/checkout            - Order summary (401 if signed out)
//! POST /api/checkout            - Place order
//! ```

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod health;
pub mod products;
pub mod wishlist;

use axum::{
    Router,
    extract::Request,
    middleware,
    routing::{get, post, put},
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::middleware::{
    api_rate_limiter, auth_rate_limiter, request_id_middleware, security_headers_middleware,
};
use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/recent", get(products::recent))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/count", get(cart::count))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::show))
        .route("/clear", post(wishlist::clear))
        .route("/{id}/toggle", post(wishlist::toggle))
        .route("/{id}", put(wishlist::add).delete(wishlist::remove))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/signup", post(auth::signup))
        .route("/logout", post(auth::logout))
        .route("/session", get(auth::session))
        .route("/me", get(auth::me))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new().route("/", get(checkout::show).post(checkout::place))
}

/// Create all JSON API routes, without rate limiting.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/products", product_routes())
        .nest("/api/cart", cart_routes())
        .nest("/api/wishlist", wishlist_routes())
        .nest("/api/auth", auth_routes())
        .nest("/api/checkout", checkout_routes())
}

/// Create all JSON API routes with per-client rate limits.
///
/// The limiter keys on the peer address, so the router must be served with
/// `into_make_service_with_connect_info::<SocketAddr>()` unless a proxy sets
/// `X-Forwarded-For`.
pub fn rate_limited_routes() -> Router<AppState> {
    Router::new()
        .nest("/api/products", product_routes().layer(api_rate_limiter()))
        .nest("/api/cart", cart_routes().layer(api_rate_limiter()))
        .nest("/api/wishlist", wishlist_routes().layer(api_rate_limiter()))
        .nest("/api/auth", auth_routes().layer(auth_rate_limiter()))
        .nest("/api/checkout", checkout_routes().layer(api_rate_limiter()))
}

/// Assemble the application: health checks, `api` routes, product imagery
/// and the request middleware stack.
pub fn app(state: AppState, api: Router<AppState>) -> Router {
    let images = ServeDir::new(state.config().static_dir.join("products"));

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(api)
        .nest_service("/products", images)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = tracing::field::Empty,
            )
        }))
        .with_state(state)
}

/// The application without rate limiting, as used by tests.
pub fn router(state: AppState) -> Router {
    app(state, routes())
}
