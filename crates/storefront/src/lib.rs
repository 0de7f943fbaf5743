//! C¥BRD storefront library.
//!
//! Catalog, the shopper's locally persisted stores (cart, wishlist, session,
//! recently viewed), checkout, and the axum JSON view layer. Exposed as a
//! library so the CLI and the integration tests drive the same code as the
//! server binary.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;
pub mod stores;
