//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `checkout` - Order summary and order placement over the cart and auth stores

pub mod checkout;

pub use checkout::{CheckoutError, CheckoutSummary, OrderConfirmation, PlaceOrder};
