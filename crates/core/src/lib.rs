//! C¥BRD Core - Shared types library.
//!
//! This crate provides common types used across all C¥BRD components:
//! - `storefront` - Catalog, local stores, and the HTTP view layer
//! - `cli` - Command-line view layer over the same local stores
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no storage access,
//! no HTTP. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, sizes, and payment methods

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
