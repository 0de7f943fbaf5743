//! Core types for C¥BRD.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod payment;
pub mod price;
pub mod size;

pub use id::*;
pub use payment::{PaymentMethod, PaymentMethodError};
pub use price::{CurrencyCode, Price, PriceError};
pub use size::{Size, SizeError};
