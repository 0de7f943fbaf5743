//! Checkout service.
//!
//! Payment capture is not wired up. An accepted order is logged and the cart
//! is emptied; manual transfers (Instapay, Vodafone Cash) are reconciled by
//! hand from the logged transaction reference.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use cybrd_core::{OrderId, PaymentMethod, Price};

use crate::stores::{AuthStore, CartItem, CartStore};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("sign in to check out")]
    NotSignedIn,

    #[error("your cart is empty")]
    EmptyCart,

    #[error("enter the transaction reference for your {0} transfer")]
    MissingReference(PaymentMethod),

    #[error("{0} payments are coming soon")]
    Unavailable(PaymentMethod),
}

/// What the checkout page shows before the order is placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutSummary {
    pub email: String,
    pub items: Vec<CartItem>,
    pub count: u32,
    pub subtotal: Price,
}

/// Build the order summary for the signed-in shopper.
///
/// # Errors
///
/// Returns `CheckoutError::NotSignedIn` without a session.
pub fn summary(cart: &CartStore, auth: &AuthStore) -> Result<CheckoutSummary, CheckoutError> {
    let user = auth.user().ok_or(CheckoutError::NotSignedIn)?;
    Ok(CheckoutSummary {
        email: user.email.clone(),
        items: cart.items().to_vec(),
        count: cart.count(),
        subtotal: cart.subtotal(),
    })
}

/// An order submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PlaceOrder {
    #[serde(default)]
    pub method: PaymentMethod,
    /// Transaction reference for manual transfers.
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderConfirmation {
    pub order_id: OrderId,
    pub email: String,
    pub items: Vec<CartItem>,
    pub subtotal: Price,
    pub method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub placed_at: DateTime<Utc>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Place an order for the cart's contents and empty the cart.
///
/// # Errors
///
/// Fails without touching the cart when the shopper is signed out, the cart
/// is empty, the payment method is not available yet, or a manual transfer
/// has no reference.
pub fn place_order(
    cart: &mut CartStore,
    auth: &AuthStore,
    request: PlaceOrder,
) -> Result<OrderConfirmation, CheckoutError> {
    let user = auth.user().ok_or(CheckoutError::NotSignedIn)?;
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let method = request.method;
    let reference = non_blank(request.reference);
    match method {
        PaymentMethod::Card | PaymentMethod::PayPal => {
            return Err(CheckoutError::Unavailable(method));
        }
        PaymentMethod::Instapay | PaymentMethod::VodafoneCash if reference.is_none() => {
            return Err(CheckoutError::MissingReference(method));
        }
        PaymentMethod::Instapay | PaymentMethod::VodafoneCash => {}
    }

    let confirmation = OrderConfirmation {
        order_id: OrderId::generate(),
        email: user.email.clone(),
        items: cart.items().to_vec(),
        subtotal: cart.subtotal(),
        method,
        reference,
        note: non_blank(request.note),
        placed_at: Utc::now(),
    };

    tracing::info!(
        order_id = %confirmation.order_id,
        user_id = %user.id,
        method = method.label(),
        reference = confirmation.reference.as_deref().unwrap_or_default(),
        items = confirmation.items.len(),
        subtotal = %confirmation.subtotal,
        "order placed"
    );

    cart.clear();
    Ok(confirmation)
}
