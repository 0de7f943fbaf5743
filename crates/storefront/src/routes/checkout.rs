//! Checkout route handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use tracing::instrument;

use cybrd_core::PaymentMethod;

use crate::error::{Result, add_breadcrumb};
use crate::services::checkout::{self, CheckoutSummary, OrderConfirmation, PlaceOrder};
use crate::state::AppState;

/// A payment option as shown on the checkout page.
#[derive(Debug, Serialize)]
pub struct PaymentOptionView {
    pub method: PaymentMethod,
    pub label: &'static str,
    /// Where manual transfers are sent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<&'static str>,
    pub requires_reference: bool,
}

impl From<PaymentMethod> for PaymentOptionView {
    fn from(method: PaymentMethod) -> Self {
        Self {
            method,
            label: method.label(),
            destination: method.transfer_destination(),
            requires_reference: method.is_manual_transfer(),
        }
    }
}

/// Checkout page response.
#[derive(Debug, Serialize)]
pub struct CheckoutView {
    #[serde(flatten)]
    pub summary: CheckoutSummary,
    pub subtotal_label: String,
    pub payment_options: Vec<PaymentOptionView>,
}

/// Order summary for the signed-in shopper.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Result<Json<CheckoutView>> {
    let stores = state.stores()?;
    let summary = checkout::summary(&stores.cart, &stores.auth)?;

    Ok(Json(CheckoutView {
        subtotal_label: summary.subtotal.to_string(),
        summary,
        payment_options: PaymentMethod::ALL
            .into_iter()
            .map(PaymentOptionView::from)
            .collect(),
    }))
}

/// Place the order and empty the cart.
#[instrument(skip(state))]
pub async fn place(
    State(state): State<AppState>,
    Json(request): Json<PlaceOrder>,
) -> Result<(StatusCode, Json<OrderConfirmation>)> {
    let confirmation = {
        let mut stores = state.stores()?;
        let stores = &mut *stores;
        checkout::place_order(&mut stores.cart, &stores.auth, request)?
    };

    let order_id = confirmation.order_id.to_string();
    add_breadcrumb(
        "checkout",
        "Order placed",
        Some(&[("order_id", order_id.as_str())]),
    );

    Ok((StatusCode::CREATED, Json(confirmation)))
}
