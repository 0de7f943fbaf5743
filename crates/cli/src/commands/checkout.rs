//! Checkout commands.

use cybrd_core::PaymentMethod;
use cybrd_storefront::services::{self, PlaceOrder};

use super::{CliError, Outcome, Session};

/// `checkout summary`: what the order would contain.
///
/// # Errors
///
/// Returns `CliError::Checkout` when signed out.
pub fn summary(session: &Session) -> Result<Outcome, CliError> {
    let summary = services::checkout::summary(&session.stores.cart, &session.stores.auth)?;

    let mut text = format!("Checking out as {}\n", summary.email);
    for item in &summary.items {
        text.push_str(&format!(
            "  {} ({}) x{}  {}\n",
            item.name,
            item.size.as_str(),
            item.quantity,
            item.line_total()
        ));
    }
    text.push_str(&format!("Subtotal: {}\n", summary.subtotal));
    text.push_str("Payment options:\n");
    for method in PaymentMethod::ALL {
        text.push_str(&format!("  {:<9} {}", method.to_string(), method.label()));
        if let Some(destination) = method.transfer_destination() {
            text.push_str(&format!(", send to {destination}"));
        }
        text.push('\n');
    }

    Outcome::new(text, &summary)
}

/// `checkout place`: place the order and empty the cart.
///
/// # Errors
///
/// Returns `CliError::Checkout` when signed out, the cart is empty, the
/// method is unavailable, or a transfer reference is missing.
pub fn place(
    session: &mut Session,
    method: PaymentMethod,
    reference: Option<String>,
    note: Option<String>,
) -> Result<Outcome, CliError> {
    let confirmation = services::checkout::place_order(
        &mut session.stores.cart,
        &session.stores.auth,
        PlaceOrder {
            method,
            reference,
            note,
        },
    )?;

    let text = format!(
        "Order {} placed: {} via {}.\nA confirmation goes to {}.\n",
        confirmation.order_id,
        confirmation.subtotal,
        method.label(),
        confirmation.email
    );
    Outcome::new(text, &confirmation)
}
