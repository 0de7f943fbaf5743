//! Cart commands.

use serde::Serialize;

use cybrd_core::{Price, ProductId, Size};
use cybrd_storefront::stores::{CartItem, CartStore};

use super::{CliError, Outcome, Session};

#[derive(Debug, Serialize)]
struct CartReport<'a> {
    items: &'a [CartItem],
    count: u32,
    subtotal: Price,
}

fn report(cart: &CartStore) -> Result<Outcome, CliError> {
    let mut text = String::new();
    if cart.is_empty() {
        text.push_str("Your cart is empty.\n");
    } else {
        for item in cart.items() {
            text.push_str(&format!(
                "#{:<3} {:<18} {:<4}",
                item.product_id.to_string(),
                item.name,
                item.size.as_str()
            ));
            if let Some(color) = &item.color {
                text.push_str(&format!(" {color:<6}"));
            }
            text.push_str(&format!(" x{}  {}\n", item.quantity, item.line_total()));
        }
        text.push_str(&format!("{} items, subtotal {}\n", cart.count(), cart.subtotal()));
    }

    Outcome::new(
        text,
        &CartReport {
            items: cart.items(),
            count: cart.count(),
            subtotal: cart.subtotal(),
        },
    )
}

/// `cart show`
///
/// # Errors
///
/// Returns an error only if the output cannot be encoded.
pub fn show(session: &Session) -> Result<Outcome, CliError> {
    report(&session.stores.cart)
}

/// `cart add`: add `quantity` of a product in a size and color.
///
/// # Errors
///
/// Returns `CliError::UnknownProduct` or `CliError::Selection` when the
/// product or its color cannot be chosen.
pub fn add(
    session: &mut Session,
    id: ProductId,
    size: Size,
    color: Option<&str>,
    quantity: u32,
) -> Result<Outcome, CliError> {
    let item = CartItem::for_product(session.product(id)?, size, color, quantity)?;
    session.stores.cart.add(item);
    report(&session.stores.cart)
}

/// `cart remove`
///
/// # Errors
///
/// Returns an error only if the output cannot be encoded.
pub fn remove(
    session: &mut Session,
    id: ProductId,
    size: Size,
    color: Option<&str>,
) -> Result<Outcome, CliError> {
    let color = session.catalog.canonical_color(id, color);
    session.stores.cart.remove(id, size, color.as_deref());
    report(&session.stores.cart)
}

/// `cart set-qty`: values below 1 are stored as 1.
///
/// # Errors
///
/// Returns an error only if the output cannot be encoded.
pub fn set_quantity(
    session: &mut Session,
    id: ProductId,
    size: Size,
    color: Option<&str>,
    quantity: i64,
) -> Result<Outcome, CliError> {
    let color = session.catalog.canonical_color(id, color);
    session
        .stores
        .cart
        .set_quantity(id, size, color.as_deref(), quantity);
    report(&session.stores.cart)
}

/// `cart clear`
///
/// # Errors
///
/// Returns an error only if the output cannot be encoded.
pub fn clear(session: &mut Session) -> Result<Outcome, CliError> {
    session.stores.cart.clear();
    report(&session.stores.cart)
}
