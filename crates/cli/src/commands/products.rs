//! Browse the drop.

use serde::Serialize;

use cybrd_core::{ProductId, Size};
use cybrd_storefront::catalog::{
    Product, ShopFilter, SortMode, available_colors, filter_products,
};

use super::{CliError, Outcome, Session, product_line};

#[derive(Debug, Serialize)]
struct Listing<'a> {
    products: Vec<&'a Product>,
    colors: Vec<String>,
}

/// `products list`: the shop listing with optional search, color and sort.
///
/// # Errors
///
/// Returns an error only if the output cannot be encoded.
pub fn list(
    session: &Session,
    query: Option<String>,
    color: Option<String>,
    sort: SortMode,
) -> Result<Outcome, CliError> {
    let filter = ShopFilter {
        query: query.unwrap_or_default(),
        color,
        sort,
    };
    let products = filter_products(&session.catalog, &filter);

    let mut text = String::new();
    if products.is_empty() {
        text.push_str("No products match.\n");
    }
    for product in &products {
        product_line(&mut text, product, session.stores.wishlist.has(product.id));
    }

    Outcome::new(
        text,
        &Listing {
            products,
            colors: available_colors(&session.catalog),
        },
    )
}

/// `products show`: one product's details. Records it as recently viewed.
///
/// # Errors
///
/// Returns `CliError::UnknownProduct` for ids outside the catalog.
pub fn show(session: &mut Session, id: ProductId) -> Result<Outcome, CliError> {
    let product = session.product(id)?;

    let mut text = String::new();
    product_line(&mut text, product, session.stores.wishlist.has(id));
    let sizes: Vec<&str> = Size::ALL.iter().map(Size::as_str).collect();
    text.push_str(&format!("  sizes: {}\n", sizes.join(", ")));
    for (color, variant) in &product.variants {
        text.push_str(&format!("  {color}: {} / {}\n", variant.front, variant.back));
    }
    if product.variants.is_empty() {
        text.push_str(&format!("  image: {}\n", product.image));
    }

    let outcome = Outcome::new(text, product)?;
    session.stores.recently_viewed.record(id);
    Ok(outcome)
}

/// `products recent`: recently viewed products, most recent first.
///
/// # Errors
///
/// Returns an error only if the output cannot be encoded.
pub fn recent(session: &Session) -> Result<Outcome, CliError> {
    let products: Vec<_> = session
        .stores
        .recently_viewed
        .ids()
        .iter()
        .filter_map(|id| session.catalog.get(*id))
        .collect();

    let mut text = String::new();
    if products.is_empty() {
        text.push_str("Nothing viewed yet.\n");
    }
    for product in &products {
        product_line(&mut text, product, session.stores.wishlist.has(product.id));
    }

    Outcome::new(text, &products)
}
