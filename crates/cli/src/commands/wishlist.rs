//! Wishlist commands.

use serde::Serialize;

use cybrd_core::ProductId;
use cybrd_storefront::catalog::Product;

use super::{CliError, Outcome, Session, product_line};

#[derive(Debug, Serialize)]
struct WishlistReport<'a> {
    ids: &'a [ProductId],
    products: Vec<&'a Product>,
}

fn report(session: &Session) -> Result<Outcome, CliError> {
    let ids = session.stores.wishlist.ids();
    let products: Vec<&Product> = ids
        .iter()
        .filter_map(|id| session.catalog.get(*id))
        .collect();

    let mut text = String::new();
    if products.is_empty() {
        text.push_str("Your wishlist is empty.\n");
    }
    for product in &products {
        product_line(&mut text, product, true);
    }

    Outcome::new(text, &WishlistReport { ids, products })
}

/// `wishlist show`
///
/// # Errors
///
/// Returns an error only if the output cannot be encoded.
pub fn show(session: &Session) -> Result<Outcome, CliError> {
    report(session)
}

/// `wishlist add`
///
/// # Errors
///
/// Returns `CliError::UnknownProduct` for ids outside the catalog.
pub fn add(session: &mut Session, id: ProductId) -> Result<Outcome, CliError> {
    session.product(id)?;
    session.stores.wishlist.add(id);
    report(session)
}

/// `wishlist remove`: removing an unsaved product is not an error.
///
/// # Errors
///
/// Returns an error only if the output cannot be encoded.
pub fn remove(session: &mut Session, id: ProductId) -> Result<Outcome, CliError> {
    session.stores.wishlist.remove(id);
    report(session)
}

/// `wishlist toggle`
///
/// # Errors
///
/// Returns `CliError::UnknownProduct` for ids outside the catalog.
pub fn toggle(session: &mut Session, id: ProductId) -> Result<Outcome, CliError> {
    let name = session.product(id)?.name.clone();
    let saved = session.stores.wishlist.toggle(id);
    let text = if saved {
        format!("Saved {name}.\n")
    } else {
        format!("Removed {name} from your wishlist.\n")
    };
    Outcome::new(
        text,
        &serde_json::json!({ "product_id": id, "saved": saved }),
    )
}

/// `wishlist clear`
///
/// # Errors
///
/// Returns an error only if the output cannot be encoded.
pub fn clear(session: &mut Session) -> Result<Outcome, CliError> {
    session.stores.wishlist.clear();
    report(session)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::commands::tests::session;

    #[test]
    fn test_add_keeps_insertion_order_without_duplicates() {
        let mut session = session();
        add(&mut session, ProductId::new(9)).unwrap();
        add(&mut session, ProductId::new(2)).unwrap();
        let outcome = add(&mut session, ProductId::new(9)).unwrap();

        assert_eq!(outcome.json["ids"], serde_json::json!([9, 2]));
        assert!(outcome.text.starts_with("#9"));
    }

    #[test]
    fn test_add_unknown_product() {
        let mut session = session();
        assert!(matches!(
            add(&mut session, ProductId::new(15)),
            Err(CliError::UnknownProduct(_))
        ));
        assert!(session.stores.wishlist.ids().is_empty());
    }

    #[test]
    fn test_toggle_flips_membership() {
        let mut session = session();
        let outcome = toggle(&mut session, ProductId::new(7)).unwrap();
        assert_eq!(outcome.json["saved"], true);
        assert_eq!(outcome.text, "Saved Ghost.\n");

        let outcome = toggle(&mut session, ProductId::new(7)).unwrap();
        assert_eq!(outcome.json["saved"], false);
        assert!(!session.stores.wishlist.has(ProductId::new(7)));
    }

    #[test]
    fn test_remove_and_clear() {
        let mut session = session();
        add(&mut session, ProductId::new(1)).unwrap();
        add(&mut session, ProductId::new(2)).unwrap();

        let outcome = remove(&mut session, ProductId::new(14)).unwrap();
        assert_eq!(outcome.json["ids"], serde_json::json!([1, 2]));

        let outcome = clear(&mut session).unwrap();
        assert_eq!(outcome.text, "Your wishlist is empty.\n");
    }
}
