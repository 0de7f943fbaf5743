//! Wishlist route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use tracing::instrument;

use cybrd_core::ProductId;

use crate::error::{Result, add_breadcrumb};
use crate::routes::products::{ProductView, find_product, parse_product_id};
use crate::state::AppState;
use crate::stores::WishlistStore;

/// Wishlist response.
#[derive(Debug, Serialize)]
pub struct WishlistView {
    pub ids: Vec<ProductId>,
    /// Saved products still in the catalog, oldest first.
    pub products: Vec<ProductView>,
}

/// Membership of one product.
#[derive(Debug, Serialize)]
pub struct SavedView {
    pub product_id: ProductId,
    pub saved: bool,
}

fn view(state: &AppState, wishlist: &WishlistStore) -> WishlistView {
    WishlistView {
        ids: wishlist.ids().to_vec(),
        products: wishlist
            .ids()
            .iter()
            .filter_map(|id| state.catalog().get(*id))
            .map(|p| ProductView::new(p, wishlist))
            .collect(),
    }
}

/// Display the wishlist.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Result<Json<WishlistView>> {
    let stores = state.stores()?;
    Ok(Json(view(&state, &stores.wishlist)))
}

/// Save a product.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SavedView>> {
    let id = parse_product_id(&id)?;
    find_product(&state, id)?;

    let mut stores = state.stores()?;
    stores.wishlist.add(id);
    Ok(Json(SavedView {
        product_id: id,
        saved: true,
    }))
}

/// Unsave a product. Unsaving an unsaved product is not an error.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SavedView>> {
    let id = parse_product_id(&id)?;

    let mut stores = state.stores()?;
    stores.wishlist.remove(id);
    Ok(Json(SavedView {
        product_id: id,
        saved: false,
    }))
}

/// Flip a product's membership.
#[instrument(skip(state))]
pub async fn toggle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SavedView>> {
    let id = parse_product_id(&id)?;
    find_product(&state, id)?;

    let saved = state.stores()?.wishlist.toggle(id);

    let product_id = id.to_string();
    add_breadcrumb(
        "wishlist",
        if saved { "Saved product" } else { "Unsaved product" },
        Some(&[("product_id", product_id.as_str())]),
    );

    Ok(Json(SavedView {
        product_id: id,
        saved,
    }))
}

/// Empty the wishlist.
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> Result<Json<WishlistView>> {
    let mut stores = state.stores()?;
    stores.wishlist.clear();
    Ok(Json(view(&state, &stores.wishlist)))
}
