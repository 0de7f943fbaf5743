//! Cart route handlers.
//!
//! Every mutation answers with the updated cart so the client never has to
//! refetch it.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use cybrd_core::{Price, ProductId, Size};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::routes::products::find_product;
use crate::state::AppState;
use crate::stores::{CartItem, CartStore};

/// One cart line with its total.
#[derive(Debug, Serialize)]
pub struct CartLineView {
    #[serde(flatten)]
    pub item: CartItem,
    pub line_total: Price,
    pub line_total_label: String,
}

/// Cart response.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub items: Vec<CartLineView>,
    pub count: u32,
    pub subtotal: Price,
    pub subtotal_label: String,
}

impl From<&CartStore> for CartView {
    fn from(cart: &CartStore) -> Self {
        let subtotal = cart.subtotal();
        Self {
            items: cart
                .items()
                .iter()
                .map(|item| {
                    let line_total = item.line_total();
                    CartLineView {
                        item: item.clone(),
                        line_total,
                        line_total_label: line_total.to_string(),
                    }
                })
                .collect(),
            count: cart.count(),
            subtotal,
            subtotal_label: subtotal.to_string(),
        }
    }
}

/// Cart badge response.
#[derive(Debug, Serialize)]
pub struct CartCountView {
    pub count: u32,
}

/// Add to cart request.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    pub size: String,
    pub color: Option<String>,
    pub quantity: Option<u32>,
}

/// Update quantity request.
#[derive(Debug, Deserialize)]
pub struct UpdateCartRequest {
    pub product_id: ProductId,
    pub size: String,
    pub color: Option<String>,
    pub quantity: i64,
}

/// Remove from cart request.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartRequest {
    pub product_id: ProductId,
    pub size: String,
    pub color: Option<String>,
}

fn parse_size(raw: &str) -> Result<Size> {
    raw.parse::<Size>()
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

/// Display the cart.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Result<Json<CartView>> {
    let stores = state.stores()?;
    Ok(Json(CartView::from(&stores.cart)))
}

/// Cart badge count.
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> Result<Json<CartCountView>> {
    let stores = state.stores()?;
    Ok(Json(CartCountView {
        count: stores.cart.count(),
    }))
}

/// Add a product in a size (and color, for products with variants).
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Json(request): Json<AddToCartRequest>,
) -> Result<Json<CartView>> {
    let size = parse_size(&request.size)?;
    let product = find_product(&state, request.product_id)?;
    let item = CartItem::for_product(
        product,
        size,
        request.color.as_deref(),
        request.quantity.unwrap_or(1),
    )?;

    let product_id = product.id.to_string();
    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[("product_id", product_id.as_str()), ("size", size.as_str())]),
    );

    let mut stores = state.stores()?;
    stores.cart.add(item);
    Ok(Json(CartView::from(&stores.cart)))
}

/// Set a line's quantity. Values below 1 are stored as 1.
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Json(request): Json<UpdateCartRequest>,
) -> Result<Json<CartView>> {
    let size = parse_size(&request.size)?;
    let color = state
        .catalog()
        .canonical_color(request.product_id, request.color.as_deref());
    let mut stores = state.stores()?;
    stores
        .cart
        .set_quantity(request.product_id, size, color.as_deref(), request.quantity);
    Ok(Json(CartView::from(&stores.cart)))
}

/// Remove a line. Removing a missing line is not an error.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Json(request): Json<RemoveFromCartRequest>,
) -> Result<Json<CartView>> {
    let size = parse_size(&request.size)?;
    let color = state
        .catalog()
        .canonical_color(request.product_id, request.color.as_deref());

    let product_id = request.product_id.to_string();
    add_breadcrumb(
        "cart",
        "Removed from cart",
        Some(&[("product_id", product_id.as_str())]),
    );

    let mut stores = state.stores()?;
    stores
        .cart
        .remove(request.product_id, size, color.as_deref());
    Ok(Json(CartView::from(&stores.cart)))
}

/// Empty the cart.
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> Result<Json<CartView>> {
    let mut stores = state.stores()?;
    stores.cart.clear();
    Ok(Json(CartView::from(&stores.cart)))
}
