//! Product route handlers.

use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use cybrd_core::{Price, ProductId, Size};

use crate::catalog::{Product, ShopFilter, SortMode, Variant, available_colors, filter_products};
use crate::error::{AppError, Result};
use crate::state::AppState;
use crate::stores::WishlistStore;

/// How many other products the detail page suggests.
pub const RECOMMENDATION_COUNT: usize = 4;

/// Product card data.
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub price_label: String,
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub back_image: Option<String>,
    pub colors: Vec<String>,
    /// Whether the product is on the wishlist.
    pub saved: bool,
}

impl ProductView {
    pub(crate) fn new(product: &Product, wishlist: &WishlistStore) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.price,
            price_label: product.price.to_string(),
            image: product.image.clone(),
            back_image: product.back_image.clone(),
            colors: product.colors().map(str::to_string).collect(),
            saved: wishlist.has(product.id),
        }
    }
}

/// Shop listing query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ShopQuery {
    pub q: Option<String>,
    pub color: Option<String>,
    pub sort: Option<String>,
}

impl ShopQuery {
    fn into_filter(self) -> Result<ShopFilter> {
        let sort = self
            .sort
            .as_deref()
            .map(str::parse::<SortMode>)
            .transpose()
            .map_err(|e| AppError::BadRequest(e.to_string()))?
            .unwrap_or_default();

        Ok(ShopFilter {
            query: self.q.unwrap_or_default(),
            color: self.color,
            sort,
        })
    }
}

/// Shop listing response.
#[derive(Debug, Serialize)]
pub struct ShopView {
    pub products: Vec<ProductView>,
    pub total: usize,
    /// Colors offered by the color filter.
    pub colors: Vec<String>,
    pub filter: ShopFilter,
}

/// Product detail response.
#[derive(Debug, Serialize)]
pub struct ProductDetailView {
    #[serde(flatten)]
    pub product: ProductView,
    pub gallery: Vec<String>,
    pub variants: BTreeMap<String, Variant>,
    pub sizes: [Size; 4],
    pub recommendations: Vec<ProductView>,
}

/// Parse a product id from a path segment.
///
/// Malformed ids are reported as missing products.
pub(crate) fn parse_product_id(raw: &str) -> Result<ProductId> {
    raw.parse::<ProductId>()
        .map_err(|_| AppError::NotFound(format!("product {raw}")))
}

/// Look up a product, or 404.
pub(crate) fn find_product(state: &AppState, id: ProductId) -> Result<&Product> {
    state
        .catalog()
        .get(id)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}

/// Shop listing with search, color filter and sort.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ShopQuery>,
) -> Result<Json<ShopView>> {
    let filter = query.into_filter()?;
    let catalog = state.catalog();
    let stores = state.stores()?;

    let products: Vec<ProductView> = filter_products(catalog, &filter)
        .into_iter()
        .map(|p| ProductView::new(p, &stores.wishlist))
        .collect();

    Ok(Json(ShopView {
        total: products.len(),
        products,
        colors: available_colors(catalog),
        filter,
    }))
}

/// Product detail. Records the product as recently viewed.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductDetailView>> {
    let id = parse_product_id(&id)?;
    let product = find_product(&state, id)?;

    let mut others: Vec<&Product> = state
        .catalog()
        .products()
        .iter()
        .filter(|p| p.id != id)
        .collect();
    others.shuffle(&mut rand::rng());
    others.truncate(RECOMMENDATION_COUNT);

    let mut stores = state.stores()?;
    stores.recently_viewed.record(id);

    Ok(Json(ProductDetailView {
        product: ProductView::new(product, &stores.wishlist),
        gallery: product.gallery.clone(),
        variants: product.variants.clone(),
        sizes: Size::ALL,
        recommendations: others
            .into_iter()
            .map(|p| ProductView::new(p, &stores.wishlist))
            .collect(),
    }))
}

/// Recently viewed products, most recent first.
#[instrument(skip(state))]
pub async fn recent(State(state): State<AppState>) -> Result<Json<Vec<ProductView>>> {
    let stores = state.stores()?;
    let products = stores
        .recently_viewed
        .ids()
        .iter()
        .filter_map(|id| state.catalog().get(*id))
        .map(|p| ProductView::new(p, &stores.wishlist))
        .collect();
    Ok(Json(products))
}
