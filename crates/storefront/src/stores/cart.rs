//! Cart store.
//!
//! Line items are keyed by (product, size, color). Adding an existing key
//! increments its quantity; quantities never drop below 1.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;

use cybrd_core::{CurrencyCode, Price, ProductId, Size};

use super::ChangeNotifier;
use crate::catalog::Product;
use crate::storage::Persistence;

/// Storage key for the cart.
pub const CART_KEY: &str = "cbrd.cart.v1";

/// Why a product selection cannot become a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// The product comes in several colors and none was chosen.
    #[error("choose a color for {product}")]
    ColorRequired { product: String },

    /// The chosen color is not offered for this product.
    #[error("{product} is not available in {color}")]
    UnknownColor { product: String, color: String },
}

/// One cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: ProductId,
    pub name: String,
    pub price: Price,
    pub image: String,
    pub size: Size,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub quantity: u32,
}

impl CartItem {
    /// Build a line for `product` in the chosen size and color.
    ///
    /// Products with color variants require one of their colors; the color is
    /// normalized to the catalog's spelling. For products without variants
    /// any color is dropped.
    ///
    /// # Errors
    ///
    /// Returns `SelectionError` if a required color is missing or unknown.
    pub fn for_product(
        product: &Product,
        size: Size,
        color: Option<&str>,
        quantity: u32,
    ) -> Result<Self, SelectionError> {
        let color = if product.variants.is_empty() {
            None
        } else {
            let requested = color
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .ok_or_else(|| SelectionError::ColorRequired {
                    product: product.name.clone(),
                })?;
            let (name, _) =
                product
                    .variant(requested)
                    .ok_or_else(|| SelectionError::UnknownColor {
                        product: product.name.clone(),
                        color: requested.to_string(),
                    })?;
            Some(name.to_string())
        };

        Ok(Self {
            product_id: product.id,
            name: product.name.clone(),
            price: product.price,
            image: product.front_image(color.as_deref()).to_string(),
            size,
            color,
            quantity: quantity.max(1),
        })
    }

    /// Identity key of this line.
    #[must_use]
    pub fn key(&self) -> LineKey {
        LineKey::new(self.product_id, self.size, self.color.clone())
    }

    /// Price × quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }

    fn has_key(&self, key: &LineKey) -> bool {
        self.product_id == key.product_id && self.size == key.size && self.color == key.color
    }
}

/// Identity of a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineKey {
    pub product_id: ProductId,
    pub size: Size,
    #[serde(default)]
    pub color: Option<String>,
}

impl LineKey {
    #[must_use]
    pub const fn new(product_id: ProductId, size: Size, color: Option<String>) -> Self {
        Self {
            product_id,
            size,
            color,
        }
    }
}

/// Cart mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    Add(CartItem),
    Remove(LineKey),
    SetQuantity { key: LineKey, quantity: i64 },
    Clear,
}

/// Ordered cart lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartState {
    #[serde(default)]
    pub items: Vec<CartItem>,
}

impl CartState {
    /// Rebuild a state from raw lines, merging duplicate keys and lifting
    /// zero quantities to 1.
    #[must_use]
    pub fn from_items(items: impl IntoIterator<Item = CartItem>) -> Self {
        let mut state = Self::default();
        for item in items {
            state.reduce(CartAction::Add(item));
        }
        state
    }

    /// Apply one action. Returns whether the state changed.
    pub fn reduce(&mut self, action: CartAction) -> bool {
        match action {
            CartAction::Add(mut item) => {
                item.quantity = item.quantity.max(1);
                let key = item.key();
                if let Some(line) = self.items.iter_mut().find(|i| i.has_key(&key)) {
                    line.quantity = line.quantity.saturating_add(item.quantity);
                } else {
                    self.items.push(item);
                }
                true
            }
            CartAction::Remove(key) => {
                let before = self.items.len();
                self.items.retain(|i| !i.has_key(&key));
                self.items.len() != before
            }
            CartAction::SetQuantity { key, quantity } => {
                let quantity = u32::try_from(quantity.max(1)).unwrap_or(u32::MAX);
                match self.items.iter_mut().find(|i| i.has_key(&key)) {
                    Some(line) if line.quantity != quantity => {
                        line.quantity = quantity;
                        true
                    }
                    _ => false,
                }
            }
            CartAction::Clear => {
                let changed = !self.items.is_empty();
                self.items.clear();
                changed
            }
        }
    }

    /// Total units across lines.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.items
            .iter()
            .fold(0_u32, |sum, i| sum.saturating_add(i.quantity))
    }

    /// Sum of line totals, saturating at the `Decimal` bounds. All catalog
    /// prices share one currency; an empty cart reports zero in the default
    /// currency.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        let currency = self
            .items
            .first()
            .map_or_else(CurrencyCode::default, |i| i.price.currency_code);
        let amount = self
            .items
            .iter()
            .fold(Decimal::ZERO, |sum, i| sum.saturating_add(i.line_total().amount));
        Price::new(amount, currency)
    }
}

/// Owns the cart and keeps local storage in sync with it.
#[derive(Debug)]
pub struct CartStore {
    state: CartState,
    persistence: Persistence,
    changes: ChangeNotifier,
}

impl CartStore {
    /// Load the persisted cart, or start empty.
    #[must_use]
    pub fn hydrate(persistence: Persistence) -> Self {
        let state = persistence
            .load::<CartState>(CART_KEY)
            .map(|s| CartState::from_items(s.items))
            .unwrap_or_default();

        Self {
            state,
            persistence,
            changes: ChangeNotifier::new(),
        }
    }

    /// Apply an action, then persist and notify if anything changed.
    pub fn dispatch(&mut self, action: CartAction) {
        tracing::debug!(?action, "cart action");
        if self.state.reduce(action) {
            self.persistence.save(CART_KEY, &self.state);
            self.changes.notify();
        }
    }

    pub fn add(&mut self, item: CartItem) {
        self.dispatch(CartAction::Add(item));
    }

    pub fn remove(&mut self, product_id: ProductId, size: Size, color: Option<&str>) {
        self.dispatch(CartAction::Remove(LineKey::new(
            product_id,
            size,
            color.map(str::to_string),
        )));
    }

    /// Set a line's quantity; values below 1 become 1.
    pub fn set_quantity(
        &mut self,
        product_id: ProductId,
        size: Size,
        color: Option<&str>,
        quantity: i64,
    ) {
        self.dispatch(CartAction::SetQuantity {
            key: LineKey::new(product_id, size, color.map(str::to_string)),
            quantity,
        });
    }

    pub fn clear(&mut self) {
        self.dispatch(CartAction::Clear);
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.state.items
    }

    #[must_use]
    pub fn count(&self) -> u32 {
        self.state.count()
    }

    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.state.subtotal()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.items.is_empty()
    }

    /// Watch for cart changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }
}
