//! Shop listing filters.
//!
//! A pure transform from the catalog and the shopper's filter state to an
//! ordered view. Recomputed on every request; nothing is cached or persisted.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{Catalog, Product};

/// Error parsing a [`SortMode`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid sort mode: {0} (expected relevance, price_asc, price_desc or name)")]
pub struct SortModeError(pub String);

/// Listing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    /// Catalog order.
    #[default]
    Relevance,
    PriceAsc,
    PriceDesc,
    Name,
}

impl std::str::FromStr for SortMode {
    type Err = SortModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "" | "relevance" => Ok(Self::Relevance),
            "price_asc" => Ok(Self::PriceAsc),
            "price_desc" => Ok(Self::PriceDesc),
            "name" => Ok(Self::Name),
            _ => Err(SortModeError(s.to_string())),
        }
    }
}

/// Filter state of the shop page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShopFilter {
    /// Free-text name query.
    pub query: String,
    /// Keep only products offered in this color.
    pub color: Option<String>,
    pub sort: SortMode,
}

impl ShopFilter {
    fn matches(&self, product: &Product, needle: &str) -> bool {
        let name_ok = needle.is_empty() || product.name.to_lowercase().contains(needle);
        let color_ok = self
            .color
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .is_none_or(|c| product.has_color(c));
        name_ok && color_ok
    }
}

/// Apply `filter` to the catalog.
///
/// Sorting is stable, so products with equal keys keep catalog order.
#[must_use]
pub fn filter_products<'a>(catalog: &'a Catalog, filter: &ShopFilter) -> Vec<&'a Product> {
    let needle = filter.query.trim().to_lowercase();

    let mut products: Vec<&Product> = catalog
        .products()
        .iter()
        .filter(|p| filter.matches(p, &needle))
        .collect();

    let by_price = |a: &&Product, b: &&Product| a.price.amount.cmp(&b.price.amount);
    match filter.sort {
        SortMode::Relevance => {}
        SortMode::PriceAsc => products.sort_by(by_price),
        SortMode::PriceDesc => products.sort_by(|a, b| by_price(b, a)),
        SortMode::Name => products.sort_by(|a, b| compare_names(&a.name, &b.name)),
    }

    products
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Every variant color in the catalog, for the color picker.
#[must_use]
pub fn available_colors(catalog: &Catalog) -> Vec<String> {
    catalog
        .products()
        .iter()
        .flat_map(|p| p.colors().map(str::to_lowercase))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
