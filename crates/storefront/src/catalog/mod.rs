//! Static product catalog.
//!
//! The storefront sells a fixed drop of 14 hoodies. The catalog is built once
//! at startup and is read-only afterwards; lookups by an unknown id return
//! `None` rather than an error.

mod filter;

use std::collections::BTreeMap;

use serde::Serialize;

use cybrd_core::{Price, ProductId};

pub use filter::{ShopFilter, SortMode, SortModeError, available_colors, filter_products};

/// Price of every hoodie in the current drop.
pub const DROP_PRICE_LE: i64 = 699;

/// Front/back imagery for one color of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Variant {
    pub front: String,
    pub back: String,
    pub gallery: Vec<String>,
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    /// Front image.
    pub image: String,
    /// Back image, shown on hover.
    pub back_image: Option<String>,
    pub gallery: Vec<String>,
    /// Color name to imagery, ordered by color name.
    pub variants: BTreeMap<String, Variant>,
}

impl Product {
    /// Color names this product is offered in.
    pub fn colors(&self) -> impl Iterator<Item = &str> {
        self.variants.keys().map(String::as_str)
    }

    /// Whether a color is offered (case-insensitive).
    #[must_use]
    pub fn has_color(&self, color: &str) -> bool {
        self.variant(color).is_some()
    }

    /// Look up a variant by color name (case-insensitive).
    #[must_use]
    pub fn variant(&self, color: &str) -> Option<(&str, &Variant)> {
        self.variants
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(color))
            .map(|(name, variant)| (name.as_str(), variant))
    }

    /// Front image for an optional color, falling back to the default image.
    #[must_use]
    pub fn front_image(&self, color: Option<&str>) -> &str {
        color
            .and_then(|c| self.variant(c))
            .map_or(self.image.as_str(), |(_, v)| v.front.as_str())
    }
}

/// The read-only product list.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog from an explicit product list.
    #[must_use]
    pub const fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// The C¥BRD hoodie drop.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(SEEDS.iter().map(ProductSeed::build).collect())
    }

    /// All products in display order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Find a product by id.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Spell `color` the way a cart line for `id` stores it: the catalog
    /// spelling for products with variants, no color for products without.
    /// Colors of unknown products and unknown colors pass through unchanged.
    #[must_use]
    pub fn canonical_color(&self, id: ProductId, color: Option<&str>) -> Option<String> {
        let color = color?;
        match self.get(id) {
            Some(product) if product.variants.is_empty() => None,
            Some(product) => Some(
                product
                    .variant(color)
                    .map_or(color, |(name, _)| name)
                    .to_string(),
            ),
            None => Some(color.to_string()),
        }
    }

    /// Number of products.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

// =============================================================================
// Built-in data
// =============================================================================

struct ProductSeed {
    id: i32,
    name: &'static str,
    front: &'static str,
    back: Option<&'static str>,
    gallery: &'static [&'static str],
    /// (color, front, back)
    variants: &'static [(&'static str, &'static str, &'static str)],
}

impl ProductSeed {
    fn build(&self) -> Product {
        Product {
            id: ProductId::new(self.id),
            name: self.name.to_string(),
            price: Price::egp(DROP_PRICE_LE),
            image: self.front.to_string(),
            back_image: self.back.map(str::to_string),
            gallery: self.gallery.iter().map(|s| (*s).to_string()).collect(),
            variants: self
                .variants
                .iter()
                .map(|(color, front, back)| {
                    (
                        (*color).to_string(),
                        Variant {
                            front: (*front).to_string(),
                            back: (*back).to_string(),
                            gallery: vec![(*front).to_string(), (*back).to_string()],
                        },
                    )
                })
                .collect(),
        }
    }
}

const fn two_tone(
    black_front: &'static str,
    black_back: &'static str,
    white_front: &'static str,
    white_back: &'static str,
) -> [(&'static str, &'static str, &'static str); 2] {
    [
        ("black", black_front, black_back),
        ("white", white_front, white_back),
    ]
}

const HOODIE_1: [(&str, &str, &str); 2] = two_tone(
    "/products/hoodie-1-front.png",
    "/products/hoodie-1-back.png",
    "/products/hoodie-1-front-white.png",
    "/products/hoodie-1-back-white.png",
);
const HOODIE_2: [(&str, &str, &str); 2] = two_tone(
    "/products/hoodie-2-front.png",
    "/products/hoodie-2-back.png",
    "/products/hoodie-2-front-white.png",
    "/products/hoodie-2-back-white.png",
);
const HOODIE_3: [(&str, &str, &str); 2] = two_tone(
    "/products/hoodie-3-front-black.png",
    "/products/hoodie-3-back-black.png",
    "/products/hoodie-3-front-white.png",
    "/products/hoodie-3-back-white.png",
);
const HOODIE_4: [(&str, &str, &str); 2] = two_tone(
    "/products/hoodie-4-front-black.png",
    "/products/hoodie-4-back-black.png",
    "/products/hoodie-4-front-white.png",
    "/products/hoodie-4-back-white.png",
);
const HOODIE_5: [(&str, &str, &str); 2] = two_tone(
    "/products/hoodie-5-front-black.png",
    "/products/hoodie-5-back-black.png",
    "/products/hoodie-5-front-white.png",
    "/products/hoodie-5-back-white.png",
);

const SEEDS: [ProductSeed; 14] = [
    ProductSeed {
        id: 1,
        name: "Flame Angel",
        front: "/products/hoodie-1-front.png",
        back: Some("/products/hoodie-1-back.png"),
        gallery: &[
            "/products/hoodie-1-front.png",
            "/products/hoodie-1-back.png",
            "/products/hoodie-1-front-white.png",
            "/products/hoodie-1-back-white.png",
        ],
        variants: &HOODIE_1,
    },
    ProductSeed {
        id: 2,
        name: "Skelton",
        front: "/products/hoodie-2-front.png",
        back: Some("/products/hoodie-2-back.png"),
        gallery: &[
            "/products/hoodie-2-front.png",
            "/products/hoodie-2-back.png",
            "/products/hoodie-2-front-white.png",
            "/products/hoodie-2-back-white.png",
        ],
        variants: &HOODIE_2,
    },
    ProductSeed {
        id: 3,
        name: "Rhuds",
        front: "/products/hoodie-3-front-black.png",
        back: Some("/products/hoodie-3-back-black.png"),
        gallery: &[
            "/products/hoodie-3-front-black.png",
            "/products/hoodie-3-back-black.png",
            "/products/hoodie-3-front-white.png",
            "/products/hoodie-3-back-white.png",
        ],
        variants: &HOODIE_3,
    },
    ProductSeed {
        id: 4,
        name: "Vampire",
        front: "/products/hoodie-4-front-black.png",
        back: Some("/products/hoodie-4-back-black.png"),
        gallery: &[
            "/products/hoodie-4-front-black.png",
            "/products/hoodie-4-back-black.png",
            "/products/hoodie-4-front-white.png",
            "/products/hoodie-4-back-white.png",
        ],
        variants: &HOODIE_4,
    },
    ProductSeed {
        id: 5,
        name: "Porshe",
        front: "/products/hoodie-5-front-black.png",
        back: Some("/products/hoodie-5-back-black.png"),
        gallery: &[
            "/products/hoodie-5-front-black.png",
            "/products/hoodie-5-back-black.png",
            "/products/hoodie-5-front-white.png",
            "/products/hoodie-5-back-white.png",
        ],
        variants: &HOODIE_5,
    },
    ProductSeed {
        id: 6,
        name: "Gang",
        front: "/products/hoodie-6-front.jpg",
        back: Some("/products/hoodie-6-back.png"),
        gallery: &["/products/hoodie-6-front.jpg", "/products/hoodie-6-back.png"],
        variants: &[(
            "black",
            "/products/hoodie-6-front.jpg",
            "/products/hoodie-6-back.png",
        )],
    },
    ProductSeed {
        id: 7,
        name: "Ghost",
        front: "/products/hoodie-7-front.png",
        back: Some("/products/hoodie-7-back.png"),
        gallery: &["/products/hoodie-7-front.png", "/products/hoodie-7-back.png"],
        variants: &[(
            "black",
            "/products/hoodie-7-front.png",
            "/products/hoodie-7-back.png",
        )],
    },
    ProductSeed {
        id: 8,
        name: "subra",
        front: "/products/hoodie-8-front.png",
        back: Some("/products/hoodie-8-back.png"),
        gallery: &["/products/hoodie-8-front.png", "/products/hoodie-8-back.png"],
        variants: &[(
            "black",
            "/products/hoodie-8-front.png",
            "/products/hoodie-8-back.png",
        )],
    },
    ProductSeed {
        id: 9,
        name: "CyButter",
        front: "/products/hoodie-9-front-white.png",
        back: Some("/products/hoodie-9-back-white.png"),
        gallery: &[
            "/products/hoodie-9-front-white.png",
            "/products/hoodie-9-back-white.png",
        ],
        variants: &[(
            "white",
            "/products/hoodie-9-front-white.png",
            "/products/hoodie-9-back-white.png",
        )],
    },
    ProductSeed {
        id: 10,
        name: "Univrse",
        front: "/products/hoodie-10-front-white.png",
        back: Some("/products/hoodie-10-back-white.png"),
        gallery: &[
            "/products/hoodie-10-front-white.png",
            "/products/hoodie-10-back-white.png",
        ],
        variants: &[(
            "white",
            "/products/hoodie-10-front-white.png",
            "/products/hoodie-10-back-white.png",
        )],
    },
    ProductSeed {
        id: 11,
        name: "C¥BRD Hoodie 11",
        front: "/products/hoodie-11.jpg",
        back: None,
        gallery: &[],
        variants: &[],
    },
    ProductSeed {
        id: 12,
        name: "C¥BRD Hoodie 12",
        front: "/products/hoodie-12.jpg",
        back: None,
        gallery: &[],
        variants: &[],
    },
    ProductSeed {
        id: 13,
        name: "C¥BRD Hoodie 13",
        front: "/products/hoodie-13.jpg",
        back: None,
        gallery: &[],
        variants: &[],
    },
    ProductSeed {
        id: 14,
        name: "C¥BRD Hoodie 14",
        front: "/products/hoodie-14.jpg",
        back: None,
        gallery: &[],
        variants: &[],
    },
];

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_has_fourteen_unique_ids_in_order() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.len(), 14);
        for (index, product) in catalog.products().iter().enumerate() {
            assert_eq!(product.id.as_i32(), i32::try_from(index).unwrap() + 1);
        }
    }

    #[test]
    fn test_canonical_color() {
        let catalog = Catalog::builtin();
        let black = catalog.canonical_color(ProductId::new(1), Some("BLACK"));
        assert_eq!(black.as_deref(), Some("black"));
        assert_eq!(
            catalog.canonical_color(ProductId::new(1), Some("teal")).as_deref(),
            Some("teal")
        );
        assert_eq!(catalog.canonical_color(ProductId::new(12), Some("red")), None);
        assert_eq!(
            catalog.canonical_color(ProductId::new(99), Some("Red")).as_deref(),
            Some("Red")
        );
        assert_eq!(catalog.canonical_color(ProductId::new(1), None), None);
    }

    #[test]
    fn test_get_unknown_id_is_none() {
        let catalog = Catalog::builtin();
        assert!(catalog.get(ProductId::new(0)).is_none());
        assert!(catalog.get(ProductId::new(15)).is_none());
        assert_eq!(catalog.get(ProductId::new(3)).unwrap().name, "Rhuds");
    }

    #[test]
    fn test_every_product_costs_699_le() {
        let catalog = Catalog::builtin();
        assert!(
            catalog
                .products()
                .iter()
                .all(|p| p.price.to_string() == "699 LE")
        );
    }

    #[test]
    fn test_variant_lookup_is_case_insensitive() {
        let catalog = Catalog::builtin();
        let rhuds = catalog.get(ProductId::new(3)).unwrap();
        let (name, variant) = rhuds.variant("WHITE").unwrap();
        assert_eq!(name, "white");
        assert_eq!(variant.front, "/products/hoodie-3-front-white.png");
        assert_eq!(rhuds.colors().collect::<Vec<_>>(), vec!["black", "white"]);
    }

    #[test]
    fn test_front_image_falls_back_without_variant() {
        let catalog = Catalog::builtin();
        let plain = catalog.get(ProductId::new(12)).unwrap();
        assert_eq!(plain.front_image(Some("black")), "/products/hoodie-12.jpg");
        let ghost = catalog.get(ProductId::new(7)).unwrap();
        assert_eq!(ghost.front_image(None), "/products/hoodie-7-front.png");
        assert!(!ghost.has_color("white"));
    }
}
