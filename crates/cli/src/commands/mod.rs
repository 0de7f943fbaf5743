//! Shopper commands.
//!
//! Each command runs against a [`Session`] (the catalog plus the stores
//! hydrated from the data directory) and returns an [`Outcome`] that `main`
//! prints as text or JSON.

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod products;
pub mod wishlist;

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use cybrd_core::ProductId;
use cybrd_storefront::catalog::{Catalog, Product};
use cybrd_storefront::services::CheckoutError;
use cybrd_storefront::storage::{FileStorage, Persistence};
use cybrd_storefront::stores::{AuthError, SelectionError, Stores};

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("no product with id {0}")]
    UnknownProduct(ProductId),

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    #[error("failed to encode output: {0}")]
    Json(#[from] serde_json::Error),
}

/// The catalog and the shopper's stores.
#[derive(Debug)]
pub struct Session {
    pub catalog: Catalog,
    pub stores: Stores,
}

impl Session {
    /// Hydrate the stores from `data_dir`.
    #[must_use]
    pub fn open(data_dir: &Path) -> Self {
        tracing::debug!(data_dir = %data_dir.display(), "opening local storage");
        Self::with_persistence(&Persistence::new(Arc::new(FileStorage::new(data_dir))))
    }

    /// Hydrate the stores from an explicit persistence handle.
    #[must_use]
    pub fn with_persistence(persistence: &Persistence) -> Self {
        Self {
            catalog: Catalog::builtin(),
            stores: Stores::hydrate(persistence),
        }
    }

    /// Look up a product.
    ///
    /// # Errors
    ///
    /// Returns `CliError::UnknownProduct` if the id is not in the catalog.
    pub fn product(&self, id: ProductId) -> Result<&Product, CliError> {
        self.catalog.get(id).ok_or(CliError::UnknownProduct(id))
    }
}

/// What a command reports.
#[derive(Debug)]
pub struct Outcome {
    pub text: String,
    pub json: serde_json::Value,
}

impl Outcome {
    /// Pair a human-readable rendering with a JSON one.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Json` if `value` cannot be encoded.
    pub fn new(text: String, value: &impl Serialize) -> Result<Self, CliError> {
        Ok(Self {
            text,
            json: serde_json::to_value(value)?,
        })
    }

    /// Render for the terminal.
    #[must_use]
    pub fn render(&self, json: bool) -> String {
        if json {
            serde_json::to_string_pretty(&self.json).unwrap_or_else(|_| self.json.to_string())
        } else {
            self.text.clone()
        }
    }
}

/// One-line product summary: `#3  Rhuds  699 LE  [black, white]`.
pub(crate) fn product_line(out: &mut String, product: &Product, saved: bool) {
    let colors: Vec<&str> = product.colors().collect();
    out.push_str(&format!(
        "#{:<3} {:<18} {}",
        product.id.to_string(),
        product.name,
        product.price
    ));
    if !colors.is_empty() {
        out.push_str(&format!("  [{}]", colors.join(", ")));
    }
    if saved {
        out.push_str("  ♥");
    }
    out.push('\n');
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    /// A session over in-memory storage.
    pub(crate) fn session() -> Session {
        Session::with_persistence(&Persistence::in_memory())
    }

    #[test]
    fn test_unknown_product() {
        let session = session();
        let err = session.product(ProductId::new(99)).unwrap_err();
        assert_eq!(err.to_string(), "no product with id 99");
    }

    #[test]
    fn test_product_line() {
        let session = session();
        let mut out = String::new();
        product_line(&mut out, session.product(ProductId::new(3)).unwrap(), true);
        assert!(out.starts_with("#3"));
        assert!(out.contains("Rhuds"));
        assert!(out.contains("699 LE"));
        assert!(out.contains("[black, white]"));
        assert!(out.trim_end().ends_with('♥'));
    }

    #[test]
    fn test_product_line_layout() {
        let session = session();
        let mut out = String::from("> ");
        product_line(&mut out, session.product(ProductId::new(3)).unwrap(), false);
        assert_eq!(out, "> #3   Rhuds              699 LE  [black, white]\n");
    }

    #[test]
    fn test_file_session_persists() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut session = Session::open(dir.path());
            session.stores.wishlist.add(ProductId::new(5));
        }
        let session = Session::open(dir.path());
        assert_eq!(session.stores.wishlist.ids(), &[ProductId::new(5)]);
    }
}
