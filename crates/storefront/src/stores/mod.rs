//! Shopper state containers.
//!
//! Each store owns one slice of state, hydrates it from [`Persistence`] when
//! constructed, and after every change writes it back and bumps a revision
//! counter that views can watch. Stores are plain values mutated through
//! `&mut self`; whoever owns them decides how access is serialized (the HTTP
//! layer keeps a single [`Stores`] behind a mutex, the CLI owns one outright).

pub mod auth;
pub mod cart;
pub mod recently_viewed;
pub mod wishlist;

use tokio::sync::watch;

use crate::storage::Persistence;

pub use auth::{AuthError, AuthState, AuthStore, User};
pub use cart::{CartAction, CartItem, CartState, CartStore, LineKey, SelectionError};
pub use recently_viewed::RecentlyViewedStore;
pub use wishlist::{WishlistState, WishlistStore};

/// Broadcasts a monotonically increasing revision after each change.
#[derive(Debug)]
pub struct ChangeNotifier {
    tx: watch::Sender<u64>,
}

impl ChangeNotifier {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self { tx }
    }

    /// Bump the revision and wake subscribers.
    pub fn notify(&self) {
        self.tx.send_modify(|revision| *revision += 1);
    }

    /// Current revision.
    #[must_use]
    pub fn revision(&self) -> u64 {
        *self.tx.borrow()
    }

    /// Subscribe to future changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.tx.subscribe()
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Every store a shopper session needs, hydrated from one storage.
#[derive(Debug)]
pub struct Stores {
    pub cart: CartStore,
    pub wishlist: WishlistStore,
    pub auth: AuthStore,
    pub recently_viewed: RecentlyViewedStore,
}

impl Stores {
    /// Hydrate all stores from `persistence`.
    #[must_use]
    pub fn hydrate(persistence: &Persistence) -> Self {
        let stores = Self {
            cart: CartStore::hydrate(persistence.clone()),
            wishlist: WishlistStore::hydrate(persistence.clone()),
            auth: AuthStore::hydrate(persistence.clone()),
            recently_viewed: RecentlyViewedStore::hydrate(persistence.clone()),
        };

        tracing::debug!(
            cart_lines = stores.cart.items().len(),
            wishlist = stores.wishlist.ids().len(),
            signed_in = stores.auth.user().is_some(),
            "stores hydrated"
        );

        stores
    }
}
