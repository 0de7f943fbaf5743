//! Wishlist store: an insertion-ordered set of product ids.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use cybrd_core::ProductId;

use super::ChangeNotifier;
use crate::storage::Persistence;

/// Storage key for the wishlist.
pub const WISHLIST_KEY: &str = "cbrd.wishlist.v1";

/// Saved product ids, oldest first, without duplicates.
///
/// Persisted as `{"ids":[...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishlistState {
    #[serde(default)]
    pub ids: Vec<ProductId>,
}

/// Accepted on load: the current object form and the older bare id array.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredWishlist {
    Object(WishlistState),
    Ids(Vec<ProductId>),
}

impl StoredWishlist {
    fn into_ids(self) -> Vec<ProductId> {
        match self {
            Self::Object(state) => state.ids,
            Self::Ids(ids) => ids,
        }
    }
}

impl WishlistState {
    fn dedup(ids: Vec<ProductId>) -> Self {
        let mut state = Self::default();
        for id in ids {
            state.insert(id);
        }
        state
    }

    fn insert(&mut self, id: ProductId) -> bool {
        if self.ids.contains(&id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    fn delete(&mut self, id: ProductId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|i| *i != id);
        self.ids.len() != before
    }
}

#[derive(Debug)]
pub struct WishlistStore {
    state: WishlistState,
    persistence: Persistence,
    changes: ChangeNotifier,
}

impl WishlistStore {
    /// Load the persisted wishlist, or start empty.
    #[must_use]
    pub fn hydrate(persistence: Persistence) -> Self {
        let state = persistence
            .load::<StoredWishlist>(WISHLIST_KEY)
            .map(|stored| WishlistState::dedup(stored.into_ids()))
            .unwrap_or_default();

        Self {
            state,
            persistence,
            changes: ChangeNotifier::new(),
        }
    }

    fn commit(&self) {
        self.persistence.save(WISHLIST_KEY, &self.state);
        self.changes.notify();
    }

    /// Save `id`. Already-saved ids are left in place.
    pub fn add(&mut self, id: ProductId) {
        tracing::debug!(%id, "wishlist add");
        if self.state.insert(id) {
            self.commit();
        }
    }

    pub fn remove(&mut self, id: ProductId) {
        tracing::debug!(%id, "wishlist remove");
        if self.state.delete(id) {
            self.commit();
        }
    }

    /// Flip membership of `id`. Returns whether it is saved afterwards.
    pub fn toggle(&mut self, id: ProductId) -> bool {
        let saved = if self.state.delete(id) {
            false
        } else {
            self.state.insert(id)
        };
        tracing::debug!(%id, saved, "wishlist toggle");
        self.commit();
        saved
    }

    #[must_use]
    pub fn has(&self, id: ProductId) -> bool {
        self.state.ids.contains(&id)
    }

    pub fn clear(&mut self) {
        if !self.state.ids.is_empty() {
            self.state.ids.clear();
            self.commit();
        }
    }

    #[must_use]
    pub fn ids(&self) -> &[ProductId] {
        &self.state.ids
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::storage::{LocalStorage, MemoryStorage, PersistOp, RecordingHook};

    fn id(n: i32) -> ProductId {
        ProductId::new(n)
    }

    #[test]
    fn test_add_is_idempotent_and_ordered() {
        let mut wishlist = WishlistStore::hydrate(Persistence::in_memory());
        wishlist.add(id(3));
        wishlist.add(id(1));
        wishlist.add(id(3));
        assert_eq!(wishlist.ids(), &[id(3), id(1)]);
    }

    #[test]
    fn test_toggle_twice_restores_membership() {
        let mut wishlist = WishlistStore::hydrate(Persistence::in_memory());
        wishlist.add(id(2));

        for n in [2, 5] {
            let before = wishlist.has(id(n));
            assert_eq!(wishlist.toggle(id(n)), !before);
            assert_eq!(wishlist.toggle(id(n)), before);
            assert_eq!(wishlist.has(id(n)), before);
        }
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut wishlist = WishlistStore::hydrate(Persistence::in_memory());
        let rx = wishlist.subscribe();
        wishlist.remove(id(9));
        wishlist.clear();
        assert!(wishlist.ids().is_empty());
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_persists_as_ids_object() {
        let storage = Arc::new(MemoryStorage::new());
        let mut wishlist = WishlistStore::hydrate(Persistence::new(storage.clone()));
        wishlist.add(id(4));
        wishlist.add(id(7));

        assert_eq!(
            storage.get_item(WISHLIST_KEY).unwrap().as_deref(),
            Some("{\"ids\":[4,7]}")
        );
        let reloaded = WishlistStore::hydrate(Persistence::new(storage));
        assert_eq!(reloaded.ids(), wishlist.ids());
    }

    #[test]
    fn test_hydration_drops_duplicates() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set_item(WISHLIST_KEY, "[1,2,1,3,2]").unwrap();
        let wishlist = WishlistStore::hydrate(Persistence::new(storage));
        assert_eq!(wishlist.ids(), &[id(1), id(2), id(3)]);
    }

    #[test]
    fn test_hydrates_ids_object() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set_item(WISHLIST_KEY, "{\"ids\":[1,2]}").unwrap();
        let wishlist = WishlistStore::hydrate(Persistence::new(storage));
        assert_eq!(wishlist.ids(), &[id(1), id(2)]);
    }

    #[test]
    fn test_legacy_array_is_rewritten_as_object() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set_item(WISHLIST_KEY, "[5]").unwrap();
        let mut wishlist = WishlistStore::hydrate(Persistence::new(storage.clone()));
        assert_eq!(wishlist.ids(), &[id(5)]);

        wishlist.add(id(6));
        assert_eq!(
            storage.get_item(WISHLIST_KEY).unwrap().as_deref(),
            Some("{\"ids\":[5,6]}")
        );
    }

    #[test]
    fn test_corrupt_value_hydrates_empty() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set_item(WISHLIST_KEY, "{\"ids\":").unwrap();
        let hook = Arc::new(RecordingHook::default());

        let wishlist = WishlistStore::hydrate(Persistence::with_hook(storage, hook.clone()));

        assert!(wishlist.ids().is_empty());
        assert_eq!(
            hook.failures(),
            vec![(PersistOp::Load, WISHLIST_KEY.to_string())]
        );
    }
}
