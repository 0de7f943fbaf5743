//! Recently viewed products, most recent first.

use tokio::sync::watch;

use cybrd_core::ProductId;

use super::ChangeNotifier;
use crate::storage::Persistence;

/// Storage key for the recently viewed list.
pub const RECENT_KEY: &str = "cbrd.recentlyViewed";

/// How many products are remembered.
pub const MAX_RECENT: usize = 10;

#[derive(Debug)]
pub struct RecentlyViewedStore {
    ids: Vec<ProductId>,
    persistence: Persistence,
    changes: ChangeNotifier,
}

impl RecentlyViewedStore {
    #[must_use]
    pub fn hydrate(persistence: Persistence) -> Self {
        let mut store = Self {
            ids: Vec::new(),
            persistence,
            changes: ChangeNotifier::new(),
        };
        if let Some(ids) = store.persistence.load::<Vec<ProductId>>(RECENT_KEY) {
            for id in ids.into_iter().rev() {
                store.push_front(id);
            }
        }
        store
    }

    fn push_front(&mut self, id: ProductId) {
        self.ids.retain(|i| *i != id);
        self.ids.insert(0, id);
        self.ids.truncate(MAX_RECENT);
    }

    /// Move `id` to the front of the list.
    pub fn record(&mut self, id: ProductId) {
        if self.ids.first() == Some(&id) {
            return;
        }
        self.push_front(id);
        self.persistence.save(RECENT_KEY, &self.ids);
        self.changes.notify();
    }

    #[must_use]
    pub fn ids(&self) -> &[ProductId] {
        &self.ids
    }

    pub fn clear(&mut self) {
        if !self.ids.is_empty() {
            self.ids.clear();
            self.persistence.remove(RECENT_KEY);
            self.changes.notify();
        }
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }
}
