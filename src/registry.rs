//! In-memory subscription registry
//!
//! Holds at most one subscription per push endpoint. The registry is the
//! only mutator of the collection; dispatch works from `snapshot()` copies.

use std::{
    collections::HashMap,
    sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use crate::types::Subscription;

#[derive(Debug, Default)]
pub struct SubscriptionRegistry {
    subscriptions: RwLock<HashMap<String, Subscription>>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or fully replace the record for `subscription.endpoint`.
    /// Returns `true` when an existing record was replaced.
    pub fn upsert(&self, subscription: Subscription) -> bool {
        self.write()
            .insert(subscription.endpoint.to_owned(), subscription)
            .is_some()
    }

    /// Returns `true` if a record was removed. Absent endpoints are a no-op.
    pub fn remove(&self, endpoint: &str) -> bool {
        self.write().remove(endpoint).is_some()
    }

    pub fn snapshot(&self) -> Vec<Subscription> {
        self.read().values().cloned().collect()
    }

    pub fn count(&self) -> usize {
        self.read().len()
    }

    pub fn contains(&self, endpoint: &str) -> bool {
        self.read().contains_key(endpoint)
    }

    // A panic while holding the lock cannot leave the map half-updated:
    // every mutation is a single insert/remove call.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Subscription>> {
        self.subscriptions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Subscription>> {
        self.subscriptions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
